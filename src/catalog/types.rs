use crate::normalizer::{normalize, normalize_opt};
use regex::Regex;

/// A catalog product. All text fields are stored normalized.
#[derive(Debug, Clone)]
pub struct Product {
    name: String,
    family: Option<String>,
    model: String,
    /// `model` as a whole token: never matched inside a longer alphanumeric run.
    whole_model: Regex,
}

impl Product {
    pub fn new(name: &str, family: Option<&str>, model: &str) -> Result<Self, regex::Error> {
        let model = normalize(model);
        let whole_model = Regex::new(&format!(r"(?:^|\b){}(?:$|\b)", regex::escape(&model)))?;
        Ok(Self {
            name: normalize(name),
            family: normalize_opt(family),
            model,
            whole_model,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn family(&self) -> Option<&str> {
        self.family.as_deref()
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Whether the model occurs as a whole token in an already normalized title.
    pub fn matches_title(&self, normalized_title: &str) -> bool {
        self.whole_model.is_match(normalized_title)
    }
}

#[derive(Debug, Clone)]
pub struct Family {
    pub name: String,
    pub products: Vec<Product>,
}

impl Family {
    pub fn new(name: &str) -> Self {
        Self {
            name: normalize(name),
            products: Vec::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Manufacturer {
    pub name: String,
    /// First-seen order.
    pub families: Vec<Family>,
    /// Products registered without a family.
    pub orphans: Vec<Product>,
}

impl Manufacturer {
    pub fn new(name: &str) -> Self {
        Self {
            name: normalize(name),
            families: Vec::new(),
            orphans: Vec::new(),
        }
    }

    pub fn product_count(&self) -> usize {
        self.orphans.len() + self.families.iter().map(|f| f.products.len()).sum::<usize>()
    }
}
