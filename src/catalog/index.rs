use crate::catalog::types::{Family, Manufacturer, Product};
use crate::model::{CatalogError, ProductRecord};
use crate::normalizer::normalize;
use std::collections::HashMap;
use tracing::{debug, info};

/// Every manufacturer in the catalog, sorted by normalized name.
///
/// A sorted sequence rather than a map: listing manufacturers are resolved by
/// substring containment around the binary-search insertion point, which a
/// keyed lookup cannot answer.
#[derive(Debug, Clone, Default)]
pub struct CatalogIndex {
    manufacturers: Vec<Manufacturer>,
}

/// Grouping state used only while the catalog is being built.
#[derive(Default)]
struct Builder {
    manufacturers: Vec<Manufacturer>,
    by_name: HashMap<String, usize>,
    // (manufacturer position, family name) -> family position
    families: HashMap<(usize, String), usize>,
}

impl Builder {
    fn add(&mut self, index: usize, record: &ProductRecord) -> Result<(), CatalogError> {
        let manufacturer = required(index, "manufacturer", &record.manufacturer)?;
        let name = required(index, "product_name", &record.product_name)?;
        let model = required(index, "model", &record.model)?;
        if model.is_empty() {
            return Err(CatalogError::EmptyModel { index });
        }

        let product = Product::new(name, record.family.as_deref(), model)
            .map_err(|source| CatalogError::InvalidPattern { index, source })?;

        let m = self.manufacturer_slot(manufacturer);
        match product.family().map(str::to_string) {
            None => self.manufacturers[m].orphans.push(product),
            Some(family) => {
                let f = self.family_slot(m, family);
                self.manufacturers[m].families[f].products.push(product);
            }
        }
        Ok(())
    }

    fn manufacturer_slot(&mut self, raw_name: &str) -> usize {
        let name = normalize(raw_name);
        if let Some(&pos) = self.by_name.get(&name) {
            return pos;
        }
        let pos = self.manufacturers.len();
        self.manufacturers.push(Manufacturer::new(&name));
        self.by_name.insert(name, pos);
        pos
    }

    fn family_slot(&mut self, manufacturer: usize, name: String) -> usize {
        let families = &mut self.manufacturers[manufacturer].families;
        *self
            .families
            .entry((manufacturer, name))
            .or_insert_with_key(|(_, name)| {
                families.push(Family::new(name));
                families.len() - 1
            })
    }
}

fn required<'a>(
    index: usize,
    field: &'static str,
    value: &'a Option<String>,
) -> Result<&'a str, CatalogError> {
    value
        .as_deref()
        .ok_or(CatalogError::MissingField { index, field })
}

impl CatalogIndex {
    /// Builds the catalog from product records. Any malformed record fails
    /// the whole build; no partial catalog is returned.
    pub fn build<I>(records: I) -> Result<Self, CatalogError>
    where
        I: IntoIterator<Item = ProductRecord>,
    {
        let mut builder = Builder::default();
        for (index, record) in records.into_iter().enumerate() {
            builder.add(index, &record)?;
        }

        let mut manufacturers = builder.manufacturers;
        manufacturers.sort_by(|a, b| a.name.cmp(&b.name));

        let catalog = Self { manufacturers };
        info!(
            "Catalog built: {} manufacturers, {} families, {} products",
            catalog.manufacturers.len(),
            catalog.family_count(),
            catalog.product_count()
        );
        Ok(catalog)
    }

    pub fn manufacturers(&self) -> &[Manufacturer] {
        &self.manufacturers
    }

    pub fn family_count(&self) -> usize {
        self.manufacturers.iter().map(|m| m.families.len()).sum()
    }

    pub fn product_count(&self) -> usize {
        self.manufacturers.iter().map(Manufacturer::product_count).sum()
    }

    /// Finds the manufacturer whose name contains `normalized_name`.
    ///
    /// Only the element at the sorted insertion point and the one right
    /// before it are considered, in that order.
    pub fn resolve_manufacturer(&self, normalized_name: &str) -> Option<&Manufacturer> {
        let index = self
            .manufacturers
            .partition_point(|m| m.name.as_str() < normalized_name);

        let at = self.manufacturers.get(index);
        let before = index.checked_sub(1).and_then(|i| self.manufacturers.get(i));
        let found = [at, before]
            .into_iter()
            .flatten()
            .find(|m| m.name.contains(normalized_name));

        if found.is_none() {
            debug!("No manufacturer around insertion point {} for '{}'", index, normalized_name);
        }
        found
    }
}
