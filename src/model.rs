// Core records: ProductRecord, Listing, and the error types of each stage.
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};
use thiserror::Error;

/// One line of the products file, before validation.
///
/// Required fields are kept optional here so the catalog builder can reject
/// an incomplete record with a precise error instead of a generic parse failure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductRecord {
    pub product_name: Option<String>,
    pub manufacturer: Option<String>,
    pub family: Option<String>,
    pub model: Option<String>,
}

impl ProductRecord {
    pub fn new(name: &str, manufacturer: &str, family: Option<&str>, model: &str) -> Self {
        Self {
            product_name: Some(name.to_string()),
            manufacturer: Some(manufacturer.to_string()),
            family: family.map(str::to_string),
            model: Some(model.to_string()),
        }
    }
}

/// A marketplace listing. `manufacturer` and `title` are read out for
/// matching; the original JSON object is carried along untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct Listing {
    pub manufacturer: String,
    pub title: String,
    payload: Map<String, Value>,
}

impl Listing {
    pub fn from_json(value: Value) -> Result<Self, ListingError> {
        let Value::Object(payload) = value else {
            return Err(ListingError::NotAnObject);
        };
        let manufacturer = required_str(&payload, "manufacturer")?;
        let title = required_str(&payload, "title")?;
        Ok(Self {
            manufacturer,
            title,
            payload,
        })
    }

    pub fn payload(&self) -> &Map<String, Value> {
        &self.payload
    }
}

fn required_str(payload: &Map<String, Value>, field: &'static str) -> Result<String, ListingError> {
    match payload.get(field) {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(_) => Err(ListingError::NotAString(field)),
        None => Err(ListingError::MissingField(field)),
    }
}

impl Serialize for Listing {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.payload.serialize(serializer)
    }
}

/// One output line: a product and every listing matched to it.
#[derive(Debug, Serialize)]
pub struct MatchedProduct<'a> {
    pub product_name: &'a str,
    pub listings: &'a [Listing],
}

#[derive(Debug, Error, PartialEq)]
pub enum ListingError {
    #[error("listing is not a JSON object")]
    NotAnObject,
    #[error("listing is missing field `{0}`")]
    MissingField(&'static str),
    #[error("listing field `{0}` is not a string")]
    NotAString(&'static str),
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("product record {index} is missing required field `{field}`")]
    MissingField { index: usize, field: &'static str },
    #[error("product record {index} has an empty model")]
    EmptyModel { index: usize },
    #[error("product record {index}: cannot compile model pattern: {source}")]
    InvalidPattern {
        index: usize,
        #[source]
        source: regex::Error,
    },
}

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{path}:{line}: malformed JSON: {source}")]
    Json {
        path: String,
        line: usize,
        #[source]
        source: serde_json::Error,
    },
    #[error("{path}:{line}: {source}")]
    Listing {
        path: String,
        line: usize,
        #[source]
        source: ListingError,
    },
}

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("cannot write {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot serialize output: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn listing_keeps_payload_verbatim() {
        let raw = json!({
            "title": "Canon PowerShot SX130 IS",
            "manufacturer": "Canon Canada",
            "currency": "CAD",
            "price": "199.99"
        });
        let listing = Listing::from_json(raw.clone()).unwrap();
        assert_eq!(listing.manufacturer, "Canon Canada");
        assert_eq!(listing.title, "Canon PowerShot SX130 IS");
        assert_eq!(serde_json::to_value(&listing).unwrap(), raw);
        // field order survives serialization
        assert_eq!(
            serde_json::to_string(&listing).unwrap(),
            r#"{"title":"Canon PowerShot SX130 IS","manufacturer":"Canon Canada","currency":"CAD","price":"199.99"}"#
        );
    }

    #[test]
    fn listing_requires_manufacturer_and_title() {
        assert_eq!(
            Listing::from_json(json!({"title": "x"})),
            Err(ListingError::MissingField("manufacturer"))
        );
        assert_eq!(
            Listing::from_json(json!({"manufacturer": "x", "title": 5})),
            Err(ListingError::NotAString("title"))
        );
        assert_eq!(Listing::from_json(json!([1, 2])), Err(ListingError::NotAnObject));
    }

    #[test]
    fn product_record_ignores_unknown_fields() {
        let record: ProductRecord = serde_json::from_str(
            r#"{"product_name":"Sony_Cyber-shot_DSC-W310","manufacturer":"Sony","model":"DSC-W310","family":"Cyber-shot","announced-date":"2010-01-06T19:00:00.000-05:00"}"#,
        )
        .unwrap();
        assert_eq!(record.family.as_deref(), Some("Cyber-shot"));
        assert_eq!(record.model.as_deref(), Some("DSC-W310"));
    }
}
