// Catalog module: the manufacturer -> family -> product hierarchy.

pub mod index;
pub mod types;

pub use index::CatalogIndex;
pub use types::{Family, Manufacturer, Product};
