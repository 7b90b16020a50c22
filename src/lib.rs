//! Matches marketplace listings to a catalog of known products using only
//! the manufacturer name and the free-text title.
//!
//! The catalog is built once ([`CatalogIndex::build`]) and then frozen; the
//! [`MatchingEngine`] resolves each listing to at most one product and the
//! matches are grouped per product in a [`ResultSet`].

pub mod aggregator;
pub mod catalog;
pub mod config;
pub mod matcher;
pub mod model;
pub mod normalizer;
pub mod sink;
pub mod source;

pub use aggregator::ResultSet;
pub use catalog::CatalogIndex;
pub use matcher::{MatchOutcome, MatchReport, MatchingEngine};
pub use model::{Listing, ProductRecord};
