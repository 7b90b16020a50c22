use crate::aggregator::ResultSet;
use crate::catalog::{CatalogIndex, Product};
use crate::matcher::report::MatchReport;
use crate::model::Listing;
use crate::normalizer::normalize;
use futures::future::join_all;
use std::sync::Arc;
use tokio::task::JoinError;
use tracing::{debug, info};

/// Result of resolving a single listing.
#[derive(Debug, Clone, Copy)]
pub enum MatchOutcome<'a> {
    Matched(&'a Product),
    /// No catalog manufacturer contains the listing's manufacturer.
    NoManufacturer,
    /// Manufacturer resolved, but no family or orphan product matched the title.
    NoProduct,
}

/// Everything a match run produces.
#[derive(Debug, Default)]
pub struct MatchRun {
    pub results: ResultSet,
    pub report: MatchReport,
}

impl MatchRun {
    fn merge(&mut self, other: MatchRun) {
        self.results.merge(other.results);
        self.report.merge(other.report);
    }
}

/// Resolves listings against a frozen catalog. Cloning is cheap; clones
/// share the same catalog.
#[derive(Debug, Clone)]
pub struct MatchingEngine {
    catalog: Arc<CatalogIndex>,
    keep_unmatched: bool,
}

impl MatchingEngine {
    pub fn new(catalog: Arc<CatalogIndex>) -> Self {
        Self {
            catalog,
            keep_unmatched: false,
        }
    }

    /// Retain unmatched listings in the run report.
    pub fn keep_unmatched(mut self, keep: bool) -> Self {
        self.keep_unmatched = keep;
        self
    }

    pub fn catalog(&self) -> &CatalogIndex {
        &self.catalog
    }

    /// Manufacturer first, then families in registration order, then orphans.
    pub fn match_listing(&self, listing: &Listing) -> MatchOutcome<'_> {
        let manufacturer_name = normalize(&listing.manufacturer);
        let Some(manufacturer) = self.catalog.resolve_manufacturer(&manufacturer_name) else {
            return MatchOutcome::NoManufacturer;
        };

        let title = normalize(&listing.title);
        let by_family = manufacturer
            .families
            .iter()
            .filter(|family| title.contains(family.name.as_str()))
            .find_map(|family| find_product(&family.products, &title));

        match by_family.or_else(|| find_product(&manufacturer.orphans, &title)) {
            Some(product) => MatchOutcome::Matched(product),
            None => MatchOutcome::NoProduct,
        }
    }

    /// Matches every listing in order, one at a time.
    pub fn run<I>(&self, listings: I) -> MatchRun
    where
        I: IntoIterator<Item = Listing>,
    {
        let mut run = MatchRun::default();
        for listing in listings {
            self.record(&mut run, listing);
        }
        run
    }

    fn record(&self, run: &mut MatchRun, listing: Listing) {
        match self.match_listing(&listing) {
            MatchOutcome::Matched(product) => {
                debug!("'{}' -> {}", listing.title, product.name());
                run.report.matched += 1;
                run.results.record(product.name(), listing);
            }
            MatchOutcome::NoManufacturer => {
                debug!("'{}': no manufacturer for '{}'", listing.title, listing.manufacturer);
                run.report.no_manufacturer += 1;
                if self.keep_unmatched {
                    run.report.unmatched_manufacturer.push(listing);
                }
            }
            MatchOutcome::NoProduct => {
                debug!("'{}': manufacturer found, no product", listing.title);
                run.report.no_product += 1;
                if self.keep_unmatched {
                    run.report.unmatched_product.push(listing);
                }
            }
        }
    }

    /// Splits the listings into `workers` contiguous chunks, matches each on a
    /// blocking task and merges the partial runs in chunk order. The merged
    /// run is identical to what [`run`](Self::run) returns.
    pub async fn run_parallel(&self, listings: Vec<Listing>, workers: usize) -> Result<MatchRun, JoinError> {
        if workers <= 1 || listings.len() < 2 {
            return Ok(self.run(listings));
        }

        let chunk_size = listings.len().div_ceil(workers);
        let mut rest = listings;
        let mut chunks = Vec::with_capacity(workers);
        while !rest.is_empty() {
            let tail = rest.split_off(chunk_size.min(rest.len()));
            chunks.push(rest);
            rest = tail;
        }
        info!("Matching on {} workers, {} listings per chunk", chunks.len(), chunk_size);

        let tasks = chunks.into_iter().map(|chunk| {
            let engine = self.clone();
            tokio::task::spawn_blocking(move || engine.run(chunk))
        });

        let mut merged = MatchRun::default();
        for partial in join_all(tasks).await {
            merged.merge(partial?);
        }
        Ok(merged)
    }
}

/// First product, in list order, whose model is a whole token of the title.
fn find_product<'a>(products: &'a [Product], normalized_title: &str) -> Option<&'a Product> {
    products.iter().find(|p| p.matches_title(normalized_title))
}
