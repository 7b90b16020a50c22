// Matched listings grouped by product name, in first-match order.
use crate::model::{Listing, MatchedProduct};
use std::collections::HashMap;

#[derive(Debug, Default)]
pub struct ResultSet {
    positions: HashMap<String, usize>,
    entries: Vec<(String, Vec<Listing>)>,
}

impl ResultSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `listing` under `product_name`, creating the entry on first use.
    pub fn record(&mut self, product_name: &str, listing: Listing) {
        match self.positions.get(product_name) {
            Some(&pos) => self.entries[pos].1.push(listing),
            None => self.push_entry(product_name.to_string(), vec![listing]),
        }
    }

    fn push_entry(&mut self, product_name: String, listings: Vec<Listing>) {
        self.positions.insert(product_name.clone(), self.entries.len());
        self.entries.push((product_name, listings));
    }

    /// Appends everything recorded in `other` after what is already here.
    ///
    /// Merging the results of contiguous listing chunks in chunk order gives
    /// the same state as recording the listings one by one.
    pub fn merge(&mut self, other: ResultSet) {
        for (product_name, mut listings) in other.entries {
            match self.positions.get(&product_name) {
                Some(&pos) => self.entries[pos].1.append(&mut listings),
                None => self.push_entry(product_name, listings),
            }
        }
    }

    pub fn get(&self, product_name: &str) -> Option<&[Listing]> {
        self.positions
            .get(product_name)
            .map(|&pos| self.entries[pos].1.as_slice())
    }

    /// Number of distinct products with at least one listing.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = MatchedProduct<'_>> {
        self.entries.iter().map(|(product_name, listings)| MatchedProduct {
            product_name,
            listings,
        })
    }

    pub fn finalize(self) -> Vec<(String, Vec<Listing>)> {
        self.entries
    }
}
