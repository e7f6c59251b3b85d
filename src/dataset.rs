//! Seed-indexed containers for named observables.
//!
//! A [`Dataset`] maps quantity names to [`Quantity`] values; a `Quantity`
//! maps seed identifiers to their [`Timeseries`]. Both are backed by
//! `BTreeMap` so iteration order is stable and aggregation results are
//! reproducible across runs.
//!
//! Ownership: the `Dataset` is the single mutable aggregate. Estimators
//! borrow it read-only; only the quantity algebra in [`crate::algebra`]
//! writes to it.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::Timeseries;

/// One named observable: a mapping from seed identifier to its timeseries.
///
/// Seeds are assumed statistically independent of each other; samples
/// *within* a seed's series are not.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Quantity {
    series: BTreeMap<String, Timeseries>,
}

impl Quantity {
    /// Create an empty quantity.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert (or replace) the series for a seed.
    pub fn insert(&mut self, seed: impl Into<String>, series: Timeseries) {
        self.series.insert(seed.into(), series);
    }

    /// Series for a seed, if present.
    pub fn get(&self, seed: &str) -> Option<&Timeseries> {
        self.series.get(seed)
    }

    /// Iterate over `(seed, series)` pairs in stable (sorted) order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Timeseries)> {
        self.series.iter()
    }

    /// Seed identifiers in stable (sorted) order.
    pub fn seeds(&self) -> impl Iterator<Item = &str> {
        self.series.keys().map(String::as_str)
    }

    /// Number of seeds.
    pub fn len(&self) -> usize {
        self.series.len()
    }

    /// True if no seed has been inserted.
    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}

impl FromIterator<(String, Timeseries)> for Quantity {
    fn from_iter<I: IntoIterator<Item = (String, Timeseries)>>(iter: I) -> Self {
        Self {
            series: iter.into_iter().collect(),
        }
    }
}

/// A collection of named quantities sharing a set of simulation seeds.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    quantities: BTreeMap<String, Quantity>,
}

impl Dataset {
    /// Create an empty dataset.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert (or replace) a quantity.
    pub fn insert(&mut self, name: impl Into<String>, quantity: Quantity) {
        self.quantities.insert(name.into(), quantity);
    }

    /// Quantity by name, if present.
    pub fn get(&self, name: &str) -> Option<&Quantity> {
        self.quantities.get(name)
    }

    /// True if a quantity with this name exists.
    pub fn contains(&self, name: &str) -> bool {
        self.quantities.contains_key(name)
    }

    /// Quantity names in stable (sorted) order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.quantities.keys().map(String::as_str)
    }

    /// Iterate over `(name, quantity)` pairs in stable (sorted) order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Quantity)> {
        self.quantities.iter()
    }

    /// Number of quantities.
    pub fn len(&self) -> usize {
        self.quantities.len()
    }

    /// True if the dataset holds no quantities.
    pub fn is_empty(&self) -> bool {
        self.quantities.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::arr1;

    fn series(vals: &[f64]) -> Timeseries {
        arr1(vals).into_dyn()
    }

    #[test]
    fn iteration_order_is_stable_and_sorted() {
        let mut q = Quantity::new();
        q.insert("seed9", series(&[1.0]));
        q.insert("seed1", series(&[2.0]));
        q.insert("seed5", series(&[3.0]));

        let seeds: Vec<&str> = q.seeds().collect();
        assert_eq!(seeds, vec!["seed1", "seed5", "seed9"]);
    }

    #[test]
    fn insert_replaces_existing_series() {
        let mut q = Quantity::new();
        q.insert("a", series(&[1.0]));
        q.insert("a", series(&[2.0, 3.0]));
        assert_eq!(q.len(), 1);
        assert_eq!(q.get("a").unwrap().len(), 2);
    }

    #[test]
    fn dataset_lookup() {
        let mut ds = Dataset::new();
        let mut q = Quantity::new();
        q.insert("a", series(&[1.0]));
        ds.insert("E", q);

        assert!(ds.contains("E"));
        assert!(!ds.contains("M"));
        assert_eq!(ds.names().collect::<Vec<_>>(), vec!["E"]);
    }
}
