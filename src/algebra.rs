//! Quantity algebra: deriving new per-seed quantities from existing ones.
//!
//! These are the only operations that mutate a [`Dataset`]. Both validate
//! every lookup before touching the dataset, so a failed call leaves it
//! unmodified.

use std::collections::BTreeMap;

use crate::dataset::{Dataset, Quantity};
use crate::error::{EstimateError, Result};
use crate::types::Timeseries;

/// Apply `f` independently to every seed's series of `source`, writing the
/// results under `target` (created or overwritten).
///
/// Pure per-seed map; no cross-seed interaction.
///
/// # Errors
///
/// [`EstimateError::MissingQuantity`] if `source` is absent.
pub fn transform<F>(dataset: &mut Dataset, source: &str, target: &str, f: F) -> Result<()>
where
    F: Fn(&Timeseries) -> Timeseries,
{
    let quantity = dataset
        .get(source)
        .ok_or_else(|| EstimateError::MissingQuantity {
            quantity: source.to_string(),
        })?;
    let derived: Quantity = quantity
        .iter()
        .map(|(seed, series)| (seed.clone(), f(series)))
        .collect();
    dataset.insert(target, derived);
    Ok(())
}

/// Write `target[seed] = Σ prefactors[source] * dataset[source][seed]` over
/// the given sources, each prefactor defaulting to 1.0.
///
/// The first source's data is deep-copied before accumulation, so the
/// original quantity is never mutated in place.
///
/// # Errors
///
/// [`EstimateError::MissingQuantity`] if any source is absent;
/// [`EstimateError::MissingPrefactor`] if a prefactor map is supplied but
/// omits a listed source; [`EstimateError::InvalidInput`] if the sources
/// disagree on seeds or series shapes. The dataset is unmodified on any
/// failure.
pub fn add_quantities(
    dataset: &mut Dataset,
    sources: &[&str],
    target: &str,
    prefactors: Option<&BTreeMap<String, f64>>,
) -> Result<()> {
    if sources.is_empty() {
        return Err(EstimateError::invalid(
            "add_quantities: need at least one source quantity",
        ));
    }

    // Resolve everything up front; mutation happens only after all lookups
    // have succeeded.
    let mut resolved: Vec<(&str, f64, &Quantity)> = Vec::with_capacity(sources.len());
    for &source in sources {
        let quantity = dataset
            .get(source)
            .ok_or_else(|| EstimateError::MissingQuantity {
                quantity: source.to_string(),
            })?;
        let factor = match prefactors {
            None => 1.0,
            Some(map) => *map
                .get(source)
                .ok_or_else(|| EstimateError::MissingPrefactor {
                    quantity: source.to_string(),
                })?,
        };
        resolved.push((source, factor, quantity));
    }

    let (_, first_factor, first) = resolved[0];
    let mut accum: BTreeMap<String, Timeseries> = first
        .iter()
        .map(|(seed, series)| (seed.clone(), series.mapv(|v| first_factor * v)))
        .collect();

    for &(source, factor, quantity) in &resolved[1..] {
        for (seed, acc) in accum.iter_mut() {
            let series = quantity
                .get(seed)
                .ok_or_else(|| {
                    EstimateError::invalid(format!(
                        "add_quantities: quantity '{}' has no series for seed '{}'",
                        source, seed
                    ))
                })?;
            if series.shape() != acc.shape() {
                return Err(EstimateError::invalid(format!(
                    "add_quantities: shape mismatch for seed '{}': {:?} vs {:?} in quantity '{}'",
                    seed,
                    acc.shape(),
                    series.shape(),
                    source
                )));
            }
            acc.zip_mut_with(series, |a, &b| *a += factor * b);
        }
    }

    dataset.insert(target, accum.into_iter().collect());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::arr1;

    fn series(vals: &[f64]) -> Timeseries {
        arr1(vals).into_dyn()
    }

    fn two_seed_dataset() -> Dataset {
        let mut ds = Dataset::new();
        let mut kinetic = Quantity::new();
        kinetic.insert("seed1", series(&[1.0, 2.0, 3.0]));
        kinetic.insert("seed2", series(&[4.0, 5.0, 6.0]));
        let mut potential = Quantity::new();
        potential.insert("seed1", series(&[10.0, 20.0, 30.0]));
        potential.insert("seed2", series(&[40.0, 50.0, 60.0]));
        ds.insert("kinetic", kinetic);
        ds.insert("potential", potential);
        ds
    }

    #[test]
    fn transform_maps_each_seed() {
        let mut ds = two_seed_dataset();
        transform(&mut ds, "kinetic", "kinetic_sq", |s| s.mapv(|v| v * v)).unwrap();
        let sq = ds.get("kinetic_sq").unwrap();
        assert_eq!(*sq.get("seed1").unwrap(), series(&[1.0, 4.0, 9.0]));
        assert_eq!(*sq.get("seed2").unwrap(), series(&[16.0, 25.0, 36.0]));
    }

    #[test]
    fn transform_missing_source_fails() {
        let mut ds = two_seed_dataset();
        let err = transform(&mut ds, "nope", "out", |s| s.clone()).unwrap_err();
        assert_eq!(
            err,
            EstimateError::MissingQuantity {
                quantity: "nope".to_string()
            }
        );
    }

    #[test]
    fn identity_combination_round_trips() {
        let mut ds = two_seed_dataset();
        let mut prefactors = BTreeMap::new();
        prefactors.insert("kinetic".to_string(), 1.0);
        add_quantities(&mut ds, &["kinetic"], "copy", Some(&prefactors)).unwrap();
        let copy = ds.get("copy").unwrap();
        for (seed, original) in ds.get("kinetic").unwrap().iter() {
            assert_eq!(copy.get(seed).unwrap(), original);
        }
    }

    #[test]
    fn weighted_sum_of_two_quantities() {
        let mut ds = two_seed_dataset();
        let mut prefactors = BTreeMap::new();
        prefactors.insert("kinetic".to_string(), 1.0);
        prefactors.insert("potential".to_string(), -0.5);
        add_quantities(&mut ds, &["kinetic", "potential"], "total", Some(&prefactors)).unwrap();
        let total = ds.get("total").unwrap();
        assert_eq!(*total.get("seed1").unwrap(), series(&[-4.0, -8.0, -12.0]));
        assert_eq!(*total.get("seed2").unwrap(), series(&[-16.0, -20.0, -24.0]));
    }

    #[test]
    fn accumulation_does_not_mutate_sources() {
        let mut ds = two_seed_dataset();
        add_quantities(&mut ds, &["kinetic", "potential"], "total", None).unwrap();
        assert_eq!(
            *ds.get("kinetic").unwrap().get("seed1").unwrap(),
            series(&[1.0, 2.0, 3.0])
        );
    }

    #[test]
    fn missing_source_leaves_dataset_unmodified() {
        let mut ds = two_seed_dataset();
        let before = ds.clone();
        let err = add_quantities(&mut ds, &["kinetic", "ghost"], "total", None).unwrap_err();
        assert_eq!(
            err,
            EstimateError::MissingQuantity {
                quantity: "ghost".to_string()
            }
        );
        assert_eq!(ds, before);
    }

    #[test]
    fn missing_prefactor_is_detected() {
        let mut ds = two_seed_dataset();
        let mut prefactors = BTreeMap::new();
        prefactors.insert("kinetic".to_string(), 2.0);
        let err = add_quantities(
            &mut ds,
            &["kinetic", "potential"],
            "total",
            Some(&prefactors),
        )
        .unwrap_err();
        assert_eq!(
            err,
            EstimateError::MissingPrefactor {
                quantity: "potential".to_string()
            }
        );
    }

    #[test]
    fn seed_mismatch_is_invalid_input() {
        let mut ds = two_seed_dataset();
        let mut partial = Quantity::new();
        partial.insert("seed1", series(&[1.0, 1.0, 1.0]));
        ds.insert("partial", partial);
        let err = add_quantities(&mut ds, &["kinetic", "partial"], "total", None).unwrap_err();
        assert!(matches!(err, EstimateError::InvalidInput { .. }));
        assert!(!ds.contains("total"));
    }
}
