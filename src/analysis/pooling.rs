//! Pooling of per-seed estimates into a single mean and error bar.
//!
//! Two policies are provided:
//!
//! 1. **Cross-seed pooling** ([`mean_err_of_data`]): the reported error is
//!    the sem *across* the per-seed means. Seed-to-seed spread dominates;
//!    within-seed noise never enters the error bar. Appropriate when many
//!    short independent runs are available.
//! 2. **Autocorrelation-weighted pooling** ([`mean_err_tau_of_data`]): each
//!    seed's sem is inflated by a shared integrated autocorrelation time τ
//!    (floored at 1), then combined in quadrature and normalized by the
//!    seed count. Appropriate when individual seeds are long, single
//!    correlated chains.

use std::collections::BTreeMap;

use log::warn;
use ndarray::{ArrayD, ArrayViewD, Axis, IxDyn, Slice};
use serde::{Deserialize, Serialize};

use crate::config::AnalysisConfig;
use crate::dataset::{Dataset, Quantity};
use crate::error::{EstimateError, Result};
use crate::statistics::{self, autocorr_time};
use crate::types::Window;

/// Which pooling rule produced a [`Report`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PoolingPolicy {
    /// Mean of seed means; error is the sem across seed means.
    CrossSeed,
    /// Per-seed sems inflated by a shared τ, combined in quadrature.
    AutocorrWeighted,
}

/// Pooled mean and error of one quantity.
///
/// `mean` and `error` carry the trailing shape of the observable; for the
/// common scalar case both are 0-dimensional and [`PooledEstimate::scalar`]
/// unwraps them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PooledEstimate {
    /// Mean of the per-seed means.
    pub mean: ArrayD<f64>,
    /// Pooled error under the chosen policy.
    pub error: ArrayD<f64>,
    /// Number of seeds that entered the pool.
    pub n_seeds: usize,
    /// Shared autocorrelation time (τ-weighted policy only), already
    /// floored at 1.
    pub tau: Option<f64>,
}

impl PooledEstimate {
    /// Mean and error as plain floats, for scalar observables.
    pub fn scalar(&self) -> Option<(f64, f64)> {
        if self.mean.ndim() == 0 && self.error.ndim() == 0 {
            Some((*self.mean.first()?, *self.error.first()?))
        } else {
            None
        }
    }
}

/// Pooled estimates for a set of quantities, in stable name order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    /// The pooling rule that produced these estimates.
    pub policy: PoolingPolicy,
    /// Per-quantity pooled estimates.
    pub estimates: BTreeMap<String, PooledEstimate>,
}

/// Per-seed truncation bounds, keyed by seed identifier.
pub type WindowMap = BTreeMap<String, Window>;

/// Resolve the requested quantity names against the dataset.
fn select<'a>(
    dataset: &'a Dataset,
    quantities: Option<&[&'a str]>,
) -> Result<Vec<(&'a str, &'a Quantity)>> {
    match quantities {
        None => Ok(dataset.iter().map(|(n, q)| (n.as_str(), q)).collect()),
        Some(names) => names
            .iter()
            .map(|&name| {
                dataset
                    .get(name)
                    .map(|q| (name, q))
                    .ok_or_else(|| EstimateError::MissingQuantity {
                        quantity: name.to_string(),
                    })
            })
            .collect(),
    }
}

/// Windowed view of one seed's series along the sample axis.
///
/// Returns `Ok(None)` (with a diagnostic) when the window excludes every
/// sample; fails with [`EstimateError::MissingSeedBound`] when a window map
/// is supplied but omits this seed.
fn windowed<'a>(
    quantity: &str,
    seed: &str,
    series: &'a crate::types::Timeseries,
    windows: Option<&WindowMap>,
) -> Result<Option<ArrayViewD<'a, f64>>> {
    let window = match windows {
        None => Window::default(),
        Some(map) => *map.get(seed).ok_or_else(|| EstimateError::MissingSeedBound {
            quantity: quantity.to_string(),
            seed: seed.to_string(),
        })?,
    };
    let len = series.len_of(Axis(0));
    let (start, end) = window.resolve(len);
    if start == end {
        warn!(
            "skipping seed '{}' of quantity '{}': truncation window excludes all {} samples",
            seed, quantity, len
        );
        return Ok(None);
    }
    Ok(Some(series.slice_axis(Axis(0), Slice::from(start..end))))
}

/// Cross-seed pooling: mean of per-seed means, error from seed-to-seed
/// spread.
///
/// For each seed the (optionally truncated) series is averaged along the
/// sample axis; the pooled mean is the mean of those per-seed means and the
/// pooled error is the sem across them (with the configured `ddof`). Seeds
/// whose window is empty are skipped with a diagnostic. Trailing axes pool
/// element-wise.
///
/// # Errors
///
/// [`EstimateError::MissingQuantity`] for an unknown requested name;
/// [`EstimateError::MissingSeedBound`] if `windows` omits a seed;
/// [`EstimateError::InsufficientData`] if fewer than 2 seeds survive (the
/// cross-seed spread is undefined for a single seed);
/// [`EstimateError::InvalidInput`] if seeds disagree on trailing shape.
pub fn mean_err_of_data(
    dataset: &Dataset,
    quantities: Option<&[&str]>,
    windows: Option<&WindowMap>,
    config: &AnalysisConfig,
) -> Result<Report> {
    let mut estimates = BTreeMap::new();
    for (name, quantity) in select(dataset, quantities)? {
        let mut seed_means: Vec<ArrayD<f64>> = Vec::with_capacity(quantity.len());
        for (seed, series) in quantity.iter() {
            let Some(view) = windowed(name, seed, series, windows)? else {
                continue;
            };
            seed_means.push(statistics::mean(view, Axis(0))?);
        }
        if seed_means.len() < 2 {
            return Err(EstimateError::InsufficientData {
                required: 2,
                available: seed_means.len(),
                context: format!("cross-seed pooling of quantity '{}'", name),
            });
        }
        let views: Vec<ArrayViewD<'_, f64>> = seed_means.iter().map(|m| m.view()).collect();
        let stacked = ndarray::stack(Axis(0), &views).map_err(|e| {
            EstimateError::invalid(format!(
                "seed means of quantity '{}' have mismatched shapes: {}",
                name, e
            ))
        })?;
        let mean = statistics::mean(stacked.view(), Axis(0))?;
        let error = statistics::sem(stacked.view(), Axis(0), config.ddof)?;
        estimates.insert(
            name.to_string(),
            PooledEstimate {
                mean,
                error,
                n_seeds: seed_means.len(),
                tau: None,
            },
        );
    }
    Ok(Report {
        policy: PoolingPolicy::CrossSeed,
        estimates,
    })
}

/// Autocorrelation-weighted pooling: within-seed errors inflated by a
/// shared τ.
///
/// A single integrated autocorrelation time τ is estimated from all seeds'
/// truncated series and floored at 1; the pooled error is
/// `sqrt(τ * Σ sem_i²) / n_seeds` over the per-seed sems (a seed with
/// exactly one sample contributes sem 0), and the pooled mean is the mean
/// of per-seed means.
///
/// # Errors
///
/// As [`mean_err_of_data`], plus [`EstimateError::InvalidInput`] for
/// multi-dimensional series (τ is defined for scalar observables) and any
/// error from [`autocorr_time`]. A single surviving seed is permitted,
/// since the within-seed error is still defined.
pub fn mean_err_tau_of_data(
    dataset: &Dataset,
    quantities: Option<&[&str]>,
    windows: Option<&WindowMap>,
    config: &AnalysisConfig,
) -> Result<Report> {
    let mut estimates = BTreeMap::new();
    for (name, quantity) in select(dataset, quantities)? {
        let mut windowed_seeds: Vec<Vec<f64>> = Vec::with_capacity(quantity.len());
        let mut seed_means: Vec<f64> = Vec::with_capacity(quantity.len());
        let mut seed_sems: Vec<f64> = Vec::with_capacity(quantity.len());
        for (seed, series) in quantity.iter() {
            if series.ndim() != 1 {
                return Err(EstimateError::invalid(format!(
                    "quantity '{}' seed '{}': autocorrelation-weighted pooling requires \
                     scalar (1-D) series, got {} dimensions",
                    name,
                    seed,
                    series.ndim()
                )));
            }
            let Some(view) = windowed(name, seed, series, windows)? else {
                continue;
            };
            let samples: Vec<f64> = view.iter().copied().collect();
            let n = samples.len();
            seed_means.push(samples.iter().sum::<f64>() / n as f64);
            seed_sems.push(if n == 1 {
                // sem is undefined for a single sample; it contributes no
                // within-seed noise to the pool.
                0.0
            } else {
                *statistics::sem(view, Axis(0), config.ddof)?
                    .first()
                    .expect("scalar sem of 1-D series")
            });
            windowed_seeds.push(samples);
        }
        if windowed_seeds.is_empty() {
            return Err(EstimateError::InsufficientData {
                required: 1,
                available: 0,
                context: format!("autocorrelation-weighted pooling of quantity '{}'", name),
            });
        }

        let tau_estimate = autocorr_time(
            windowed_seeds.iter().map(|s| s.as_slice()),
            config.min_time,
            None,
            config.window_constant,
        )?;
        let tau = tau_estimate.max(1.0);

        let n_seeds = seed_means.len();
        let mean = seed_means.iter().sum::<f64>() / n_seeds as f64;
        let error = (tau * seed_sems.iter().map(|s| s * s).sum::<f64>()).sqrt() / n_seeds as f64;
        estimates.insert(
            name.to_string(),
            PooledEstimate {
                mean: ArrayD::from_elem(IxDyn(&[]), mean),
                error: ArrayD::from_elem(IxDyn(&[]), error),
                n_seeds,
                tau: Some(tau),
            },
        );
    }
    Ok(Report {
        policy: PoolingPolicy::AutocorrWeighted,
        estimates,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::arr1;

    use crate::types::Timeseries;

    fn series(vals: &[f64]) -> Timeseries {
        arr1(vals).into_dyn()
    }

    fn energy_dataset() -> Dataset {
        let mut ds = Dataset::new();
        let mut energy = Quantity::new();
        energy.insert("seed1", series(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0]));
        energy.insert("seed2", series(&[2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0]));
        ds.insert("E", energy);
        ds
    }

    #[test]
    fn cross_seed_pooling_of_two_seeds() {
        let ds = energy_dataset();
        let report = mean_err_of_data(&ds, None, None, &AnalysisConfig::default()).unwrap();
        assert_eq!(report.policy, PoolingPolicy::CrossSeed);
        let (mean, err) = report.estimates["E"].scalar().unwrap();
        assert!((mean - 5.0).abs() < 1e-12);
        assert!((err - 0.5).abs() < 1e-12);
        assert_eq!(report.estimates["E"].n_seeds, 2);
    }

    #[test]
    fn unknown_quantity_is_reported() {
        let ds = energy_dataset();
        let err =
            mean_err_of_data(&ds, Some(&["M"]), None, &AnalysisConfig::default()).unwrap_err();
        assert_eq!(
            err,
            EstimateError::MissingQuantity {
                quantity: "M".to_string()
            }
        );
    }

    #[test]
    fn window_map_must_cover_every_seed() {
        let ds = energy_dataset();
        let mut windows = WindowMap::new();
        windows.insert("seed1".to_string(), Window::from_start(2));
        let err = mean_err_of_data(&ds, None, Some(&windows), &AnalysisConfig::default())
            .unwrap_err();
        assert_eq!(
            err,
            EstimateError::MissingSeedBound {
                quantity: "E".to_string(),
                seed: "seed2".to_string()
            }
        );
    }

    #[test]
    fn truncation_shifts_the_pooled_mean() {
        let ds = energy_dataset();
        let mut windows = WindowMap::new();
        windows.insert("seed1".to_string(), Window::from_start(4));
        windows.insert("seed2".to_string(), Window::from_start(4));
        let report =
            mean_err_of_data(&ds, None, Some(&windows), &AnalysisConfig::default()).unwrap();
        // Remaining samples: [5..8] and [6..9], means 6.5 and 7.5.
        let (mean, err) = report.estimates["E"].scalar().unwrap();
        assert!((mean - 7.0).abs() < 1e-12);
        assert!((err - 0.5).abs() < 1e-12);
    }

    #[test]
    fn empty_window_skips_seed_and_single_survivor_fails() {
        let ds = energy_dataset();
        let mut windows = WindowMap::new();
        windows.insert("seed1".to_string(), Window::default());
        windows.insert("seed2".to_string(), Window::new(8, 8));
        let err = mean_err_of_data(&ds, None, Some(&windows), &AnalysisConfig::default())
            .unwrap_err();
        assert!(matches!(err, EstimateError::InsufficientData { .. }));
    }

    #[test]
    fn tau_pooling_floors_tau_at_one() {
        let ds = energy_dataset();
        let report = mean_err_tau_of_data(&ds, None, None, &AnalysisConfig::default()).unwrap();
        let estimate = &report.estimates["E"];
        assert_eq!(report.policy, PoolingPolicy::AutocorrWeighted);
        assert!(estimate.tau.unwrap() >= 1.0);
        let (mean, _) = estimate.scalar().unwrap();
        assert!((mean - 5.0).abs() < 1e-12);
    }

    #[test]
    fn tau_pooling_combines_within_seed_errors() {
        let ds = energy_dataset();
        let report = mean_err_tau_of_data(&ds, None, None, &AnalysisConfig::default()).unwrap();
        let estimate = &report.estimates["E"];
        let tau = estimate.tau.unwrap();
        // Both seeds are arithmetic progressions with identical spread:
        // sem = std([1..8], ddof=1)/sqrt(8).
        let sem_one = {
            let s = series(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0]);
            *crate::statistics::sem(s.view(), Axis(0), 1.0)
                .unwrap()
                .first()
                .unwrap()
        };
        let expected = (tau * 2.0 * sem_one * sem_one).sqrt() / 2.0;
        let (_, err) = estimate.scalar().unwrap();
        assert!((err - expected).abs() < 1e-12);
    }

    #[test]
    fn tau_pooling_accepts_a_single_seed() {
        let mut ds = Dataset::new();
        let mut q = Quantity::new();
        q.insert("only", series(&[1.0, 2.0, 1.0, 2.0, 1.0, 2.0, 1.0, 2.0]));
        ds.insert("E", q);
        let report = mean_err_tau_of_data(&ds, None, None, &AnalysisConfig::default()).unwrap();
        assert_eq!(report.estimates["E"].n_seeds, 1);
    }

    #[test]
    fn tau_pooling_rejects_vector_valued_series() {
        let mut ds = Dataset::new();
        let mut q = Quantity::new();
        q.insert(
            "seed1",
            ndarray::arr2(&[[1.0, 2.0], [3.0, 4.0]]).into_dyn(),
        );
        ds.insert("V", q);
        let err = mean_err_tau_of_data(&ds, None, None, &AnalysisConfig::default()).unwrap_err();
        assert!(matches!(err, EstimateError::InvalidInput { .. }));
    }

    #[test]
    fn vector_valued_series_pool_elementwise() {
        let mut ds = Dataset::new();
        let mut q = Quantity::new();
        q.insert(
            "seed1",
            ndarray::arr2(&[[1.0, 10.0], [3.0, 30.0]]).into_dyn(),
        );
        q.insert(
            "seed2",
            ndarray::arr2(&[[2.0, 20.0], [4.0, 40.0]]).into_dyn(),
        );
        ds.insert("V", q);
        let report = mean_err_of_data(&ds, None, None, &AnalysisConfig::default()).unwrap();
        let estimate = &report.estimates["V"];
        assert_eq!(estimate.mean.shape(), &[2]);
        // Seed means are [2, 20] and [3, 30]; pooled mean [2.5, 25].
        assert!((estimate.mean[[0]] - 2.5).abs() < 1e-12);
        assert!((estimate.mean[[1]] - 25.0).abs() < 1e-12);
        assert!(estimate.scalar().is_none());
    }
}
