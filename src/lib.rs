//! # seedpool
//!
//! Post-processing for repeated-seed Monte Carlo timeseries.
//!
//! Stochastic simulations are typically run several times with independent
//! random seeds; each run produces a serially *correlated* timeseries per
//! observable. Averaging naively and quoting `std/sqrt(N)` underestimates
//! the error, sometimes badly. This crate combines the runs into a single
//! best estimate with a correctly inflated error bar:
//!
//! - [`statistics`]: binning and jackknife resampling, basic estimators and
//!   error propagation, autocorrelation functions with automatic-window
//!   integrated autocorrelation time, and binned (plateau) error estimation
//! - [`analysis`]: pooling of per-seed estimates under a cross-seed or an
//!   autocorrelation-weighted policy
//! - [`algebra`]: derived quantities (linear combinations, per-seed
//!   transforms) over a [`Dataset`]
//! - [`data`]: loading per-seed observable files into a dataset
//! - [`output`]: terminal reports, JSON export, and curve plotting
//!
//! ## Common Pitfall: Trusting the Naive Error
//!
//! For a correlated chain the sem of the raw samples is *not* the error of
//! the mean: it is too small by a factor of `sqrt(tau)`, where `tau` is
//! the integrated autocorrelation time. Use the binning curve to check
//! that your error estimate has plateaued, or pool with
//! [`mean_err_tau_of_data`] which inflates per-seed errors by a shared
//! `tau` automatically.
//!
//! ## Quick Start
//!
//! ```
//! use ndarray::arr1;
//! use seedpool::{mean_err_of_data, AnalysisConfig, Dataset, Quantity};
//!
//! let mut energy = Quantity::new();
//! energy.insert("seed1", arr1(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0]).into_dyn());
//! energy.insert("seed2", arr1(&[2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0]).into_dyn());
//! let mut dataset = Dataset::new();
//! dataset.insert("E", energy);
//!
//! let report = mean_err_of_data(&dataset, None, None, &AnalysisConfig::default())?;
//! let (mean, error) = report.estimates["E"].scalar().unwrap();
//! assert_eq!((mean, error), (5.0, 0.5));
//! # Ok::<(), seedpool::EstimateError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

// Core modules
mod config;
mod dataset;
mod error;
mod types;

// Functional modules
pub mod algebra;
pub mod analysis;
pub mod data;
pub mod output;
pub mod statistics;

// Re-exports for the public API
pub use analysis::{
    mean_err_of_data, mean_err_tau_of_data, PooledEstimate, PoolingPolicy, Report, WindowMap,
};
pub use config::AnalysisConfig;
pub use dataset::{Dataset, Quantity};
pub use error::{EstimateError, Result};
pub use types::{Timeseries, Window};
