//! Statistical estimation core.
//!
//! This module provides the estimator family for correlated Monte Carlo
//! timeseries:
//! - Resampling primitives: contiguous binning and leave-one-out jackknife
//! - Basic estimators: mean, standard deviation, standard error, and
//!   error-propagation combinators
//! - Normalized autocorrelation functions with automatic-window integrated
//!   autocorrelation time
//! - Binned error estimation with plateau detection depth

mod autocorrelation;
mod binning;
mod estimators;
mod resample;

pub use autocorrelation::{acf_overview, autocorr_time, autocorrelation, AcfBand, AcfCurve};
pub use binning::{binned_err, binning_curve, binning_depth, binning_tau, BinningCurve};
pub use estimators::{add_sem, div_sem, mean, mult_sem, sem, sem_jackknife, std};
pub use resample::{bin, jackknife};
