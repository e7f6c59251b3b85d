//! Binned error estimation.
//!
//! Successively halving a correlated series into bins of size `2^k` washes
//! out serial correlation; once the bins are longer than the correlation
//! time, the sem of the binned series plateaus at the true error of the
//! mean. [`binning_depth`] picks the plateau level, [`binned_err`] reports
//! the error there, and [`binning_tau`] converts the error inflation into
//! an integrated autocorrelation time estimate.

use ndarray::{aview1, ArrayD, ArrayViewD, Axis};
use serde::{Deserialize, Serialize};

use crate::config::AnalysisConfig;
use crate::error::{EstimateError, Result};
use crate::statistics::{bin, sem};

/// Number of successive halvings before the binned sem is trusted as
/// plateaued: `max(0, floor(log2(len)) - maxk_offset)`.
///
/// The `maxk_offset` margin keeps the estimate `maxk_offset` octaves below
/// the top of the hierarchy, away from too-few-bins noise. Monotonically
/// non-decreasing in `len`.
pub fn binning_depth(len: usize, maxk_offset: usize) -> usize {
    if len == 0 {
        return 0;
    }
    (len.ilog2() as usize).saturating_sub(maxk_offset)
}

/// Correlation-corrected error of the mean: sem of the series binned at
/// `binsize = 2^depth`.
///
/// `binidx` selects the binning level explicitly; `None` uses
/// [`binning_depth`] with the configured margin. Reduction runs along
/// `axis` with the configured `ddof`; trailing axes are preserved.
///
/// # Errors
///
/// Propagates [`EstimateError::InvalidInput`] from the binning step (for
/// an explicit `binidx` whose binsize exceeds the series length) and
/// [`EstimateError::InsufficientData`] when too few bins remain for the
/// `ddof`-corrected sem.
pub fn binned_err(
    series: ArrayViewD<'_, f64>,
    axis: Axis,
    binidx: Option<usize>,
    config: &AnalysisConfig,
) -> Result<ArrayD<f64>> {
    if axis.index() >= series.ndim() {
        return Err(EstimateError::invalid(format!(
            "binned_err: axis {} out of bounds for {}-dimensional series",
            axis.index(),
            series.ndim()
        )));
    }
    let n = series.len_of(axis);
    let depth = binidx.unwrap_or_else(|| binning_depth(n, config.maxk_offset));
    let binned = bin(series, 1usize << depth, axis)?;
    sem(binned.view(), axis, config.ddof)
}

/// Integrated autocorrelation time via the binning method:
/// `(err_at_plateau / err_at_binsize_1)^2`.
///
/// Returns `0.0` when [`binning_depth`] is less than 2, with too few
/// binning levels to trust the ratio.
pub fn binning_tau(series: &[f64], config: &AnalysisConfig) -> Result<f64> {
    let depth = binning_depth(series.len(), config.maxk_offset);
    if depth < 2 {
        return Ok(0.0);
    }
    let plateau = binned_err(aview1(series).into_dyn(), Axis(0), Some(depth), config)?;
    let unbinned = binned_err(aview1(series).into_dyn(), Axis(0), Some(0), config)?;
    let plateau = *plateau.first().expect("scalar sem of 1-D series");
    let unbinned = *unbinned.first().expect("scalar sem of 1-D series");
    if unbinned == 0.0 {
        return Err(EstimateError::DivisionByZero {
            context: "binning tau (constant series has zero unbinned error)".to_string(),
        });
    }
    Ok((plateau / unbinned).powi(2))
}

/// Error of the mean at successive binsizes `2^k`, for plotting the
/// binning plateau.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BinningCurve {
    /// Binsizes `1, 2, 4, ...`.
    pub binsizes: Vec<usize>,
    /// Sem of the series binned at the matching binsize.
    pub errors: Vec<f64>,
}

/// Compute the binning curve: [`binned_err`] at `2^k` for
/// `k in 0..(floor(log2(len)) - maxk_offset)`.
///
/// This is the numeric half of the binning plot; rendering lives in
/// [`crate::output::plot`].
///
/// # Errors
///
/// [`EstimateError::InsufficientData`] if the series is too short for any
/// binning level at the configured margin.
pub fn binning_curve(series: &[f64], config: &AnalysisConfig) -> Result<BinningCurve> {
    let n = series.len();
    let max_k = binning_depth(n, config.maxk_offset);
    if max_k == 0 {
        return Err(EstimateError::InsufficientData {
            required: 1usize << (config.maxk_offset + 1),
            available: n,
            context: "binning analysis (try a smaller maxk_offset)".to_string(),
        });
    }
    let view = aview1(series).into_dyn();
    let mut binsizes = Vec::with_capacity(max_k);
    let mut errors = Vec::with_capacity(max_k);
    for k in 0..max_k {
        let err = binned_err(view.clone(), Axis(0), Some(k), config)?;
        binsizes.push(1usize << k);
        errors.push(*err.first().expect("scalar sem of 1-D series"));
    }
    Ok(BinningCurve { binsizes, errors })
}
