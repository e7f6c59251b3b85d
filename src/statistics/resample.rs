//! Resampling primitives: binning and jackknife.
//!
//! Both functions return freshly allocated arrays that never alias the
//! input, so callers' series cannot be corrupted by downstream reshaping.

use ndarray::{ArrayD, ArrayViewD, Axis, Slice};

use crate::error::{EstimateError, Result};

/// Bin a series into contiguous groups of `binsize` along `axis`,
/// averaging within each group.
///
/// Samples that do not fill a complete bin are dropped, so the output has
/// length `floor(N / binsize)` along `axis`; all other axes are preserved.
/// `bin(s, 1, axis)` is an owned copy of the input.
///
/// # Errors
///
/// [`EstimateError::InvalidInput`] if `binsize < 1`, `binsize` exceeds the
/// length along `axis`, or `axis` is out of bounds.
pub fn bin(series: ArrayViewD<'_, f64>, binsize: usize, axis: Axis) -> Result<ArrayD<f64>> {
    if axis.index() >= series.ndim() {
        return Err(EstimateError::invalid(format!(
            "bin: axis {} out of bounds for {}-dimensional series",
            axis.index(),
            series.ndim()
        )));
    }
    let n = series.len_of(axis);
    if binsize < 1 {
        return Err(EstimateError::invalid("bin: binsize must be at least 1"));
    }
    if binsize > n {
        return Err(EstimateError::invalid(format!(
            "bin: binsize {} exceeds series length {} along axis {}",
            binsize,
            n,
            axis.index()
        )));
    }

    let n_bins = n / binsize;
    let mut shape = series.shape().to_vec();
    shape[axis.index()] = n_bins;
    let mut out = ArrayD::zeros(shape);
    for b in 0..n_bins {
        let group = series.slice_axis(axis, Slice::from(b * binsize..(b + 1) * binsize));
        let group_mean = group
            .mean_axis(axis)
            .expect("bin group has binsize >= 1 samples");
        out.index_axis_mut(axis, b).assign(&group_mean);
    }
    Ok(out)
}

/// Jackknife-resample a series along `axis`.
///
/// `resampled[i]` is the mean of all samples except sample `i`, so the
/// output has the same length as the input along `axis`. Used to estimate
/// bias and (via [`super::sem_jackknife`]) the error of derived quantities,
/// not to reduce N.
///
/// # Errors
///
/// [`EstimateError::InvalidInput`] if the series has fewer than 2 samples
/// along `axis` (leave-one-out is undefined for a single sample) or `axis`
/// is out of bounds.
pub fn jackknife(series: ArrayViewD<'_, f64>, axis: Axis) -> Result<ArrayD<f64>> {
    if axis.index() >= series.ndim() {
        return Err(EstimateError::invalid(format!(
            "jackknife: axis {} out of bounds for {}-dimensional series",
            axis.index(),
            series.ndim()
        )));
    }
    let n = series.len_of(axis);
    if n < 2 {
        return Err(EstimateError::invalid(
            "jackknife: need at least 2 samples along the axis",
        ));
    }

    let total = series.sum_axis(axis);
    let mut out = ArrayD::zeros(series.shape().to_vec());
    for i in 0..n {
        let leave_one_out = (&total - &series.index_axis(axis, i)) / (n as f64 - 1.0);
        out.index_axis_mut(axis, i).assign(&leave_one_out);
    }
    Ok(out)
}
