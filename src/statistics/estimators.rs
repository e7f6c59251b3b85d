//! Basic estimators: mean, standard deviation, standard error, and
//! error-propagation combinators for correlated quantities.

use ndarray::{ArrayD, ArrayViewD, Axis};

use crate::error::{EstimateError, Result};

/// Validate the reduction axis and return the sample count along it.
fn check_axis(series: &ArrayViewD<'_, f64>, axis: Axis, context: &str) -> Result<usize> {
    if axis.index() >= series.ndim() {
        return Err(EstimateError::invalid(format!(
            "{}: axis {} out of bounds for {}-dimensional series",
            context,
            axis.index(),
            series.ndim()
        )));
    }
    let n = series.len_of(axis);
    if n == 0 {
        return Err(EstimateError::invalid(format!(
            "{}: series is empty along axis {}",
            context,
            axis.index()
        )));
    }
    Ok(n)
}

/// Require enough samples for a `ddof`-corrected variance denominator.
fn check_ddof(n: usize, ddof: f64, context: &str) -> Result<()> {
    if (n as f64) <= ddof {
        return Err(EstimateError::InsufficientData {
            required: ddof as usize + 1,
            available: n,
            context: context.to_string(),
        });
    }
    Ok(())
}

/// Arithmetic mean along `axis`; other axes are preserved.
pub fn mean(series: ArrayViewD<'_, f64>, axis: Axis) -> Result<ArrayD<f64>> {
    check_axis(&series, axis, "mean")?;
    series
        .mean_axis(axis)
        .ok_or_else(|| EstimateError::invalid("mean: series is empty along the axis"))
}

/// Sample standard deviation along `axis`.
///
/// `ddof` is subtracted from N in the variance denominator; `ddof = 1.0`
/// applies Bessel's correction.
pub fn std(series: ArrayViewD<'_, f64>, axis: Axis, ddof: f64) -> Result<ArrayD<f64>> {
    let n = check_axis(&series, axis, "std")?;
    check_ddof(n, ddof, "standard deviation")?;
    Ok(series.std_axis(axis, ddof))
}

/// Standard error of the mean along `axis`: `std / sqrt(N)`.
pub fn sem(series: ArrayViewD<'_, f64>, axis: Axis, ddof: f64) -> Result<ArrayD<f64>> {
    let n = check_axis(&series, axis, "sem")?;
    check_ddof(n, ddof, "standard error of the mean")?;
    let mut s = series.std_axis(axis, ddof);
    let sqrt_n = (n as f64).sqrt();
    s.mapv_inplace(|v| v / sqrt_n);
    Ok(s)
}

/// Combine the errors of N equally-weighted independent estimates of the
/// same quantity: `sqrt(sum(e_i^2)) / N`.
///
/// This is the error of the plain average of the N estimates (quadrature
/// sum of the per-estimate errors, normalized by the count). For a single
/// estimate the error passes through unchanged.
pub fn add_sem(errors: &[f64]) -> Result<f64> {
    if errors.is_empty() {
        return Err(EstimateError::invalid(
            "add_sem: need at least one error to combine",
        ));
    }
    let n = errors.len() as f64;
    Ok(errors.iter().map(|e| e * e).sum::<f64>().sqrt() / n)
}

/// Relative-error quadrature shared by [`mult_sem`] and [`div_sem`].
fn relative_err(m1: f64, e1: f64, m2: f64, e2: f64, context: &str) -> Result<f64> {
    if m1 == 0.0 || m2 == 0.0 {
        return Err(EstimateError::DivisionByZero {
            context: context.to_string(),
        });
    }
    Ok(((e1 / m1).powi(2) + (e2 / m2).powi(2)).sqrt())
}

/// Error of the product `m1 * m2` of two independent quantities.
///
/// Propagates relative errors: `|m1*m2| * sqrt((e1/m1)^2 + (e2/m2)^2)`.
/// Fails with [`EstimateError::DivisionByZero`] when either mean is zero.
pub fn mult_sem(m1: f64, e1: f64, m2: f64, e2: f64) -> Result<f64> {
    let rel = relative_err(m1, e1, m2, e2, "product error propagation")?;
    Ok((m1 * m2).abs() * rel)
}

/// Error of the quotient `m1 / m2` of two independent quantities.
///
/// Propagates relative errors: `|m1/m2| * sqrt((e1/m1)^2 + (e2/m2)^2)`.
/// Fails with [`EstimateError::DivisionByZero`] when either mean is zero.
pub fn div_sem(m1: f64, e1: f64, m2: f64, e2: f64) -> Result<f64> {
    let rel = relative_err(m1, e1, m2, e2, "quotient error propagation")?;
    Ok((m1 / m2).abs() * rel)
}

/// Error estimate from jackknife-resampled data.
///
/// Jackknife averages vary far less than the underlying samples; the naive
/// sem of the resampled sequence must be scaled back up by
/// `sqrt((N-1) * (N-ddof))` to estimate the error of the original mean.
pub fn sem_jackknife(resampled: ArrayViewD<'_, f64>, axis: Axis, ddof: f64) -> Result<ArrayD<f64>> {
    let n = check_axis(&resampled, axis, "sem_jackknife")?;
    check_ddof(n, ddof, "jackknife error estimate")?;
    let factor = ((n as f64 - 1.0) * (n as f64 - ddof)).sqrt();
    let mut s = sem(resampled, axis, ddof)?;
    s.mapv_inplace(|v| v * factor);
    Ok(s)
}
