//! Normalized autocorrelation functions and integrated autocorrelation time.
//!
//! The integrated autocorrelation time τ is the factor by which the naive
//! variance of a timeseries average underestimates the true variance due to
//! serial correlation. It is estimated here by averaging the per-seed
//! autocorrelation functions and summing them up to an automatically chosen
//! cutoff window (Sokal's heuristic): the smallest `M` with
//! `c * tau[M] <= M`, balancing truncation bias against estimator variance.

use log::warn;
use serde::{Deserialize, Serialize};

use crate::error::{EstimateError, Result};

/// Normalized autocorrelation function of a single seed's series.
///
/// Mean-subtracts `series[min_time..]`, forms the non-negative-lag half of
/// the full discrete correlation `c[k] = Σ_t x[t]·x[t+k]`, and, when
/// `normalize` is set, divides by the lag-0 value so `acf[0] == 1`. Output
/// length is `series.len() - min_time`.
///
/// # Errors
///
/// [`EstimateError::InvalidInput`] if `min_time` leaves no samples;
/// [`EstimateError::DivisionByZero`] if `normalize` is set and the series
/// is constant (zero lag-0 autocovariance).
pub fn autocorrelation(series: &[f64], min_time: usize, normalize: bool) -> Result<Vec<f64>> {
    if min_time >= series.len() {
        return Err(EstimateError::invalid(format!(
            "autocorrelation: min_time {} leaves no samples (series length {})",
            min_time,
            series.len()
        )));
    }
    let x = &series[min_time..];
    let mut acf = correlation_sums(x, x.len());
    if normalize {
        let c0 = acf[0];
        if c0 == 0.0 {
            return Err(EstimateError::DivisionByZero {
                context: "autocorrelation normalization (constant series)".to_string(),
            });
        }
        for v in &mut acf {
            *v /= c0;
        }
    }
    Ok(acf)
}

/// Integrated autocorrelation time from a collection of independent seeds.
///
/// Per-seed normalized autocorrelation functions are truncated to
/// `max_time` lags (default: the shortest usable seed length) and averaged;
/// the running estimate is `tau[k] = 2 * cumsum(avg_acf)[k] - 1`, and the
/// reported value is `tau[M]` at the automatic cutoff `M`.
///
/// Seeds with fewer than `min_time + 2` samples carry no lag information
/// and are skipped with a diagnostic. Callers using the result as a
/// variance inflation factor should floor it at 1.
///
/// # Errors
///
/// [`EstimateError::InvalidInput`] if `max_time` exceeds the shortest
/// usable seed length; [`EstimateError::InsufficientData`] if no seed is
/// usable; [`EstimateError::DivisionByZero`] if a usable seed is constant.
/// `max_time == 0` is the degenerate no-correction case and returns `0.0`.
pub fn autocorr_time<'a, I>(seeds: I, min_time: usize, max_time: Option<usize>, c: f64) -> Result<f64>
where
    I: IntoIterator<Item = &'a [f64]>,
{
    let mut usable: Vec<&[f64]> = Vec::new();
    for (idx, series) in seeds.into_iter().enumerate() {
        if series.len() >= min_time + 2 {
            usable.push(series);
        } else {
            warn!(
                "autocorr_time: skipping seed #{} with {} samples (need at least {})",
                idx,
                series.len(),
                min_time + 2
            );
        }
    }
    if usable.is_empty() {
        return Err(EstimateError::InsufficientData {
            required: min_time + 2,
            available: 0,
            context: "autocorrelation time (no usable seeds)".to_string(),
        });
    }

    let shortest = usable.iter().map(|s| s.len() - min_time).min().expect("usable is non-empty");
    let n_lags = match max_time {
        Some(0) => return Ok(0.0),
        Some(m) if m > shortest => {
            return Err(EstimateError::invalid(format!(
                "autocorr_time: max_time {} exceeds shortest usable seed length {}",
                m, shortest
            )));
        }
        Some(m) => m,
        None => shortest,
    };

    let mut avg = vec![0.0; n_lags];
    for series in &usable {
        let acf = normalized_acf(&series[min_time..], n_lags)?;
        for (a, v) in avg.iter_mut().zip(acf) {
            *a += v;
        }
    }
    let n_seeds = usable.len() as f64;
    for a in &mut avg {
        *a /= n_seeds;
    }

    let tau = running_tau(&avg);
    Ok(tau[auto_window(&tau, c)])
}

/// One seed's autocorrelation curve, ready for plotting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AcfCurve {
    /// Seed identifier.
    pub seed: String,
    /// Normalized autocorrelation values, lag 0 upward.
    pub acf: Vec<f64>,
}

/// Cross-seed mean ± error band of the autocorrelation functions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AcfBand {
    /// Per-lag mean across seeds.
    pub mean: Vec<f64>,
    /// Per-lag standard error across seeds (zeros for a single seed).
    pub err: Vec<f64>,
}

/// Per-seed autocorrelation curves plus their cross-seed band, all
/// truncated to a common lag count (default: shortest usable seed).
///
/// This is the numeric half of the autocorrelation plot; the rendering
/// half lives in [`crate::output::plot`].
pub fn acf_overview<'a, I>(
    seeds: I,
    min_time: usize,
    max_time: Option<usize>,
) -> Result<(Vec<AcfCurve>, AcfBand)>
where
    I: IntoIterator<Item = (&'a str, &'a [f64])>,
{
    let mut usable: Vec<(&str, &[f64])> = Vec::new();
    for (seed, series) in seeds {
        if series.len() >= min_time + 2 {
            usable.push((seed, series));
        } else {
            warn!(
                "acf_overview: skipping seed '{}' with {} samples (need at least {})",
                seed,
                series.len(),
                min_time + 2
            );
        }
    }
    if usable.is_empty() {
        return Err(EstimateError::InsufficientData {
            required: min_time + 2,
            available: 0,
            context: "autocorrelation overview (no usable seeds)".to_string(),
        });
    }

    let shortest = usable
        .iter()
        .map(|(_, s)| s.len() - min_time)
        .min()
        .expect("usable is non-empty");
    let n_lags = match max_time {
        Some(m) if m > shortest => {
            return Err(EstimateError::invalid(format!(
                "acf_overview: max_time {} exceeds shortest usable seed length {}",
                m, shortest
            )));
        }
        Some(m) => m,
        None => shortest,
    };

    let mut curves = Vec::with_capacity(usable.len());
    for (seed, series) in &usable {
        curves.push(AcfCurve {
            seed: (*seed).to_string(),
            acf: normalized_acf(&series[min_time..], n_lags)?,
        });
    }

    let n_seeds = curves.len() as f64;
    let mut mean = vec![0.0; n_lags];
    for curve in &curves {
        for (m, v) in mean.iter_mut().zip(&curve.acf) {
            *m += v;
        }
    }
    for m in &mut mean {
        *m /= n_seeds;
    }
    let mut err = vec![0.0; n_lags];
    if curves.len() > 1 {
        for (lag, e) in err.iter_mut().enumerate() {
            let var = curves
                .iter()
                .map(|c| (c.acf[lag] - mean[lag]).powi(2))
                .sum::<f64>()
                / (n_seeds - 1.0);
            *e = (var / n_seeds).sqrt();
        }
    }

    Ok((curves, AcfBand { mean, err }))
}

/// Non-negative-lag autocovariance sums of a mean-subtracted copy of `x`.
fn correlation_sums(x: &[f64], n_lags: usize) -> Vec<f64> {
    let n = x.len();
    let mean = x.iter().sum::<f64>() / n as f64;
    let centered: Vec<f64> = x.iter().map(|v| v - mean).collect();
    (0..n_lags)
        .map(|lag| {
            centered[..n - lag]
                .iter()
                .zip(&centered[lag..])
                .map(|(a, b)| a * b)
                .sum()
        })
        .collect()
}

/// Normalized autocorrelation function truncated to `n_lags` values.
fn normalized_acf(x: &[f64], n_lags: usize) -> Result<Vec<f64>> {
    let mut acf = correlation_sums(x, n_lags);
    let c0 = acf[0];
    if c0 == 0.0 {
        return Err(EstimateError::DivisionByZero {
            context: "autocorrelation normalization (constant series)".to_string(),
        });
    }
    for v in &mut acf {
        *v /= c0;
    }
    Ok(acf)
}

/// Running integrated-time estimate `tau[k] = 2 * cumsum(acf)[k] - 1`.
fn running_tau(avg_acf: &[f64]) -> Vec<f64> {
    let mut tau = Vec::with_capacity(avg_acf.len());
    let mut cumsum = 0.0;
    for a in avg_acf {
        cumsum += a;
        tau.push(2.0 * cumsum - 1.0);
    }
    tau
}

/// Automatic windowing: smallest `M` with `c * tau[M] <= M`, else the last
/// index.
fn auto_window(tau: &[f64], c: f64) -> usize {
    for (m, &t) in tau.iter().enumerate() {
        if c * t <= m as f64 {
            return m;
        }
    }
    tau.len() - 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng};
    use rand_xoshiro::Xoshiro256PlusPlus;

    fn white_noise(n: usize, seed: u64) -> Vec<f64> {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
        (0..n).map(|_| rng.gen::<f64>() - 0.5).collect()
    }

    /// AR(1) chain with decay parameter `phi`.
    fn correlated_chain(n: usize, phi: f64, seed: u64) -> Vec<f64> {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
        let mut x = 0.0;
        (0..n)
            .map(|_| {
                x = phi * x + (rng.gen::<f64>() - 0.5);
                x
            })
            .collect()
    }

    #[test]
    fn normalized_acf_starts_at_one() {
        let s = white_noise(256, 1);
        let acf = autocorrelation(&s, 0, true).unwrap();
        assert_eq!(acf.len(), 256);
        assert!((acf[0] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn min_time_shortens_output() {
        let s = white_noise(100, 2);
        let acf = autocorrelation(&s, 30, true).unwrap();
        assert_eq!(acf.len(), 70);
    }

    #[test]
    fn unnormalized_lag0_is_sum_of_squares() {
        let s = vec![1.0, 2.0, 3.0, 4.0];
        let acf = autocorrelation(&s, 0, false).unwrap();
        // Centered values are [-1.5, -0.5, 0.5, 1.5].
        assert!((acf[0] - 5.0).abs() < 1e-12);
    }

    #[test]
    fn iid_noise_decays_toward_zero() {
        let s = white_noise(4096, 3);
        let acf = autocorrelation(&s, 0, true).unwrap();
        let tail_max = acf[50..500]
            .iter()
            .fold(0.0_f64, |acc, &v| acc.max(v.abs()));
        assert!(tail_max < 0.15, "tail autocorrelation {} too large", tail_max);
    }

    #[test]
    fn constant_series_cannot_be_normalized() {
        let s = vec![2.0; 64];
        assert!(matches!(
            autocorrelation(&s, 0, true).unwrap_err(),
            EstimateError::DivisionByZero { .. }
        ));
    }

    #[test]
    fn min_time_exhausting_series_is_invalid() {
        let s = vec![1.0, 2.0];
        assert!(autocorrelation(&s, 2, true).is_err());
    }

    #[test]
    fn tau_of_iid_noise_is_near_one() {
        let seeds: Vec<Vec<f64>> = (0..4).map(|i| white_noise(2048, 10 + i)).collect();
        let tau = autocorr_time(seeds.iter().map(|s| s.as_slice()), 0, None, 5.0).unwrap();
        assert!((tau - 1.0).abs() < 0.5, "iid tau was {}", tau);
    }

    #[test]
    fn correlated_chain_has_larger_tau_than_noise() {
        let correlated: Vec<Vec<f64>> =
            (0..4).map(|i| correlated_chain(2048, 0.9, 20 + i)).collect();
        let noise: Vec<Vec<f64>> = (0..4).map(|i| white_noise(2048, 30 + i)).collect();
        let tau_corr =
            autocorr_time(correlated.iter().map(|s| s.as_slice()), 0, None, 5.0).unwrap();
        let tau_noise = autocorr_time(noise.iter().map(|s| s.as_slice()), 0, None, 5.0).unwrap();
        assert!(
            tau_corr > 3.0 * tau_noise,
            "tau_corr {} vs tau_noise {}",
            tau_corr,
            tau_noise
        );
    }

    #[test]
    fn max_time_zero_is_degenerate_no_correction() {
        let seeds = [vec![1.0, 2.0, 3.0, 4.0]];
        let tau = autocorr_time(seeds.iter().map(|s| s.as_slice()), 0, Some(0), 5.0).unwrap();
        assert_eq!(tau, 0.0);
    }

    #[test]
    fn max_time_beyond_shortest_seed_is_invalid() {
        let seeds = [vec![1.0; 16], vec![1.0, 2.0, 3.0, 4.0]];
        let err =
            autocorr_time(seeds.iter().map(|s| s.as_slice()), 0, Some(8), 5.0).unwrap_err();
        assert!(matches!(err, EstimateError::InvalidInput { .. }));
    }

    #[test]
    fn all_seeds_too_short_is_insufficient_data() {
        let seeds = [vec![1.0]];
        let err = autocorr_time(seeds.iter().map(|s| s.as_slice()), 0, None, 5.0).unwrap_err();
        assert!(matches!(err, EstimateError::InsufficientData { .. }));
    }

    #[test]
    fn acf_overview_band_covers_all_seeds() {
        let seeds: Vec<(String, Vec<f64>)> = (0..3)
            .map(|i| (format!("seed{}", i), white_noise(512, 40 + i as u64)))
            .collect();
        let (curves, band) = acf_overview(
            seeds.iter().map(|(name, s)| (name.as_str(), s.as_slice())),
            0,
            Some(64),
        )
        .unwrap();
        assert_eq!(curves.len(), 3);
        assert_eq!(band.mean.len(), 64);
        assert_eq!(band.err.len(), 64);
        assert!((band.mean[0] - 1.0).abs() < 1e-12);
        // All curves share lag 0 == 1, so the band error vanishes there.
        assert!(band.err[0].abs() < 1e-12);
    }
}
