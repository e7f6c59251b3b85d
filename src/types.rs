//! Core data-model types.

use ndarray::ArrayD;

/// A timeseries of numeric samples.
///
/// The sample axis of a stored series is `Axis(0)`; trailing axes, if any,
/// index the components of a vector- or matrix-valued observable. Estimator
/// primitives take an explicit [`ndarray::Axis`] so resampled intermediates
/// can be reduced along any axis.
pub type Timeseries = ArrayD<f64>;

/// Per-seed truncation bounds for equilibration/burn-in discard.
///
/// `nmin` is the first sample kept; `nmax` (exclusive) is the first sample
/// dropped, or `None` for "to the end". Bounds are clamped to the series
/// length the way Python slicing clamps, so an oversized `nmax` is not an
/// error. Supplied per aggregation call; never stored on a quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Window {
    /// Index of the first sample to keep.
    pub nmin: usize,
    /// One past the last sample to keep; `None` means the series end.
    pub nmax: Option<usize>,
}

impl Window {
    /// Window covering `nmin..nmax`.
    pub fn new(nmin: usize, nmax: usize) -> Self {
        Self {
            nmin,
            nmax: Some(nmax),
        }
    }

    /// Window covering `nmin..` (everything after the burn-in).
    pub fn from_start(nmin: usize) -> Self {
        Self { nmin, nmax: None }
    }

    /// Resolve to a concrete `start..end` range for a series of length `len`.
    ///
    /// The result may be empty (`start == end`) if the bounds exclude every
    /// sample; callers decide whether an empty window is an error or a skip.
    pub(crate) fn resolve(&self, len: usize) -> (usize, usize) {
        let start = self.nmin.min(len);
        let end = self.nmax.map_or(len, |m| m.min(len)).max(start);
        (start, end)
    }
}
