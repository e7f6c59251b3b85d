//! Configuration for the estimation pipeline.

/// Tunables shared by the resampling, autocorrelation, and pooling layers.
///
/// The defaults reproduce the conventional analysis: Bessel-corrected
/// within-seed errors, Sokal windowing constant `c = 5`, and a four-octave
/// safety margin at the top of the binning hierarchy.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisConfig {
    /// Delta degrees of freedom subtracted from N in variance denominators.
    ///
    /// `1.0` gives the unbiased sample variance (Bessel's correction).
    /// Default: 1.0.
    pub ddof: f64,

    /// Windowing constant `c` for the automatic autocorrelation cutoff.
    ///
    /// The summation window `M` is the smallest index with `c * tau[M] <= M`,
    /// balancing truncation bias against estimator variance. Default: 5.0.
    pub window_constant: f64,

    /// Octaves left unbinned at the top of the binning hierarchy.
    ///
    /// `binning_depth = max(0, floor(log2(N)) - maxk_offset)`; the margin
    /// keeps the plateaued error estimate away from the too-few-bins regime.
    /// Default: 4.
    pub maxk_offset: usize,

    /// Samples discarded from the start of each series before
    /// autocorrelation analysis. Default: 0.
    pub min_time: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            ddof: 1.0,
            window_constant: 5.0,
            maxk_offset: 4,
            min_time: 0,
        }
    }
}

impl AnalysisConfig {
    /// Create a configuration with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Preset for short chains: a two-octave binning margin.
    ///
    /// With fewer than a few thousand samples per seed the default margin
    /// often leaves no binning levels at all; this preset trades some
    /// too-few-bins noise for a usable plateau estimate.
    pub fn short_series() -> Self {
        Self {
            maxk_offset: 2,
            ..Default::default()
        }
    }

    /// Set the delta degrees of freedom.
    pub fn ddof(mut self, ddof: f64) -> Self {
        assert!(ddof >= 0.0, "ddof must be non-negative");
        self.ddof = ddof;
        self
    }

    /// Set the automatic-windowing constant.
    pub fn window_constant(mut self, c: f64) -> Self {
        assert!(c > 0.0, "window_constant must be positive");
        self.window_constant = c;
        self
    }

    /// Set the binning safety margin in octaves.
    pub fn maxk_offset(mut self, offset: usize) -> Self {
        self.maxk_offset = offset;
        self
    }

    /// Set the burn-in skip for autocorrelation analysis.
    pub fn min_time(mut self, min_time: usize) -> Self {
        self.min_time = min_time;
        self
    }

    /// Check that the configuration is internally consistent.
    pub fn validate(&self) -> Result<(), String> {
        if self.ddof < 0.0 {
            return Err("ddof must be non-negative".to_string());
        }
        if !self.window_constant.is_finite() || self.window_constant <= 0.0 {
            return Err("window_constant must be positive and finite".to_string());
        }
        Ok(())
    }
}
