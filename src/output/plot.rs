//! Rendering of computed curves onto a caller-supplied surface.
//!
//! Every entry point here consumes arrays that were already computed by
//! the statistics layer; no numeric work happens in this module. The
//! drawing target is an explicit parameter: pass `Some(surface)` to draw
//! onto an existing surface, or `None` to have a fresh default-constructed
//! one created and returned.

use serde::{Deserialize, Serialize};

use crate::statistics::{AcfBand, AcfCurve, BinningCurve};

/// Axis scaling for a rendered curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Scale {
    /// Linear axis.
    Linear,
    /// Logarithmic axis.
    Log,
}

/// A drawing target for curve plots.
///
/// Implement this for whatever backend is at hand (a GUI plot widget, an
/// SVG writer); [`TextSurface`] is the built-in plain-text fallback.
pub trait Surface {
    /// Draw one labeled curve.
    fn curve(&mut self, label: &str, xs: &[f64], ys: &[f64], xscale: Scale, yscale: Scale);

    /// Draw a shaded `center ± halfwidth` band.
    fn band(&mut self, label: &str, xs: &[f64], center: &[f64], halfwidth: &[f64]);

    /// Mark a vertical position (e.g. a truncation start).
    fn vline(&mut self, label: &str, x: f64);
}

/// Plain-text [`Surface`] that records draws as readable lines.
#[derive(Debug, Default)]
pub struct TextSurface {
    lines: Vec<String>,
}

impl TextSurface {
    /// Create an empty surface.
    pub fn new() -> Self {
        Self::default()
    }

    /// The rendered plot as text.
    pub fn render(&self) -> String {
        self.lines.join("\n")
    }
}

impl Surface for TextSurface {
    fn curve(&mut self, label: &str, xs: &[f64], ys: &[f64], xscale: Scale, yscale: Scale) {
        self.lines.push(format!(
            "curve '{}' [{:?} x, {:?} y], {} points",
            label,
            xscale,
            yscale,
            xs.len()
        ));
        for (x, y) in xs.iter().zip(ys) {
            self.lines.push(format!("  {:>12.6}  {:>14.8}", x, y));
        }
    }

    fn band(&mut self, label: &str, xs: &[f64], center: &[f64], halfwidth: &[f64]) {
        self.lines
            .push(format!("band '{}', {} points", label, xs.len()));
        for ((x, c), h) in xs.iter().zip(center).zip(halfwidth) {
            self.lines
                .push(format!("  {:>12.6}  {:>14.8} +- {:<12.8}", x, c, h));
        }
    }

    fn vline(&mut self, label: &str, x: f64) {
        self.lines.push(format!("vline '{}' at {}", label, x));
    }
}

/// One seed's raw timeseries, ready for an overlay plot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesTrace {
    /// Seed identifier.
    pub seed: String,
    /// Samples in time order.
    pub samples: Vec<f64>,
    /// Index of the first sample kept after equilibration, if marked.
    pub truncation: Option<usize>,
}

/// Render an error-vs-binsize curve on a log-scale x axis.
pub fn plot_binning<S: Surface + Default>(curve: &BinningCurve, surface: Option<S>) -> S {
    let mut surface = surface.unwrap_or_default();
    let xs: Vec<f64> = curve.binsizes.iter().map(|&b| b as f64).collect();
    surface.curve("binning", &xs, &curve.errors, Scale::Log, Scale::Linear);
    surface
}

/// Render per-seed autocorrelation curves on a log-scale y axis, optionally
/// overlaying the cross-seed mean ± error band.
pub fn plot_autocorrelation<S: Surface + Default>(
    curves: &[AcfCurve],
    band: Option<&AcfBand>,
    surface: Option<S>,
) -> S {
    let mut surface = surface.unwrap_or_default();
    for curve in curves {
        let lags: Vec<f64> = (0..curve.acf.len()).map(|lag| lag as f64).collect();
        surface.curve(&curve.seed, &lags, &curve.acf, Scale::Linear, Scale::Log);
    }
    if let Some(band) = band {
        let lags: Vec<f64> = (0..band.mean.len()).map(|lag| lag as f64).collect();
        surface.band("cross-seed mean", &lags, &band.mean, &band.err);
    }
    surface
}

/// Overlay raw per-seed timeseries, optionally marking each seed's
/// truncation start.
pub fn plot_timeseries<S: Surface + Default>(traces: &[SeriesTrace], surface: Option<S>) -> S {
    let mut surface = surface.unwrap_or_default();
    for trace in traces {
        let xs: Vec<f64> = (0..trace.samples.len()).map(|t| t as f64).collect();
        surface.curve(&trace.seed, &xs, &trace.samples, Scale::Linear, Scale::Linear);
        if let Some(start) = trace.truncation {
            surface.vline(&format!("{} truncation", trace.seed), start as f64);
        }
    }
    surface
}
