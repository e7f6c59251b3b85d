//! Presentation of computed results: terminal reports, JSON export, and
//! curve plotting onto a caller-supplied surface.
//!
//! Nothing in this module computes statistics; it consumes the arrays and
//! reports produced by [`crate::statistics`] and [`crate::analysis`].

pub mod json;
pub mod plot;
pub mod terminal;

pub use json::{to_json, to_json_pretty};
pub use plot::{
    plot_autocorrelation, plot_binning, plot_timeseries, Scale, SeriesTrace, Surface, TextSurface,
};
pub use terminal::format_report;
