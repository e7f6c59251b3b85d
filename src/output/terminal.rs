//! Terminal rendering of pooled-estimate reports.

use colored::Colorize;

use crate::analysis::{PoolingPolicy, Report};

/// Format a [`Report`] as a human-readable table.
///
/// Scalar quantities print as `mean +- error`; vector-valued quantities
/// print their trailing shape with per-component values on one line.
pub fn format_report(report: &Report) -> String {
    let mut out = String::new();
    let policy = match report.policy {
        PoolingPolicy::CrossSeed => "cross-seed pooling",
        PoolingPolicy::AutocorrWeighted => "autocorrelation-weighted pooling",
    };
    out.push_str(&format!("{} ({})\n", "Pooled estimates".bold(), policy));
    let sep = "\u{2500}".repeat(62);
    out.push_str(&sep);
    out.push('\n');

    for (name, estimate) in &report.estimates {
        match estimate.scalar() {
            Some((mean, error)) => {
                out.push_str(&format!(
                    "  {:<16} {:>14.8} {} {:<12.8}",
                    name.bold(),
                    mean,
                    "+-".dimmed(),
                    error
                ));
            }
            None => {
                let means: Vec<String> =
                    estimate.mean.iter().map(|v| format!("{:.6}", v)).collect();
                let errors: Vec<String> =
                    estimate.error.iter().map(|v| format!("{:.6}", v)).collect();
                out.push_str(&format!(
                    "  {:<16} shape {:?}: [{}] {} [{}]",
                    name.bold(),
                    estimate.mean.shape(),
                    means.join(", "),
                    "+-".dimmed(),
                    errors.join(", ")
                ));
            }
        }
        if let Some(tau) = estimate.tau {
            out.push_str(&format!("  tau = {:.3}", tau));
        }
        out.push_str(&format!("  ({} seeds)\n", estimate.n_seeds));
    }
    out
}
