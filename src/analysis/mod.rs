//! Multi-seed aggregation.
//!
//! Combines per-seed timeseries of each named quantity into a pooled mean
//! and error bar, under either the cross-seed or the
//! autocorrelation-weighted policy. See [`pooling`] for the two rules and
//! when each applies.

pub mod pooling;

pub use pooling::{
    mean_err_of_data, mean_err_tau_of_data, PooledEstimate, PoolingPolicy, Report, WindowMap,
};
