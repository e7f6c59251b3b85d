//! Error types for the estimation core.

use std::fmt;

/// Error returned when an estimator cannot produce a result.
///
/// Every core function fails fast with one of these variants at the point of
/// detection; there is no silent coercion to NaN. Each variant carries enough
/// context to identify the quantity, seed, or parameter that triggered it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EstimateError {
    /// Input had the wrong shape or an out-of-range parameter.
    InvalidInput {
        /// What was wrong with the input.
        reason: String,
    },

    /// The series is too short for the requested analysis depth.
    InsufficientData {
        /// Minimum number of samples (or seeds) required.
        required: usize,
        /// Number actually available.
        available: usize,
        /// What was being computed when the shortage was detected.
        context: String,
    },

    /// A named quantity was not present in the dataset.
    MissingQuantity {
        /// The quantity name that failed to resolve.
        quantity: String,
    },

    /// A prefactor map was supplied but omits one of the listed sources.
    MissingPrefactor {
        /// The source quantity without a prefactor entry.
        quantity: String,
    },

    /// A truncation-bounds map was supplied but omits a seed present in the data.
    MissingSeedBound {
        /// The quantity being aggregated.
        quantity: String,
        /// The seed without a bounds entry.
        seed: String,
    },

    /// A zero-valued mean appeared in relative-error propagation.
    DivisionByZero {
        /// The operation that hit the zero denominator.
        context: String,
    },
}

impl fmt::Display for EstimateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EstimateError::InvalidInput { reason } => {
                write!(f, "invalid input: {}", reason)
            }
            EstimateError::InsufficientData {
                required,
                available,
                context,
            } => {
                write!(
                    f,
                    "insufficient data for {}: need at least {}, got {}",
                    context, required, available
                )
            }
            EstimateError::MissingQuantity { quantity } => {
                write!(f, "quantity '{}' not present in dataset", quantity)
            }
            EstimateError::MissingPrefactor { quantity } => {
                write!(f, "prefactor map omits source quantity '{}'", quantity)
            }
            EstimateError::MissingSeedBound { quantity, seed } => {
                write!(
                    f,
                    "truncation bounds for quantity '{}' omit seed '{}'",
                    quantity, seed
                )
            }
            EstimateError::DivisionByZero { context } => {
                write!(f, "division by zero in {}", context)
            }
        }
    }
}

impl std::error::Error for EstimateError {}

/// Result type for estimation operations.
pub type Result<T> = std::result::Result<T, EstimateError>;

impl EstimateError {
    /// Shorthand for an [`EstimateError::InvalidInput`] with a formatted reason.
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        EstimateError::InvalidInput {
            reason: reason.into(),
        }
    }
}
