//! Error types for shimmer configuration.

use thiserror::Error;

/// Result type for shimmer operations.
pub type Result<T> = std::result::Result<T, ShimmerError>;

/// Reasons a shimmer configuration is rejected at construction time.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ShimmerError {
    /// Gradient has no stops at all.
    #[error("gradient must have at least one stop")]
    EmptyGradient,

    /// Gradient does not start at 0.0 and end at 1.0.
    #[error("gradient must span [0, 1], got first stop {first} and last stop {last}")]
    GradientBounds { first: f64, last: f64 },

    /// A stop position is NaN or outside [0, 1].
    #[error("gradient stop {index} at {position} is outside [0, 1]")]
    StopOutOfRange { index: usize, position: f64 },

    /// Stop positions decrease somewhere.
    #[error("gradient stop {index} at {current} comes before previous stop at {previous}")]
    NonMonotonicStops {
        index: usize,
        previous: f64,
        current: f64,
    },

    /// Period must be a positive, finite duration.
    #[error("period must be positive, got {0} ms")]
    InvalidPeriod(f64),

    /// Delay must be non-negative and finite.
    #[error("delay must be non-negative, got {0} ms")]
    InvalidDelay(f64),

    /// A color string could not be parsed.
    #[error("invalid color: {0}")]
    InvalidColor(String),

    /// Direction name is not one of the known sweeps.
    #[error("unknown direction {0:?}")]
    UnknownDirection(String),
}
