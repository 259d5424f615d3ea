// triton_core/src/errors.rs

use thiserror::Error;

/// Construction-time validation failures. These are raised once, when a
/// sensor or map is built, and never at tick time.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("range bounds must satisfy 0 <= min < max, got min {min} m, max {max} m")]
    InvalidRangeBounds { min: f64, max: f64 },

    #[error("cone aperture must be positive, got {0} rad")]
    NonPositiveConeAngle(f64),

    #[error("update frequency must be positive, got {0} Hz")]
    NonPositiveFrequency(f64),

    #[error("noise gain must be non-negative, got {0}")]
    NegativeNoiseGain(f64),

    #[error("occupancy grid must have at least one cell")]
    EmptyGrid,

    #[error("grid resolution must be positive, got {0} m")]
    NonPositiveResolution(f64),

    #[error("grid rows must all have the same length: row {row} has {got} cells, expected {expected}")]
    RaggedGridRows {
        row: usize,
        got: usize,
        expected: usize,
    },
}

/// The robot pose could not be resolved for a tick. Transient by design:
/// the scheduler skips the tick and publishes nothing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("pose of frame '{frame}' unresolvable: {reason}")]
pub struct PoseLookupError {
    pub frame: String,
    pub reason: String,
}

impl PoseLookupError {
    pub fn new(frame: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            frame: frame.into(),
            reason: reason.into(),
        }
    }
}
