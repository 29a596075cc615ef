//! Error types for pendular.
//!
//! Construction and configuration return `Result<T, SimError>` instead of
//! panicking. Numeric blow-ups during integration are *not* errors: a chain
//! whose state turns `NaN` keeps ticking until the next reseed replaces it.

use thiserror::Error;

/// Result type alias for pendular operations.
pub type SimResult<T> = Result<T, SimError>;

/// Unified error type for all pendular operations.
#[derive(Debug, Error)]
pub enum SimError {
    // ===== Construction Errors =====
    /// A per-segment input array does not match the segment count.
    #[error("Chain construction: {field} has {actual} entries, expected {expected}")]
    SegmentMismatch {
        /// Name of the offending input (e.g. "lengths").
        field: &'static str,
        /// Configured segment count.
        expected: usize,
        /// Length of the array actually supplied.
        actual: usize,
    },

    /// A chain must contain at least one segment.
    #[error("Chain construction: segment count must be at least 1")]
    EmptyChain,

    /// A trajectory buffer must hold at least one point.
    #[error("Chain construction: trajectory capacity must be at least 1")]
    EmptyTrajectory,

    // ===== Configuration Errors =====
    /// Invalid configuration parameter.
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the configuration error.
        message: String,
    },

    /// YAML parsing error.
    #[error("YAML parsing error: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    /// Schema validation error.
    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    // ===== I/O Errors =====
    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Telemetry serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl SimError {
    /// Create a configuration error with a message.
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a segment mismatch error.
    #[must_use]
    pub const fn segment_mismatch(field: &'static str, expected: usize, actual: usize) -> Self {
        Self::SegmentMismatch {
            field,
            expected,
            actual,
        }
    }

    /// Check if this error came from malformed construction or configuration
    /// input (as opposed to I/O).
    #[must_use]
    pub const fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            Self::SegmentMismatch { .. }
                | Self::EmptyChain
                | Self::EmptyTrajectory
                | Self::Config { .. }
                | Self::YamlParse(_)
                | Self::Validation(_)
        )
    }
}
