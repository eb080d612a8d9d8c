//! Error types and result utilities for chunking operations.

use thiserror::Error;

/// Convenience type alias for results that may contain a [`ChunkError`].
pub type ChunkResult<T> = Result<T, ChunkError>;

/// Error types that can occur while cropping, chunking or transforming audio.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ChunkError {
    /// The input audio or a size argument cannot be worked with.
    ///
    /// Raised for empty sources, a zero chunk size or stride, a zero sample rate,
    /// and batches whose channel counts disagree.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// An option value is outside its accepted range.
    ///
    /// This includes inverted gain ranges, overlap fractions outside `[0, 1)`
    /// and probabilities outside `[0, 1]`.
    #[error("Invalid parameter error: {0}")]
    InvalidParameter(String),

    /// Array dimensions don't match expected values.
    #[error("Dimension mismatch error: {0}")]
    DimensionMismatch(String),

    /// Configuration could not be parsed or overridden.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ChunkError {
    /// Shorthand for an [`ChunkError::InvalidInput`] with a formatted message.
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        ChunkError::InvalidInput(msg.into())
    }

    /// Shorthand for an [`ChunkError::InvalidParameter`] naming the offending parameter.
    pub fn invalid_parameter(name: &str, reason: impl AsRef<str>) -> Self {
        ChunkError::InvalidParameter(format!("{name}: {}", reason.as_ref()))
    }
}

impl From<serde_yaml::Error> for ChunkError {
    fn from(err: serde_yaml::Error) -> Self {
        ChunkError::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_carry_context() {
        let err = ChunkError::invalid_parameter("overlap", "must be in [0, 1)");
        assert_eq!(
            err.to_string(),
            "Invalid parameter error: overlap: must be in [0, 1)"
        );
        let err = ChunkError::invalid_input("empty source");
        assert_eq!(err.to_string(), "Invalid input: empty source");
    }
}
