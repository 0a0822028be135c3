//! Error types for pyramid binarization
//!
//! The algorithm itself is deterministic, so every failure here is either
//! bad input (dimensions, buffer sizes, parameters) or an I/O problem in the
//! driver layer. None of them are retried.

use thiserror::Error;

/// Smallest width or height a pyramid layer may have
pub const MIN_LAYER_SIZE: usize = 4;

/// Binarization error type
#[derive(Error, Debug)]
pub enum BinarizeError {
    /// Image narrower or shorter than the smallest pyramid layer (includes zero-sized)
    #[error("invalid image dimensions: {width}x{height} (minimum is {min}x{min})", min = MIN_LAYER_SIZE)]
    InvalidDimensions {
        /// Image width
        width: usize,
        /// Image height
        height: usize,
    },

    /// Requested threshold level does not exist in the built pyramid
    #[error("threshold level {level} out of range: pyramid has {depth} levels")]
    LevelOutOfRange {
        /// Requested level
        level: usize,
        /// Number of levels available
        depth: usize,
    },

    /// A 2x2 reduction was invoked on zero samples
    #[error("internal invariant violated: reduction over zero samples")]
    EmptyReduction,

    /// Packed pixel buffer length does not match the stated dimensions
    #[error("buffer size mismatch: expected {expected} bytes, got {actual}")]
    BufferSize {
        /// Required length in bytes
        expected: usize,
        /// Length supplied
        actual: usize,
    },

    /// Grid shape does not match the expected shape
    #[error("dimension mismatch: expected {}x{}, got {}x{}", .expected.0, .expected.1, .actual.0, .actual.1)]
    DimensionMismatch {
        /// Required `(width, height)`
        expected: (usize, usize),
        /// Supplied `(width, height)`
        actual: (usize, usize),
    },

    /// Invalid configuration value
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Image decode or encode error
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for binarization operations
pub type Result<T> = std::result::Result<T, BinarizeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = BinarizeError::InvalidDimensions {
            width: 3,
            height: 10,
        };
        assert_eq!(
            err.to_string(),
            "invalid image dimensions: 3x10 (minimum is 4x4)"
        );

        let err = BinarizeError::LevelOutOfRange { level: 3, depth: 3 };
        assert!(err.to_string().contains("level 3"));

        let err = BinarizeError::DimensionMismatch {
            expected: (4, 5),
            actual: (2, 3),
        };
        assert_eq!(err.to_string(), "dimension mismatch: expected 4x5, got 2x3");
    }

    #[test]
    fn test_io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: BinarizeError = io.into();
        assert!(matches!(err, BinarizeError::Io(_)));
    }
}
