//! Error types for the Gaussian blur engine.
//!
//! Mirrors the taxonomy of spec section 7: invalid parameters and
//! unsupported input are reported without touching the image; resource
//! and internal errors are fatal to the call.

use thiserror::Error;

/// Result type alias using [`BlurError`] as the error type.
pub type BlurResult<T> = std::result::Result<T, BlurError>;

/// Errors that can occur while blurring an image.
#[derive(Debug, Error)]
pub enum BlurError {
    /// `sigma <= 0`. The image is left untouched.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Channel count outside `{3, 4}`, or buffer length mismatch.
    /// The image is left byte-identical to its input.
    #[error("unsupported input: {0}")]
    UnsupportedInput(String),

    /// Allocation or FFT-plan creation failure. Fatal to the call.
    #[error("resource error: {0}")]
    Resource(String),

    /// FFT primitive contract violation; never expected in practice.
    #[error("internal error: {0}")]
    Internal(String),
}

impl BlurError {
    /// Creates an [`BlurError::InvalidParameter`] error.
    pub fn invalid_parameter(msg: impl Into<String>) -> Self {
        Self::InvalidParameter(msg.into())
    }

    /// Creates an [`BlurError::UnsupportedInput`] error.
    pub fn unsupported_input(msg: impl Into<String>) -> Self {
        Self::UnsupportedInput(msg.into())
    }

    /// Creates an [`BlurError::Resource`] error.
    pub fn resource(msg: impl Into<String>) -> Self {
        Self::Resource(msg.into())
    }

    /// Creates an [`BlurError::Internal`] error.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_include_context() {
        let err = BlurError::invalid_parameter("sigma must be > 0");
        assert!(err.to_string().contains("sigma"));
    }
}
