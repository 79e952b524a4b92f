//! Error taxonomy shared by every operation in the crate.
//!
//! The set is closed: callers match on three kinds and read the message.
//! Configuration loading has its own [`ConfigError`](crate::config::ConfigError).

use thiserror::Error;

/// Result type alias for image operations.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The caller passed a value that violates a precondition.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    /// Geometry extends past the current canvas.
    #[error("Out of bounds: {0}")]
    OutOfBounds(String),
    /// A transform, encoder or draw primitive failed, or the backend lacks the capability.
    #[error("Runtime error: {0}")]
    Runtime(String),
}

impl Error {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    pub fn out_of_bounds(message: impl Into<String>) -> Self {
        Self::OutOfBounds(message.into())
    }

    pub fn runtime(message: impl Into<String>) -> Self {
        Self::Runtime(message.into())
    }
}

impl From<image::ImageError> for Error {
    fn from(err: image::ImageError) -> Self {
        Self::Runtime(err.to_string())
    }
}
