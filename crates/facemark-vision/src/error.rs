//! Error types for the vision pipeline.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for vision operations.
pub type VisionResult<T> = Result<T, VisionError>;

/// Errors that can occur while decoding, detecting, or rendering.
#[derive(Debug, Error)]
pub enum VisionError {
    #[error("cannot decode image: {0}")]
    Decode(String),

    #[error("image dimensions are zero")]
    ZeroDimensions,

    #[error("failed to encode image: {0}")]
    Encode(String),

    #[error("face detection model not found: {0}")]
    ModelNotFound(PathBuf),

    #[error("failed to load face detection model: {0}")]
    ModelInvalid(String),

    #[error("no usable label font: {0}")]
    FontNotFound(String),

    #[error("failed to parse label font {0}")]
    FontInvalid(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl VisionError {
    /// Create a decode failure error.
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode(message.into())
    }

    /// Create an encode failure error.
    pub fn encode(message: impl Into<String>) -> Self {
        Self::Encode(message.into())
    }
}
