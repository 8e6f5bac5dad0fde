//! Error types for the image crate.

use thiserror::Error;

/// Result type alias for conversion operations.
pub type Result<T> = std::result::Result<T, ConvertError>;

/// Errors that can occur while converting an image.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// Input is not a recognizable raster image
    #[error("decode failed: {0}")]
    Decode(String),

    /// The encoder rejected the decoded image
    #[error("{format} encode failed: {message}")]
    Encode {
        /// Target format name
        format: &'static str,
        /// Encoder message
        message: String,
    },

    /// Requested output format is not one of png, jpg, jpeg
    #[error("unsupported target format: {0:?}")]
    UnsupportedFormat(String),
}

impl ConvertError {
    /// Whether this error was caused by the input bytes rather than the request.
    pub fn is_decode(&self) -> bool {
        matches!(self, ConvertError::Decode(_))
    }
}
