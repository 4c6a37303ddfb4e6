//! Error types for the cover composer

use thiserror::Error;

/// Result type alias for layout and rendering operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while laying out, composing or persisting a cover
#[derive(Error, Debug)]
pub enum Error {
    /// Layout or adapter configuration is unusable (non-positive width, font size...)
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The host measurer could not produce a width
    #[error("Measurement failed: {0}")]
    Measure(String),

    /// Failed to rasterize or encode an image
    #[error("Rendering failed: {0}")]
    RenderError(String),

    /// Persisted state could not be (de)serialized
    #[error("State serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Filesystem error from a directory-backed store or the CLI
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(feature = "raster")]
impl From<image::ImageError> for Error {
    fn from(err: image::ImageError) -> Self {
        Error::RenderError(err.to_string())
    }
}
