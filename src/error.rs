//! Custom error types for cartoonizer.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the cartoonizer library.
#[derive(Error, Debug)]
pub enum Error {
    /// Selected bytes are not a decodable image.
    #[error("failed to decode image: {source}")]
    Decode {
        #[source]
        source: image::ImageError,
    },

    /// Failed to load an image file.
    #[error("failed to load image from {path}: {source}")]
    ImageRead {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// Failed to save an image file.
    #[error("failed to save image to {path}: {source}")]
    ImageSave {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// Inference was requested before the model finished loading and warming up.
    #[error("model is not ready: load and warm-up must complete first")]
    ModelNotReady,

    /// Failed to download the model artifact.
    #[cfg(feature = "onnx")]
    #[error("failed to download model {name}: {source}")]
    ModelDownload {
        name: String,
        #[source]
        source: reqwest::Error,
    },

    /// Failed to load the serialized model graph.
    #[cfg(feature = "onnx")]
    #[error("failed to load model from {path}: {source}")]
    ModelLoad {
        path: PathBuf,
        #[source]
        source: ort::Error,
    },

    /// Model inference failed.
    #[cfg(feature = "onnx")]
    #[error("model inference failed: {source}")]
    Inference {
        #[source]
        source: ort::Error,
    },

    /// Failed to create cache directory.
    #[error("failed to create cache directory {path}: {source}")]
    CacheDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Invalid parameter value.
    #[error("invalid parameter {name}: {reason}")]
    InvalidParameter { name: String, reason: String },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Shape mismatch in tensor operations.
    #[error("tensor shape mismatch: expected {expected}, got {actual}")]
    ShapeMismatch { expected: String, actual: String },

    /// Render target or requested display size is unusable.
    #[error("render target unavailable or zero-sized ({width}x{height})")]
    Render { width: u32, height: u32 },
}

/// Result type alias for cartoonizer operations.
pub type Result<T> = std::result::Result<T, Error>;
