//! Error types for the stockscan-core library.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for the stockscan library.
#[derive(Error, Debug)]
pub enum StockscanError {
    /// OCR processing error.
    #[error("OCR error: {0}")]
    Ocr(#[from] OcrError),

    /// The caller's request was rejected.
    #[error("request rejected: {0}")]
    Request(#[from] RequestError),

    /// Storage error.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors raised while locating or running the OCR engine.
///
/// None of these reach the caller of an extraction: the orchestrator turns
/// every one of them into a fallback run.
#[derive(Error, Debug)]
pub enum OcrError {
    /// No usable engine binary was found at startup.
    #[error("engine unavailable: {0}")]
    EngineUnavailable(String),

    /// The image could not be decoded or re-encoded for the engine.
    #[error("invalid image: {0}")]
    InvalidImage(String),

    /// The engine process could not be started.
    #[error("failed to invoke engine: {0}")]
    Invocation(String),

    /// The engine ran but exited unsuccessfully.
    #[error("engine exited with {status}: {stderr}")]
    EngineFailed { status: String, stderr: String },

    /// I/O error while preparing engine input.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Malformed-request conditions that are surfaced directly.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RequestError {
    /// No image, or an empty filename, was supplied.
    #[error("{0}")]
    MissingInput(String),

    /// The confirmed-items list was empty.
    #[error("No items received")]
    EmptyConfirmedItems,
}

/// Errors from the flat-file stores.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Failed to create or write a file.
    #[error("failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to serialize a payload.
    #[error("failed to serialize: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl StorageError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type for the stockscan library.
pub type Result<T> = std::result::Result<T, StockscanError>;
