//! Error types for the bento-core library.

use thiserror::Error;

/// Main error type for the bento library.
#[derive(Error, Debug)]
pub enum BentoError {
    /// OCR boundary error.
    #[error("OCR error: {0}")]
    Ocr(#[from] OcrError),

    /// Ledger or preference store error.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Field extraction or validation error.
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors raised by an external text recognizer.
#[derive(Error, Debug)]
pub enum OcrError {
    /// The recognizer could not be started or reached.
    #[error("recognizer unavailable: {0}")]
    Unavailable(String),

    /// Recognition ran but failed.
    #[error("text recognition failed: {0}")]
    Recognition(String),

    /// The input could not be read as an image.
    #[error("invalid image: {0}")]
    InvalidImage(String),
}

/// Errors related to persisted ledger and preference data.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Reading or writing the backing file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The backing file holds malformed data.
    #[error("failed to parse {path}: {reason}")]
    Parse { path: String, reason: String },

    /// No record with the given id.
    #[error("transaction not found: {0}")]
    NotFound(String),
}

/// Errors related to field values.
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// Field validation failed.
    #[error("validation failed for {field}: {reason}")]
    Validation { field: String, reason: String },

    /// Failed to parse a value.
    #[error("failed to parse {field}: {value}")]
    Parse { field: String, value: String },
}

/// Result type for the bento library.
pub type Result<T> = std::result::Result<T, BentoError>;
