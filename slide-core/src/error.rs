//! Error types for document and template loading.
//!
//! Editing operations never fail: an operation whose precondition does not
//! hold is a no-op. Errors are reserved for malformed input.

use thiserror::Error;

/// Result type for canvas operations.
pub type CanvasResult<T> = Result<T, CanvasError>;

/// Errors that can occur when loading documents or templates.
#[derive(Debug, Error)]
pub enum CanvasError {
    /// The document is structurally invalid.
    #[error("Invalid document: {0}")]
    InvalidDocument(String),

    /// The document contains no slides.
    #[error("Document contains no slides")]
    EmptyDocument,

    /// JSON serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The template is structurally invalid.
    #[error("Invalid template: {0}")]
    InvalidTemplate(String),
}
