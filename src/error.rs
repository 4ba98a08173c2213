//! Error types for the Xiphos library.
//!
//! This module provides error handling for all Xiphos operations. All errors
//! are represented by the [`XiphosError`] enum, which provides detailed
//! information about what went wrong.
//!
//! # Examples
//!
//! ```
//! use xiphos::error::{Result, XiphosError};
//!
//! fn example_operation() -> Result<()> {
//!     Err(XiphosError::invalid_argument("limit must be positive"))
//! }
//!
//! match example_operation() {
//!     Ok(_) => println!("Success"),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use anyhow;
use thiserror::Error;

/// The main error type for Xiphos operations.
///
/// This enum represents all possible errors that can occur in the Xiphos
/// library. It uses the `thiserror` crate for automatic `Error` trait
/// implementation and provides convenient constructor methods for creating
/// specific error types.
#[derive(Error, Debug)]
pub enum XiphosError {
    /// Query analysis errors (tokenization, language detection).
    #[error("Analysis error: {0}")]
    Analysis(String),

    /// Errors reported by the external text-index store.
    #[error("Lexical backend error: {0}")]
    LexicalBackend(String),

    /// Errors reported by the external vector store.
    #[error("Vector backend error: {0}")]
    VectorBackend(String),

    /// Errors reported by the embedding provider.
    #[error("Embedding error: {0}")]
    Embedding(String),

    /// Configuration loading errors.
    #[error("Config error: {0}")]
    Config(String),

    /// A backend call exceeded its deadline.
    #[error("Timeout: {0}")]
    Timeout(String),

    /// Structurally invalid request parameters.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// JSON serialization/deserialization errors.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error for other cases.
    #[error("Error: {0}")]
    Other(String),

    /// Generic anyhow error.
    #[error("Anyhow error: {0}")]
    Anyhow(#[from] anyhow::Error),
}

/// Result type alias for operations that may fail with XiphosError.
pub type Result<T> = std::result::Result<T, XiphosError>;

impl XiphosError {
    /// Create a new analysis error.
    pub fn analysis<S: Into<String>>(msg: S) -> Self {
        XiphosError::Analysis(msg.into())
    }

    /// Create a new lexical backend error.
    pub fn lexical_backend<S: Into<String>>(msg: S) -> Self {
        XiphosError::LexicalBackend(msg.into())
    }

    /// Create a new vector backend error.
    pub fn vector_backend<S: Into<String>>(msg: S) -> Self {
        XiphosError::VectorBackend(msg.into())
    }

    /// Create a new embedding error.
    pub fn embedding<S: Into<String>>(msg: S) -> Self {
        XiphosError::Embedding(msg.into())
    }

    /// Create a new config error.
    pub fn config<S: Into<String>>(msg: S) -> Self {
        XiphosError::Config(msg.into())
    }

    /// Create a new timeout error.
    pub fn timeout<S: Into<String>>(msg: S) -> Self {
        XiphosError::Timeout(msg.into())
    }

    /// Create a new invalid argument error.
    pub fn invalid_argument<S: Into<String>>(msg: S) -> Self {
        XiphosError::InvalidArgument(msg.into())
    }

    /// Create a new generic error.
    pub fn other<S: Into<String>>(msg: S) -> Self {
        XiphosError::Other(msg.into())
    }

    /// True for errors that the orchestrator absorbs as an empty sub-result
    /// rather than surfacing to the caller.
    pub fn is_degradation(&self) -> bool {
        matches!(
            self,
            XiphosError::LexicalBackend(_)
                | XiphosError::VectorBackend(_)
                | XiphosError::Embedding(_)
                | XiphosError::Timeout(_)
        )
    }
}
