//! Error types for the Liana library.
//!
//! All errors are represented by the [`LianaError`] enum. Configuration
//! errors are raised synchronously during indexer construction and are
//! fatal; backend communication failures propagate to the caller of the
//! triggering operation.
//!
//! # Examples
//!
//! ```
//! use liana::error::{LianaError, Result};
//!
//! fn example_operation() -> Result<()> {
//!     Err(LianaError::configuration("No index name information found"))
//! }
//!
//! match example_operation() {
//!     Ok(_) => println!("Success"),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use std::io;

use anyhow;
use thiserror::Error;

/// The main error type for Liana operations.
///
/// This enum represents all possible errors that can occur in the Liana
/// library. It uses the `thiserror` crate for automatic `Error` trait
/// implementation and provides convenient constructor methods for creating
/// specific error types.
#[derive(Error, Debug)]
pub enum LianaError {
    /// I/O errors (file operations, network, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Configuration resolution errors (connection, index name, document
    /// type, primary key). Raised during indexer construction, never retried.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Schema-related errors
    #[error("Schema error: {0}")]
    Schema(String),

    /// Search-related errors (hit resolution, query execution)
    #[error("Search error: {0}")]
    Search(String),

    /// Field-related errors
    #[error("Field error: {0}")]
    Field(String),

    /// Backend-related errors surfaced by a collaborator implementation
    #[error("Backend error: {0}")]
    Backend(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error for other cases
    #[error("Error: {0}")]
    Other(String),

    /// Generic anyhow error
    #[error("Anyhow error: {0}")]
    Anyhow(#[from] anyhow::Error),
}

/// Result type alias for operations that may fail with LianaError.
pub type Result<T> = std::result::Result<T, LianaError>;

impl LianaError {
    /// Create a new configuration error.
    pub fn configuration<S: Into<String>>(msg: S) -> Self {
        LianaError::Configuration(msg.into())
    }

    /// Create a new schema error.
    pub fn schema<S: Into<String>>(msg: S) -> Self {
        LianaError::Schema(msg.into())
    }

    /// Create a new search error.
    pub fn search<S: Into<String>>(msg: S) -> Self {
        LianaError::Search(msg.into())
    }

    /// Create a new field error.
    pub fn field<S: Into<String>>(msg: S) -> Self {
        LianaError::Field(msg.into())
    }

    /// Create a new backend error.
    pub fn backend<S: Into<String>>(msg: S) -> Self {
        LianaError::Backend(msg.into())
    }

    /// Create a new generic error.
    pub fn other<S: Into<String>>(msg: S) -> Self {
        LianaError::Other(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_construction() {
        let error = LianaError::configuration("Test configuration error");
        assert_eq!(
            error.to_string(),
            "Configuration error: Test configuration error"
        );

        let error = LianaError::schema("Test schema error");
        assert_eq!(error.to_string(), "Schema error: Test schema error");

        let error = LianaError::search("Test search error");
        assert_eq!(error.to_string(), "Search error: Test search error");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let liana_error = LianaError::from(io_error);

        match liana_error {
            LianaError::Io(_) => {} // Expected
            _ => panic!("Expected IO error variant"),
        }
    }
}
