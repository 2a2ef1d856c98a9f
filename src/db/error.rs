//! Database-specific error types
//!
//! This module defines all error types that can occur during storage operations.
//!
//! # Error Types
//!
//! - **`SledError`**: Errors from the underlying sled embedded database
//! - **`DecodeError`** / **`EncodeError`**: bincode failures on stored values
//! - **`JsonError`**: Malformed item import files
//! - **`Unavailable`**: A repository could not be reached at all
//!
//! All errors implement `std::error::Error` via the `thiserror` crate.

use thiserror::Error;

/// Database-specific errors
#[derive(Debug, Error)]
pub enum DbError {
    /// Represents a sled database error
    #[error("Database error: {0}")]
    SledError(#[from] sled::Error),

    /// Represents a bincode decoding error
    #[error("Error while decoding data: {0}")]
    DecodeError(#[from] bincode::error::DecodeError),

    /// Represents a bincode encoding error
    #[error("Error while encoding data: {0}")]
    EncodeError(#[from] bincode::error::EncodeError),

    /// Represents a JSON import error
    #[error("Error while parsing items: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Generic serialization/deserialization error
    #[error("Error during serialization: {0}")]
    SerializeError(String),

    /// A path could not be read
    #[error("Error while reading path {0}")]
    PathError(String),

    /// Invalid input provided (e.g., an item without a title)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The backing store could not be reached
    #[error("Repository unavailable: {0}")]
    Unavailable(String),
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod error_tests;
