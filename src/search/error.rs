//! Search-specific error types
//!
//! These errors can occur while building a matcher from configuration or
//! while fetching the dataset a search runs over.
//!
//! # Error Types
//!
//! - **`RepositoryError`**: The item repository failed to supply a dataset (wraps `DbError`)
//! - **`InvalidField`**: A weighted field was configured with an unusable weight or threshold
//! - **`InvalidProfile`**: A listing profile cannot be used (no fields, zero page size, ...)

use thiserror::Error;

/// Search-specific errors
#[derive(Debug, Error)]
pub enum SearchError {
    /// The repository could not supply items
    #[error("Repository error: {0}")]
    RepositoryError(#[from] crate::db::DbError),

    /// A weighted field has an invalid weight or acceptance threshold
    #[error("Invalid field '{field}': {reason}")]
    InvalidField { field: String, reason: String },

    /// A listing profile is unusable
    #[error("Invalid listing profile: {0}")]
    InvalidProfile(String),
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod error_tests;
