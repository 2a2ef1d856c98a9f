//! Listr - tag filtering, fuzzy search and pagination for content listings
//!
//! This library turns a newest-first list of papers or posts into a validated
//! page of results: items are filtered by tag, ranked against a free-text
//! query with a weighted edit-distance matcher, and sliced into fixed-size
//! pages. Out-of-range page requests produce a redirect to the canonical page.

use thiserror::Error;

pub mod cli;
pub mod config;
pub mod db;
pub mod item;
pub mod output;
pub mod pagination;
pub mod pipeline;
pub mod search;

#[cfg(test)]
pub mod testing;

pub use item::{Comment, Item, ListingKind, Tag};
pub use pagination::PaginationOutcome;
pub use pipeline::{ItemRepository, ListingProfile, ListingRequest, SearchPipeline};

/// Error enum, contains all failure states of the program
#[derive(Debug, Error)]
pub enum ListrError {
    /// Database error
    #[error("Database error: {0}")]
    DbError(#[from] db::DbError),
    /// Search error
    #[error("Search error: {0}")]
    SearchError(#[from] search::SearchError),
    /// Represents a configuration error
    #[error("Configuration error: {0}")]
    ConfigError(#[from] ::config::ConfigError),
    /// Represents an I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
    /// Invalid input error
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
