//! Tag filtering and fuzzy ranking of listing items
//!
//! - [`filter`]: exact, set-based tag inclusion (OR semantics)
//! - [`query`]: parsing of the raw search string into a [`Query`]
//! - [`distance`]: location-independent edit distance
//! - [`fuzzy`]: weighted multi-field scoring built on top of [`distance`]

pub mod distance;
pub mod error;
pub mod filter;
pub mod fuzzy;
pub mod query;

pub use error::SearchError;
pub use filter::{TagFilterExt, TagFilterSet, Tagged};
pub use fuzzy::{FieldAccessor, FieldSpec, FuzzyMatcher, SearchResult};
pub use query::Query;
