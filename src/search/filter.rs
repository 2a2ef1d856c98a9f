//! Trait-based tag filtering
//!
//! Any collection of records can be filtered by tag as long as the record
//! type exposes its tag names through [`Tagged`]. The filter is an exact,
//! set-based inclusion test with OR semantics: an item survives when at
//! least one of its tag names is in the requested [`TagFilterSet`].
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │  Tagged Trait                       │  ← Adaptation layer
//! │  - tag_names() -> Iterator<&str>    │
//! └─────────────────────────────────────┘
//!            ▲
//!            │ implements
//!          Item
//!
//! ┌─────────────────────────────────────┐
//! │  TagFilterExt<T: Tagged>            │  ← Filtering logic
//! │  - filter_tags(&TagFilterSet)       │
//! └─────────────────────────────────────┘
//! ```
//!
//! # Examples
//!
//! ```ignore
//! use listr::search::{TagFilterExt, TagFilterSet};
//!
//! let tags = TagFilterSet::from_params(&["CAT 1,CAT 2".to_string()]);
//! let kept = items.filter_tags(&tags);
//! ```

use crate::item::Item;
use std::collections::BTreeSet;

/// Unordered set of requested tag names; empty means "no tag filtering"
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagFilterSet(BTreeSet<String>);

impl TagFilterSet {
    /// Normalize raw `tags` request values into a set of tag names
    ///
    /// The parameter arrives either absent (empty slice), as a single
    /// comma-joined value, or as several values. Every value is split on
    /// commas, trimmed, and empty names are dropped.
    #[must_use]
    pub fn from_params(raw: &[String]) -> Self {
        Self(
            raw.iter()
                .flat_map(|value| value.split(','))
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(String::from)
                .collect(),
        )
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains(name)
    }

    /// Tag names in sorted order
    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        self.0.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for TagFilterSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

/// Types that carry a set of tag names
pub trait Tagged {
    /// Return the tag names of this record
    fn tag_names(&self) -> impl Iterator<Item = &str> + '_;

    /// Whether any of this record's tags is in `tags`
    fn matches_any(&self, tags: &TagFilterSet) -> bool {
        self.tag_names().any(|name| tags.contains(name))
    }
}

impl Tagged for Item {
    fn tag_names(&self) -> impl Iterator<Item = &str> + '_ {
        Item::tag_names(self)
    }
}

/// Keep the items whose tag names intersect `tags`, preserving order
///
/// An empty `tags` set is the identity.
#[must_use]
pub fn filter<T: Tagged>(items: Vec<T>, tags: &TagFilterSet) -> Vec<T> {
    if tags.is_empty() {
        return items;
    }
    items.into_iter().filter(|item| item.matches_any(tags)).collect()
}

/// Extension trait adding tag filtering to owned collections
pub trait TagFilterExt<T: Tagged> {
    /// Filter by tag with OR semantics, see [`filter`]
    #[must_use]
    fn filter_tags(self, tags: &TagFilterSet) -> Vec<T>;
}

impl<T: Tagged> TagFilterExt<T> for Vec<T> {
    fn filter_tags(self, tags: &TagFilterSet) -> Vec<T> {
        filter(self, tags)
    }
}
