//! Testing utilities for listr
//!
//! This module provides a `TestDb` wrapper for temporary stores, item
//! fixtures, and in-memory repositories for exercising the pipeline.
//!
//! Only available when compiled with `cfg(test)`.

use crate::db::{Database, DbError};
use crate::item::{Item, ListingKind, Tag};
use crate::pipeline::ItemRepository;
use crate::search::TagFilterSet;
use chrono::{DateTime, TimeZone, Utc};
use std::cell::RefCell;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Wrapper for a temporary test database that cleans up on drop
///
/// The store lives in its own temporary directory, so parallel tests never
/// share state.
pub struct TestDb {
    // Field order matters: the database must close before the directory goes.
    db: Database,
    path: PathBuf,
    _dir: TempDir,
}

impl TestDb {
    /// Create an empty database in a fresh temporary directory
    ///
    /// # Panics
    /// Panics if the directory or database cannot be created.
    #[must_use]
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("store");
        let db = Database::open(&path).expect("Failed to open test database");
        Self {
            db,
            path,
            _dir: dir,
        }
    }

    /// Get a reference to the underlying database
    #[must_use]
    pub const fn db(&self) -> &Database {
        &self.db
    }

    /// Get the path to the test database
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// UTC timestamp `secs` seconds after the epoch
///
/// # Panics
/// Panics if `secs` is out of chrono's range.
#[must_use]
pub fn at(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(secs, 0).unwrap()
}

/// A paper created at `secs` with the given tag names
#[must_use]
pub fn paper(id: &str, secs: i64, title: &str, tags: &[&str]) -> Item {
    tags.iter().fold(
        Item::new(id, ListingKind::Papers, at(secs), title),
        |item, tag| item.with_tag(Tag::new(*tag)),
    )
}

/// A post created at `secs` by `author`
#[must_use]
pub fn post(id: &str, secs: i64, title: &str, author: &str) -> Item {
    Item::new(id, ListingKind::Posts, at(secs), title).with_author(author)
}

/// `n` papers `p1..=pn`, newest first, titled "Paper i"
///
/// Odd papers are tagged `CAT 1`, even ones `CAT 2`.
#[must_use]
pub fn numbered_papers(n: usize) -> Vec<Item> {
    (1..=n)
        .map(|i| {
            let tag = if i % 2 == 1 { "CAT 1" } else { "CAT 2" };
            let secs = i64::try_from(n - i).unwrap();
            paper(&format!("p{i}"), secs, &format!("Paper {i}"), &[tag])
        })
        .collect()
}

/// In-memory repository returning a fixed, pre-ordered dataset
///
/// Records the tag hint of every call so tests can inspect it.
pub struct VecRepository {
    items: Vec<Item>,
    requested: RefCell<Vec<Option<TagFilterSet>>>,
}

impl VecRepository {
    #[must_use]
    pub fn new(items: Vec<Item>) -> Self {
        Self {
            items,
            requested: RefCell::new(Vec::new()),
        }
    }

    /// Tag hints received so far, oldest call first
    #[must_use]
    pub fn requested_tags(&self) -> Vec<Option<TagFilterSet>> {
        self.requested.borrow().clone()
    }
}

impl ItemRepository for VecRepository {
    fn list(&self, tags: Option<&TagFilterSet>) -> Result<Vec<Item>, DbError> {
        self.requested.borrow_mut().push(tags.cloned());
        Ok(self.items.clone())
    }
}

/// Repository whose every fetch fails
pub struct FailingRepository;

impl ItemRepository for FailingRepository {
    fn list(&self, _tags: Option<&TagFilterSet>) -> Result<Vec<Item>, DbError> {
        Err(DbError::Unavailable("test repository is offline".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_db_basic() {
        let test_db = TestDb::new();
        assert_eq!(test_db.db().count(), 0);
        assert!(test_db.path().exists());
    }

    #[test]
    fn test_db_isolated() {
        let first = TestDb::new();
        let second = TestDb::new();
        first.db().insert(&paper("p1", 1, "Only here", &[])).unwrap();

        assert_eq!(first.db().count(), 1);
        assert_eq!(second.db().count(), 0);
        assert_ne!(first.path(), second.path());
    }

    #[test]
    fn test_numbered_papers_newest_first() {
        let items = numbered_papers(4);
        let ids: Vec<_> = items.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["p1", "p2", "p3", "p4"]);
        assert!(items.windows(2).all(|w| w[0].created_at > w[1].created_at));
        assert_eq!(items[0].tags[0].name, "CAT 1");
        assert_eq!(items[1].tags[0].name, "CAT 2");
    }

    #[test]
    fn test_failing_repository() {
        assert!(FailingRepository.list(None).is_err());
    }
}
