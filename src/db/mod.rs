//! Item store for listr
//!
//! Provides the repository the search pipeline reads from, using sled as the
//! embedded database backend.
//!
//! Uses two sled trees:
//! - `items`: Main tree mapping item ids to serialized items
//! - `tags`: Reverse index mapping tag names to item ids
//!
//! The store only answers "which items exist (with these tags)"; all text
//! matching happens in [`crate::search`].

use crate::item::{Item, ListingKind};
use crate::pipeline::ItemRepository;
use crate::search::TagFilterSet;
use sled::{Db, Tree};
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

pub mod error;

pub use error::DbError;

/// Database wrapper that encapsulates all storage operations
///
/// Uses two trees for efficient lookups:
/// - `items` tree: `id` -> `Item`
/// - `tags` tree: tag -> Vec<`id`>
pub struct Database {
    db: Db,
    items: Tree,
    tags: Tree,
}

impl Database {
    /// Opens or creates a database at the specified path
    ///
    /// # Examples
    /// ```no_run
    /// use listr::db::Database;
    /// let db = Database::open("my_db").unwrap();
    /// ```
    ///
    /// # Errors
    ///
    /// Returns `DbError` if the database cannot be opened or if the internal
    /// trees cannot be created.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, DbError> {
        let db = sled::open(path)?;
        let items = db.open_tree("items")?;
        let tags = db.open_tree("tags")?;
        Ok(Self { db, items, tags })
    }

    /// Insert or replace an item
    ///
    /// Repeated tag names on the item are collapsed before storing.
    ///
    /// # Errors
    ///
    /// Returns `DbError::InvalidInput` if the id or title is blank, or a
    /// `DbError` if database operations or serialization fail.
    pub fn insert(&self, item: &Item) -> Result<(), DbError> {
        if item.id.trim().is_empty() {
            return Err(DbError::InvalidInput("item id must not be empty".to_string()));
        }
        if item.title.trim().is_empty() {
            return Err(DbError::InvalidInput(format!(
                "item '{}' has an empty title",
                item.id
            )));
        }

        let mut item = item.clone();
        item.dedup_tags();

        if let Some(old) = self.get(&item.id)? {
            self.remove_from_tag_index(&old.id, &tag_names(&old))?;
        }

        let value = bincode::serde::encode_to_vec(&item, bincode::config::standard())?;
        self.items.insert(item.id.as_bytes(), value)?;
        self.add_to_tag_index(&item.id, &tag_names(&item))?;

        Ok(())
    }

    /// Get an item by id
    ///
    /// # Errors
    ///
    /// Returns `DbError` if database operations fail or deserialization errors occur.
    pub fn get(&self, id: &str) -> Result<Option<Item>, DbError> {
        match self.items.get(id.as_bytes())? {
            Some(value) => Ok(Some(decode_item(&value)?)),
            None => Ok(None),
        }
    }

    /// Remove an item and its tag index entries
    ///
    /// # Errors
    ///
    /// Returns `DbError` if database operations fail.
    pub fn remove(&self, id: &str) -> Result<bool, DbError> {
        if let Some(item) = self.get(id)? {
            self.remove_from_tag_index(id, &tag_names(&item))?;
        }
        Ok(self.items.remove(id.as_bytes())?.is_some())
    }

    /// List published items of one kind, newest first
    ///
    /// With a non-empty `tags` set only items carrying at least one of the
    /// tags are loaded, using the reverse index. Items created at the same
    /// instant are ordered by id.
    ///
    /// # Errors
    ///
    /// Returns `DbError` if database iteration fails or deserialization errors occur.
    pub fn list_items(
        &self,
        kind: ListingKind,
        tags: Option<&TagFilterSet>,
    ) -> Result<Vec<Item>, DbError> {
        let mut items = match tags.filter(|t| !t.is_empty()) {
            Some(tags) => {
                let ids = self.find_by_any_tag(tags)?;
                let mut items = Vec::with_capacity(ids.len());
                for id in ids {
                    if let Some(item) = self.get(&id)? {
                        items.push(item);
                    }
                }
                items
            }
            None => self.list_all()?,
        };

        items.retain(|item| item.kind == kind && item.published);
        items.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| a.id.cmp(&b.id))
        });

        debug!(kind = %kind, count = items.len(), "listed items");
        Ok(items)
    }

    /// Every stored item, in key order
    ///
    /// # Errors
    ///
    /// Returns `DbError` if database iteration fails or deserialization errors occur.
    pub fn list_all(&self) -> Result<Vec<Item>, DbError> {
        let mut items = Vec::new();
        for result in &self.items {
            let (_, value) = result?;
            items.push(decode_item(&value)?);
        }
        Ok(items)
    }

    /// Ids of all items with a specific tag
    ///
    /// # Errors
    ///
    /// Returns `DbError` if database operations fail or deserialization errors occur.
    pub fn find_by_tag(&self, tag: &str) -> Result<Vec<String>, DbError> {
        match self.tags.get(tag.as_bytes())? {
            Some(value) => {
                let (ids, _): (Vec<String>, usize) =
                    bincode::decode_from_slice(&value, bincode::config::standard())?;
                Ok(ids)
            }
            None => Ok(Vec::new()),
        }
    }

    /// Ids of items that have any of the given tags, without duplicates
    ///
    /// # Errors
    ///
    /// Returns `DbError` if any tag lookup fails.
    pub fn find_by_any_tag(&self, tags: &TagFilterSet) -> Result<BTreeSet<String>, DbError> {
        let mut ids = BTreeSet::new();
        for tag in tags.iter() {
            ids.extend(self.find_by_tag(tag)?);
        }
        Ok(ids)
    }

    /// Get all unique tag names in the database, sorted
    ///
    /// # Errors
    ///
    /// Returns `DbError` if database iteration fails or if tag keys contain invalid UTF-8.
    pub fn list_all_tags(&self) -> Result<Vec<String>, DbError> {
        let mut tags = Vec::new();
        for result in &self.tags {
            let (key, _) = result?;
            let tag = String::from_utf8(key.to_vec())
                .map_err(|e| DbError::SerializeError(format!("tag key is not UTF-8: {e}")))?;
            tags.push(tag);
        }
        tags.sort();
        Ok(tags)
    }

    /// Load a JSON array of items from `path` and insert them all
    ///
    /// # Returns
    /// Number of items imported
    ///
    /// # Errors
    ///
    /// Returns `DbError` if the file cannot be read or parsed, or if any insert fails.
    pub fn import_json<P: AsRef<Path>>(&self, path: P) -> Result<usize, DbError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| DbError::PathError(format!("{}: {e}", path.display())))?;
        let items: Vec<Item> = serde_json::from_str(&content)?;

        for item in &items {
            self.insert(item)?;
        }
        self.flush()?;

        info!(count = items.len(), path = %path.display(), "imported items");
        Ok(items.len())
    }

    /// Get the number of items in the database
    #[must_use]
    pub fn count(&self) -> usize {
        self.items.len()
    }

    /// Check if an item exists in the database
    ///
    /// # Errors
    ///
    /// Returns `DbError` if database operations fail.
    pub fn contains(&self, id: &str) -> Result<bool, DbError> {
        Ok(self.items.contains_key(id.as_bytes())?)
    }

    /// Flush all pending writes to disk
    ///
    /// # Errors
    ///
    /// Returns `DbError` if the flush operation fails.
    pub fn flush(&self) -> Result<(), DbError> {
        self.db.flush()?;
        Ok(())
    }

    /// Clear all entries from the database
    ///
    /// # Warning
    /// This operation is irreversible!
    ///
    /// # Errors
    ///
    /// Returns `DbError` if clearing either tree fails.
    pub fn clear(&self) -> Result<(), DbError> {
        self.items.clear()?;
        self.tags.clear()?;
        Ok(())
    }

    /// Repository view over one listing kind
    #[must_use]
    pub const fn repository(&self, kind: ListingKind) -> KindRepository<'_> {
        KindRepository { db: self, kind }
    }

    // Private helper methods for managing the tag index

    fn add_to_tag_index(&self, id: &str, tags: &[String]) -> Result<(), DbError> {
        for tag in tags {
            let tag_key = tag.as_bytes();

            let mut ids = self.find_by_tag(tag)?;
            if !ids.iter().any(|existing| existing == id) {
                ids.push(id.to_string());
            }

            let encoded = bincode::encode_to_vec(&ids, bincode::config::standard())?;
            self.tags.insert(tag_key, encoded)?;
        }
        Ok(())
    }

    fn remove_from_tag_index(&self, id: &str, tags: &[String]) -> Result<(), DbError> {
        for tag in tags {
            let tag_key = tag.as_bytes();

            let mut ids = self.find_by_tag(tag)?;
            ids.retain(|existing| existing != id);

            if ids.is_empty() {
                self.tags.remove(tag_key)?;
            } else {
                let encoded = bincode::encode_to_vec(&ids, bincode::config::standard())?;
                self.tags.insert(tag_key, encoded)?;
            }
        }
        Ok(())
    }
}

impl Drop for Database {
    fn drop(&mut self) {
        // Best-effort flush; callers needing durability flush() explicitly.
        let _ = self.db.flush();
    }
}

/// [`ItemRepository`] over the items of a single [`ListingKind`]
pub struct KindRepository<'a> {
    db: &'a Database,
    kind: ListingKind,
}

impl ItemRepository for KindRepository<'_> {
    fn list(&self, tags: Option<&TagFilterSet>) -> Result<Vec<Item>, DbError> {
        self.db.list_items(self.kind, tags)
    }
}

fn tag_names(item: &Item) -> Vec<String> {
    item.tag_names().map(String::from).collect()
}

fn decode_item(bytes: &[u8]) -> Result<Item, DbError> {
    let (item, _): (Item, usize) =
        bincode::serde::decode_from_slice(bytes, bincode::config::standard())?;
    Ok(item)
}
