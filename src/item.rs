//! Listing records
//!
//! An [`Item`] is one searchable record: an exam paper or a discussion post.
//! Items are read-only projections built per request; the storage layer owns
//! persistence and hands them out newest first.

use chrono::{DateTime, Utc};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of listing an item belongs to
#[derive(ValueEnum, Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ListingKind {
    /// Exam papers, searched by title and tags
    Papers,
    /// Discussion posts, searched across authors, bodies and comments
    Posts,
}

impl ListingKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Papers => "papers",
            Self::Posts => "posts",
        }
    }
}

impl fmt::Display for ListingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named category label with optional alternative spellings
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Tag {
    pub name: String,
    #[serde(default)]
    pub aliases: Vec<String>,
}

impl Tag {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            aliases: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }
}

/// A comment attached to an item
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Comment {
    pub author: String,
    pub text: String,
}

impl Comment {
    #[must_use]
    pub fn new(author: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            author: author.into(),
            text: text.into(),
        }
    }
}

const fn default_published() -> bool {
    true
}

/// A single searchable and filterable record
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Item {
    pub id: String,
    pub kind: ListingKind,
    pub created_at: DateTime<Utc>,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub tags: Vec<Tag>,
    #[serde(default)]
    pub comments: Vec<Comment>,
    /// Unpublished items are never handed out by the store
    #[serde(default = "default_published")]
    pub published: bool,
}

impl Item {
    /// Create a published item with no tags, comments or secondary text
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        kind: ListingKind,
        created_at: DateTime<Utc>,
        title: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            kind,
            created_at,
            title: title.into(),
            description: None,
            body: None,
            author: None,
            tags: Vec::new(),
            comments: Vec::new(),
            published: true,
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    #[must_use]
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    /// Attach a tag. A tag whose name is already present is ignored, keeping
    /// names unique within the item.
    #[must_use]
    pub fn with_tag(mut self, tag: Tag) -> Self {
        if !self.tags.iter().any(|t| t.name == tag.name) {
            self.tags.push(tag);
        }
        self
    }

    #[must_use]
    pub fn with_comment(mut self, comment: Comment) -> Self {
        self.comments.push(comment);
        self
    }

    #[must_use]
    pub const fn with_published(mut self, published: bool) -> Self {
        self.published = published;
        self
    }

    /// Tag names attached to this item
    pub fn tag_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.tags.iter().map(|t| t.name.as_str())
    }

    /// Drop repeated tag names, keeping the first occurrence
    pub fn dedup_tags(&mut self) {
        let mut seen = std::collections::HashSet::new();
        self.tags.retain(|t| seen.insert(t.name.clone()));
    }
}
