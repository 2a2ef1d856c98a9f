//! Search-filter-paginate pipeline
//!
//! [`SearchPipeline::run`] answers one listing request:
//!
//! 1. fetch the newest-first dataset from an [`ItemRepository`]
//! 2. keep items carrying any requested tag
//! 3. rank by the fuzzy matcher when a search string is present
//! 4. validate the requested page against the filtered result count
//! 5. redirect to the canonical page when validation changed it,
//!    otherwise slice out and render the page
//!
//! Nothing is cached between runs; each call works on its own fetch.

use crate::db::DbError;
use crate::item::{Item, ListingKind};
use crate::pagination::{self, PaginationOutcome};
use crate::search::fuzzy::fields;
use crate::search::{FieldSpec, FuzzyMatcher, Query, SearchError, TagFilterExt, TagFilterSet};
use tracing::{debug, info};
use url::form_urlencoded;

/// Supplier of listing items
///
/// Implementations return only published items, ordered by creation time
/// with the newest first. The tag set is a hint that lets storage narrow the
/// fetch; the pipeline filters by tag again regardless.
pub trait ItemRepository {
    /// Fetch the items to list
    ///
    /// # Errors
    ///
    /// Returns `DbError` if the underlying store cannot be read. The
    /// pipeline does not retry.
    fn list(&self, tags: Option<&TagFilterSet>) -> Result<Vec<Item>, DbError>;
}

/// Raw request parameters, as received from the caller
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingRequest {
    /// Free-text search; absent or blank disables fuzzy matching
    pub search: Option<String>,
    /// `tags` values: none, one comma-joined value, or several values
    pub tags: Vec<String>,
    /// Requested page; absent means page 1
    pub page: Option<String>,
}

impl ListingRequest {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    #[must_use]
    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    #[must_use]
    pub fn page(mut self, page: impl Into<String>) -> Self {
        self.page = Some(page.into());
        self
    }
}

/// Per-listing search and paging settings
#[derive(Debug, Clone)]
pub struct ListingProfile {
    pub kind: ListingKind,
    pub page_size: usize,
    /// Items must score strictly below this to be listed
    pub score_threshold: f64,
    /// Searchable fields; the first one is used for literal queries
    pub fields: Vec<FieldSpec>,
    /// Path that redirect locations are built on
    pub base_path: String,
}

impl ListingProfile {
    /// Exam papers: title and tag search, nine per page
    #[must_use]
    pub fn papers() -> Self {
        Self {
            kind: ListingKind::Papers,
            page_size: 9,
            score_threshold: 0.6,
            fields: vec![
                FieldSpec::new("title", 1.0, fields::title),
                FieldSpec::new("tags", 2.0, fields::tags),
            ],
            base_path: "/papers".to_string(),
        }
    }

    /// Discussion posts: search across titles, bodies, authors and comments
    #[must_use]
    pub fn posts() -> Self {
        Self {
            kind: ListingKind::Posts,
            page_size: 10,
            score_threshold: 0.7,
            fields: vec![
                FieldSpec::new("title", 2.0, fields::title),
                FieldSpec::new("body", 1.0, fields::body),
                FieldSpec::new("author", 1.0, fields::author),
                FieldSpec::new("comments.text", 1.0, fields::comment_text),
                FieldSpec::new("comments.author", 1.0, fields::comment_author),
            ],
            base_path: "/posts".to_string(),
        }
    }

    #[must_use]
    pub fn for_kind(kind: ListingKind) -> Self {
        match kind {
            ListingKind::Papers => Self::papers(),
            ListingKind::Posts => Self::posts(),
        }
    }

    /// Use the same acceptance threshold on every field
    #[must_use]
    pub fn with_field_threshold(mut self, threshold: f64) -> Self {
        for field in &mut self.fields {
            field.threshold = threshold;
        }
        self
    }
}

/// Runs listing requests for one [`ListingProfile`]
#[derive(Debug, Clone)]
pub struct SearchPipeline {
    kind: ListingKind,
    page_size: usize,
    base_path: String,
    matcher: FuzzyMatcher,
}

impl SearchPipeline {
    /// # Errors
    ///
    /// Returns `SearchError` if the page size is zero or the profile's
    /// fields or threshold are invalid.
    pub fn new(profile: ListingProfile) -> Result<Self, SearchError> {
        if profile.page_size == 0 {
            return Err(SearchError::InvalidProfile(format!(
                "page size for {} must be positive",
                profile.kind
            )));
        }
        let matcher = FuzzyMatcher::new(profile.fields, profile.score_threshold)?;
        Ok(Self {
            kind: profile.kind,
            page_size: profile.page_size,
            base_path: profile.base_path,
            matcher,
        })
    }

    #[must_use]
    pub const fn kind(&self) -> ListingKind {
        self.kind
    }

    #[must_use]
    pub const fn page_size(&self) -> usize {
        self.page_size
    }

    #[must_use]
    pub const fn matcher(&self) -> &FuzzyMatcher {
        &self.matcher
    }

    /// Answer one listing request
    ///
    /// # Errors
    ///
    /// Returns `SearchError::RepositoryError` when the repository fails.
    pub fn run<R>(
        &self,
        repository: &R,
        request: &ListingRequest,
    ) -> Result<PaginationOutcome<Item>, SearchError>
    where
        R: ItemRepository + ?Sized,
    {
        let tags = TagFilterSet::from_params(&request.tags);
        let query = Query::parse(request.search.as_deref().unwrap_or_default());

        let fetched = repository.list((!tags.is_empty()).then_some(&tags))?;
        let fetched_count = fetched.len();

        let tagged = fetched.filter_tags(&tags);
        let tagged_count = tagged.len();

        let results: Vec<Item> = if query.is_empty() {
            tagged
        } else {
            self.matcher
                .score(tagged, &query)
                .into_iter()
                .map(|result| result.item)
                .collect()
        };

        let total_pages = pagination::total_pages(results.len(), self.page_size);
        let requested = pagination::parse_page(request.page.as_deref());
        let page = pagination::validate(requested, total_pages);

        debug!(
            kind = %self.kind,
            fetched = fetched_count,
            tagged = tagged_count,
            matched = results.len(),
            total_pages,
            page,
            "listing evaluated"
        );

        if total_pages > 0 && requested != i64::try_from(page).ok() {
            let location = canonical_location(&self.base_path, page, request);
            info!(
                kind = %self.kind,
                requested = ?request.page,
                page,
                %location,
                "redirecting to canonical page"
            );
            return Ok(PaginationOutcome::Redirect { page, location });
        }

        let items = pagination::paginate(&results, page, self.page_size).to_vec();
        Ok(PaginationOutcome::Render {
            items,
            current_page: page,
            total_pages,
        })
    }
}

/// Build `base_path?page=N[&search=..][&tags=..]` with URL-encoded values
///
/// The original `search` and `tags` values are kept as given so the
/// redirected request reproduces the same result set.
#[must_use]
pub fn canonical_location(base_path: &str, page: u64, request: &ListingRequest) -> String {
    let mut query = form_urlencoded::Serializer::new(String::new());
    query.append_pair("page", &page.to_string());
    if let Some(search) = request.search.as_deref().filter(|s| !s.is_empty()) {
        query.append_pair("search", search);
    }
    for tag in &request.tags {
        query.append_pair("tags", tag);
    }
    format!("{base_path}?{}", query.finish())
}
