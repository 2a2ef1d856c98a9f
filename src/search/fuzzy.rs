//! Weighted multi-field fuzzy matching
//!
//! A [`FuzzyMatcher`] scores items against a [`Query`] over an ordered list
//! of [`FieldSpec`]s. Lower scores are better; `0.0` is a perfect match.
//!
//! # Scoring
//!
//! For every field value, each query token gets a normalized cost from
//! [`normalized_cost`]. A token is *accepted* on that value when its cost is
//! at most the field's acceptance threshold. The value's score is the mean
//! token cost, where rejected tokens count as `1.0`, and the value matched
//! iff it accepted at least one token. Multi-valued fields (tags, comments)
//! keep their best matched value.
//!
//! The item score fuses the matched fields:
//!
//! ```text
//! score = Π_matched  min(field_score / weight, 1)
//! ```
//!
//! A good match on a heavy field pulls the score down further than the same
//! match on a light field. Every factor is at most `1`, so a further matched
//! field never raises the score, and the result never exceeds the best
//! field's own term. Unmatched fields are left out and never veto an item.
//! Items with no matched field, or whose score is not strictly below the
//! matcher's score threshold, are dropped.
//!
//! A [`Query::Literal`] skips all of this: the first field must contain the
//! literal (case-insensitively) and every surviving item scores `0.0`.

use super::distance::normalized_cost;
use super::error::SearchError;
use super::query::Query;
use crate::item::Item;
use rayon::prelude::*;

/// Extracts the text values of one field from an item
///
/// Single-valued fields return zero or one value; nested fields return one
/// value per sub-collection element.
pub type FieldAccessor = for<'a> fn(&'a Item) -> Vec<&'a str>;

/// Acceptance threshold used when a field does not set its own
pub const DEFAULT_FIELD_THRESHOLD: f64 = 0.4;

/// A searchable field with its relative importance
#[derive(Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub weight: f64,
    /// Maximum normalized token cost that still counts as a match
    pub threshold: f64,
    pub accessor: FieldAccessor,
}

impl std::fmt::Debug for FieldSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldSpec")
            .field("name", &self.name)
            .field("weight", &self.weight)
            .field("threshold", &self.threshold)
            .finish_non_exhaustive()
    }
}

impl FieldSpec {
    #[must_use]
    pub const fn new(name: &'static str, weight: f64, accessor: FieldAccessor) -> Self {
        Self {
            name,
            weight,
            threshold: DEFAULT_FIELD_THRESHOLD,
            accessor,
        }
    }

    #[must_use]
    pub const fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    fn validate(&self) -> Result<(), SearchError> {
        if !(self.weight.is_finite() && self.weight > 0.0) {
            return Err(SearchError::InvalidField {
                field: self.name.to_string(),
                reason: format!("weight must be a positive number, got {}", self.weight),
            });
        }
        if !(0.0..=1.0).contains(&self.threshold) {
            return Err(SearchError::InvalidField {
                field: self.name.to_string(),
                reason: format!("threshold must be within 0..=1, got {}", self.threshold),
            });
        }
        Ok(())
    }
}

/// Common field accessors
pub mod fields {
    use crate::item::Item;

    pub fn title(item: &Item) -> Vec<&str> {
        vec![item.title.as_str()]
    }

    pub fn description(item: &Item) -> Vec<&str> {
        item.description.as_deref().into_iter().collect()
    }

    pub fn body(item: &Item) -> Vec<&str> {
        item.body.as_deref().into_iter().collect()
    }

    pub fn author(item: &Item) -> Vec<&str> {
        item.author.as_deref().into_iter().collect()
    }

    /// Tag names followed by their aliases
    pub fn tags(item: &Item) -> Vec<&str> {
        item.tags
            .iter()
            .flat_map(|tag| {
                std::iter::once(tag.name.as_str()).chain(tag.aliases.iter().map(String::as_str))
            })
            .collect()
    }

    pub fn comment_text(item: &Item) -> Vec<&str> {
        item.comments.iter().map(|c| c.text.as_str()).collect()
    }

    pub fn comment_author(item: &Item) -> Vec<&str> {
        item.comments.iter().map(|c| c.author.as_str()).collect()
    }
}

/// An item that passed the matcher, with its aggregate score
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
    pub item: Item,
    pub score: f64,
}

/// Multi-field weighted approximate matcher
#[derive(Debug, Clone)]
pub struct FuzzyMatcher {
    fields: Vec<FieldSpec>,
    score_threshold: f64,
}

impl FuzzyMatcher {
    /// Build a matcher over `fields`; the first field is the primary one
    ///
    /// # Errors
    ///
    /// Returns `SearchError` if no fields are given, a field has a
    /// non-positive weight or an out-of-range threshold, or the score
    /// threshold is not a positive number.
    pub fn new(fields: Vec<FieldSpec>, score_threshold: f64) -> Result<Self, SearchError> {
        if fields.is_empty() {
            return Err(SearchError::InvalidProfile(
                "at least one searchable field is required".to_string(),
            ));
        }
        for field in &fields {
            field.validate()?;
        }
        if !(score_threshold.is_finite() && score_threshold > 0.0) {
            return Err(SearchError::InvalidProfile(format!(
                "score threshold must be a positive number, got {score_threshold}"
            )));
        }
        Ok(Self {
            fields,
            score_threshold,
        })
    }

    #[must_use]
    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    #[must_use]
    pub const fn score_threshold(&self) -> f64 {
        self.score_threshold
    }

    /// Score and rank `items` against `query`
    ///
    /// Returns only accepted items, best first; equal scores keep their input
    /// order. An empty query returns every item with score `0.0`.
    #[must_use]
    pub fn score(&self, items: Vec<Item>, query: &Query) -> Vec<SearchResult> {
        let tokens: Vec<Vec<char>> = match query {
            Query::Empty => {
                return items
                    .into_iter()
                    .map(|item| SearchResult { item, score: 0.0 })
                    .collect();
            }
            Query::Literal(literal) => return self.score_literal(items, literal),
            Query::Fuzzy(tokens) => tokens.iter().map(|t| t.chars().collect()).collect(),
        };

        if tokens.is_empty() {
            return Vec::new();
        }

        // Collecting an indexed parallel iterator keeps input order, so the
        // stable sort below breaks ties exactly like a sequential pass.
        let mut results: Vec<SearchResult> = items
            .into_par_iter()
            .filter_map(|item| {
                self.score_item(&item, &tokens)
                    .filter(|score| *score < self.score_threshold)
                    .map(|score| SearchResult { item, score })
            })
            .collect();

        results.sort_by(|a, b| a.score.total_cmp(&b.score));
        results
    }

    fn score_literal(&self, items: Vec<Item>, literal: &str) -> Vec<SearchResult> {
        let primary = self.fields[0].accessor;
        items
            .into_iter()
            .filter(|item| {
                primary(item)
                    .iter()
                    .any(|value| value.to_lowercase().contains(literal))
            })
            .map(|item| SearchResult { item, score: 0.0 })
            .collect()
    }

    /// Aggregate score for one item, `None` when no field matched
    fn score_item(&self, item: &Item, tokens: &[Vec<char>]) -> Option<f64> {
        self.fields
            .iter()
            .filter_map(|field| {
                Self::score_field(field, item, tokens).map(|score| (score / field.weight).min(1.0))
            })
            .reduce(|fused, factor| fused * factor)
    }

    /// Best score among the field's values, `None` when no value matched
    fn score_field(field: &FieldSpec, item: &Item, tokens: &[Vec<char>]) -> Option<f64> {
        (field.accessor)(item)
            .into_iter()
            .filter_map(|value| Self::score_value(value, tokens, field.threshold))
            .min_by(f64::total_cmp)
    }

    fn score_value(value: &str, tokens: &[Vec<char>], threshold: f64) -> Option<f64> {
        let text: Vec<char> = value.to_lowercase().chars().collect();
        let mut sum = 0.0;
        let mut accepted = false;

        for token in tokens {
            let cost = normalized_cost(token, &text);
            if cost <= threshold {
                accepted = true;
                sum += cost;
            } else {
                sum += 1.0;
            }
        }

        #[allow(clippy::cast_precision_loss)]
        let mean = sum / tokens.len() as f64;
        accepted.then_some(mean)
    }
}
