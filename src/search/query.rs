//! Search query parsing
//!
//! A raw search string becomes one of three query shapes:
//!
//! - empty (after trimming): no fuzzy filtering at all
//! - starting with [`LITERAL_MARKER`]: exact substring match on the primary field
//! - anything else: whitespace-separated fuzzy tokens
//!
//! ```
//! use listr::search::Query;
//!
//! assert_eq!(Query::parse("  "), Query::Empty);
//! assert_eq!(Query::parse("'CAT 1"), Query::Literal("cat 1".to_string()));
//! assert_eq!(
//!     Query::parse("data a structures"),
//!     Query::Fuzzy(vec!["data".to_string(), "structures".to_string()])
//! );
//! ```

/// Leading character that switches a query to literal substring matching
pub const LITERAL_MARKER: char = '\'';

/// Tokens shorter than this (in characters) carry no match signal
pub const MIN_TOKEN_LEN: usize = 2;

/// Parsed search query
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Query {
    /// No search requested
    Empty,
    /// Lowercased tokens for approximate matching, short tokens removed
    Fuzzy(Vec<String>),
    /// Lowercased literal that the primary field must contain
    Literal(String),
}

impl Query {
    /// Parse a raw search string
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Self::Empty;
        }

        if let Some(rest) = trimmed.strip_prefix(LITERAL_MARKER) {
            let literal = rest.trim();
            if literal.is_empty() {
                return Self::Empty;
            }
            return Self::Literal(literal.to_lowercase());
        }

        Self::Fuzzy(
            trimmed
                .split_whitespace()
                .filter(|token| token.chars().count() >= MIN_TOKEN_LEN)
                .map(str::to_lowercase)
                .collect(),
        )
    }

    /// Whether the fuzzy stage should be skipped
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whitespace_only_is_empty() {
        assert_eq!(Query::parse(""), Query::Empty);
        assert_eq!(Query::parse(" \t\n"), Query::Empty);
        assert!(Query::parse("").is_empty());
    }

    #[test]
    fn test_short_tokens_dropped() {
        assert_eq!(
            Query::parse("a OS x networks"),
            Query::Fuzzy(vec!["os".to_string(), "networks".to_string()])
        );
    }

    #[test]
    fn test_all_tokens_too_short() {
        let query = Query::parse("a b c");
        assert_eq!(query, Query::Fuzzy(Vec::new()));
        assert!(!query.is_empty());
    }

    #[test]
    fn test_token_length_counts_chars_not_bytes() {
        assert_eq!(Query::parse("é"), Query::Fuzzy(Vec::new()));
        assert_eq!(Query::parse("éé"), Query::Fuzzy(vec!["éé".to_string()]));
    }

    #[test]
    fn test_literal_marker() {
        assert_eq!(
            Query::parse("  'Data Structures "),
            Query::Literal("data structures".to_string())
        );
    }

    #[test]
    fn test_bare_marker_is_empty() {
        assert_eq!(Query::parse("'"), Query::Empty);
        assert_eq!(Query::parse("'   "), Query::Empty);
    }
}
