//! Unit tests for search error types

#[cfg(test)]
mod tests {
    use crate::db::error::DbError;
    use crate::search::error::SearchError;
    use std::error::Error;

    #[test]
    fn test_invalid_field_error() {
        let error = SearchError::InvalidField {
            field: "title".to_string(),
            reason: "weight must be positive".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid field 'title': weight must be positive"
        );
    }

    #[test]
    fn test_invalid_profile_error() {
        let error = SearchError::InvalidProfile("page size must be positive".to_string());
        assert_eq!(
            error.to_string(),
            "Invalid listing profile: page size must be positive"
        );
    }

    #[test]
    fn test_repository_error_from_db_error() {
        let db_error = DbError::Unavailable("connection reset".to_string());
        let search_error: SearchError = db_error.into();

        assert!(search_error.to_string().contains("Repository error"));
        assert!(search_error.to_string().contains("connection reset"));
        assert!(search_error.source().is_some());
    }

    #[test]
    fn test_error_debug() {
        let error = SearchError::InvalidProfile("no fields".to_string());
        let debug = format!("{error:?}");
        assert!(debug.contains("InvalidProfile"));
        assert!(debug.contains("no fields"));
    }

    #[test]
    fn test_error_source_none_for_config_errors() {
        let error = SearchError::InvalidProfile("x".to_string());
        assert!(error.source().is_none());
    }
}
