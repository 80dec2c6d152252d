//! Autocomplete suggestions for the search box
//!
//! Distinct hostel names and locations starting with the typed prefix.

use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

pub const DEFAULT_LIMIT: i64 = 10;
pub const MAX_LIMIT: i64 = 20;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchSuggestionsQuery {
    #[serde(default)]
    pub q: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct SearchSuggestion {
    pub text: String,
    /// `name` or `location`
    pub kind: String,
}

#[derive(Debug, thiserror::Error)]
pub enum SearchSuggestionsError {
    #[error("Query is required and must be at least 2 characters")]
    QueryTooShort,
    #[error("Limit must be between 1 and 20")]
    InvalidLimit,
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<Vec<SearchSuggestion>, SearchSuggestionsError>> for SearchSuggestionsQuery {}

impl crate::cqrs::middleware::Query for SearchSuggestionsQuery {}

impl SearchSuggestionsQuery {
    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(DEFAULT_LIMIT)
    }

    pub fn validate(&self) -> Result<(), SearchSuggestionsError> {
        if self.q.trim().chars().count() < 2 {
            return Err(SearchSuggestionsError::QueryTooShort);
        }
        if !(1..=MAX_LIMIT).contains(&self.limit()) {
            return Err(SearchSuggestionsError::InvalidLimit);
        }
        Ok(())
    }

    fn prefix_pattern(&self) -> String {
        let escaped = self
            .q
            .trim()
            .replace('\\', "\\\\")
            .replace('%', "\\%")
            .replace('_', "\\_");
        format!("{escaped}%")
    }
}

#[tracing::instrument(skip(pool), fields(q = %query.q))]
pub async fn handle(
    pool: PgPool,
    query: SearchSuggestionsQuery,
) -> Result<Vec<SearchSuggestion>, SearchSuggestionsError> {
    query.validate()?;

    let suggestions = sqlx::query_as::<_, SearchSuggestion>(
        r#"
        SELECT text, kind FROM (
            SELECT DISTINCT name AS text, 'name' AS kind FROM hostels WHERE name ILIKE $1
            UNION
            SELECT DISTINCT location AS text, 'location' AS kind FROM hostels WHERE location ILIKE $1
        ) s
        ORDER BY length(text) ASC, text ASC
        LIMIT $2
        "#,
    )
    .bind(query.prefix_pattern())
    .bind(query.limit())
    .fetch_all(&pool)
    .await?;

    Ok(suggestions)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate() {
        let short = SearchSuggestionsQuery {
            q: "j".to_string(),
            limit: None,
        };
        assert!(matches!(short.validate(), Err(SearchSuggestionsError::QueryTooShort)));

        let bad_limit = SearchSuggestionsQuery {
            q: "ju".to_string(),
            limit: Some(50),
        };
        assert!(matches!(bad_limit.validate(), Err(SearchSuggestionsError::InvalidLimit)));

        let ok = SearchSuggestionsQuery {
            q: "ju".to_string(),
            limit: None,
        };
        assert!(ok.validate().is_ok());
        assert_eq!(ok.limit(), DEFAULT_LIMIT);
    }

    #[test]
    fn test_prefix_pattern_escapes_wildcards() {
        let query = SearchSuggestionsQuery {
            q: " 50%_off ".to_string(),
            limit: None,
        };
        assert_eq!(query.prefix_pattern(), "50\\%\\_off%");
    }
}
