//! Search API routes
//!
//! - `GET /api/v1/search?q=` - Free-text hostel search
//! - `GET /api/v1/search/suggestions?q=` - Name and location autocomplete

use axum::{
    extract::{Query, State},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use serde_json::json;
use sqlx::PgPool;

use super::queries::{
    HostelSearchError, HostelSearchQuery, SearchSuggestionsError, SearchSuggestionsQuery,
};
use crate::{api::response::ApiResponse, features::shared::error_helpers};

pub fn search_routes() -> Router<PgPool> {
    Router::new()
        .route("/", get(search_hostels))
        .route("/suggestions", get(get_suggestions))
}

#[tracing::instrument(skip(pool, query), fields(q = %query.q, page = ?query.page))]
async fn search_hostels(
    State(pool): State<PgPool>,
    Query(query): Query<HostelSearchQuery>,
) -> Result<Response, SearchApiError> {
    let page = super::queries::hostels::handle(pool, query).await?;

    Ok(
        ApiResponse::success_with_meta(page.items, json!({ "pagination": page.pagination }))
            .into_response(),
    )
}

#[tracing::instrument(skip(pool, query), fields(q = %query.q, limit = ?query.limit))]
async fn get_suggestions(
    State(pool): State<PgPool>,
    Query(query): Query<SearchSuggestionsQuery>,
) -> Result<Response, SearchApiError> {
    let suggestions = super::queries::suggestions::handle(pool, query).await?;

    tracing::debug!(count = suggestions.len(), "Suggestions completed");

    Ok(ApiResponse::success(suggestions).into_response())
}

#[derive(Debug)]
enum SearchApiError {
    Search(HostelSearchError),
    Suggestions(SearchSuggestionsError),
}

impl From<HostelSearchError> for SearchApiError {
    fn from(err: HostelSearchError) -> Self {
        Self::Search(err)
    }
}

impl From<SearchSuggestionsError> for SearchApiError {
    fn from(err: SearchSuggestionsError) -> Self {
        Self::Suggestions(err)
    }
}

impl IntoResponse for SearchApiError {
    fn into_response(self) -> Response {
        match self {
            SearchApiError::Search(HostelSearchError::Database(e)) => {
                error_helpers::database_error("hostel search", &e)
            },
            SearchApiError::Search(err) => error_helpers::validation_error(err.to_string()),
            SearchApiError::Suggestions(SearchSuggestionsError::Database(e)) => {
                error_helpers::database_error("search suggestions", &e)
            },
            SearchApiError::Suggestions(err) => error_helpers::validation_error(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::{Request, StatusCode}};
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_empty_query_is_bad_request() {
        let pool = PgPool::connect_lazy("postgres://localhost/unused").unwrap();
        let app = search_routes().with_state(pool);

        let response = app
            .oneshot(Request::builder().uri("/?q=").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_missing_query_is_bad_request() {
        let pool = PgPool::connect_lazy("postgres://localhost/unused").unwrap();
        let app = search_routes().with_state(pool);

        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
