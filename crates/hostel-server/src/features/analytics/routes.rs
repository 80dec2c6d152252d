//! Analytics API routes
//!
//! - `GET /api/v1/analytics/landlord` - Dashboard summary for the calling landlord

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use hostel_common::types::UserRole;
use sqlx::PgPool;

use super::{aggregator::AnalyticsError, queries::LandlordAnalyticsQuery};
use crate::{
    api::response::{ApiResponse, ErrorResponse},
    error::AppError,
    features::shared::error_helpers,
    middleware::AuthUser,
};

pub fn analytics_routes() -> Router<PgPool> {
    Router::new().route("/landlord", get(landlord_analytics))
}

/// # Response
///
/// - `200 OK` - Summary
/// - `401 Unauthorized` / `403 Forbidden` - Not a landlord
/// - `404 Not Found` - Caller has no landlord profile
/// - `500 Internal Server Error` - Aggregation failed
#[tracing::instrument(skip(pool), fields(user_id = %user.user_id))]
async fn landlord_analytics(
    State(pool): State<PgPool>,
    user: AuthUser,
) -> Result<Response, AnalyticsApiError> {
    user.require_role(UserRole::Landlord)?;

    let summary = super::queries::landlord_summary::handle(
        pool,
        LandlordAnalyticsQuery {
            user_id: user.user_id,
        },
    )
    .await?;

    tracing::debug!(
        total_hostels = summary.total_hostels,
        total_bookings = summary.total_bookings,
        "Landlord analytics computed"
    );

    Ok((StatusCode::OK, Json(ApiResponse::success(summary))).into_response())
}

#[derive(Debug)]
enum AnalyticsApiError {
    Auth(AppError),
    Summary(AnalyticsError),
}

impl From<AppError> for AnalyticsApiError {
    fn from(err: AppError) -> Self {
        Self::Auth(err)
    }
}

impl From<AnalyticsError> for AnalyticsApiError {
    fn from(err: AnalyticsError) -> Self {
        Self::Summary(err)
    }
}

impl IntoResponse for AnalyticsApiError {
    fn into_response(self) -> Response {
        match self {
            AnalyticsApiError::Auth(err) => err.into_response(),
            AnalyticsApiError::Summary(err @ AnalyticsError::LandlordNotFound) => {
                error_helpers::not_found(err.to_string())
            },
            AnalyticsApiError::Summary(AnalyticsError::Aggregation(e)) => {
                tracing::error!(error = ?e, "Landlord analytics aggregation failed");
                ErrorResponse::new("INTERNAL_ERROR", "Failed to fetch analytics")
                    .into_response_with(StatusCode::INTERNAL_SERVER_ERROR)
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_aggregation_failure_hides_detail() {
        let err = AnalyticsApiError::Summary(AnalyticsError::Aggregation(sqlx::Error::Protocol(
            "relation \"bookings\" does not exist".to_string(),
        )));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_json(response).await;
        assert_eq!(body["error"]["message"], "Failed to fetch analytics");
        assert!(!body.to_string().contains("relation"));
    }

    #[tokio::test]
    async fn test_missing_profile_is_not_found() {
        let response = AnalyticsApiError::Summary(AnalyticsError::LandlordNotFound).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "NOT_FOUND");
        assert_eq!(body["error"]["message"], "Landlord profile not found");
    }
}
