//! HTTP application assembly
//!
//! [`create_router`] builds the full application: `/health` at the root,
//! every feature under `/api/v1`, and the shared middleware stack. The
//! binary adds rate limiting on top.

pub mod response;

use axum::{
    extract::State,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use serde_json::json;
use sqlx::PgPool;
use tower_http::compression::CompressionLayer;

use crate::{
    config::Config,
    db,
    error::AppError,
    features::{self, FeatureState},
    middleware,
};
use response::ApiResponse;

pub fn create_router(state: FeatureState, config: &Config) -> Router {
    let health = Router::new()
        .route("/health", get(health_check))
        .with_state(state.db.clone());

    Router::new()
        .merge(health)
        .nest("/api/v1", features::router(state))
        .layer(CompressionLayer::new())
        .layer(middleware::tracing_layer())
        .layer(middleware::cors_layer(&config.cors))
}

async fn health_check(State(pool): State<PgPool>) -> Result<Response, AppError> {
    db::health_check(&pool).await.map_err(|e| {
        tracing::error!(error = ?e, "Database health check failed");
        AppError::Unavailable("Database is unreachable".to_string())
    })?;

    Ok(ApiResponse::success(json!({
        "status": "healthy",
        "database": "connected",
        "version": env!("CARGO_PKG_VERSION"),
    }))
    .into_response())
}
