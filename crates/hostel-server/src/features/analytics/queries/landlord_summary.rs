//! Landlord dashboard query

use chrono::Utc;
use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::features::analytics::{
    aggregator::{summarize, AnalyticsError, LandlordAnalytics},
    store::PgAnalyticsStore,
};

/// Dashboard summary for the landlord profile owned by `user_id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LandlordAnalyticsQuery {
    pub user_id: Uuid,
}

impl Request<Result<LandlordAnalytics, AnalyticsError>> for LandlordAnalyticsQuery {}

impl crate::cqrs::middleware::Query for LandlordAnalyticsQuery {}

/// Runs the aggregation inside one transaction that is released before
/// returning.
#[tracing::instrument(skip(pool))]
pub async fn handle(
    pool: PgPool,
    query: LandlordAnalyticsQuery,
) -> Result<LandlordAnalytics, AnalyticsError> {
    let mut store = PgAnalyticsStore::new(pool.begin().await?);
    let summary = summarize(&mut store, query.user_id, Utc::now()).await?;
    store.finish().await?;

    Ok(summary)
}
