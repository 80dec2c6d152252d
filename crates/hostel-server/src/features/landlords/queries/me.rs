//! Current landlord profile query

use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{db, models::Landlord};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetMyLandlordQuery {
    pub user_id: Uuid,
}

#[derive(Debug, thiserror::Error)]
pub enum GetMyLandlordError {
    #[error("Landlord profile not found")]
    NotFound,
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<Landlord, GetMyLandlordError>> for GetMyLandlordQuery {}

impl crate::cqrs::middleware::Query for GetMyLandlordQuery {}

#[tracing::instrument(skip(pool))]
pub async fn handle(
    pool: PgPool,
    query: GetMyLandlordQuery,
) -> Result<Landlord, GetMyLandlordError> {
    db::landlord_for_user(&pool, query.user_id)
        .await?
        .ok_or(GetMyLandlordError::NotFound)
}
