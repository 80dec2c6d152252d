//! The caller's own bookings as a guest

use hostel_common::types::BookingStatus;
use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use super::{fetch_page, BookingPage, BookingScope};
use crate::features::shared::PaginationParams;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListMyBookingsQuery {
    #[serde(skip)]
    pub guest_id: Uuid,
    #[serde(default)]
    pub status: Option<BookingStatus>,
    #[serde(default)]
    pub page: Option<i64>,
    #[serde(default)]
    pub per_page: Option<i64>,
}

#[derive(Debug, thiserror::Error)]
pub enum ListMyBookingsError {
    #[error("{0}")]
    Pagination(&'static str),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<BookingPage, ListMyBookingsError>> for ListMyBookingsQuery {}

impl crate::cqrs::middleware::Query for ListMyBookingsQuery {}

#[tracing::instrument(skip(pool))]
pub async fn handle(
    pool: PgPool,
    query: ListMyBookingsQuery,
) -> Result<BookingPage, ListMyBookingsError> {
    let params = PaginationParams::new(query.page, query.per_page);
    params.validate().map_err(ListMyBookingsError::Pagination)?;

    Ok(fetch_page(&pool, BookingScope::Guest(query.guest_id), query.status, &params).await?)
}
