//! Bookings on the calling landlord's hostels

use hostel_common::types::BookingStatus;
use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use super::{fetch_page, BookingPage, BookingScope};
use crate::{db, features::shared::PaginationParams};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListLandlordBookingsQuery {
    #[serde(skip)]
    pub user_id: Uuid,
    #[serde(default)]
    pub status: Option<BookingStatus>,
    #[serde(default)]
    pub page: Option<i64>,
    #[serde(default)]
    pub per_page: Option<i64>,
}

#[derive(Debug, thiserror::Error)]
pub enum ListLandlordBookingsError {
    #[error("{0}")]
    Pagination(&'static str),
    #[error("Landlord profile not found")]
    LandlordNotFound,
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<BookingPage, ListLandlordBookingsError>> for ListLandlordBookingsQuery {}

impl crate::cqrs::middleware::Query for ListLandlordBookingsQuery {}

#[tracing::instrument(skip(pool))]
pub async fn handle(
    pool: PgPool,
    query: ListLandlordBookingsQuery,
) -> Result<BookingPage, ListLandlordBookingsError> {
    let params = PaginationParams::new(query.page, query.per_page);
    params
        .validate()
        .map_err(ListLandlordBookingsError::Pagination)?;

    let landlord = db::landlord_for_user(&pool, query.user_id)
        .await?
        .ok_or(ListLandlordBookingsError::LandlordNotFound)?;

    Ok(fetch_page(&pool, BookingScope::Landlord(landlord.id), query.status, &params).await?)
}
