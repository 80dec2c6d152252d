//! Hostel detail query
//!
//! The hostel with computed availability, its review summary and a card for
//! the owning landlord.

use chrono::Utc;
use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    db,
    models::{HostelRow, HostelView, Landlord, LandlordCard, HOSTEL_COLUMNS, LANDLORD_COLUMNS},
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetHostelQuery {
    pub id: Uuid,
}

#[derive(Debug, Clone, Serialize)]
pub struct HostelDetail {
    #[serde(flatten)]
    pub hostel: HostelView,
    /// Mean review rating rounded to one decimal; `null` without reviews
    pub rating: Option<f64>,
    pub reviews_count: i64,
    pub landlord: LandlordCard,
}

#[derive(Debug, thiserror::Error)]
pub enum GetHostelError {
    #[error("Hostel '{0}' not found")]
    NotFound(Uuid),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<HostelDetail, GetHostelError>> for GetHostelQuery {}

impl crate::cqrs::middleware::Query for GetHostelQuery {}

#[derive(Debug, sqlx::FromRow)]
struct ReviewSummary {
    rating: Option<f64>,
    reviews_count: i64,
}

#[tracing::instrument(skip(pool))]
pub async fn handle(pool: PgPool, query: GetHostelQuery) -> Result<HostelDetail, GetHostelError> {
    let sql = format!("SELECT {HOSTEL_COLUMNS} FROM hostels h WHERE h.id = $1");
    let row = sqlx::query_as::<_, HostelRow>(&sql)
        .bind(query.id)
        .fetch_optional(&pool)
        .await?
        .ok_or(GetHostelError::NotFound(query.id))?;

    let sql = format!("SELECT {LANDLORD_COLUMNS} FROM landlords l WHERE l.id = $1");
    let landlord = sqlx::query_as::<_, Landlord>(&sql)
        .bind(row.landlord_id)
        .fetch_one(&pool)
        .await?;

    let reviews = sqlx::query_as::<_, ReviewSummary>(
        "SELECT ROUND(AVG(rating)::numeric, 1)::float8 AS rating, COUNT(*) AS reviews_count \
         FROM reviews WHERE hostel_id = $1",
    )
    .bind(query.id)
    .fetch_one(&pool)
    .await?;

    let hostel = db::hostel_views(&pool, vec![row], Utc::now().date_naive())
        .await?
        .pop()
        .ok_or(GetHostelError::NotFound(query.id))?;

    Ok(HostelDetail {
        hostel,
        rating: reviews.rating,
        reviews_count: reviews.reviews_count,
        landlord: landlord.into(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::shared::test_helpers::{TestBooking, TestHostel, TestLandlord};

    #[sqlx::test(migrations = "../../migrations")]
    #[ignore]
    async fn test_detail_with_reviews(pool: PgPool) -> sqlx::Result<()> {
        let landlord = TestLandlord::new("Green Court Ltd").insert(&pool).await?;
        let hostel = TestHostel::new(&landlord, "Green Court")
            .with_capacity(2)
            .insert(&pool)
            .await?;
        TestBooking::new(&hostel).with_guests(2).confirmed().insert(&pool).await?;
        for rating in [4_i16, 5] {
            sqlx::query("INSERT INTO reviews (hostel_id, author_id, rating) VALUES ($1, $2, $3)")
                .bind(hostel.id)
                .bind(Uuid::new_v4())
                .bind(rating)
                .execute(&pool)
                .await?;
        }

        let detail = handle(pool, GetHostelQuery { id: hostel.id }).await.unwrap();
        assert_eq!(detail.rating, Some(4.5));
        assert_eq!(detail.reviews_count, 2);
        assert_eq!(detail.landlord.business_name, "Green Court Ltd");
        assert_eq!(detail.hostel.available_rooms, 0);
        assert_eq!(detail.hostel.availability.available, Some(false));
        Ok(())
    }

    #[sqlx::test(migrations = "../../migrations")]
    #[ignore]
    async fn test_missing_hostel(pool: PgPool) -> sqlx::Result<()> {
        let id = Uuid::new_v4();
        let err = handle(pool, GetHostelQuery { id }).await.unwrap_err();
        assert!(matches!(err, GetHostelError::NotFound(missing) if missing == id));
        Ok(())
    }
}
