//! Reviews of one hostel, newest first

use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    features::shared::{Paginated, PaginationParams},
    models::{Review, REVIEW_COLUMNS},
};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListHostelReviewsQuery {
    #[serde(skip)]
    pub hostel_id: Uuid,
    #[serde(default)]
    pub page: Option<i64>,
    #[serde(default)]
    pub per_page: Option<i64>,
}

pub type ReviewPage = Paginated<Review>;

#[derive(Debug, thiserror::Error)]
pub enum ListHostelReviewsError {
    #[error("{0}")]
    Pagination(&'static str),
    #[error("Hostel '{0}' not found")]
    HostelNotFound(Uuid),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<ReviewPage, ListHostelReviewsError>> for ListHostelReviewsQuery {}

impl crate::cqrs::middleware::Query for ListHostelReviewsQuery {}

#[tracing::instrument(skip(pool))]
pub async fn handle(
    pool: PgPool,
    query: ListHostelReviewsQuery,
) -> Result<ReviewPage, ListHostelReviewsError> {
    let params = PaginationParams::new(query.page, query.per_page);
    params.validate().map_err(ListHostelReviewsError::Pagination)?;

    let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM hostels WHERE id = $1)")
        .bind(query.hostel_id)
        .fetch_one(&pool)
        .await?;
    if !exists {
        return Err(ListHostelReviewsError::HostelNotFound(query.hostel_id));
    }

    let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM reviews WHERE hostel_id = $1")
        .bind(query.hostel_id)
        .fetch_one(&pool)
        .await?;

    let sql = format!(
        "SELECT {REVIEW_COLUMNS} FROM reviews r WHERE r.hostel_id = $1 \
         ORDER BY r.created_at DESC, r.id ASC LIMIT $2 OFFSET $3"
    );
    let items = sqlx::query_as::<_, Review>(&sql)
        .bind(query.hostel_id)
        .bind(params.per_page())
        .bind(params.offset())
        .fetch_all(&pool)
        .await?;

    Ok(Paginated::from_items(items, &params, total))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::shared::test_helpers::{TestHostel, TestLandlord};

    #[sqlx::test(migrations = "../../migrations")]
    #[ignore]
    async fn test_lists_hostel_reviews(pool: PgPool) -> sqlx::Result<()> {
        let landlord = TestLandlord::new("Green Court Ltd").insert(&pool).await?;
        let hostel = TestHostel::new(&landlord, "Green Court").insert(&pool).await?;
        for rating in [3_i16, 4, 5] {
            sqlx::query("INSERT INTO reviews (hostel_id, author_id, rating) VALUES ($1, $2, $3)")
                .bind(hostel.id)
                .bind(Uuid::new_v4())
                .bind(rating)
                .execute(&pool)
                .await?;
        }

        let page = handle(
            pool.clone(),
            ListHostelReviewsQuery {
                hostel_id: hostel.id,
                page: Some(1),
                per_page: Some(2),
            },
        )
        .await
        .unwrap();
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.pagination.total, 3);
        assert!(page.pagination.has_next);

        let missing = ListHostelReviewsQuery {
            hostel_id: Uuid::new_v4(),
            ..Default::default()
        };
        assert!(matches!(
            handle(pool, missing).await,
            Err(ListHostelReviewsError::HostelNotFound(_))
        ));
        Ok(())
    }
}
