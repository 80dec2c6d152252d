//! Create review command
//!
//! One review per author and hostel. The owning landlord's rating is
//! recomputed from all reviews of their hostels in the same transaction.

use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::{
    features::shared::error_helpers,
    models::{Review, REVIEW_COLUMNS},
};

pub const MIN_RATING: i16 = 1;
pub const MAX_RATING: i16 = 5;
pub const MAX_COMMENT_LENGTH: usize = 2000;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateReviewCommand {
    #[serde(skip)]
    pub author_id: Uuid,
    pub hostel_id: Uuid,
    pub rating: i16,
    #[serde(default)]
    pub comment: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum CreateReviewError {
    #[error("Rating must be between 1 and 5")]
    Rating,
    #[error("Comment must be at most 2000 characters")]
    CommentTooLong,
    #[error("Hostel '{0}' not found")]
    HostelNotFound(Uuid),
    #[error("Landlords cannot review their own hostels")]
    OwnHostel,
    #[error("You have already reviewed this hostel")]
    AlreadyReviewed,
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<Review, CreateReviewError>> for CreateReviewCommand {}

impl crate::cqrs::middleware::Command for CreateReviewCommand {}

impl CreateReviewCommand {
    pub fn validate(&self) -> Result<(), CreateReviewError> {
        if !(MIN_RATING..=MAX_RATING).contains(&self.rating) {
            return Err(CreateReviewError::Rating);
        }
        if let Some(comment) = &self.comment {
            if comment.chars().count() > MAX_COMMENT_LENGTH {
                return Err(CreateReviewError::CommentTooLong);
            }
        }
        Ok(())
    }
}

#[derive(Debug, sqlx::FromRow)]
struct HostelOwner {
    landlord_id: Uuid,
    owner_user_id: Uuid,
}

/// Set a landlord's rating to the mean of all reviews across their hostels.
async fn refresh_landlord_rating(
    tx: &mut Transaction<'_, Postgres>,
    landlord_id: Uuid,
) -> Result<Option<f64>, sqlx::Error> {
    sqlx::query_scalar::<_, Option<f64>>(
        r#"
        UPDATE landlords SET
            rating = (
                SELECT AVG(r.rating)::float8
                FROM reviews r JOIN hostels h ON h.id = r.hostel_id
                WHERE h.landlord_id = $1
            ),
            updated_at = NOW()
        WHERE id = $1
        RETURNING rating
        "#,
    )
    .bind(landlord_id)
    .fetch_one(&mut **tx)
    .await
}

#[tracing::instrument(skip(pool, command), fields(hostel_id = %command.hostel_id))]
pub async fn handle(pool: PgPool, command: CreateReviewCommand) -> Result<Review, CreateReviewError> {
    command.validate()?;

    let mut tx = pool.begin().await?;

    let owner = sqlx::query_as::<_, HostelOwner>(
        "SELECT h.landlord_id, l.user_id AS owner_user_id FROM hostels h \
         JOIN landlords l ON l.id = h.landlord_id WHERE h.id = $1",
    )
    .bind(command.hostel_id)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or(CreateReviewError::HostelNotFound(command.hostel_id))?;

    if owner.owner_user_id == command.author_id {
        return Err(CreateReviewError::OwnHostel);
    }

    let sql = format!(
        "INSERT INTO reviews AS r (hostel_id, author_id, rating, comment) \
         VALUES ($1, $2, $3, $4) RETURNING {REVIEW_COLUMNS}"
    );
    let review = sqlx::query_as::<_, Review>(&sql)
        .bind(command.hostel_id)
        .bind(command.author_id)
        .bind(command.rating)
        .bind(command.comment.as_deref().map(str::trim))
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            error_helpers::map_unique_violation(
                e,
                CreateReviewError::AlreadyReviewed,
                CreateReviewError::Database,
            )
        })?;

    let rating = refresh_landlord_rating(&mut tx, owner.landlord_id).await?;

    tx.commit().await?;

    tracing::info!(
        review_id = %review.id,
        landlord_id = %owner.landlord_id,
        landlord_rating = ?rating,
        "Review created"
    );

    Ok(review)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::shared::test_helpers::{TestHostel, TestLandlord};

    fn command(rating: i16) -> CreateReviewCommand {
        CreateReviewCommand {
            author_id: Uuid::new_v4(),
            hostel_id: Uuid::new_v4(),
            rating,
            comment: Some("Quiet and close to campus".to_string()),
        }
    }

    #[test]
    fn test_rating_bounds() {
        assert!(command(1).validate().is_ok());
        assert!(command(5).validate().is_ok());
        assert!(matches!(command(0).validate(), Err(CreateReviewError::Rating)));
        assert!(matches!(command(6).validate(), Err(CreateReviewError::Rating)));
    }

    #[test]
    fn test_comment_length() {
        let mut cmd = command(4);
        cmd.comment = Some("x".repeat(MAX_COMMENT_LENGTH + 1));
        assert!(matches!(cmd.validate(), Err(CreateReviewError::CommentTooLong)));
    }

    #[sqlx::test(migrations = "../../migrations")]
    #[ignore]
    async fn test_review_refreshes_landlord_rating(pool: PgPool) -> sqlx::Result<()> {
        let landlord = TestLandlord::new("Green Court Ltd").insert(&pool).await?;
        let a = TestHostel::new(&landlord, "A").insert(&pool).await?;
        let b = TestHostel::new(&landlord, "B").insert(&pool).await?;

        let mut first = command(5);
        first.hostel_id = a.id;
        handle(pool.clone(), first.clone()).await.unwrap();

        let mut second = command(2);
        second.hostel_id = b.id;
        handle(pool.clone(), second).await.unwrap();

        let rating: Option<f64> = sqlx::query_scalar("SELECT rating FROM landlords WHERE id = $1")
            .bind(landlord.id)
            .fetch_one(&pool)
            .await?;
        assert_eq!(rating, Some(3.5));

        assert!(matches!(
            handle(pool.clone(), first).await,
            Err(CreateReviewError::AlreadyReviewed)
        ));

        let mut own = command(5);
        own.hostel_id = a.id;
        own.author_id = landlord.user_id;
        assert!(matches!(handle(pool, own).await, Err(CreateReviewError::OwnHostel)));
        Ok(())
    }
}
