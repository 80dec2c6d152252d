//! The calling landlord's hostels

use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use super::list::{fetch_page, ListHostelsResponse};
use crate::{
    db::{self, HostelFilter},
    features::shared::PaginationParams,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListMyHostelsQuery {
    #[serde(skip)]
    pub user_id: Uuid,
    #[serde(default)]
    pub page: Option<i64>,
    #[serde(default)]
    pub per_page: Option<i64>,
}

#[derive(Debug, thiserror::Error)]
pub enum ListMyHostelsError {
    #[error("{0}")]
    Pagination(&'static str),
    #[error("Landlord profile not found")]
    LandlordNotFound,
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<ListHostelsResponse, ListMyHostelsError>> for ListMyHostelsQuery {}

impl crate::cqrs::middleware::Query for ListMyHostelsQuery {}

#[tracing::instrument(skip(pool))]
pub async fn handle(
    pool: PgPool,
    query: ListMyHostelsQuery,
) -> Result<ListHostelsResponse, ListMyHostelsError> {
    let params = PaginationParams::new(query.page, query.per_page);
    params.validate().map_err(ListMyHostelsError::Pagination)?;

    let landlord = db::landlord_for_user(&pool, query.user_id)
        .await?
        .ok_or(ListMyHostelsError::LandlordNotFound)?;

    let filter = HostelFilter {
        landlord_id: Some(landlord.id),
        ..Default::default()
    };

    Ok(fetch_page(&pool, &filter, &params).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::shared::test_helpers::{TestHostel, TestLandlord};

    #[sqlx::test(migrations = "../../migrations")]
    #[ignore]
    async fn test_only_own_hostels(pool: PgPool) -> sqlx::Result<()> {
        let me = TestLandlord::new("Mine Ltd").insert(&pool).await?;
        let other = TestLandlord::new("Other Ltd").insert(&pool).await?;
        TestHostel::new(&me, "Mine").insert(&pool).await?;
        TestHostel::new(&other, "Theirs").insert(&pool).await?;

        let page = handle(
            pool,
            ListMyHostelsQuery {
                user_id: me.user_id,
                page: None,
                per_page: None,
            },
        )
        .await
        .unwrap();
        assert_eq!(page.pagination.total, 1);
        assert_eq!(page.items[0].name, "Mine");
        Ok(())
    }
}
