//! Free-text hostel search
//!
//! Matches the term against name, location, description and served
//! university. Featured hostels rank first, then newest.

use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::{
    db::{HostelFilter, HostelSort},
    features::{
        hostels::queries::{list::fetch_page, ListHostelsResponse},
        shared::PaginationParams,
    },
};

pub const MAX_QUERY_LENGTH: usize = 200;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HostelSearchQuery {
    #[serde(default)]
    pub q: String,
    #[serde(default)]
    pub verified_only: Option<bool>,
    #[serde(default)]
    pub page: Option<i64>,
    #[serde(default)]
    pub per_page: Option<i64>,
}

#[derive(Debug, thiserror::Error)]
pub enum HostelSearchError {
    #[error("Query is required")]
    QueryRequired,
    #[error("Query must be at most 200 characters")]
    QueryTooLong,
    #[error("{0}")]
    Pagination(&'static str),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<ListHostelsResponse, HostelSearchError>> for HostelSearchQuery {}

impl crate::cqrs::middleware::Query for HostelSearchQuery {}

impl HostelSearchQuery {
    pub fn pagination(&self) -> PaginationParams {
        PaginationParams::new(self.page, self.per_page)
    }

    pub fn validate(&self) -> Result<(), HostelSearchError> {
        let term = self.q.trim();
        if term.is_empty() {
            return Err(HostelSearchError::QueryRequired);
        }
        if term.chars().count() > MAX_QUERY_LENGTH {
            return Err(HostelSearchError::QueryTooLong);
        }
        self.pagination()
            .validate()
            .map_err(HostelSearchError::Pagination)
    }

    pub fn filter(&self) -> HostelFilter {
        HostelFilter {
            text: Some(self.q.trim().to_string()),
            verified_only: self.verified_only.unwrap_or(false),
            sort: HostelSort::FeaturedFirst,
            ..Default::default()
        }
    }
}

#[tracing::instrument(skip(pool), fields(q = %query.q))]
pub async fn handle(
    pool: PgPool,
    query: HostelSearchQuery,
) -> Result<ListHostelsResponse, HostelSearchError> {
    query.validate()?;

    let page = fetch_page(&pool, &query.filter(), &query.pagination()).await?;

    tracing::debug!(
        count = page.items.len(),
        total = page.pagination.total,
        "Search completed"
    );

    Ok(page)
}
