//! List hostels query
//!
//! Filtered, sorted and paginated listing with availability computed for
//! every hostel on the page.

use chrono::Utc;
use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::{
    db::{self, HostelFilter, HostelSort},
    features::shared::{Paginated, PaginationParams},
    models::{HostelRow, HostelView, HOSTEL_COLUMNS},
};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListHostelsQuery {
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub min_price: Option<f64>,
    #[serde(default)]
    pub max_price: Option<f64>,
    /// Comma-separated room types
    #[serde(default)]
    pub room_type: Option<String>,
    #[serde(default)]
    pub min_capacity: Option<i32>,
    #[serde(default)]
    pub verified_only: Option<bool>,
    #[serde(default)]
    pub sort_by: Option<HostelSort>,
    #[serde(default)]
    pub page: Option<i64>,
    #[serde(default)]
    pub per_page: Option<i64>,
}

pub type ListHostelsResponse = Paginated<HostelView>;

#[derive(Debug, thiserror::Error)]
pub enum ListHostelsError {
    #[error("{0}")]
    Pagination(&'static str),
    #[error("Prices cannot be negative")]
    NegativePrice,
    #[error("min_price cannot be greater than max_price")]
    PriceRange,
    #[error("min_capacity cannot be negative")]
    NegativeCapacity,
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<ListHostelsResponse, ListHostelsError>> for ListHostelsQuery {}

impl crate::cqrs::middleware::Query for ListHostelsQuery {}

impl ListHostelsQuery {
    pub fn pagination(&self) -> PaginationParams {
        PaginationParams::new(self.page, self.per_page)
    }

    pub fn validate(&self) -> Result<(), ListHostelsError> {
        self.pagination()
            .validate()
            .map_err(ListHostelsError::Pagination)?;

        if self.min_price.is_some_and(|p| p < 0.0) || self.max_price.is_some_and(|p| p < 0.0) {
            return Err(ListHostelsError::NegativePrice);
        }
        if let (Some(min), Some(max)) = (self.min_price, self.max_price) {
            if min > max {
                return Err(ListHostelsError::PriceRange);
            }
        }
        if self.min_capacity.is_some_and(|c| c < 0) {
            return Err(ListHostelsError::NegativeCapacity);
        }
        Ok(())
    }

    pub fn filter(&self) -> HostelFilter {
        HostelFilter {
            location: self.location.clone(),
            min_price: self.min_price,
            max_price: self.max_price,
            room_types: parse_room_types(self.room_type.as_deref()),
            min_capacity: self.min_capacity,
            verified_only: self.verified_only.unwrap_or(false),
            sort: self.sort_by.unwrap_or_default(),
            ..Default::default()
        }
    }
}

fn parse_room_types(raw: Option<&str>) -> Vec<String> {
    raw.map(|s| {
        s.split(',')
            .map(|t| t.trim().to_lowercase())
            .filter(|t| !t.is_empty())
            .collect()
    })
    .unwrap_or_default()
}

/// Count and fetch one page of hostels matching `filter`.
pub(crate) async fn fetch_page(
    pool: &PgPool,
    filter: &HostelFilter,
    params: &PaginationParams,
) -> Result<Paginated<HostelView>, sqlx::Error> {
    let mut count: QueryBuilder<Postgres> = QueryBuilder::new("SELECT COUNT(*) FROM hostels h");
    filter.push_where(&mut count);
    let total: i64 = count.build_query_scalar().fetch_one(pool).await?;

    let mut select: QueryBuilder<Postgres> =
        QueryBuilder::new(format!("SELECT {HOSTEL_COLUMNS} FROM hostels h"));
    filter.push_where(&mut select);
    filter.push_order(&mut select);
    select
        .push(" LIMIT ")
        .push_bind(params.per_page())
        .push(" OFFSET ")
        .push_bind(params.offset());
    let rows: Vec<HostelRow> = select.build_query_as().fetch_all(pool).await?;

    let views = db::hostel_views(pool, rows, Utc::now().date_naive()).await?;

    Ok(Paginated::from_items(views, params, total))
}

#[tracing::instrument(skip(pool))]
pub async fn handle(
    pool: PgPool,
    query: ListHostelsQuery,
) -> Result<ListHostelsResponse, ListHostelsError> {
    query.validate()?;

    Ok(fetch_page(&pool, &query.filter(), &query.pagination()).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::shared::test_helpers::{TestBooking, TestHostel, TestLandlord};

    #[test]
    fn test_validate_price_range() {
        let query = ListHostelsQuery {
            min_price: Some(9000.0),
            max_price: Some(1000.0),
            ..Default::default()
        };
        assert!(matches!(query.validate(), Err(ListHostelsError::PriceRange)));

        let query = ListHostelsQuery {
            min_price: Some(-1.0),
            ..Default::default()
        };
        assert!(matches!(query.validate(), Err(ListHostelsError::NegativePrice)));
    }

    #[test]
    fn test_validate_pagination() {
        let query = ListHostelsQuery {
            per_page: Some(500),
            ..Default::default()
        };
        assert!(matches!(query.validate(), Err(ListHostelsError::Pagination(_))));
        assert!(ListHostelsQuery::default().validate().is_ok());
    }

    #[test]
    fn test_filter_from_query() {
        let query = ListHostelsQuery {
            location: Some("Juja".to_string()),
            room_type: Some(" Single, shared ,,".to_string()),
            verified_only: Some(true),
            sort_by: Some(HostelSort::PriceDesc),
            ..Default::default()
        };
        let filter = query.filter();
        assert_eq!(filter.room_types, vec!["single", "shared"]);
        assert!(filter.verified_only);
        assert_eq!(filter.sort, HostelSort::PriceDesc);
        assert_eq!(filter.landlord_id, None);
    }

    #[test]
    fn test_query_string_deserialization() {
        let uri = "/hostels?location=Juja&min_price=100&sort_by=price_asc&page=2"
            .parse()
            .unwrap();
        let axum::extract::Query(query) =
            axum::extract::Query::<ListHostelsQuery>::try_from_uri(&uri).unwrap();
        assert_eq!(query.location.as_deref(), Some("Juja"));
        assert_eq!(query.min_price, Some(100.0));
        assert_eq!(query.sort_by, Some(HostelSort::PriceAsc));
        assert_eq!(query.pagination().page(), 2);
    }

    #[sqlx::test(migrations = "../../migrations")]
    #[ignore]
    async fn test_lists_with_availability(pool: PgPool) -> sqlx::Result<()> {
        let landlord = TestLandlord::new("Green Court Ltd").insert(&pool).await?;
        let hostel = TestHostel::new(&landlord, "Green Court")
            .with_capacity(10)
            .insert(&pool)
            .await?;
        TestBooking::new(&hostel).with_guests(3).confirmed().insert(&pool).await?;
        TestBooking::new(&hostel)
            .with_guests(4)
            .with_status(hostel_common::types::BookingStatus::Cancelled)
            .insert(&pool)
            .await?;

        let page = handle(pool, ListHostelsQuery::default()).await.unwrap();
        assert_eq!(page.pagination.total, 1);
        assert_eq!(page.items[0].available_rooms, 7);
        Ok(())
    }
}
