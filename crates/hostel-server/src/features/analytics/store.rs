//! PostgreSQL implementation of [`AnalyticsStore`]
//!
//! Every read goes through the one transaction handed in by the caller, so
//! a dashboard sees a single consistent snapshot.

use sqlx::{Postgres, QueryBuilder, Transaction};
use uuid::Uuid;

use super::aggregator::{AnalyticsStore, LandlordRef, OwnedHostel, TopHostel};
use crate::db::BookingFilter;

pub struct PgAnalyticsStore<'c> {
    tx: Transaction<'c, Postgres>,
}

impl<'c> PgAnalyticsStore<'c> {
    pub fn new(tx: Transaction<'c, Postgres>) -> Self {
        Self { tx }
    }

    /// Release the transaction.
    pub async fn finish(self) -> Result<(), sqlx::Error> {
        self.tx.commit().await
    }
}

fn count_query(filter: &BookingFilter) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new("SELECT COUNT(*) FROM bookings b");
    filter.push_where(&mut qb);
    qb
}

fn sum_query(filter: &BookingFilter) -> QueryBuilder<'static, Postgres> {
    let mut qb =
        QueryBuilder::new("SELECT COALESCE(SUM(b.total_price), 0)::float8 FROM bookings b");
    filter.push_where(&mut qb);
    qb
}

fn top_hostel_query(filter: &BookingFilter) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new(
        "SELECT h.name, COALESCE(SUM(b.total_price), 0)::float8 AS revenue, \
         COUNT(b.id) AS bookings FROM bookings b JOIN hostels h ON h.id = b.hostel_id",
    );
    filter.push_where(&mut qb);
    qb.push(
        " GROUP BY h.id, h.name, h.created_at \
         ORDER BY revenue DESC, h.created_at ASC, h.id ASC LIMIT 1",
    );
    qb
}

#[async_trait::async_trait]
impl AnalyticsStore for PgAnalyticsStore<'_> {
    async fn landlord(&mut self, user_id: Uuid) -> Result<Option<LandlordRef>, sqlx::Error> {
        sqlx::query_as::<_, LandlordRef>("SELECT id, rating FROM landlords WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(&mut *self.tx)
            .await
    }

    async fn owned_hostels(&mut self, landlord_id: Uuid) -> Result<Vec<OwnedHostel>, sqlx::Error> {
        sqlx::query_as::<_, OwnedHostel>(
            "SELECT id, name, capacity, created_at FROM hostels \
             WHERE landlord_id = $1 ORDER BY created_at ASC, id ASC",
        )
        .bind(landlord_id)
        .fetch_all(&mut *self.tx)
        .await
    }

    async fn count_bookings(&mut self, filter: &BookingFilter) -> Result<i64, sqlx::Error> {
        let mut qb = count_query(filter);
        let count = qb
            .build_query_scalar::<i64>()
            .fetch_one(&mut *self.tx)
            .await?;
        Ok(count)
    }

    async fn sum_revenue(&mut self, filter: &BookingFilter) -> Result<f64, sqlx::Error> {
        let mut qb = sum_query(filter);
        let sum = qb
            .build_query_scalar::<f64>()
            .fetch_one(&mut *self.tx)
            .await?;
        Ok(sum)
    }

    async fn top_hostel(
        &mut self,
        filter: &BookingFilter,
    ) -> Result<Option<TopHostel>, sqlx::Error> {
        let mut qb = top_hostel_query(filter);
        let top = qb
            .build_query_as::<TopHostel>()
            .fetch_optional(&mut *self.tx)
            .await?;
        Ok(top)
    }
}
