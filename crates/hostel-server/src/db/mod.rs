//! Database pool setup and shared query helpers

use std::{collections::HashMap, time::Duration};

use chrono::NaiveDate;
use hostel_common::{
    availability::{available_rooms, BookingSlot},
    types::BookingStatus,
};
use sqlx::{
    postgres::{PgPool, PgPoolOptions},
    PgExecutor, Postgres, QueryBuilder,
};
use uuid::Uuid;

use crate::{
    config::DatabaseConfig,
    models::{HostelRow, HostelView, Landlord, LANDLORD_COLUMNS},
};

pub mod filters;

pub use filters::{BookingFilter, HostelFilter, HostelSort};

pub async fn create_pool(config: &DatabaseConfig) -> sqlx::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.connect_timeout_secs))
        .idle_timeout(Duration::from_secs(config.idle_timeout_secs))
        .connect(&config.url)
        .await?;

    tracing::info!(
        max_connections = config.max_connections,
        min_connections = config.min_connections,
        "Database connection pool created"
    );

    Ok(pool)
}

pub async fn health_check(pool: &PgPool) -> sqlx::Result<()> {
    sqlx::query("SELECT 1").execute(pool).await.map(|_| ())
}

#[derive(Debug, sqlx::FromRow)]
struct SlotRow {
    hostel_id: Uuid,
    guests: i32,
    status: String,
    check_out: NaiveDate,
}

/// Bookings holding capacity on `today` for each of `hostel_ids`, in one query.
///
/// Hostels with no active bookings are absent from the map.
pub async fn active_slots<'e>(
    executor: impl PgExecutor<'e>,
    hostel_ids: &[Uuid],
    today: NaiveDate,
) -> sqlx::Result<HashMap<Uuid, Vec<BookingSlot>>> {
    if hostel_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let filter = BookingFilter::for_hostels(hostel_ids.to_vec())
        .with_statuses(&BookingStatus::OCCUPYING)
        .active_on(today);

    let mut qb: QueryBuilder<Postgres> =
        QueryBuilder::new("SELECT b.hostel_id, b.guests, b.status, b.check_out FROM bookings b");
    filter.push_where(&mut qb);

    let rows: Vec<SlotRow> = qb.build_query_as().fetch_all(executor).await?;

    let mut slots: HashMap<Uuid, Vec<BookingSlot>> = HashMap::new();
    for row in rows {
        let Ok(status) = row.status.parse() else {
            tracing::warn!(hostel_id = %row.hostel_id, status = %row.status, "Skipping booking with unknown status");
            continue;
        };
        slots.entry(row.hostel_id).or_default().push(BookingSlot {
            guests: row.guests,
            status,
            check_out: row.check_out,
        });
    }

    Ok(slots)
}

/// Attach computed availability to a page of hostels.
pub async fn hostel_views<'e>(
    executor: impl PgExecutor<'e>,
    rows: Vec<HostelRow>,
    today: NaiveDate,
) -> sqlx::Result<Vec<HostelView>> {
    let ids: Vec<Uuid> = rows.iter().map(|h| h.id).collect();
    let slots = active_slots(executor, &ids, today).await?;

    Ok(rows
        .into_iter()
        .map(|row| {
            let bookings = slots.get(&row.id).map(Vec::as_slice).unwrap_or(&[]);
            let rooms = available_rooms(row.capacity, bookings, today);
            row.into_view(rooms)
        })
        .collect())
}

/// Landlord profile owned by `user_id`, if one was registered.
pub async fn landlord_for_user<'e>(
    executor: impl PgExecutor<'e>,
    user_id: Uuid,
) -> sqlx::Result<Option<Landlord>> {
    let sql = format!("SELECT {LANDLORD_COLUMNS} FROM landlords l WHERE l.user_id = $1");
    sqlx::query_as::<_, Landlord>(&sql)
        .bind(user_id)
        .fetch_optional(executor)
        .await
}

/// User id of the landlord owning `hostel_id`; `None` when the hostel does not exist.
pub async fn hostel_owner<'e>(
    executor: impl PgExecutor<'e>,
    hostel_id: Uuid,
) -> sqlx::Result<Option<Uuid>> {
    sqlx::query_scalar::<_, Uuid>(
        "SELECT l.user_id FROM hostels h JOIN landlords l ON l.id = h.landlord_id WHERE h.id = $1",
    )
    .bind(hostel_id)
    .fetch_optional(executor)
    .await
}
