//! Booking read operations
//!
//! Guest and landlord listings share [`fetch_page`], which differs only in
//! how the bookings are scoped.

pub mod get;
pub mod landlord;
pub mod mine;

pub use get::{GetBookingError, GetBookingQuery};
pub use landlord::{ListLandlordBookingsError, ListLandlordBookingsQuery};
pub use mine::{ListMyBookingsError, ListMyBookingsQuery};

use hostel_common::types::BookingStatus;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::{
    features::shared::{Paginated, PaginationParams},
    models::{BookingWithHostel, BOOKING_COLUMNS},
};

pub type BookingPage = Paginated<BookingWithHostel>;

/// Whose bookings a listing returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BookingScope {
    /// Bookings made by this user
    Guest(Uuid),
    /// Bookings on hostels owned by this landlord profile
    Landlord(Uuid),
}

fn push_scope(
    qb: &mut QueryBuilder<'_, Postgres>,
    scope: BookingScope,
    status: Option<BookingStatus>,
) {
    match scope {
        BookingScope::Guest(guest_id) => {
            qb.push(" WHERE b.guest_id = ").push_bind(guest_id);
        },
        BookingScope::Landlord(landlord_id) => {
            qb.push(" WHERE h.landlord_id = ").push_bind(landlord_id);
        },
    }
    if let Some(status) = status {
        qb.push(" AND b.status = ").push_bind(status.as_str());
    }
}

const FROM_BOOKINGS: &str = " FROM bookings b JOIN hostels h ON h.id = b.hostel_id";

pub(crate) fn count_query(
    scope: BookingScope,
    status: Option<BookingStatus>,
) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new(format!("SELECT COUNT(*){FROM_BOOKINGS}"));
    push_scope(&mut qb, scope, status);
    qb
}

pub(crate) fn page_query(
    scope: BookingScope,
    status: Option<BookingStatus>,
    params: &PaginationParams,
) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new(format!(
        "SELECT {BOOKING_COLUMNS}, h.name AS hostel_name{FROM_BOOKINGS}"
    ));
    push_scope(&mut qb, scope, status);
    qb.push(" ORDER BY b.created_at DESC, b.id ASC LIMIT ")
        .push_bind(params.per_page())
        .push(" OFFSET ")
        .push_bind(params.offset());
    qb
}

pub(crate) async fn fetch_page(
    pool: &PgPool,
    scope: BookingScope,
    status: Option<BookingStatus>,
    params: &PaginationParams,
) -> Result<BookingPage, sqlx::Error> {
    let mut count = count_query(scope, status);
    let total: i64 = count.build_query_scalar().fetch_one(pool).await?;

    let mut select = page_query(scope, status, params);
    let items: Vec<BookingWithHostel> = select.build_query_as().fetch_all(pool).await?;

    Ok(Paginated::from_items(items, params, total))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guest_page_sql() {
        let qb = page_query(
            BookingScope::Guest(Uuid::new_v4()),
            None,
            &PaginationParams::default(),
        );
        assert!(qb.sql().ends_with(
            "FROM bookings b JOIN hostels h ON h.id = b.hostel_id WHERE b.guest_id = $1 \
             ORDER BY b.created_at DESC, b.id ASC LIMIT $2 OFFSET $3"
        ));
        assert!(qb.sql().contains("h.name AS hostel_name"));
    }

    #[test]
    fn test_landlord_count_sql_with_status() {
        let qb = count_query(
            BookingScope::Landlord(Uuid::new_v4()),
            Some(BookingStatus::Pending),
        );
        assert_eq!(
            qb.sql(),
            "SELECT COUNT(*) FROM bookings b JOIN hostels h ON h.id = b.hostel_id \
             WHERE h.landlord_id = $1 AND b.status = $2"
        );
    }
}
