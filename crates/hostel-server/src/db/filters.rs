//! Typed query specifications translated once into SQL
//!
//! Filters append their predicates to a [`QueryBuilder`] with bound
//! parameters. Booking filters expect the bookings table aliased as `b`;
//! hostel filters expect hostels aliased as `h`.

use chrono::{DateTime, NaiveDate, Utc};
use hostel_common::types::BookingStatus;
use serde::{Deserialize, Serialize};
use sqlx::{Postgres, QueryBuilder};
use uuid::Uuid;

/// Appends ` WHERE ` before the first predicate and ` AND ` before the rest.
struct Predicates {
    started: bool,
}

impl Predicates {
    fn new() -> Self {
        Self { started: false }
    }

    fn next(&mut self, qb: &mut QueryBuilder<'_, Postgres>) {
        qb.push(if self.started { " AND " } else { " WHERE " });
        self.started = true;
    }
}

fn status_strings(statuses: &[BookingStatus]) -> Vec<String> {
    statuses.iter().map(|s| s.as_str().to_string()).collect()
}

// ============================================================================
// Bookings
// ============================================================================

/// Selection of bookings by hostel, status and date range.
///
/// `None` fields do not restrict the selection. `hostel_ids: Some(vec![])`
/// matches nothing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookingFilter {
    pub hostel_ids: Option<Vec<Uuid>>,
    pub statuses: Option<Vec<BookingStatus>>,
    /// Inclusive lower bound on `created_at`
    pub created_from: Option<DateTime<Utc>>,
    /// Exclusive upper bound on `created_at`
    pub created_before: Option<DateTime<Utc>>,
    /// Inclusive lower bound on `check_out`
    pub check_out_on_or_after: Option<NaiveDate>,
}

impl BookingFilter {
    pub fn for_hostels(hostel_ids: Vec<Uuid>) -> Self {
        Self {
            hostel_ids: Some(hostel_ids),
            ..Default::default()
        }
    }

    pub fn with_statuses(mut self, statuses: &[BookingStatus]) -> Self {
        self.statuses = Some(statuses.to_vec());
        self
    }

    pub fn created_since(mut self, from: DateTime<Utc>) -> Self {
        self.created_from = Some(from);
        self
    }

    pub fn created_between(mut self, from: DateTime<Utc>, before: DateTime<Utc>) -> Self {
        self.created_from = Some(from);
        self.created_before = Some(before);
        self
    }

    /// Only bookings whose check-out is on or after `today`.
    pub fn active_on(mut self, today: NaiveDate) -> Self {
        self.check_out_on_or_after = Some(today);
        self
    }

    /// Evaluate the filter against one booking in memory, with the same
    /// semantics as [`BookingFilter::push_where`].
    pub fn matches(
        &self,
        hostel_id: Uuid,
        status: BookingStatus,
        created_at: DateTime<Utc>,
        check_out: NaiveDate,
    ) -> bool {
        self.hostel_ids.as_ref().map_or(true, |ids| ids.contains(&hostel_id))
            && self.statuses.as_ref().map_or(true, |s| s.contains(&status))
            && self.created_from.map_or(true, |from| created_at >= from)
            && self.created_before.map_or(true, |before| created_at < before)
            && self.check_out_on_or_after.map_or(true, |today| check_out >= today)
    }

    pub fn push_where(&self, qb: &mut QueryBuilder<'_, Postgres>) {
        let mut predicates = Predicates::new();

        if let Some(ids) = &self.hostel_ids {
            predicates.next(qb);
            qb.push("b.hostel_id = ANY(").push_bind(ids.clone()).push(")");
        }

        if let Some(statuses) = &self.statuses {
            predicates.next(qb);
            qb.push("b.status = ANY(")
                .push_bind(status_strings(statuses))
                .push(")");
        }

        if let Some(from) = self.created_from {
            predicates.next(qb);
            qb.push("b.created_at >= ").push_bind(from);
        }

        if let Some(before) = self.created_before {
            predicates.next(qb);
            qb.push("b.created_at < ").push_bind(before);
        }

        if let Some(today) = self.check_out_on_or_after {
            predicates.next(qb);
            qb.push("b.check_out >= ").push_bind(today);
        }
    }
}

// ============================================================================
// Hostels
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HostelSort {
    PriceAsc,
    PriceDesc,
    /// Newest first
    #[default]
    CreatedAt,
    /// Featured hostels first, then newest
    FeaturedFirst,
}

impl HostelSort {
    fn order_by(self) -> &'static str {
        match self {
            HostelSort::PriceAsc => " ORDER BY h.price ASC, h.id ASC",
            HostelSort::PriceDesc => " ORDER BY h.price DESC, h.id ASC",
            HostelSort::CreatedAt => " ORDER BY h.created_at DESC, h.id ASC",
            HostelSort::FeaturedFirst => {
                " ORDER BY h.is_featured DESC, h.created_at DESC, h.id ASC"
            },
        }
    }
}

/// Hostel listing and search criteria.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HostelFilter {
    /// Case-insensitive match on location, name or served university
    pub location: Option<String>,
    /// Case-insensitive match on name, location, description or university
    pub text: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub room_types: Vec<String>,
    pub min_capacity: Option<i32>,
    pub verified_only: bool,
    pub landlord_id: Option<Uuid>,
    pub sort: HostelSort,
}

fn contains_pattern(term: &str) -> String {
    let escaped = term
        .trim()
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

impl HostelFilter {
    pub fn push_where(&self, qb: &mut QueryBuilder<'_, Postgres>) {
        let mut predicates = Predicates::new();

        if let Some(location) = self.location.as_deref().filter(|l| !l.trim().is_empty()) {
            let pattern = contains_pattern(location);
            predicates.next(qb);
            qb.push("(h.location ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR h.name ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR h.features->>'university' ILIKE ")
                .push_bind(pattern)
                .push(")");
        }

        if let Some(text) = self.text.as_deref().filter(|t| !t.trim().is_empty()) {
            let pattern = contains_pattern(text);
            predicates.next(qb);
            qb.push("(h.name ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR h.location ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR h.description ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR h.features->>'university' ILIKE ")
                .push_bind(pattern)
                .push(")");
        }

        if let Some(min) = self.min_price {
            predicates.next(qb);
            qb.push("h.price >= ").push_bind(min);
        }

        if let Some(max) = self.max_price {
            predicates.next(qb);
            qb.push("h.price <= ").push_bind(max);
        }

        if !self.room_types.is_empty() {
            predicates.next(qb);
            qb.push("h.room_type = ANY(")
                .push_bind(self.room_types.clone())
                .push(")");
        }

        if let Some(min_capacity) = self.min_capacity {
            predicates.next(qb);
            qb.push("h.capacity >= ").push_bind(min_capacity);
        }

        if self.verified_only {
            predicates.next(qb);
            qb.push("h.is_verified = TRUE");
        }

        if let Some(landlord_id) = self.landlord_id {
            predicates.next(qb);
            qb.push("h.landlord_id = ").push_bind(landlord_id);
        }
    }

    pub fn push_order(&self, qb: &mut QueryBuilder<'_, Postgres>) {
        qb.push(self.sort.order_by());
    }
}
