//! Landlord dashboard aggregation
//!
//! [`summarize`] derives every dashboard figure from three aggregate
//! primitives on [`AnalyticsStore`]: count, sum of `total_price`, and the
//! top hostel by revenue. Each primitive takes a [`BookingFilter`]; the
//! current time is an argument so month boundaries are reproducible.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use hostel_common::types::BookingStatus;
use serde::Serialize;
use uuid::Uuid;

use crate::db::BookingFilter;

/// Number of calendar months in the trend, ending with the current month.
pub const TREND_MONTHS: i32 = 4;

// ============================================================================
// Output
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LandlordAnalytics {
    pub total_revenue: f64,
    pub monthly_revenue: f64,
    pub total_bookings: i64,
    pub active_bookings: i64,
    pub occupancy_rate: f64,
    pub average_rating: f64,
    pub top_hostel: Option<TopHostel>,
    pub monthly_trend: Vec<TrendPoint>,
    pub total_hostels: i64,
}

impl LandlordAnalytics {
    /// Summary for a landlord without hostels.
    pub fn empty() -> Self {
        Self {
            total_revenue: 0.0,
            monthly_revenue: 0.0,
            total_bookings: 0,
            active_bookings: 0,
            occupancy_rate: 0.0,
            average_rating: 0.0,
            top_hostel: None,
            monthly_trend: Vec::new(),
            total_hostels: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct TopHostel {
    pub name: String,
    pub revenue: f64,
    pub bookings: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendPoint {
    pub month: String,
    pub revenue: f64,
    pub bookings: i64,
}

// ============================================================================
// Store
// ============================================================================

/// The landlord fields the dashboard reads.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct LandlordRef {
    pub id: Uuid,
    pub rating: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct OwnedHostel {
    pub id: Uuid,
    pub name: String,
    pub capacity: i32,
    pub created_at: DateTime<Utc>,
}

/// Aggregate reads over landlords, hostels and bookings.
#[async_trait::async_trait]
pub trait AnalyticsStore: Send {
    async fn landlord(&mut self, user_id: Uuid) -> Result<Option<LandlordRef>, sqlx::Error>;

    /// Hostels owned by the landlord, oldest first.
    async fn owned_hostels(&mut self, landlord_id: Uuid) -> Result<Vec<OwnedHostel>, sqlx::Error>;

    async fn count_bookings(&mut self, filter: &BookingFilter) -> Result<i64, sqlx::Error>;

    /// Sum of `total_price`; 0 when nothing matches.
    async fn sum_revenue(&mut self, filter: &BookingFilter) -> Result<f64, sqlx::Error>;

    /// Hostel with the highest summed `total_price` among matching bookings.
    ///
    /// Ties go to the earliest created hostel, then the lowest id.
    async fn top_hostel(&mut self, filter: &BookingFilter)
        -> Result<Option<TopHostel>, sqlx::Error>;
}

#[derive(Debug, thiserror::Error)]
pub enum AnalyticsError {
    #[error("Landlord profile not found")]
    LandlordNotFound,
    #[error("Failed to fetch analytics")]
    Aggregation(#[from] sqlx::Error),
}

// ============================================================================
// Calendar months
// ============================================================================

/// `(year, month)` moved by `delta` months.
pub fn shift_month(year: i32, month: u32, delta: i32) -> (i32, u32) {
    let index = year * 12 + (month as i32 - 1) + delta;
    (index.div_euclid(12), index.rem_euclid(12) as u32 + 1)
}

/// First instant of the calendar month in UTC.
pub fn month_start(year: i32, month: u32) -> DateTime<Utc> {
    NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
        .unwrap_or_default()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthWindow {
    pub label: String,
    pub start: DateTime<Utc>,
    /// Exclusive
    pub end: DateTime<Utc>,
}

/// The trend months ending with the month of `now`, oldest first.
pub fn trend_windows(now: DateTime<Utc>) -> Vec<MonthWindow> {
    (0..TREND_MONTHS)
        .rev()
        .map(|back| {
            let (year, month) = shift_month(now.year(), now.month(), -back);
            let (next_year, next_month) = shift_month(year, month, 1);
            let start = month_start(year, month);
            MonthWindow {
                label: start.format("%b").to_string(),
                start,
                end: month_start(next_year, next_month),
            }
        })
        .collect()
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// `activeBookings / totalCapacity` as a percentage with one decimal.
pub fn occupancy_rate(active_bookings: i64, total_capacity: i64) -> f64 {
    if total_capacity <= 0 {
        return 0.0;
    }
    round1(active_bookings as f64 / total_capacity as f64 * 100.0)
}

// ============================================================================
// Aggregation
// ============================================================================

/// Build the dashboard for the landlord owned by `user_id` as of `now`.
#[tracing::instrument(skip(store))]
pub async fn summarize<S>(
    store: &mut S,
    user_id: Uuid,
    now: DateTime<Utc>,
) -> Result<LandlordAnalytics, AnalyticsError>
where
    S: AnalyticsStore + ?Sized,
{
    let landlord = store
        .landlord(user_id)
        .await?
        .ok_or(AnalyticsError::LandlordNotFound)?;

    let hostels = store.owned_hostels(landlord.id).await?;
    if hostels.is_empty() {
        return Ok(LandlordAnalytics::empty());
    }

    let all = BookingFilter::for_hostels(hostels.iter().map(|h| h.id).collect());
    let earning = all.clone().with_statuses(&BookingStatus::REVENUE);

    let total_bookings = store.count_bookings(&all).await?;
    let active_bookings = store
        .count_bookings(
            &all.clone()
                .with_statuses(&[BookingStatus::Confirmed])
                .active_on(now.date_naive()),
        )
        .await?;

    let total_revenue = store.sum_revenue(&earning).await?;
    let monthly_revenue = store
        .sum_revenue(&earning.clone().created_since(month_start(now.year(), now.month())))
        .await?;

    let mut monthly_trend = Vec::with_capacity(TREND_MONTHS as usize);
    for window in trend_windows(now) {
        let revenue = store
            .sum_revenue(&earning.clone().created_between(window.start, window.end))
            .await?;
        let bookings = store
            .count_bookings(&all.clone().created_between(window.start, window.end))
            .await?;
        monthly_trend.push(TrendPoint {
            month: window.label,
            revenue,
            bookings,
        });
    }

    let total_capacity: i64 = hostels.iter().map(|h| i64::from(h.capacity.max(0))).sum();

    let top_hostel = match store.top_hostel(&earning).await? {
        Some(top) => Some(top),
        None => hostels.first().map(|h| TopHostel {
            name: h.name.clone(),
            revenue: 0.0,
            bookings: 0,
        }),
    };

    Ok(LandlordAnalytics {
        total_revenue,
        monthly_revenue,
        total_bookings,
        active_bookings,
        occupancy_rate: occupancy_rate(active_bookings, total_capacity),
        average_rating: landlord.rating.map(round1).unwrap_or(0.0),
        top_hostel,
        monthly_trend,
        total_hostels: hostels.len() as i64,
    })
}

#[cfg(test)]
pub(crate) mod memory {
    //! In-memory [`AnalyticsStore`] for tests.

    use std::collections::HashMap;

    use super::*;

    #[derive(Debug, Clone)]
    pub struct MemoryBooking {
        pub hostel_id: Uuid,
        pub status: BookingStatus,
        pub total_price: f64,
        pub created_at: DateTime<Utc>,
        pub check_out: NaiveDate,
    }

    #[derive(Debug, Default)]
    pub struct MemoryStore {
        pub landlords: HashMap<Uuid, LandlordRef>,
        pub hostels: HashMap<Uuid, Vec<OwnedHostel>>,
        pub bookings: Vec<MemoryBooking>,
        pub fail: bool,
    }

    impl MemoryStore {
        fn check(&self) -> Result<(), sqlx::Error> {
            if self.fail {
                Err(sqlx::Error::PoolTimedOut)
            } else {
                Ok(())
            }
        }

        fn matching<'a>(
            &'a self,
            filter: &'a BookingFilter,
        ) -> impl Iterator<Item = &'a MemoryBooking> + 'a {
            self.bookings
                .iter()
                .filter(|b| filter.matches(b.hostel_id, b.status, b.created_at, b.check_out))
        }

        fn hostel(&self, id: Uuid) -> Option<&OwnedHostel> {
            self.hostels.values().flatten().find(|h| h.id == id)
        }
    }

    #[async_trait::async_trait]
    impl AnalyticsStore for MemoryStore {
        async fn landlord(&mut self, user_id: Uuid) -> Result<Option<LandlordRef>, sqlx::Error> {
            self.check()?;
            Ok(self.landlords.get(&user_id).cloned())
        }

        async fn owned_hostels(
            &mut self,
            landlord_id: Uuid,
        ) -> Result<Vec<OwnedHostel>, sqlx::Error> {
            self.check()?;
            let mut hostels = self.hostels.get(&landlord_id).cloned().unwrap_or_default();
            hostels.sort_by_key(|h| (h.created_at, h.id));
            Ok(hostels)
        }

        async fn count_bookings(&mut self, filter: &BookingFilter) -> Result<i64, sqlx::Error> {
            self.check()?;
            Ok(self.matching(filter).count() as i64)
        }

        async fn sum_revenue(&mut self, filter: &BookingFilter) -> Result<f64, sqlx::Error> {
            self.check()?;
            Ok(self.matching(filter).map(|b| b.total_price).sum())
        }

        async fn top_hostel(
            &mut self,
            filter: &BookingFilter,
        ) -> Result<Option<TopHostel>, sqlx::Error> {
            self.check()?;

            let mut totals: HashMap<Uuid, (f64, i64)> = HashMap::new();
            for booking in self.matching(filter) {
                let entry = totals.entry(booking.hostel_id).or_default();
                entry.0 += booking.total_price;
                entry.1 += 1;
            }

            let mut ranked: Vec<(&OwnedHostel, f64, i64)> = totals
                .into_iter()
                .filter_map(|(id, (revenue, count))| self.hostel(id).map(|h| (h, revenue, count)))
                .collect();
            ranked.sort_by(|a, b| {
                b.1.total_cmp(&a.1)
                    .then(a.0.created_at.cmp(&b.0.created_at))
                    .then(a.0.id.cmp(&b.0.id))
            });

            Ok(ranked.first().map(|(h, revenue, bookings)| TopHostel {
                name: h.name.clone(),
                revenue: *revenue,
                bookings: *bookings,
            }))
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};

    use super::memory::{MemoryBooking, MemoryStore};
    use super::*;

    fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()
    }

    struct Fixture {
        store: MemoryStore,
        user_id: Uuid,
        landlord_id: Uuid,
    }

    impl Fixture {
        fn new(rating: Option<f64>) -> Self {
            let user_id = Uuid::new_v4();
            let landlord_id = Uuid::new_v4();
            let mut store = MemoryStore::default();
            store.landlords.insert(
                user_id,
                LandlordRef {
                    id: landlord_id,
                    rating,
                },
            );
            Self {
                store,
                user_id,
                landlord_id,
            }
        }

        fn hostel(&mut self, name: &str, capacity: i32, created_at: DateTime<Utc>) -> Uuid {
            let id = Uuid::new_v4();
            self.store
                .hostels
                .entry(self.landlord_id)
                .or_default()
                .push(OwnedHostel {
                    id,
                    name: name.to_string(),
                    capacity,
                    created_at,
                });
            id
        }

        fn booking(
            &mut self,
            hostel_id: Uuid,
            status: BookingStatus,
            total_price: f64,
            created_at: DateTime<Utc>,
            check_out: NaiveDate,
        ) {
            self.store.bookings.push(MemoryBooking {
                hostel_id,
                status,
                total_price,
                created_at,
                check_out,
            });
        }

        async fn summarize(&mut self, now: DateTime<Utc>) -> Result<LandlordAnalytics, AnalyticsError> {
            summarize(&mut self.store, self.user_id, now).await
        }
    }

    #[test]
    fn test_shift_month_rolls_over_years() {
        assert_eq!(shift_month(2024, 1, -1), (2023, 12));
        assert_eq!(shift_month(2024, 12, 1), (2025, 1));
        assert_eq!(shift_month(2024, 3, -3), (2023, 12));
        assert_eq!(shift_month(2024, 6, 0), (2024, 6));
        assert_eq!(shift_month(2024, 2, -26), (2021, 12));
    }

    #[test]
    fn test_trend_windows_across_new_year() {
        let windows = trend_windows(at(2024, 1, 15));
        let labels: Vec<&str> = windows.iter().map(|w| w.label.as_str()).collect();
        assert_eq!(labels, vec!["Oct", "Nov", "Dec", "Jan"]);
        assert_eq!(windows[2].start, month_start(2023, 12));
        assert_eq!(windows[2].end, month_start(2024, 1));
        assert_eq!(windows[3].end, month_start(2024, 2));
    }

    #[test]
    fn test_trend_windows_are_contiguous() {
        let windows = trend_windows(at(2024, 3, 31));
        assert_eq!(windows.len(), 4);
        for pair in windows.windows(2) {
            assert_eq!(pair[0].end, pair[1].start);
        }
    }

    #[test]
    fn test_occupancy_rate() {
        assert_eq!(occupancy_rate(0, 0), 0.0);
        assert_eq!(occupancy_rate(5, 0), 0.0);
        assert_eq!(occupancy_rate(1, 3), 33.3);
        assert_eq!(occupancy_rate(2, 3), 66.7);
        assert_eq!(occupancy_rate(4, 4), 100.0);
    }

    #[tokio::test]
    async fn test_unknown_landlord_is_not_found() {
        let mut store = MemoryStore::default();
        let err = summarize(&mut store, Uuid::new_v4(), at(2024, 5, 1))
            .await
            .unwrap_err();
        assert!(matches!(err, AnalyticsError::LandlordNotFound));
    }

    #[tokio::test]
    async fn test_landlord_without_hostels_gets_zeroed_summary() {
        let mut fx = Fixture::new(Some(4.8));
        let summary = fx.summarize(at(2024, 5, 1)).await.unwrap();

        assert_eq!(summary, LandlordAnalytics::empty());
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["topHostel"], serde_json::Value::Null);
        assert_eq!(json["monthlyTrend"], serde_json::json!([]));
        assert_eq!(json["totalHostels"], 0);
    }

    #[tokio::test]
    async fn test_top_hostel_by_revenue() {
        let now = at(2024, 5, 20);
        let mut fx = Fixture::new(None);
        let a = fx.hostel("A", 10, at(2023, 1, 1));
        fx.hostel("B", 10, at(2022, 1, 1));
        fx.booking(a, BookingStatus::Confirmed, 100.0, now, now.date_naive());

        let summary = fx.summarize(now).await.unwrap();
        assert_eq!(
            summary.top_hostel,
            Some(TopHostel {
                name: "A".to_string(),
                revenue: 100.0,
                bookings: 1,
            })
        );
        assert_eq!(summary.total_hostels, 2);
    }

    #[tokio::test]
    async fn test_top_hostel_falls_back_to_earliest_created() {
        let now = at(2024, 5, 20);
        let mut fx = Fixture::new(None);
        let newer = fx.hostel("Newer", 5, at(2024, 1, 1));
        fx.hostel("Oldest", 5, at(2021, 1, 1));
        fx.booking(newer, BookingStatus::Pending, 300.0, now, now.date_naive());

        let summary = fx.summarize(now).await.unwrap();
        assert_eq!(
            summary.top_hostel,
            Some(TopHostel {
                name: "Oldest".to_string(),
                revenue: 0.0,
                bookings: 0,
            })
        );
    }

    #[tokio::test]
    async fn test_top_hostel_tie_goes_to_earliest_created() {
        let now = at(2024, 5, 20);
        let mut fx = Fixture::new(None);
        let late = fx.hostel("Late", 5, at(2024, 1, 1));
        let early = fx.hostel("Early", 5, at(2023, 1, 1));
        fx.booking(late, BookingStatus::Completed, 50.0, now, now.date_naive());
        fx.booking(early, BookingStatus::Confirmed, 50.0, now, now.date_naive());

        let summary = fx.summarize(now).await.unwrap();
        assert_eq!(summary.top_hostel.map(|t| t.name), Some("Early".to_string()));
    }

    #[tokio::test]
    async fn test_revenue_counts_confirmed_and_completed_only() {
        let now = at(2024, 5, 20);
        let today = now.date_naive();
        let mut fx = Fixture::new(None);
        let h = fx.hostel("H", 10, at(2023, 1, 1));
        fx.booking(h, BookingStatus::Confirmed, 100.0, now, today);
        fx.booking(h, BookingStatus::Completed, 50.0, now, today);
        fx.booking(h, BookingStatus::Pending, 1000.0, now, today);
        fx.booking(h, BookingStatus::Cancelled, 1000.0, now, today);
        fx.booking(h, BookingStatus::Upcoming, 1000.0, now, today);

        let summary = fx.summarize(now).await.unwrap();
        assert_eq!(summary.total_revenue, 150.0);
        assert_eq!(summary.total_bookings, 5);
    }

    #[tokio::test]
    async fn test_revenue_is_zero_not_null_without_qualifying_bookings() {
        let now = at(2024, 5, 20);
        let mut fx = Fixture::new(None);
        let h = fx.hostel("H", 10, at(2023, 1, 1));
        fx.booking(h, BookingStatus::Pending, 80.0, now, now.date_naive());

        let summary = fx.summarize(now).await.unwrap();
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["totalRevenue"], 0.0);
        assert_eq!(json["monthlyRevenue"], 0.0);
    }

    #[tokio::test]
    async fn test_monthly_revenue_starts_at_first_of_month() {
        let now = at(2024, 5, 20);
        let mut fx = Fixture::new(None);
        let h = fx.hostel("H", 10, at(2023, 1, 1));
        let checkout = now.date_naive();
        fx.booking(h, BookingStatus::Confirmed, 100.0, month_start(2024, 5), checkout);
        fx.booking(
            h,
            BookingStatus::Confirmed,
            40.0,
            month_start(2024, 5) - Duration::seconds(1),
            checkout,
        );

        let summary = fx.summarize(now).await.unwrap();
        assert_eq!(summary.monthly_revenue, 100.0);
        assert_eq!(summary.total_revenue, 140.0);
    }

    #[tokio::test]
    async fn test_monthly_trend_buckets_by_calendar_month() {
        let now = at(2024, 1, 10);
        let mut fx = Fixture::new(None);
        let h = fx.hostel("H", 10, at(2022, 1, 1));
        let checkout = now.date_naive();
        fx.booking(h, BookingStatus::Confirmed, 70.0, at(2023, 12, 31), checkout);
        fx.booking(h, BookingStatus::Cancelled, 30.0, at(2023, 12, 2), checkout);
        fx.booking(h, BookingStatus::Completed, 20.0, at(2024, 1, 1), checkout);
        fx.booking(h, BookingStatus::Confirmed, 999.0, at(2023, 9, 30), checkout);

        let summary = fx.summarize(now).await.unwrap();
        assert_eq!(
            summary.monthly_trend,
            vec![
                TrendPoint {
                    month: "Oct".to_string(),
                    revenue: 0.0,
                    bookings: 0
                },
                TrendPoint {
                    month: "Nov".to_string(),
                    revenue: 0.0,
                    bookings: 0
                },
                TrendPoint {
                    month: "Dec".to_string(),
                    revenue: 70.0,
                    bookings: 2
                },
                TrendPoint {
                    month: "Jan".to_string(),
                    revenue: 20.0,
                    bookings: 1
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_active_bookings_and_occupancy() {
        let now = at(2024, 5, 20);
        let today = now.date_naive();
        let mut fx = Fixture::new(None);
        let a = fx.hostel("A", 2, at(2023, 1, 1));
        let b = fx.hostel("B", 1, at(2023, 2, 1));
        fx.booking(a, BookingStatus::Confirmed, 10.0, now, today);
        fx.booking(a, BookingStatus::Confirmed, 10.0, now, today - Duration::days(1));
        fx.booking(b, BookingStatus::Upcoming, 10.0, now, today + Duration::days(3));

        let summary = fx.summarize(now).await.unwrap();
        assert_eq!(summary.active_bookings, 1);
        assert_eq!(summary.occupancy_rate, 33.3);
    }

    #[tokio::test]
    async fn test_zero_capacity_gives_zero_occupancy() {
        let now = at(2024, 5, 20);
        let mut fx = Fixture::new(None);
        let h = fx.hostel("H", 0, at(2023, 1, 1));
        fx.booking(h, BookingStatus::Confirmed, 10.0, now, now.date_naive());

        let summary = fx.summarize(now).await.unwrap();
        assert_eq!(summary.active_bookings, 1);
        assert_eq!(summary.occupancy_rate, 0.0);
    }

    #[tokio::test]
    async fn test_average_rating_rounded() {
        let now = at(2024, 5, 20);
        let mut fx = Fixture::new(Some(4.26));
        fx.hostel("H", 1, at(2023, 1, 1));
        assert_eq!(fx.summarize(now).await.unwrap().average_rating, 4.3);

        let mut unrated = Fixture::new(None);
        unrated.hostel("H", 1, at(2023, 1, 1));
        assert_eq!(unrated.summarize(now).await.unwrap().average_rating, 0.0);
    }

    #[tokio::test]
    async fn test_store_failure_is_aggregation_error() {
        let mut fx = Fixture::new(None);
        fx.hostel("H", 1, at(2023, 1, 1));
        fx.store.fail = true;

        let err = fx.summarize(at(2024, 5, 20)).await.unwrap_err();
        assert!(matches!(err, AnalyticsError::Aggregation(_)));
        assert_eq!(err.to_string(), "Failed to fetch analytics");
    }

    #[tokio::test]
    async fn test_landlord_lookup_failure_is_not_reported_as_missing() {
        let mut store = MemoryStore {
            fail: true,
            ..Default::default()
        };

        let err = summarize(&mut store, Uuid::new_v4(), at(2024, 5, 20))
            .await
            .unwrap_err();
        assert!(matches!(err, AnalyticsError::Aggregation(_)));
    }

    #[tokio::test]
    async fn test_serialized_field_names() {
        let now = at(2024, 5, 20);
        let mut fx = Fixture::new(None);
        fx.hostel("H", 1, at(2023, 1, 1));

        let json = serde_json::to_value(fx.summarize(now).await.unwrap()).unwrap();
        let mut keys: Vec<&str> = json.as_object().unwrap().keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(
            keys,
            vec![
                "activeBookings",
                "averageRating",
                "monthlyRevenue",
                "monthlyTrend",
                "occupancyRate",
                "topHostel",
                "totalBookings",
                "totalHostels",
                "totalRevenue",
            ]
        );
        assert_eq!(json["monthlyTrend"].as_array().unwrap().len(), 4);
        assert_eq!(json["monthlyTrend"][3]["month"], "May");
    }
}
