//! Landlord analytics
//!
//! Revenue, occupancy, the four-month trend and the top hostel for a
//! landlord's dashboard. The arithmetic lives in [`aggregator`] behind the
//! [`aggregator::AnalyticsStore`] trait; [`store`] backs it with PostgreSQL.

pub mod aggregator;
pub mod queries;
pub mod routes;
pub mod store;

pub use aggregator::{AnalyticsError, LandlordAnalytics, TopHostel, TrendPoint};
pub use queries::LandlordAnalyticsQuery;
pub use routes::analytics_routes;
