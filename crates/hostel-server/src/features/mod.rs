//! Feature slices of the hostel marketplace API
//!
//! Each slice is organized as a vertical slice:
//! - `commands/` - Write operations
//! - `queries/` - Read operations
//! - `routes.rs` - HTTP route definitions
//!
//! Commands and queries implement `mediator::Request` and expose a
//! standalone `handle` function that the routes call directly.

pub mod analytics;
pub mod bookings;
pub mod hostels;
pub mod landlords;
pub mod reviews;
pub mod search;
pub mod shared;
pub mod uploads;

use axum::Router;

use crate::storage::Storage;

/// Shared state handed to the feature routers
#[derive(Clone)]
pub struct FeatureState {
    pub db: sqlx::PgPool,
    pub storage: Storage,
    /// Request body limit for image uploads
    pub upload_max_bytes: usize,
}

/// All feature routes, each under its own prefix.
pub fn router(state: FeatureState) -> Router<()> {
    Router::new()
        .nest("/landlords", landlords::landlords_routes().with_state(state.db.clone()))
        .nest("/hostels", hostels::hostels_routes().with_state(state.db.clone()))
        .nest("/search", search::search_routes().with_state(state.db.clone()))
        .nest("/bookings", bookings::bookings_routes().with_state(state.db.clone()))
        .nest("/reviews", reviews::reviews_routes().with_state(state.db.clone()))
        .nest("/analytics", analytics::analytics_routes().with_state(state.db.clone()))
        .nest(
            "/uploads",
            uploads::uploads_routes(state.upload_max_bytes).with_state(state.storage),
        )
}
