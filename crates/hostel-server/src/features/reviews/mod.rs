//! Reviews feature
//!
//! Students rate hostels 1-5; each new review refreshes the owning
//! landlord's aggregate rating.

pub mod commands;
pub mod queries;
pub mod routes;

pub use commands::CreateReviewCommand;
pub use queries::ListHostelReviewsQuery;
pub use routes::reviews_routes;
