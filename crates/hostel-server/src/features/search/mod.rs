//! Search feature
//!
//! Free-text hostel search and autocomplete suggestions.

pub mod queries;
pub mod routes;

pub use queries::{HostelSearchQuery, SearchSuggestionsQuery};
pub use routes::search_routes;
