pub mod hostels;
pub mod suggestions;

pub use hostels::{HostelSearchError, HostelSearchQuery};
pub use suggestions::{SearchSuggestion, SearchSuggestionsError, SearchSuggestionsQuery};
