pub mod list;

pub use list::{ListHostelReviewsError, ListHostelReviewsQuery, ReviewPage};
