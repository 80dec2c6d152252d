pub mod landlord_summary;

pub use landlord_summary::LandlordAnalyticsQuery;
