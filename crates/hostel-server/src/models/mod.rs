//! Database models
//!
//! Row types map one-to-one onto the tables in `/migrations`. The `*_COLUMNS`
//! constants list the selected columns under the aliases used across the
//! feature queries (`l` landlords, `h` hostels, `b` bookings, `r` reviews).

use chrono::{DateTime, NaiveDate, Utc};
use hostel_common::{
    availability::AvailabilityView,
    types::{AvailabilitySettings, BookingStatus, HostelFeatures},
    HostelError,
};
use serde::Serialize;
use sqlx::{types::Json, FromRow};
use uuid::Uuid;

// ============================================================================
// Landlords
// ============================================================================

pub const LANDLORD_COLUMNS: &str = "l.id, l.user_id, l.business_name, l.contact_email, \
     l.contact_phone, l.rating, l.is_verified, l.created_at, l.updated_at";

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Landlord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub business_name: String,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub rating: Option<f64>,
    pub is_verified: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Public summary of a landlord shown alongside their hostels.
#[derive(Debug, Clone, Serialize)]
pub struct LandlordCard {
    pub id: Uuid,
    pub business_name: String,
    pub rating: Option<f64>,
    pub is_verified: bool,
}

impl From<Landlord> for LandlordCard {
    fn from(landlord: Landlord) -> Self {
        Self {
            id: landlord.id,
            business_name: landlord.business_name,
            rating: landlord.rating,
            is_verified: landlord.is_verified,
        }
    }
}

// ============================================================================
// Hostels
// ============================================================================

pub const HOSTEL_COLUMNS: &str = "h.id, h.landlord_id, h.name, h.description, h.location, \
     h.latitude, h.longitude, h.price, h.currency, h.capacity, h.room_type, h.images, \
     h.amenities, h.features, h.availability, h.is_verified, h.is_featured, h.created_at, \
     h.updated_at";

#[derive(Debug, Clone, FromRow)]
pub struct HostelRow {
    pub id: Uuid,
    pub landlord_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub location: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub price: f64,
    pub currency: String,
    pub capacity: i32,
    pub room_type: String,
    pub images: Json<Vec<String>>,
    pub amenities: Json<Vec<String>>,
    pub features: Json<HostelFeatures>,
    pub availability: Json<AvailabilitySettings>,
    pub is_verified: bool,
    pub is_featured: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Hostel as returned by the API, with computed availability.
#[derive(Debug, Clone, Serialize)]
pub struct HostelView {
    pub id: Uuid,
    pub landlord_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub location: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub price: f64,
    pub currency: String,
    pub capacity: i32,
    pub available_rooms: i32,
    pub room_type: String,
    pub room_type_label: String,
    pub images: Vec<String>,
    pub amenities: Vec<String>,
    pub features: HostelFeatures,
    pub availability: AvailabilitySettings,
    pub is_verified: bool,
    pub is_featured: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl HostelRow {
    pub fn into_view(self, available_rooms: i32) -> HostelView {
        let computed = AvailabilityView::new(&self.availability.0, available_rooms);

        HostelView {
            id: self.id,
            landlord_id: self.landlord_id,
            room_type_label: hostel_common::types::display_room_type(&self.room_type),
            name: self.name,
            description: self.description,
            location: self.location,
            latitude: self.latitude,
            longitude: self.longitude,
            price: self.price,
            currency: self.currency,
            capacity: self.capacity,
            available_rooms: computed.available_rooms,
            room_type: self.room_type,
            images: self.images.0,
            amenities: self.amenities.0,
            features: self.features.0,
            availability: computed.availability,
            is_verified: self.is_verified,
            is_featured: self.is_featured,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

// ============================================================================
// Bookings
// ============================================================================

pub const BOOKING_COLUMNS: &str = "b.id, b.hostel_id, b.guest_id, b.guests, b.status, \
     b.check_in, b.check_out, b.total_price, b.created_at, b.updated_at";

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Booking {
    pub id: Uuid,
    pub hostel_id: Uuid,
    pub guest_id: Uuid,
    pub guests: i32,
    pub status: String,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub total_price: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    pub fn status(&self) -> Result<BookingStatus, HostelError> {
        self.status.parse()
    }
}

/// Booking joined with the name of its hostel.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct BookingWithHostel {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub booking: Booking,
    pub hostel_name: String,
}

// ============================================================================
// Reviews
// ============================================================================

pub const REVIEW_COLUMNS: &str = "r.id, r.hostel_id, r.author_id, r.rating, r.comment, r.created_at";

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Review {
    pub id: Uuid,
    pub hostel_id: Uuid,
    pub author_id: Uuid,
    pub rating: i16,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}
