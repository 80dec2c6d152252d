//! Test fixtures for database-backed tests
//!
//! ```rust,ignore
//! #[sqlx::test(migrations = "../../migrations")]
//! async fn test_something(pool: PgPool) -> sqlx::Result<()> {
//!     let landlord = TestLandlord::new("Green Court Ltd").insert(&pool).await?;
//!     let hostel = TestHostel::new(&landlord, "Green Court").with_capacity(10).insert(&pool).await?;
//!     TestBooking::new(&hostel).with_guests(3).confirmed().insert(&pool).await?;
//!     Ok(())
//! }
//! ```

use chrono::{DateTime, Duration, NaiveDate, Utc};
use hostel_common::types::BookingStatus;
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct TestLandlord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub business_name: String,
    pub rating: Option<f64>,
}

impl TestLandlord {
    pub fn new(business_name: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            business_name: business_name.to_string(),
            rating: None,
        }
    }

    pub fn with_rating(mut self, rating: f64) -> Self {
        self.rating = Some(rating);
        self
    }

    pub async fn insert(self, pool: &PgPool) -> sqlx::Result<Self> {
        sqlx::query(
            "INSERT INTO landlords (id, user_id, business_name, rating) VALUES ($1, $2, $3, $4)",
        )
        .bind(self.id)
        .bind(self.user_id)
        .bind(&self.business_name)
        .bind(self.rating)
        .execute(pool)
        .await?;
        Ok(self)
    }
}

#[derive(Debug, Clone)]
pub struct TestHostel {
    pub id: Uuid,
    pub landlord_id: Uuid,
    pub name: String,
    pub location: String,
    pub price: f64,
    pub capacity: i32,
    pub room_type: String,
    pub created_at: DateTime<Utc>,
}

impl TestHostel {
    pub fn new(landlord: &TestLandlord, name: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            landlord_id: landlord.id,
            name: name.to_string(),
            location: "Juja".to_string(),
            price: 5000.0,
            capacity: 10,
            room_type: "single".to_string(),
            created_at: Utc::now(),
        }
    }

    pub fn with_capacity(mut self, capacity: i32) -> Self {
        self.capacity = capacity;
        self
    }

    pub fn with_price(mut self, price: f64) -> Self {
        self.price = price;
        self
    }

    pub fn with_location(mut self, location: &str) -> Self {
        self.location = location.to_string();
        self
    }

    pub fn created_at(mut self, at: DateTime<Utc>) -> Self {
        self.created_at = at;
        self
    }

    pub async fn insert(self, pool: &PgPool) -> sqlx::Result<Self> {
        sqlx::query(
            "INSERT INTO hostels (id, landlord_id, name, location, price, capacity, room_type, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
        )
        .bind(self.id)
        .bind(self.landlord_id)
        .bind(&self.name)
        .bind(&self.location)
        .bind(self.price)
        .bind(self.capacity)
        .bind(&self.room_type)
        .bind(self.created_at)
        .execute(pool)
        .await?;
        Ok(self)
    }
}

#[derive(Debug, Clone)]
pub struct TestBooking {
    pub id: Uuid,
    pub hostel_id: Uuid,
    pub guest_id: Uuid,
    pub guests: i32,
    pub status: BookingStatus,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub total_price: f64,
    pub created_at: DateTime<Utc>,
}

impl TestBooking {
    /// Pending booking for one guest, checking out tomorrow.
    pub fn new(hostel: &TestHostel) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            hostel_id: hostel.id,
            guest_id: Uuid::new_v4(),
            guests: 1,
            status: BookingStatus::Pending,
            check_in: now.date_naive(),
            check_out: now.date_naive() + Duration::days(1),
            total_price: hostel.price,
            created_at: now,
        }
    }

    pub fn with_guests(mut self, guests: i32) -> Self {
        self.guests = guests;
        self
    }

    pub fn with_status(mut self, status: BookingStatus) -> Self {
        self.status = status;
        self
    }

    pub fn confirmed(self) -> Self {
        self.with_status(BookingStatus::Confirmed)
    }

    pub fn with_guest(mut self, guest_id: Uuid) -> Self {
        self.guest_id = guest_id;
        self
    }

    pub fn with_total_price(mut self, total_price: f64) -> Self {
        self.total_price = total_price;
        self
    }

    pub fn checking_out(mut self, check_out: NaiveDate) -> Self {
        self.check_in = check_out - Duration::days(1);
        self.check_out = check_out;
        self
    }

    pub fn created_at(mut self, at: DateTime<Utc>) -> Self {
        self.created_at = at;
        self
    }

    pub async fn insert(self, pool: &PgPool) -> sqlx::Result<Self> {
        sqlx::query(
            "INSERT INTO bookings (id, hostel_id, guest_id, guests, status, check_in, check_out, total_price, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
        )
        .bind(self.id)
        .bind(self.hostel_id)
        .bind(self.guest_id)
        .bind(self.guests)
        .bind(self.status.as_str())
        .bind(self.check_in)
        .bind(self.check_out)
        .bind(self.total_price)
        .bind(self.created_at)
        .execute(pool)
        .await?;
        Ok(self)
    }
}
