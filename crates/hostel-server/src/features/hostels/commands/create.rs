//! Create hostel command

use chrono::Utc;
use hostel_common::{
    availability::available_rooms,
    types::{AvailabilitySettings, HostelFeatures},
};
use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::{types::Json, PgPool};
use uuid::Uuid;

use super::HostelFieldError;
use crate::{db, models::{HostelRow, HostelView}};

pub const DEFAULT_CURRENCY: &str = "KES";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateHostelCommand {
    #[serde(skip)]
    pub user_id: Uuid,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub location: String,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    pub price: f64,
    #[serde(default)]
    pub currency: Option<String>,
    pub capacity: i32,
    pub room_type: String,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub amenities: Vec<String>,
    #[serde(default)]
    pub features: HostelFeatures,
    #[serde(default)]
    pub availability: AvailabilitySettings,
}

#[derive(Debug, thiserror::Error)]
pub enum CreateHostelError {
    #[error(transparent)]
    Invalid(#[from] HostelFieldError),
    #[error("Landlord profile not found")]
    LandlordNotFound,
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<HostelView, CreateHostelError>> for CreateHostelCommand {}

impl crate::cqrs::middleware::Command for CreateHostelCommand {}

impl CreateHostelCommand {
    pub fn validate(&self) -> Result<(), CreateHostelError> {
        super::validate_name_field(&self.name)?;
        super::validate_location(&self.location)?;
        super::validate_coordinates(self.latitude, self.longitude)?;
        super::validate_price(self.price)?;
        if let Some(currency) = &self.currency {
            super::validate_currency(currency)?;
        }
        super::validate_capacity(self.capacity)?;
        super::validate_room_type(&self.room_type)?;
        super::validate_images(&self.images)?;
        super::validate_attributes(&self.features, &self.availability)?;
        Ok(())
    }
}

#[tracing::instrument(skip(pool, command), fields(name = %command.name))]
pub async fn handle(
    pool: PgPool,
    command: CreateHostelCommand,
) -> Result<HostelView, CreateHostelError> {
    command.validate()?;

    let landlord = db::landlord_for_user(&pool, command.user_id)
        .await?
        .ok_or(CreateHostelError::LandlordNotFound)?;

    let row = sqlx::query_as::<_, HostelRow>(
        r#"
        INSERT INTO hostels (
            landlord_id, name, description, location, latitude, longitude, price, currency,
            capacity, room_type, images, amenities, features, availability
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
        RETURNING *
        "#,
    )
    .bind(landlord.id)
    .bind(command.name.trim())
    .bind(&command.description)
    .bind(command.location.trim())
    .bind(command.latitude)
    .bind(command.longitude)
    .bind(command.price)
    .bind(command.currency.as_deref().unwrap_or(DEFAULT_CURRENCY))
    .bind(command.capacity)
    .bind(super::normalize_room_type(&command.room_type))
    .bind(Json(&command.images))
    .bind(Json(&command.amenities))
    .bind(Json(&command.features))
    .bind(Json(&command.availability))
    .fetch_one(&pool)
    .await?;

    tracing::info!(hostel_id = %row.id, landlord_id = %landlord.id, "Hostel created");

    let rooms = available_rooms(row.capacity, &[], Utc::now().date_naive());
    Ok(row.into_view(rooms))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::shared::test_helpers::TestLandlord;

    pub(crate) fn command() -> CreateHostelCommand {
        CreateHostelCommand {
            user_id: Uuid::new_v4(),
            name: "Green Court".to_string(),
            description: Some("Five minutes from the main gate".to_string()),
            location: "Juja".to_string(),
            latitude: Some(-1.1),
            longitude: Some(37.01),
            price: 4500.0,
            currency: None,
            capacity: 12,
            room_type: "Shared Room".to_string(),
            images: vec!["https://cdn.example.com/hostel-images/a.jpg".to_string()],
            amenities: vec!["wifi".to_string()],
            features: HostelFeatures::default(),
            availability: AvailabilitySettings::default(),
        }
    }

    #[test]
    fn test_validate_success() {
        assert!(command().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_fields() {
        let mut cmd = command();
        cmd.name = " ".to_string();
        assert!(matches!(
            cmd.validate(),
            Err(CreateHostelError::Invalid(HostelFieldError::Name(_)))
        ));

        let mut cmd = command();
        cmd.price = -1.0;
        assert!(matches!(
            cmd.validate(),
            Err(CreateHostelError::Invalid(HostelFieldError::Price))
        ));

        let mut cmd = command();
        cmd.capacity = -3;
        assert!(matches!(
            cmd.validate(),
            Err(CreateHostelError::Invalid(HostelFieldError::Capacity))
        ));

        let mut cmd = command();
        cmd.currency = Some("shilling".to_string());
        assert!(matches!(
            cmd.validate(),
            Err(CreateHostelError::Invalid(HostelFieldError::Currency(_)))
        ));

        let mut cmd = command();
        cmd.images = vec!["file:///etc/passwd".to_string()];
        assert!(matches!(
            cmd.validate(),
            Err(CreateHostelError::Invalid(HostelFieldError::Image(_)))
        ));

        let mut cmd = command();
        cmd.availability.deposit = Some(-10.0);
        assert!(matches!(
            cmd.validate(),
            Err(CreateHostelError::Invalid(HostelFieldError::Attributes(_)))
        ));
    }

    #[test]
    fn test_body_defaults() {
        let cmd: CreateHostelCommand = serde_json::from_value(serde_json::json!({
            "name": "Green Court",
            "location": "Juja",
            "price": 4500,
            "capacity": 4,
            "room_type": "single"
        }))
        .unwrap();
        assert!(cmd.images.is_empty());
        assert_eq!(cmd.features.schema_version, hostel_common::types::ATTRIBUTE_SCHEMA_VERSION);
        assert!(cmd.validate().is_ok());
    }

    #[sqlx::test(migrations = "../../migrations")]
    #[ignore]
    async fn test_create_requires_profile(pool: PgPool) -> sqlx::Result<()> {
        let err = handle(pool.clone(), command()).await.unwrap_err();
        assert!(matches!(err, CreateHostelError::LandlordNotFound));

        let landlord = TestLandlord::new("Green Court Ltd").insert(&pool).await?;
        let mut cmd = command();
        cmd.user_id = landlord.user_id;
        let hostel = handle(pool, cmd).await.unwrap();
        assert_eq!(hostel.currency, "KES");
        assert_eq!(hostel.room_type, "shared_room");
        assert_eq!(hostel.available_rooms, 12);
        Ok(())
    }
}
