//! Update hostel command
//!
//! Partial update: only fields present in the body are written. The caller
//! must own the hostel unless they are an admin.

use chrono::Utc;
use hostel_common::types::{AvailabilitySettings, HostelFeatures};
use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::{types::Json, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use super::HostelFieldError;
use crate::{
    db,
    models::{HostelRow, HostelView},
};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateHostelCommand {
    #[serde(skip)]
    pub hostel_id: Uuid,
    #[serde(skip)]
    pub user_id: Uuid,
    #[serde(skip)]
    pub is_admin: bool,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub capacity: Option<i32>,
    #[serde(default)]
    pub room_type: Option<String>,
    #[serde(default)]
    pub images: Option<Vec<String>>,
    #[serde(default)]
    pub amenities: Option<Vec<String>>,
    #[serde(default)]
    pub features: Option<HostelFeatures>,
    #[serde(default)]
    pub availability: Option<AvailabilitySettings>,
}

#[derive(Debug, thiserror::Error)]
pub enum UpdateHostelError {
    #[error(transparent)]
    Invalid(#[from] HostelFieldError),
    #[error("No fields to update")]
    NoFieldsToUpdate,
    #[error("Hostel '{0}' not found")]
    NotFound(Uuid),
    #[error("Only the owning landlord can modify this hostel")]
    Forbidden,
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<HostelView, UpdateHostelError>> for UpdateHostelCommand {}

impl crate::cqrs::middleware::Command for UpdateHostelCommand {}

impl UpdateHostelCommand {
    fn has_changes(&self) -> bool {
        self.name.is_some()
            || self.description.is_some()
            || self.location.is_some()
            || self.latitude.is_some()
            || self.longitude.is_some()
            || self.price.is_some()
            || self.currency.is_some()
            || self.capacity.is_some()
            || self.room_type.is_some()
            || self.images.is_some()
            || self.amenities.is_some()
            || self.features.is_some()
            || self.availability.is_some()
    }

    pub fn validate(&self) -> Result<(), UpdateHostelError> {
        if !self.has_changes() {
            return Err(UpdateHostelError::NoFieldsToUpdate);
        }
        if let Some(name) = &self.name {
            super::validate_name_field(name)?;
        }
        if let Some(location) = &self.location {
            super::validate_location(location)?;
        }
        super::validate_coordinates(self.latitude, self.longitude)?;
        if let Some(price) = self.price {
            super::validate_price(price)?;
        }
        if let Some(currency) = &self.currency {
            super::validate_currency(currency)?;
        }
        if let Some(capacity) = self.capacity {
            super::validate_capacity(capacity)?;
        }
        if let Some(room_type) = &self.room_type {
            super::validate_room_type(room_type)?;
        }
        if let Some(images) = &self.images {
            super::validate_images(images)?;
        }
        if let Some(features) = &self.features {
            features.validate().map_err(HostelFieldError::from)?;
        }
        if let Some(availability) = &self.availability {
            availability.validate().map_err(HostelFieldError::from)?;
        }
        Ok(())
    }

    fn update_query(&self) -> QueryBuilder<'_, Postgres> {
        let mut qb = QueryBuilder::new("UPDATE hostels SET ");
        let mut set = qb.separated(", ");

        if let Some(name) = &self.name {
            set.push("name = ").push_bind_unseparated(name.trim());
        }
        if let Some(description) = &self.description {
            set.push("description = ").push_bind_unseparated(description);
        }
        if let Some(location) = &self.location {
            set.push("location = ").push_bind_unseparated(location.trim());
        }
        if let Some(latitude) = self.latitude {
            set.push("latitude = ").push_bind_unseparated(latitude);
        }
        if let Some(longitude) = self.longitude {
            set.push("longitude = ").push_bind_unseparated(longitude);
        }
        if let Some(price) = self.price {
            set.push("price = ").push_bind_unseparated(price);
        }
        if let Some(currency) = &self.currency {
            set.push("currency = ").push_bind_unseparated(currency);
        }
        if let Some(capacity) = self.capacity {
            set.push("capacity = ").push_bind_unseparated(capacity);
        }
        if let Some(room_type) = &self.room_type {
            set.push("room_type = ")
                .push_bind_unseparated(super::normalize_room_type(room_type));
        }
        if let Some(images) = &self.images {
            set.push("images = ").push_bind_unseparated(Json(images));
        }
        if let Some(amenities) = &self.amenities {
            set.push("amenities = ").push_bind_unseparated(Json(amenities));
        }
        if let Some(features) = &self.features {
            set.push("features = ").push_bind_unseparated(Json(features));
        }
        if let Some(availability) = &self.availability {
            set.push("availability = ").push_bind_unseparated(Json(availability));
        }
        set.push("updated_at = NOW()");

        qb.push(" WHERE id = ").push_bind(self.hostel_id);
        qb.push(" RETURNING *");
        qb
    }
}

#[tracing::instrument(skip(pool, command), fields(hostel_id = %command.hostel_id))]
pub async fn handle(
    pool: PgPool,
    command: UpdateHostelCommand,
) -> Result<HostelView, UpdateHostelError> {
    command.validate()?;

    let owner = db::hostel_owner(&pool, command.hostel_id)
        .await?
        .ok_or(UpdateHostelError::NotFound(command.hostel_id))?;
    if owner != command.user_id && !command.is_admin {
        return Err(UpdateHostelError::Forbidden);
    }

    let mut qb = command.update_query();
    let row = qb
        .build_query_as::<HostelRow>()
        .fetch_optional(&pool)
        .await?
        .ok_or(UpdateHostelError::NotFound(command.hostel_id))?;

    tracing::info!(hostel_id = %row.id, "Hostel updated");

    let hostel = db::hostel_views(&pool, vec![row], Utc::now().date_naive())
        .await?
        .pop()
        .ok_or(UpdateHostelError::NotFound(command.hostel_id))?;
    Ok(hostel)
}
