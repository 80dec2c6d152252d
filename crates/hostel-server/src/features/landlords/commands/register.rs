//! Register landlord profile command
//!
//! Creates the landlord profile for the calling user. A user owns at most
//! one profile.

use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    features::shared::{
        error_helpers::map_unique_violation,
        validation::{is_valid_email, validate_name, NameValidationError},
    },
    models::Landlord,
};

pub const MAX_BUSINESS_NAME_LENGTH: usize = 150;
pub const MAX_PHONE_LENGTH: usize = 30;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterLandlordCommand {
    /// Set from the caller identity, never from the body
    #[serde(skip)]
    pub user_id: Uuid,
    pub business_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_phone: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum RegisterLandlordError {
    #[error("{0}")]
    BusinessName(#[from] NameValidationError),
    #[error("Contact email '{0}' is invalid")]
    EmailInvalid(String),
    #[error("Contact phone must be 7 to 30 digits, optionally starting with '+'")]
    PhoneInvalid,
    #[error("A landlord profile already exists for this user")]
    AlreadyRegistered,
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<Landlord, RegisterLandlordError>> for RegisterLandlordCommand {}

impl crate::cqrs::middleware::Command for RegisterLandlordCommand {}

fn is_valid_phone(phone: &str) -> bool {
    let digits = phone.strip_prefix('+').unwrap_or(phone);
    phone.len() <= MAX_PHONE_LENGTH
        && digits.len() >= 7
        && digits.chars().all(|c| c.is_ascii_digit())
}

impl RegisterLandlordCommand {
    pub fn validate(&self) -> Result<(), RegisterLandlordError> {
        validate_name(&self.business_name, "Business name", MAX_BUSINESS_NAME_LENGTH)?;

        if let Some(email) = &self.contact_email {
            if !is_valid_email(email) {
                return Err(RegisterLandlordError::EmailInvalid(email.clone()));
            }
        }

        if let Some(phone) = &self.contact_phone {
            if !is_valid_phone(phone) {
                return Err(RegisterLandlordError::PhoneInvalid);
            }
        }

        Ok(())
    }
}

#[tracing::instrument(skip(pool))]
pub async fn handle(
    pool: PgPool,
    command: RegisterLandlordCommand,
) -> Result<Landlord, RegisterLandlordError> {
    command.validate()?;

    let landlord = sqlx::query_as::<_, Landlord>(
        r#"
        INSERT INTO landlords (user_id, business_name, contact_email, contact_phone)
        VALUES ($1, $2, $3, $4)
        RETURNING id, user_id, business_name, contact_email, contact_phone, rating,
                  is_verified, created_at, updated_at
        "#,
    )
    .bind(command.user_id)
    .bind(command.business_name.trim())
    .bind(&command.contact_email)
    .bind(&command.contact_phone)
    .fetch_one(&pool)
    .await
    .map_err(|e| {
        map_unique_violation(
            e,
            RegisterLandlordError::AlreadyRegistered,
            RegisterLandlordError::Database,
        )
    })?;

    tracing::info!(landlord_id = %landlord.id, "Landlord profile registered");

    Ok(landlord)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn command() -> RegisterLandlordCommand {
        RegisterLandlordCommand {
            user_id: Uuid::new_v4(),
            business_name: "Green Court Ltd".to_string(),
            contact_email: Some("owner@greencourt.co.ke".to_string()),
            contact_phone: Some("+254712345678".to_string()),
        }
    }

    #[test]
    fn test_validate_success() {
        assert!(command().validate().is_ok());
    }

    #[test]
    fn test_validate_business_name() {
        let mut cmd = command();
        cmd.business_name = "  ".to_string();
        assert!(matches!(
            cmd.validate(),
            Err(RegisterLandlordError::BusinessName(NameValidationError::Required { .. }))
        ));

        cmd.business_name = "x".repeat(MAX_BUSINESS_NAME_LENGTH + 1);
        assert!(matches!(
            cmd.validate(),
            Err(RegisterLandlordError::BusinessName(NameValidationError::TooLong { .. }))
        ));
    }

    #[test]
    fn test_validate_contacts() {
        let mut cmd = command();
        cmd.contact_email = Some("not-an-email".to_string());
        assert!(matches!(cmd.validate(), Err(RegisterLandlordError::EmailInvalid(_))));

        let mut cmd = command();
        cmd.contact_phone = Some("07-12".to_string());
        assert!(matches!(cmd.validate(), Err(RegisterLandlordError::PhoneInvalid)));

        let mut cmd = command();
        cmd.contact_email = None;
        cmd.contact_phone = Some("0712345678".to_string());
        assert!(cmd.validate().is_ok());
    }

    #[test]
    fn test_user_id_is_not_read_from_body() {
        let cmd: RegisterLandlordCommand = serde_json::from_value(serde_json::json!({
            "user_id": "5f0c1c52-8a1f-4d0e-9d36-1c4f5c3b2a10",
            "business_name": "Green Court Ltd"
        }))
        .unwrap();
        assert_eq!(cmd.user_id, Uuid::nil());
    }

    #[sqlx::test(migrations = "../../migrations")]
    #[ignore]
    async fn test_second_registration_conflicts(pool: PgPool) -> sqlx::Result<()> {
        let cmd = command();
        handle(pool.clone(), cmd.clone()).await.unwrap();

        let err = handle(pool, cmd).await.unwrap_err();
        assert!(matches!(err, RegisterLandlordError::AlreadyRegistered));
        Ok(())
    }
}
