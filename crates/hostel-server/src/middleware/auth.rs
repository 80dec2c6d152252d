//! Caller identity forwarded by the upstream gateway
//!
//! The gateway validates tokens and forwards the caller as `x-user-id`
//! (UUID) and `x-user-role` (`student`, `landlord` or `admin`). A missing
//! role header means `student`.

use axum::{extract::FromRequestParts, http::request::Parts};
use hostel_common::types::UserRole;
use uuid::Uuid;

use crate::error::AppError;

pub const USER_ID_HEADER: &str = "x-user-id";
pub const USER_ROLE_HEADER: &str = "x-user-role";

/// Authenticated caller. Extracting it rejects anonymous requests with 401.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub role: UserRole,
}

impl AuthUser {
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    /// Reject with 403 unless the caller has `role`. Admins pass every check.
    pub fn require_role(&self, role: UserRole) -> Result<(), AppError> {
        if self.role == role || self.is_admin() {
            Ok(())
        } else {
            Err(AppError::Forbidden(format!(
                "This action requires the {} role",
                role
            )))
        }
    }

    fn from_parts(parts: &Parts) -> Result<Self, AppError> {
        let user_id = parts
            .headers
            .get(USER_ID_HEADER)
            .ok_or_else(|| AppError::Unauthorized("Missing caller identity".to_string()))?
            .to_str()
            .ok()
            .and_then(|s| Uuid::parse_str(s.trim()).ok())
            .ok_or_else(|| AppError::Unauthorized("Invalid caller identity".to_string()))?;

        let role = match parts.headers.get(USER_ROLE_HEADER) {
            None => UserRole::default(),
            Some(value) => value
                .to_str()
                .ok()
                .and_then(|s| s.parse().ok())
                .ok_or_else(|| AppError::Unauthorized("Invalid caller role".to_string()))?,
        };

        Ok(Self { user_id, role })
    }
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Self::from_parts(parts)
    }
}
