//! Delete hostel command
//!
//! Bookings and reviews of the hostel go with it (`ON DELETE CASCADE`).

use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::db;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteHostelCommand {
    pub hostel_id: Uuid,
    pub user_id: Uuid,
    pub is_admin: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteHostelResponse {
    pub id: Uuid,
}

#[derive(Debug, thiserror::Error)]
pub enum DeleteHostelError {
    #[error("Hostel '{0}' not found")]
    NotFound(Uuid),
    #[error("Only the owning landlord can delete this hostel")]
    Forbidden,
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<DeleteHostelResponse, DeleteHostelError>> for DeleteHostelCommand {}

impl crate::cqrs::middleware::Command for DeleteHostelCommand {}

#[tracing::instrument(skip(pool))]
pub async fn handle(
    pool: PgPool,
    command: DeleteHostelCommand,
) -> Result<DeleteHostelResponse, DeleteHostelError> {
    let mut tx = pool.begin().await?;

    let owner = db::hostel_owner(&mut *tx, command.hostel_id)
        .await?
        .ok_or(DeleteHostelError::NotFound(command.hostel_id))?;
    if owner != command.user_id && !command.is_admin {
        return Err(DeleteHostelError::Forbidden);
    }

    let result = sqlx::query("DELETE FROM hostels WHERE id = $1")
        .bind(command.hostel_id)
        .execute(&mut *tx)
        .await?;
    if result.rows_affected() == 0 {
        return Err(DeleteHostelError::NotFound(command.hostel_id));
    }

    tx.commit().await?;

    tracing::info!(hostel_id = %command.hostel_id, "Hostel deleted");

    Ok(DeleteHostelResponse {
        id: command.hostel_id,
    })
}
