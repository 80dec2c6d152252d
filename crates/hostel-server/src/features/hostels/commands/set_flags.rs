//! Set hostel moderation flags (admin only)

use chrono::Utc;
use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::{
    db,
    models::{HostelRow, HostelView},
};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SetHostelFlagsCommand {
    #[serde(skip)]
    pub hostel_id: Uuid,
    #[serde(default)]
    pub is_verified: Option<bool>,
    #[serde(default)]
    pub is_featured: Option<bool>,
}

#[derive(Debug, thiserror::Error)]
pub enum SetHostelFlagsError {
    #[error("At least one of is_verified or is_featured is required")]
    NoFields,
    #[error("Hostel '{0}' not found")]
    NotFound(Uuid),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<HostelView, SetHostelFlagsError>> for SetHostelFlagsCommand {}

impl crate::cqrs::middleware::Command for SetHostelFlagsCommand {}

impl SetHostelFlagsCommand {
    pub fn validate(&self) -> Result<(), SetHostelFlagsError> {
        if self.is_verified.is_none() && self.is_featured.is_none() {
            return Err(SetHostelFlagsError::NoFields);
        }
        Ok(())
    }

    fn update_query(&self) -> QueryBuilder<'static, Postgres> {
        let mut qb = QueryBuilder::new("UPDATE hostels SET ");
        let mut set = qb.separated(", ");
        if let Some(verified) = self.is_verified {
            set.push("is_verified = ").push_bind_unseparated(verified);
        }
        if let Some(featured) = self.is_featured {
            set.push("is_featured = ").push_bind_unseparated(featured);
        }
        set.push("updated_at = NOW()");
        qb.push(" WHERE id = ").push_bind(self.hostel_id);
        qb.push(" RETURNING *");
        qb
    }
}

#[tracing::instrument(skip(pool))]
pub async fn handle(
    pool: PgPool,
    command: SetHostelFlagsCommand,
) -> Result<HostelView, SetHostelFlagsError> {
    command.validate()?;

    let mut qb = command.update_query();
    let row = qb
        .build_query_as::<HostelRow>()
        .fetch_optional(&pool)
        .await?
        .ok_or(SetHostelFlagsError::NotFound(command.hostel_id))?;

    tracing::info!(
        hostel_id = %row.id,
        is_verified = row.is_verified,
        is_featured = row.is_featured,
        "Hostel flags updated"
    );

    let hostel = db::hostel_views(&pool, vec![row], Utc::now().date_naive())
        .await?
        .pop()
        .ok_or(SetHostelFlagsError::NotFound(command.hostel_id))?;
    Ok(hostel)
}
