//! Hostel API routes
//!
//! - `GET /api/v1/hostels` - List hostels with filters, sort and pagination
//! - `GET /api/v1/hostels/mine` - The calling landlord's hostels
//! - `GET /api/v1/hostels/:id` - Hostel detail
//! - `POST /api/v1/hostels` - Create a hostel (landlord)
//! - `PUT /api/v1/hostels/:id` - Partial update (owning landlord)
//! - `DELETE /api/v1/hostels/:id` - Delete (owning landlord)
//! - `PATCH /api/v1/hostels/:id/flags` - Set verified/featured (admin)

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, patch},
    Json, Router,
};
use hostel_common::types::UserRole;
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

use super::{
    commands::{
        CreateHostelCommand, CreateHostelError, DeleteHostelCommand, DeleteHostelError,
        SetHostelFlagsCommand, SetHostelFlagsError, UpdateHostelCommand, UpdateHostelError,
    },
    queries::{
        GetHostelError, GetHostelQuery, ListHostelsError, ListHostelsQuery, ListMyHostelsError,
        ListMyHostelsQuery,
    },
};
use crate::{
    api::response::ApiResponse, error::AppError, features::shared::error_helpers,
    middleware::AuthUser,
};

pub fn hostels_routes() -> Router<PgPool> {
    Router::new()
        .route("/", get(list_hostels).post(create_hostel))
        .route("/mine", get(my_hostels))
        .route(
            "/:id",
            get(get_hostel).put(update_hostel).delete(delete_hostel),
        )
        .route("/:id/flags", patch(set_flags))
}

#[tracing::instrument(skip(pool))]
async fn list_hostels(
    State(pool): State<PgPool>,
    Query(query): Query<ListHostelsQuery>,
) -> Result<Response, HostelApiError> {
    let page = super::queries::list::handle(pool, query).await?;

    Ok(
        ApiResponse::success_with_meta(page.items, json!({ "pagination": page.pagination }))
            .into_response(),
    )
}

#[derive(Debug, serde::Deserialize)]
struct PageQuery {
    page: Option<i64>,
    per_page: Option<i64>,
}

#[tracing::instrument(skip(pool), fields(user_id = %user.user_id))]
async fn my_hostels(
    State(pool): State<PgPool>,
    user: AuthUser,
    Query(paging): Query<PageQuery>,
) -> Result<Response, HostelApiError> {
    user.require_role(UserRole::Landlord)?;

    let page = super::queries::mine::handle(
        pool,
        ListMyHostelsQuery {
            user_id: user.user_id,
            page: paging.page,
            per_page: paging.per_page,
        },
    )
    .await?;

    Ok(
        ApiResponse::success_with_meta(page.items, json!({ "pagination": page.pagination }))
            .into_response(),
    )
}

#[tracing::instrument(skip(pool))]
async fn get_hostel(
    State(pool): State<PgPool>,
    Path(id): Path<Uuid>,
) -> Result<Response, HostelApiError> {
    let hostel = super::queries::get::handle(pool, GetHostelQuery { id }).await?;

    Ok(ApiResponse::success(hostel).into_response())
}

/// # Response
///
/// - `201 Created` - Hostel created
/// - `400 Bad Request` - Validation error
/// - `403 Forbidden` - Caller is not a landlord
/// - `404 Not Found` - Caller has no landlord profile
#[tracing::instrument(skip(pool, command), fields(user_id = %user.user_id))]
async fn create_hostel(
    State(pool): State<PgPool>,
    user: AuthUser,
    Json(mut command): Json<CreateHostelCommand>,
) -> Result<Response, HostelApiError> {
    user.require_role(UserRole::Landlord)?;
    command.user_id = user.user_id;

    let hostel = super::commands::create::handle(pool, command).await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::success(hostel))).into_response())
}

#[tracing::instrument(skip(pool, command), fields(user_id = %user.user_id))]
async fn update_hostel(
    State(pool): State<PgPool>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(mut command): Json<UpdateHostelCommand>,
) -> Result<Response, HostelApiError> {
    user.require_role(UserRole::Landlord)?;
    command.hostel_id = id;
    command.user_id = user.user_id;
    command.is_admin = user.is_admin();

    let hostel = super::commands::update::handle(pool, command).await?;

    Ok(ApiResponse::success(hostel).into_response())
}

#[tracing::instrument(skip(pool), fields(user_id = %user.user_id))]
async fn delete_hostel(
    State(pool): State<PgPool>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Response, HostelApiError> {
    user.require_role(UserRole::Landlord)?;

    let deleted = super::commands::delete::handle(
        pool,
        DeleteHostelCommand {
            hostel_id: id,
            user_id: user.user_id,
            is_admin: user.is_admin(),
        },
    )
    .await?;

    Ok(ApiResponse::success(deleted).into_response())
}

#[tracing::instrument(skip(pool, command), fields(user_id = %user.user_id))]
async fn set_flags(
    State(pool): State<PgPool>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(mut command): Json<SetHostelFlagsCommand>,
) -> Result<Response, HostelApiError> {
    user.require_role(UserRole::Admin)?;
    command.hostel_id = id;

    let hostel = super::commands::set_flags::handle(pool, command).await?;

    Ok(ApiResponse::success(hostel).into_response())
}

#[derive(Debug)]
enum HostelApiError {
    Auth(AppError),
    List(ListHostelsError),
    Mine(ListMyHostelsError),
    Get(GetHostelError),
    Create(CreateHostelError),
    Update(UpdateHostelError),
    Delete(DeleteHostelError),
    Flags(SetHostelFlagsError),
}

impl From<AppError> for HostelApiError {
    fn from(err: AppError) -> Self {
        Self::Auth(err)
    }
}

impl From<ListHostelsError> for HostelApiError {
    fn from(err: ListHostelsError) -> Self {
        Self::List(err)
    }
}

impl From<ListMyHostelsError> for HostelApiError {
    fn from(err: ListMyHostelsError) -> Self {
        Self::Mine(err)
    }
}

impl From<GetHostelError> for HostelApiError {
    fn from(err: GetHostelError) -> Self {
        Self::Get(err)
    }
}

impl From<CreateHostelError> for HostelApiError {
    fn from(err: CreateHostelError) -> Self {
        Self::Create(err)
    }
}

impl From<UpdateHostelError> for HostelApiError {
    fn from(err: UpdateHostelError) -> Self {
        Self::Update(err)
    }
}

impl From<DeleteHostelError> for HostelApiError {
    fn from(err: DeleteHostelError) -> Self {
        Self::Delete(err)
    }
}

impl From<SetHostelFlagsError> for HostelApiError {
    fn from(err: SetHostelFlagsError) -> Self {
        Self::Flags(err)
    }
}

impl IntoResponse for HostelApiError {
    fn into_response(self) -> Response {
        match self {
            HostelApiError::Auth(err) => err.into_response(),

            HostelApiError::List(ListHostelsError::Database(e)) => {
                error_helpers::database_error("hostel listing", &e)
            },
            HostelApiError::List(err) => error_helpers::validation_error(err.to_string()),

            HostelApiError::Mine(ListMyHostelsError::Database(e)) => {
                error_helpers::database_error("landlord hostel listing", &e)
            },
            HostelApiError::Mine(err @ ListMyHostelsError::LandlordNotFound) => {
                error_helpers::not_found(err.to_string())
            },
            HostelApiError::Mine(err) => error_helpers::validation_error(err.to_string()),

            HostelApiError::Get(err @ GetHostelError::NotFound(_)) => {
                error_helpers::not_found(err.to_string())
            },
            HostelApiError::Get(GetHostelError::Database(e)) => {
                error_helpers::database_error("hostel lookup", &e)
            },

            HostelApiError::Create(CreateHostelError::Database(e)) => {
                error_helpers::database_error("hostel creation", &e)
            },
            HostelApiError::Create(err @ CreateHostelError::LandlordNotFound) => {
                error_helpers::not_found(err.to_string())
            },
            HostelApiError::Create(err) => error_helpers::validation_error(err.to_string()),

            HostelApiError::Update(UpdateHostelError::Database(e)) => {
                error_helpers::database_error("hostel update", &e)
            },
            HostelApiError::Update(err @ UpdateHostelError::NotFound(_)) => {
                error_helpers::not_found(err.to_string())
            },
            HostelApiError::Update(err @ UpdateHostelError::Forbidden) => {
                error_helpers::forbidden(err.to_string())
            },
            HostelApiError::Update(err) => error_helpers::validation_error(err.to_string()),

            HostelApiError::Delete(DeleteHostelError::Database(e)) => {
                error_helpers::database_error("hostel deletion", &e)
            },
            HostelApiError::Delete(err @ DeleteHostelError::NotFound(_)) => {
                error_helpers::not_found(err.to_string())
            },
            HostelApiError::Delete(err @ DeleteHostelError::Forbidden) => {
                error_helpers::forbidden(err.to_string())
            },

            HostelApiError::Flags(SetHostelFlagsError::Database(e)) => {
                error_helpers::database_error("hostel flag update", &e)
            },
            HostelApiError::Flags(err @ SetHostelFlagsError::NotFound(_)) => {
                error_helpers::not_found(err.to_string())
            },
            HostelApiError::Flags(err @ SetHostelFlagsError::NoFields) => {
                error_helpers::validation_error(err.to_string())
            },
        }
    }
}
