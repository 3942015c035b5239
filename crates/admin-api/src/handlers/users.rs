// ============================================================================
// Admin API - User Handlers
// File: crates/admin-api/src/handlers/users.rs
// ============================================================================

use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use admin_core::domain::{NewUser, Permission, ProfileUpdate};
use admin_shared::Page;

use crate::dto::{UserDto, UserListQuery};
use crate::error::ApiError;
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::middleware::CurrentUser;
use crate::response::ApiResponse;
use crate::state::AppState;

type ApiResult<T> = Result<Json<ApiResponse<T>>, ApiError>;

/// GET /api/v1/users
pub async fn list(
    State(state): State<AppState>,
    user: CurrentUser,
    ApiQuery(query): ApiQuery<UserListQuery>,
) -> ApiResult<Page<UserDto>> {
    user.require(Permission::VerUsuarios)?;
    let (filter, pagination) = query.into_parts();
    let page = state.users.list(&filter, &pagination).await?;
    Ok(Json(ApiResponse::success(page.map(UserDto::from))))
}

/// GET /api/v1/users/{id}
pub async fn get(State(state): State<AppState>, user: CurrentUser, ApiPath(id): ApiPath<Uuid>) -> ApiResult<UserDto> {
    user.require(Permission::VerUsuarios)?;
    let profile = state.users.get(&id).await?;
    Ok(Json(ApiResponse::success(profile.into())))
}

/// POST /api/v1/users
pub async fn create(
    State(state): State<AppState>,
    user: CurrentUser,
    ApiJson(payload): ApiJson<NewUser>,
) -> Result<(StatusCode, Json<ApiResponse<UserDto>>), ApiError> {
    user.require(Permission::CrearUsuarios)?;
    let profile = state.users.create(&user.actor(), payload).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(profile.into()))))
}

/// PATCH /api/v1/users/{id}
pub async fn update(
    State(state): State<AppState>,
    user: CurrentUser,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(changes): ApiJson<ProfileUpdate>,
) -> ApiResult<UserDto> {
    user.require(Permission::EditarUsuarios)?;
    let profile = state.users.update(&user.actor(), &id, changes).await?;
    Ok(Json(ApiResponse::success(profile.into())))
}

/// POST /api/v1/users/{id}/toggle-status
pub async fn toggle_status(
    State(state): State<AppState>,
    user: CurrentUser,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<UserDto> {
    user.require(Permission::EditarUsuarios)?;
    let profile = state.users.toggle_active(&user.actor(), &id).await?;
    Ok(Json(ApiResponse::success(profile.into())))
}

/// DELETE /api/v1/users/{id}
pub async fn delete(State(state): State<AppState>, user: CurrentUser, ApiPath(id): ApiPath<Uuid>) -> ApiResult<Value> {
    user.require(Permission::EliminarUsuarios)?;
    state.users.delete(&user.actor(), &id).await?;
    Ok(Json(ApiResponse::success(json!({ "id": id, "deleted": true }))))
}
