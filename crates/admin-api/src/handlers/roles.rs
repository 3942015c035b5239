// ============================================================================
// Admin API - Role Handlers
// File: crates/admin-api/src/handlers/roles.rs
// ============================================================================

use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use admin_core::domain::{NewRole, Permission, RoleUpdate};
use admin_shared::Page;

use crate::dto::{RoleDto, RoleListQuery};
use crate::error::ApiError;
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::middleware::CurrentUser;
use crate::response::ApiResponse;
use crate::state::AppState;

type ApiResult<T> = Result<Json<ApiResponse<T>>, ApiError>;

/// GET /api/v1/roles
pub async fn list(
    State(state): State<AppState>,
    user: CurrentUser,
    ApiQuery(query): ApiQuery<RoleListQuery>,
) -> ApiResult<Page<RoleDto>> {
    user.require(Permission::VerRoles)?;
    let (filter, pagination) = query.into_parts();
    let page = state.roles.list(&filter, &pagination).await?;
    Ok(Json(ApiResponse::success(page.map(RoleDto::from))))
}

/// GET /api/v1/roles/{id}
pub async fn get(State(state): State<AppState>, user: CurrentUser, ApiPath(id): ApiPath<Uuid>) -> ApiResult<RoleDto> {
    user.require(Permission::VerRoles)?;
    let role = state.roles.get(&id).await?;
    Ok(Json(ApiResponse::success(role.into())))
}

/// POST /api/v1/roles
pub async fn create(
    State(state): State<AppState>,
    user: CurrentUser,
    ApiJson(payload): ApiJson<NewRole>,
) -> Result<(StatusCode, Json<ApiResponse<RoleDto>>), ApiError> {
    user.require(Permission::CrearRoles)?;
    let role = state.roles.create(&user.actor(), payload).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(role.into()))))
}

/// PATCH /api/v1/roles/{id}
pub async fn update(
    State(state): State<AppState>,
    user: CurrentUser,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(changes): ApiJson<RoleUpdate>,
) -> ApiResult<RoleDto> {
    user.require(Permission::EditarRoles)?;
    let role = state.roles.update(&user.actor(), &id, changes).await?;
    Ok(Json(ApiResponse::success(role.into())))
}

/// POST /api/v1/roles/{id}/toggle-status
pub async fn toggle_status(
    State(state): State<AppState>,
    user: CurrentUser,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<RoleDto> {
    user.require(Permission::EditarRoles)?;
    let role = state.roles.toggle_active(&user.actor(), &id).await?;
    Ok(Json(ApiResponse::success(role.into())))
}

/// DELETE /api/v1/roles/{id}
pub async fn delete(State(state): State<AppState>, user: CurrentUser, ApiPath(id): ApiPath<Uuid>) -> ApiResult<Value> {
    user.require(Permission::EliminarRoles)?;
    state.roles.delete(&user.actor(), &id).await?;
    Ok(Json(ApiResponse::success(json!({ "id": id, "deleted": true }))))
}
