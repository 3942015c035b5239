// ============================================================================
// Admin API - Report Handlers
// File: crates/admin-api/src/handlers/reportes.rs
// ============================================================================

use axum::{
    extract::State,
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use admin_core::domain::{Permission, Report, ReportStats};
use admin_shared::Page;

use crate::dto::{AssignRequest, ReportListQuery, StatusRequest};
use crate::error::ApiError;
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::middleware::CurrentUser;
use crate::response::ApiResponse;
use crate::state::AppState;

type ApiResult<T> = Result<Json<ApiResponse<T>>, ApiError>;

/// GET /api/v1/reportes
pub async fn list(
    State(state): State<AppState>,
    user: CurrentUser,
    ApiQuery(query): ApiQuery<ReportListQuery>,
) -> ApiResult<Page<Report>> {
    user.require(Permission::VerReportes)?;
    let (filter, pagination) = query.into_parts()?;
    let page = state.reports.list(&filter, &pagination).await?;
    Ok(Json(ApiResponse::success(page)))
}

/// GET /api/v1/reportes/map
///
/// Plain GeoJSON (no envelope) so map libraries can load the URL directly.
pub async fn map(
    State(state): State<AppState>,
    user: CurrentUser,
    ApiQuery(query): ApiQuery<ReportListQuery>,
) -> Result<Json<Value>, ApiError> {
    user.require(Permission::VerMapa)?;
    let (filter, _) = query.into_parts()?;
    Ok(Json(state.reports.map_features(&filter).await?))
}

/// GET /api/v1/reportes/stats
pub async fn stats(State(state): State<AppState>, user: CurrentUser) -> ApiResult<ReportStats> {
    user.require(Permission::VerDashboard)?;
    Ok(Json(ApiResponse::success(state.reports.stats().await?)))
}

/// GET /api/v1/reportes/{id}
pub async fn get(State(state): State<AppState>, user: CurrentUser, ApiPath(id): ApiPath<Uuid>) -> ApiResult<Report> {
    user.require(Permission::VerReportes)?;
    Ok(Json(ApiResponse::success(state.reports.get(&id).await?)))
}

/// PATCH /api/v1/reportes/{id}/status
pub async fn change_status(
    State(state): State<AppState>,
    user: CurrentUser,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<StatusRequest>,
) -> ApiResult<Report> {
    user.require(Permission::CambiarEstadoReportes)?;
    let report = state.reports.change_status(&user.actor(), &id, payload.estado).await?;
    Ok(Json(ApiResponse::success(report)))
}

/// PATCH /api/v1/reportes/{id}/assign
pub async fn assign(
    State(state): State<AppState>,
    user: CurrentUser,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<AssignRequest>,
) -> ApiResult<Report> {
    user.require(Permission::AsignarReportes)?;
    let report = state.reports.assign(&user.actor(), &id, payload.asignado_a).await?;
    Ok(Json(ApiResponse::success(report)))
}

/// DELETE /api/v1/reportes/{id}
pub async fn delete(State(state): State<AppState>, user: CurrentUser, ApiPath(id): ApiPath<Uuid>) -> ApiResult<Value> {
    user.require(Permission::EliminarReportes)?;
    state.reports.delete(&user.actor(), &id).await?;
    Ok(Json(ApiResponse::success(json!({ "id": id, "deleted": true }))))
}
