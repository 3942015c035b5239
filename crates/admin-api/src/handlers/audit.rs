//! Activity log and change history

use axum::{
    extract::State,
    Json,
};

use admin_core::domain::{ActivityEntry, ChangeView, Permission};
use admin_shared::Page;

use crate::dto::{ActivityQuery, ChangeQuery};
use crate::error::ApiError;
use crate::extract::ApiQuery;
use crate::middleware::CurrentUser;
use crate::response::ApiResponse;
use crate::state::AppState;

/// GET /api/v1/audit/activities
pub async fn activities(
    State(state): State<AppState>,
    user: CurrentUser,
    ApiQuery(query): ApiQuery<ActivityQuery>,
) -> Result<Json<ApiResponse<Page<ActivityEntry>>>, ApiError> {
    user.require(Permission::VerActividades)?;
    let (filter, pagination) = query.into_parts();
    Ok(Json(ApiResponse::success(state.audit.activities(&filter, &pagination).await?)))
}

/// GET /api/v1/audit/changes
pub async fn changes(
    State(state): State<AppState>,
    user: CurrentUser,
    ApiQuery(query): ApiQuery<ChangeQuery>,
) -> Result<Json<ApiResponse<Page<ChangeView>>>, ApiError> {
    user.require(Permission::VerHistorialCambios)?;
    let (filter, pagination) = query.into_parts()?;
    Ok(Json(ApiResponse::success(state.audit.changes(&filter, &pagination).await?)))
}
