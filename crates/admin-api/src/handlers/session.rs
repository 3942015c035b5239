//! Permission catalog and the signed-in user

use axum::Json;

use admin_core::domain::{permission_catalog, PermissionGroupView};

use crate::middleware::CurrentUser;
use crate::response::ApiResponse;

/// GET /api/v1/permissions
pub async fn permissions(_user: CurrentUser) -> Json<ApiResponse<Vec<PermissionGroupView>>> {
    Json(ApiResponse::success(permission_catalog()))
}

/// GET /api/v1/me
pub async fn me(user: CurrentUser) -> Json<ApiResponse<CurrentUser>> {
    Json(ApiResponse::success(user))
}
