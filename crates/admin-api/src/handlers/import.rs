// ============================================================================
// Admin API - Bulk Import Handlers
// File: crates/admin-api/src/handlers/import.rs
// ============================================================================

use axum::{
    extract::{Multipart, State},
    http::header,
    response::IntoResponse,
    Json,
};
use tracing::info;

use admin_core::domain::Permission;
use admin_core::import::{ImportKind, ImportReport};

use crate::dto::PreviewDto;
use crate::error::ApiError;
use crate::extract::ApiPath;
use crate::middleware::CurrentUser;
use crate::response::ApiResponse;
use crate::state::AppState;

fn parse_kind(raw: &str) -> Result<ImportKind, ApiError> {
    ImportKind::from_str(raw).ok_or_else(|| ApiError::NotFound(format!("Tipo de importación desconocido: {}", raw)))
}

fn required_permission(kind: ImportKind) -> Permission {
    match kind {
        ImportKind::Users => Permission::ImportarUsuarios,
        ImportKind::Roles => Permission::ImportarRoles,
    }
}

/// Reads the `file` field, enforcing the configured size limit.
async fn read_upload(mut multipart: Multipart, max_bytes: usize) -> Result<Vec<u8>, ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Formulario inválido: {}", e)))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::BadRequest(format!("No se pudo leer el archivo: {}", e)))?;
        if bytes.len() > max_bytes {
            return Err(ApiError::BadRequest(format!(
                "El archivo supera el tamaño máximo de {} bytes",
                max_bytes
            )));
        }
        return Ok(bytes.to_vec());
    }
    Err(ApiError::BadRequest("Falta el campo 'file'".to_string()))
}

/// GET /api/v1/import/{kind}/template
pub async fn template(
    State(state): State<AppState>,
    user: CurrentUser,
    ApiPath(kind): ApiPath<String>,
) -> Result<impl IntoResponse, ApiError> {
    let kind = parse_kind(&kind)?;
    user.require(required_permission(kind))?;

    let csv = state.imports.template(kind)?;
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", kind.template_filename()),
            ),
        ],
        csv,
    ))
}

/// POST /api/v1/import/{kind}/preview
pub async fn preview(
    State(state): State<AppState>,
    user: CurrentUser,
    ApiPath(kind): ApiPath<String>,
    multipart: Multipart,
) -> Result<Json<ApiResponse<PreviewDto>>, ApiError> {
    let kind = parse_kind(&kind)?;
    user.require(required_permission(kind))?;
    let bytes = read_upload(multipart, state.import_settings.max_file_bytes).await?;

    let preview = match kind {
        ImportKind::Users => PreviewDto::Users(state.imports.preview_users(&bytes).await?),
        ImportKind::Roles => PreviewDto::Roles(state.imports.preview_roles(&bytes).await?),
    };
    Ok(Json(ApiResponse::success(preview)))
}

/// POST /api/v1/import/{kind}/commit
pub async fn commit(
    State(state): State<AppState>,
    user: CurrentUser,
    ApiPath(kind): ApiPath<String>,
    multipart: Multipart,
) -> Result<Json<ApiResponse<ImportReport>>, ApiError> {
    let kind = parse_kind(&kind)?;
    user.require(required_permission(kind))?;
    let bytes = read_upload(multipart, state.import_settings.max_file_bytes).await?;

    info!(kind = kind.as_str(), bytes = bytes.len(), user = %user.id, "Import commit requested");
    let report = match kind {
        ImportKind::Users => state.imports.commit_users(&user.actor(), &bytes).await?,
        ImportKind::Roles => state.imports.commit_roles(&user.actor(), &bytes).await?,
    };
    Ok(Json(ApiResponse::success(report)))
}
