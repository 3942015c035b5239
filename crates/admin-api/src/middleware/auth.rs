// ============================================================================
// Admin API - Authentication Middleware
// File: crates/admin-api/src/middleware/auth.rs
// Description: Bearer token -> profile -> role permissions
// ============================================================================

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::Response,
};
use serde::Serialize;
use tracing::{debug, warn};
use uuid::Uuid;

use admin_core::domain::Permission;
use admin_core::services::Actor;
use admin_security::JwtError;
use admin_shared::utils::mask_email;

use crate::error::ApiError;
use crate::state::AppState;

/// Authenticated admin, resolved once per request.
#[derive(Debug, Clone, Serialize)]
pub struct CurrentUser {
    pub id: Uuid,
    pub email: String,
    pub nombre: String,
    pub rol: Option<String>,
    pub permisos: Vec<Permission>,
}

impl CurrentUser {
    pub fn can(&self, permission: Permission) -> bool {
        self.permisos.contains(&permission)
    }

    pub fn require(&self, permission: Permission) -> Result<(), ApiError> {
        if self.can(permission) {
            Ok(())
        } else {
            warn!("User {} lacks permission {}", self.id, permission.as_str());
            Err(ApiError::Forbidden(format!("Permiso requerido: {}", permission.label())))
        }
    }

    pub fn actor(&self) -> Actor {
        Actor::new(self.id, self.email.clone())
    }
}

impl<S: Send + Sync> FromRequestParts<S> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .ok_or_else(|| ApiError::Unauthorized("Sesión no iniciada".to_string()))
    }
}

fn bearer_token(request: &Request) -> Option<String> {
    request
        .headers()
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
}

pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = bearer_token(&request)
        .ok_or_else(|| ApiError::Unauthorized("Falta el token de acceso".to_string()))?;

    let claims = state.verifier.verify(&token).map_err(|e| match e {
        JwtError::TokenExpired => ApiError::Unauthorized("La sesión expiró".to_string()),
        other => ApiError::Unauthorized(other.to_string()),
    })?;
    let user_id = claims
        .user_id()
        .map_err(|e| ApiError::Unauthorized(e.to_string()))?;

    let profile = state
        .profiles
        .find_by_id(&user_id)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Perfil no encontrado".to_string()))?;

    if !profile.activo {
        warn!("Inactive user rejected: {}", mask_email(&profile.email));
        return Err(ApiError::Forbidden("Usuario inactivo".to_string()));
    }

    let permisos = state.roles.permissions_for(profile.rol_nombre()).await?;
    debug!(user = %profile.id, permisos = permisos.len(), "Request authenticated");

    let current = CurrentUser {
        id: profile.id,
        nombre: profile.display_name().to_string(),
        rol: profile.rol_nombre().map(str::to_string),
        email: profile.email,
        permisos,
    };
    request.extensions_mut().insert(current);

    Ok(next.run(request).await)
}
