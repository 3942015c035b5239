//! Route table

use axum::{
    middleware,
    routing::{get, patch, post},
    Router,
};

use crate::handlers::{audit, health, import, reportes, roles, session, users};
use crate::middleware::require_auth;
use crate::state::AppState;

/// All routes under `/api/v1`. Everything except the health probes goes
/// through [`require_auth`].
pub fn build_router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check));

    let protected_routes = Router::new()
        .route("/permissions", get(session::permissions))
        .route("/me", get(session::me))
        // Users
        .route("/users", get(users::list).post(users::create))
        .route("/users/{id}", get(users::get).patch(users::update).delete(users::delete))
        .route("/users/{id}/toggle-status", post(users::toggle_status))
        // Roles
        .route("/roles", get(roles::list).post(roles::create))
        .route("/roles/{id}", get(roles::get).patch(roles::update).delete(roles::delete))
        .route("/roles/{id}/toggle-status", post(roles::toggle_status))
        // Reportes
        .route("/reportes", get(reportes::list))
        .route("/reportes/map", get(reportes::map))
        .route("/reportes/stats", get(reportes::stats))
        .route("/reportes/{id}", get(reportes::get).delete(reportes::delete))
        .route("/reportes/{id}/status", patch(reportes::change_status))
        .route("/reportes/{id}/assign", patch(reportes::assign))
        // Audit
        .route("/audit/activities", get(audit::activities))
        .route("/audit/changes", get(audit::changes))
        // Bulk import
        .route("/import/{kind}/template", get(import::template))
        .route("/import/{kind}/preview", post(import::preview))
        .route("/import/{kind}/commit", post(import::commit))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .nest("/api/v1", public_routes.merge(protected_routes))
        .with_state(state)
}
