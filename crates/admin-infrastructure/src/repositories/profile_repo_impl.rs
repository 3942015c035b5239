// ============================================================================
// Admin Infrastructure - Profile Repository
// File: crates/admin-infrastructure/src/repositories/profile_repo_impl.rs
// ============================================================================

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::json;
use tracing::{error, info, warn};
use uuid::Uuid;

use admin_core::domain::{NewUser, Profile, ProfileUpdate};
use admin_core::error::DomainError;
use admin_core::repositories::ProfileRepository;

use crate::backend::{eq, BackendClient};

const TABLE: &str = "profiles";
/// Profile columns plus the embedded role name.
const SELECT: &str = "*,roles(nombre)";

/// Columns filled in after the auth account exists.
#[derive(Debug, Serialize)]
struct ProfileFields<'a> {
    id: Uuid,
    email: &'a str,
    nombre_completo: &'a str,
    telefono: Option<&'a str>,
    rol_id: Uuid,
    activo: bool,
}

pub struct BackendProfileRepository {
    client: Arc<BackendClient>,
}

impl BackendProfileRepository {
    pub fn new(client: Arc<BackendClient>) -> Self {
        Self { client }
    }

    async fn patch<B: Serialize + Sync>(&self, id: &Uuid, body: &B) -> Result<Profile, DomainError> {
        let rows: Vec<Profile> = self
            .client
            .update(TABLE, &[eq("id", id), ("select", SELECT.to_string())], body)
            .await?;
        rows.into_iter().next().ok_or(DomainError::UserNotFound(*id))
    }

    async fn fill_profile(&self, fields: &ProfileFields<'_>) -> Result<Profile, DomainError> {
        let patched: Vec<Profile> = self
            .client
            .update(TABLE, &[eq("id", fields.id), ("select", SELECT.to_string())], fields)
            .await?;
        if let Some(profile) = patched.into_iter().next() {
            return Ok(profile);
        }

        // No trigger-created row yet: insert it ourselves.
        let inserted: Vec<Profile> = self.client.insert(TABLE, fields).await?;
        inserted
            .into_iter()
            .next()
            .ok_or_else(|| DomainError::BackendError("Profile insert returned no rows".to_string()))
    }
}

#[async_trait]
impl ProfileRepository for BackendProfileRepository {
    async fn list(&self) -> Result<Vec<Profile>, DomainError> {
        Ok(self
            .client
            .select(TABLE, &[("select", SELECT.to_string()), ("order", "created_at.desc".to_string())])
            .await?)
    }

    async fn find_by_id(&self, id: &Uuid) -> Result<Option<Profile>, DomainError> {
        let rows: Vec<Profile> = self
            .client
            .select(TABLE, &[("select", SELECT.to_string()), eq("id", id), ("limit", "1".to_string())])
            .await?;
        Ok(rows.into_iter().next())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Profile>, DomainError> {
        let rows: Vec<Profile> = self
            .client
            .select(
                TABLE,
                &[("select", SELECT.to_string()), eq("email", email.trim().to_lowercase()), ("limit", "1".to_string())],
            )
            .await?;
        Ok(rows.into_iter().next())
    }

    /// Creates the auth account, then fills in the profile row. The account
    /// is removed again when the profile cannot be written.
    async fn create(&self, user: &NewUser, rol_id: &Uuid) -> Result<Profile, DomainError> {
        let id = self
            .client
            .create_auth_user(&user.email, &user.password, json!({ "nombre_completo": user.nombre_completo }))
            .await
            .map_err(|e| {
                if e.is_conflict() {
                    DomainError::EmailAlreadyExists(user.email.clone())
                } else {
                    e.into()
                }
            })?;

        let fields = ProfileFields {
            id,
            email: &user.email,
            nombre_completo: &user.nombre_completo,
            telefono: user.telefono.as_deref(),
            rol_id: *rol_id,
            activo: user.activo,
        };

        match self.fill_profile(&fields).await {
            Ok(profile) => {
                info!("Auth user and profile created: {}", id);
                Ok(profile)
            }
            Err(e) => {
                warn!("Profile write failed for {}, removing auth user: {}", id, e);
                if let Err(cleanup) = self.client.delete_auth_user(&id).await {
                    error!("Failed to remove orphan auth user {}: {}", id, cleanup);
                }
                Err(e)
            }
        }
    }

    async fn update(&self, id: &Uuid, changes: &ProfileUpdate) -> Result<Profile, DomainError> {
        self.patch(id, changes).await
    }

    async fn set_active(&self, id: &Uuid, activo: bool) -> Result<Profile, DomainError> {
        self.patch(id, &json!({ "activo": activo })).await
    }

    /// Deleting the auth account cascades to the profile; the explicit
    /// delete covers schemas without the cascade.
    async fn delete(&self, id: &Uuid) -> Result<(), DomainError> {
        self.client.delete_auth_user(id).await?;
        self.client.delete(TABLE, &[eq("id", id)]).await?;
        Ok(())
    }
}
