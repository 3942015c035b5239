// ============================================================================
// Admin Core - User Service
// File: crates/admin-core/src/services/user_service.rs
// Description: User administration over backend profiles
// ============================================================================

use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;
use validator::Validate;

use admin_shared::{utils::mask_email, Page, Pagination};

use super::{Actor, AuditService};
use crate::domain::{NewActivity, NewUser, Profile, ProfileUpdate};
use crate::error::DomainError;
use crate::filter::{apply, UserFilter};
use crate::repositories::{ProfileRepository, RoleRepository};

const ENTITY: &str = "usuario";

pub struct UserService {
    profiles: Arc<dyn ProfileRepository>,
    roles: Arc<dyn RoleRepository>,
    audit: AuditService,
}

impl UserService {
    pub fn new(profiles: Arc<dyn ProfileRepository>, roles: Arc<dyn RoleRepository>, audit: AuditService) -> Self {
        Self { profiles, roles, audit }
    }

    pub async fn list(&self, filter: &UserFilter, pagination: &Pagination) -> Result<Page<Profile>, DomainError> {
        let profiles = self.profiles.list().await?;
        Ok(apply(profiles, filter, pagination))
    }

    pub async fn get(&self, id: &Uuid) -> Result<Profile, DomainError> {
        self.profiles
            .find_by_id(id)
            .await?
            .ok_or(DomainError::UserNotFound(*id))
    }

    pub async fn create(&self, actor: &Actor, user: NewUser) -> Result<Profile, DomainError> {
        let user = NewUser { email: user.email.trim().to_lowercase(), ..user };
        user.validate()?;
        let email = user.email.clone();

        if self.profiles.find_by_email(&email).await?.is_some() {
            warn!("Create user rejected: email already registered: {}", mask_email(&email));
            return Err(DomainError::EmailAlreadyExists(email));
        }

        let role = self
            .roles
            .find_by_name(&user.rol)
            .await?
            .ok_or_else(|| DomainError::RoleNotFound(user.rol.clone()))?;

        let profile = self.profiles.create(&user, &role.id).await?;
        info!("User created: {} ({})", profile.id, mask_email(&profile.email));

        self.audit
            .record(
                NewActivity::builder("crear", ENTITY)
                    .usuario(actor.id, actor.email.clone())
                    .entidad_id(profile.id)
                    .descripcion(format!("Usuario {} creado", profile.email))
                    .metadata("rol", role.nombre)
                    .build(),
            )
            .await;

        Ok(profile)
    }

    pub async fn update(&self, actor: &Actor, id: &Uuid, changes: ProfileUpdate) -> Result<Profile, DomainError> {
        changes.validate()?;
        if changes.is_empty() {
            return Err(DomainError::ValidationError("No hay cambios que guardar".to_string()));
        }
        if *id == actor.id && changes.activo == Some(false) {
            warn!("User {} tried to deactivate their own account", actor.id);
            return Err(DomainError::SelfModification);
        }

        self.get(id).await?;
        if let Some(rol_id) = changes.rol_id {
            if self.roles.find_by_id(&rol_id).await?.is_none() {
                return Err(DomainError::RoleNotFound(rol_id.to_string()));
            }
        }

        let profile = self.profiles.update(id, &changes).await?;
        info!("User updated: {}", id);

        self.audit
            .record(
                NewActivity::builder("actualizar", ENTITY)
                    .usuario(actor.id, actor.email.clone())
                    .entidad_id(id)
                    .descripcion(format!("Usuario {} actualizado", profile.email))
                    .build(),
            )
            .await;

        Ok(profile)
    }

    /// Flips `activo`. Admins cannot lock themselves out.
    pub async fn toggle_active(&self, actor: &Actor, id: &Uuid) -> Result<Profile, DomainError> {
        if *id == actor.id {
            warn!("User {} tried to toggle their own status", actor.id);
            return Err(DomainError::SelfModification);
        }

        let current = self.get(id).await?;
        let profile = self.profiles.set_active(id, !current.activo).await?;
        let accion = if profile.activo { "activar" } else { "desactivar" };
        info!("User {}: {}", accion, id);

        self.audit
            .record(
                NewActivity::builder(accion, ENTITY)
                    .usuario(actor.id, actor.email.clone())
                    .entidad_id(id)
                    .descripcion(format!("Usuario {} {}", profile.email, if profile.activo { "activado" } else { "desactivado" }))
                    .build(),
            )
            .await;

        Ok(profile)
    }

    pub async fn delete(&self, actor: &Actor, id: &Uuid) -> Result<(), DomainError> {
        if *id == actor.id {
            warn!("User {} tried to delete their own account", actor.id);
            return Err(DomainError::SelfModification);
        }

        let profile = self.get(id).await?;
        self.profiles.delete(id).await?;
        info!("User deleted: {} ({})", id, mask_email(&profile.email));

        self.audit
            .record(
                NewActivity::builder("eliminar", ENTITY)
                    .usuario(actor.id, actor.email.clone())
                    .entidad_id(id)
                    .descripcion(format!("Usuario {} eliminado", profile.email))
                    .build(),
            )
            .await;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::profile::sample_profile;
    use crate::domain::role::sample_role;
    use crate::repositories::{MockAuditRepository, MockProfileRepository, MockRoleRepository};

    fn audit() -> AuditService {
        let mut repo = MockAuditRepository::new();
        repo.expect_record().returning(|_| Ok(()));
        AuditService::new(Arc::new(repo))
    }

    fn actor() -> Actor {
        Actor::new(Uuid::new_v4(), "admin@example.com")
    }

    fn new_user(email: &str, rol: &str) -> NewUser {
        NewUser {
            email: email.to_string(),
            password: "s3gura-Clave".to_string(),
            nombre_completo: "Ana Pérez".to_string(),
            telefono: None,
            rol: rol.to_string(),
            activo: true,
        }
    }

    #[tokio::test]
    async fn test_create_resolves_role() {
        let role = sample_role("usuario", vec![]);
        let role_id = role.id;

        let mut profiles = MockProfileRepository::new();
        profiles.expect_find_by_email().returning(|_| Ok(None));
        profiles
            .expect_create()
            .withf(move |user, rol_id| user.email == "ana@example.com" && *rol_id == role_id)
            .returning(|user, _| Ok(sample_profile(&user.email, Some("usuario"))));

        let mut roles = MockRoleRepository::new();
        roles.expect_find_by_name().returning(move |_| Ok(Some(role.clone())));

        let service = UserService::new(Arc::new(profiles), Arc::new(roles), audit());
        let profile = service.create(&actor(), new_user(" Ana@Example.com ", "usuario")).await.unwrap();
        assert_eq!(profile.email, "ana@example.com");
    }

    #[tokio::test]
    async fn test_create_rejects_duplicates_and_unknown_roles() {
        let mut profiles = MockProfileRepository::new();
        profiles
            .expect_find_by_email()
            .returning(|email| Ok((email == "ana@example.com").then(|| sample_profile(email, None))));
        profiles.expect_create().never();

        let mut roles = MockRoleRepository::new();
        roles.expect_find_by_name().returning(|_| Ok(None));

        let service = UserService::new(Arc::new(profiles), Arc::new(roles), audit());

        let err = service.create(&actor(), new_user("ana@example.com", "usuario")).await.unwrap_err();
        assert!(matches!(err, DomainError::EmailAlreadyExists(_)));

        let err = service.create(&actor(), new_user("luis@example.com", "gerente")).await.unwrap_err();
        assert!(matches!(err, DomainError::RoleNotFound(r) if r == "gerente"));

        let err = service.create(&actor(), new_user("no-email", "usuario")).await.unwrap_err();
        assert!(matches!(err, DomainError::ValidationError(_)));
    }

    #[tokio::test]
    async fn test_self_protection() {
        let me = actor();
        let mut profiles = MockProfileRepository::new();
        profiles.expect_set_active().never();
        profiles.expect_delete().never();
        profiles.expect_update().never();

        let service = UserService::new(Arc::new(profiles), Arc::new(MockRoleRepository::new()), audit());

        assert!(matches!(service.toggle_active(&me, &me.id).await, Err(DomainError::SelfModification)));
        assert!(matches!(service.delete(&me, &me.id).await, Err(DomainError::SelfModification)));
        let deactivate = ProfileUpdate { activo: Some(false), ..Default::default() };
        assert!(matches!(service.update(&me, &me.id, deactivate).await, Err(DomainError::SelfModification)));
    }

    #[tokio::test]
    async fn test_toggle_flips_status() {
        let target = sample_profile("luis@example.com", Some("usuario"));
        let id = target.id;

        let mut profiles = MockProfileRepository::new();
        profiles.expect_find_by_id().returning(move |_| Ok(Some(target.clone())));
        profiles.expect_set_active().withf(|_, activo| !*activo).returning(|_, activo| {
            let mut p = sample_profile("luis@example.com", Some("usuario"));
            p.activo = activo;
            Ok(p)
        });

        let service = UserService::new(Arc::new(profiles), Arc::new(MockRoleRepository::new()), audit());
        let updated = service.toggle_active(&actor(), &id).await.unwrap();
        assert!(!updated.activo);
    }

    #[tokio::test]
    async fn test_update_requires_changes_and_existing_user() {
        let mut profiles = MockProfileRepository::new();
        profiles.expect_find_by_id().returning(|_| Ok(None));
        let service = UserService::new(Arc::new(profiles), Arc::new(MockRoleRepository::new()), audit());

        let id = Uuid::new_v4();
        let err = service.update(&actor(), &id, ProfileUpdate::default()).await.unwrap_err();
        assert!(matches!(err, DomainError::ValidationError(_)));

        let rename = ProfileUpdate { nombre_completo: Some("Luis Gómez".into()), ..Default::default() };
        let err = service.update(&actor(), &id, rename).await.unwrap_err();
        assert!(matches!(err, DomainError::UserNotFound(u) if u == id));
    }
}
