// ============================================================================
// Admin Core - Permission Catalog
// File: crates/admin-core/src/domain/permission.rs
// Description: Permission enum, grouping and labels shared with the backend
// ============================================================================

use serde::{Deserialize, Serialize};

use admin_shared::constants::PERMISSION_SEPARATORS;

/// Permission values stored in `roles.permisos`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    VerUsuarios,
    CrearUsuarios,
    EditarUsuarios,
    EliminarUsuarios,
    ImportarUsuarios,
    VerRoles,
    CrearRoles,
    EditarRoles,
    EliminarRoles,
    ImportarRoles,
    VerReportes,
    CrearReportes,
    EditarReportes,
    EliminarReportes,
    AsignarReportes,
    CambiarEstadoReportes,
    VerMapa,
    VerActividades,
    VerHistorialCambios,
    VerDashboard,
    ExportarDatos,
    ConfigurarSistema,
}

impl Permission {
    pub const ALL: [Permission; 22] = [
        Permission::VerUsuarios,
        Permission::CrearUsuarios,
        Permission::EditarUsuarios,
        Permission::EliminarUsuarios,
        Permission::ImportarUsuarios,
        Permission::VerRoles,
        Permission::CrearRoles,
        Permission::EditarRoles,
        Permission::EliminarRoles,
        Permission::ImportarRoles,
        Permission::VerReportes,
        Permission::CrearReportes,
        Permission::EditarReportes,
        Permission::EliminarReportes,
        Permission::AsignarReportes,
        Permission::CambiarEstadoReportes,
        Permission::VerMapa,
        Permission::VerActividades,
        Permission::VerHistorialCambios,
        Permission::VerDashboard,
        Permission::ExportarDatos,
        Permission::ConfigurarSistema,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Permission::VerUsuarios => "ver_usuarios",
            Permission::CrearUsuarios => "crear_usuarios",
            Permission::EditarUsuarios => "editar_usuarios",
            Permission::EliminarUsuarios => "eliminar_usuarios",
            Permission::ImportarUsuarios => "importar_usuarios",
            Permission::VerRoles => "ver_roles",
            Permission::CrearRoles => "crear_roles",
            Permission::EditarRoles => "editar_roles",
            Permission::EliminarRoles => "eliminar_roles",
            Permission::ImportarRoles => "importar_roles",
            Permission::VerReportes => "ver_reportes",
            Permission::CrearReportes => "crear_reportes",
            Permission::EditarReportes => "editar_reportes",
            Permission::EliminarReportes => "eliminar_reportes",
            Permission::AsignarReportes => "asignar_reportes",
            Permission::CambiarEstadoReportes => "cambiar_estado_reportes",
            Permission::VerMapa => "ver_mapa",
            Permission::VerActividades => "ver_actividades",
            Permission::VerHistorialCambios => "ver_historial_cambios",
            Permission::VerDashboard => "ver_dashboard",
            Permission::ExportarDatos => "exportar_datos",
            Permission::ConfigurarSistema => "configurar_sistema",
        }
    }

    /// Lenient parse: trims, ignores case and accepts `-` or spaces in place
    /// of `_`.
    pub fn from_str(s: &str) -> Option<Self> {
        let key = s.trim().to_lowercase().replace(['-', ' '], "_");
        Self::ALL.iter().copied().find(|p| p.as_str() == key)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Permission::VerUsuarios => "Ver usuarios",
            Permission::CrearUsuarios => "Crear usuarios",
            Permission::EditarUsuarios => "Editar usuarios",
            Permission::EliminarUsuarios => "Eliminar usuarios",
            Permission::ImportarUsuarios => "Importar usuarios (CSV)",
            Permission::VerRoles => "Ver roles",
            Permission::CrearRoles => "Crear roles",
            Permission::EditarRoles => "Editar roles",
            Permission::EliminarRoles => "Eliminar roles",
            Permission::ImportarRoles => "Importar roles (CSV)",
            Permission::VerReportes => "Ver reportes",
            Permission::CrearReportes => "Crear reportes",
            Permission::EditarReportes => "Editar reportes",
            Permission::EliminarReportes => "Eliminar reportes",
            Permission::AsignarReportes => "Asignar reportes",
            Permission::CambiarEstadoReportes => "Cambiar estado de reportes",
            Permission::VerMapa => "Ver mapa de reportes",
            Permission::VerActividades => "Ver registro de actividades",
            Permission::VerHistorialCambios => "Ver historial de cambios",
            Permission::VerDashboard => "Ver panel principal",
            Permission::ExportarDatos => "Exportar datos",
            Permission::ConfigurarSistema => "Configurar sistema",
        }
    }

    pub fn group(&self) -> PermissionGroup {
        match self {
            Permission::VerUsuarios
            | Permission::CrearUsuarios
            | Permission::EditarUsuarios
            | Permission::EliminarUsuarios
            | Permission::ImportarUsuarios => PermissionGroup::Usuarios,
            Permission::VerRoles
            | Permission::CrearRoles
            | Permission::EditarRoles
            | Permission::EliminarRoles
            | Permission::ImportarRoles => PermissionGroup::Roles,
            Permission::VerReportes
            | Permission::CrearReportes
            | Permission::EditarReportes
            | Permission::EliminarReportes
            | Permission::AsignarReportes
            | Permission::CambiarEstadoReportes => PermissionGroup::Reportes,
            Permission::VerMapa => PermissionGroup::Mapa,
            Permission::VerActividades | Permission::VerHistorialCambios => PermissionGroup::Auditoria,
            Permission::VerDashboard | Permission::ExportarDatos | Permission::ConfigurarSistema => {
                PermissionGroup::Sistema
            }
        }
    }
}

impl std::fmt::Display for Permission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PermissionGroup {
    Usuarios,
    Roles,
    Reportes,
    Mapa,
    Auditoria,
    Sistema,
}

impl PermissionGroup {
    pub const ALL: [PermissionGroup; 6] = [
        PermissionGroup::Usuarios,
        PermissionGroup::Roles,
        PermissionGroup::Reportes,
        PermissionGroup::Mapa,
        PermissionGroup::Auditoria,
        PermissionGroup::Sistema,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PermissionGroup::Usuarios => "usuarios",
            PermissionGroup::Roles => "roles",
            PermissionGroup::Reportes => "reportes",
            PermissionGroup::Mapa => "mapa",
            PermissionGroup::Auditoria => "auditoria",
            PermissionGroup::Sistema => "sistema",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PermissionGroup::Usuarios => "Usuarios",
            PermissionGroup::Roles => "Roles y permisos",
            PermissionGroup::Reportes => "Reportes",
            PermissionGroup::Mapa => "Mapa",
            PermissionGroup::Auditoria => "Auditoría",
            PermissionGroup::Sistema => "Sistema",
        }
    }

    pub fn permissions(&self) -> Vec<Permission> {
        Permission::ALL.iter().copied().filter(|p| p.group() == *self).collect()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PermissionView {
    pub key: &'static str,
    pub label: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct PermissionGroupView {
    pub key: &'static str,
    pub label: &'static str,
    pub permissions: Vec<PermissionView>,
}

/// Grouped catalog used by the role editor, in declaration order.
pub fn permission_catalog() -> Vec<PermissionGroupView> {
    PermissionGroup::ALL
        .iter()
        .map(|group| PermissionGroupView {
            key: group.as_str(),
            label: group.label(),
            permissions: group
                .permissions()
                .into_iter()
                .map(|p| PermissionView { key: p.as_str(), label: p.label() })
                .collect(),
        })
        .collect()
}

/// Splits a CSV cell such as `ver_usuarios;ver_roles` into known permissions
/// and the raw names that were not recognised. Duplicates keep their first
/// position.
pub fn parse_permission_list(raw: &str) -> (Vec<Permission>, Vec<String>) {
    let mut accepted = Vec::new();
    let mut rejected = Vec::new();

    for name in raw.split(PERMISSION_SEPARATORS).map(str::trim).filter(|s| !s.is_empty()) {
        match Permission::from_str(name) {
            Some(p) if !accepted.contains(&p) => accepted.push(p),
            Some(_) => {}
            None => rejected.push(name.to_string()),
        }
    }

    (accepted, rejected)
}
