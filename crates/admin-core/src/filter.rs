//! List filters applied to records fetched from the backend

use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

use admin_shared::{utils::normalize_search, Page, Pagination};

use crate::domain::{
    ActivityEntry, BoundingBox, ChangeRecord, Operation, Profile, Report, ReportPriority, ReportStatus, Role,
};

pub trait Filter<T> {
    fn matches(&self, item: &T) -> bool;
}

/// Filters then paginates, keeping the incoming order.
pub fn apply<T, F: Filter<T>>(items: Vec<T>, filter: &F, pagination: &Pagination) -> Page<T> {
    let matched: Vec<T> = items.into_iter().filter(|item| filter.matches(item)).collect();
    Page::from_vec(matched, pagination)
}

fn contains_term(haystack: Option<&str>, term: &str) -> bool {
    haystack.is_some_and(|h| h.to_lowercase().contains(term))
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserFilter {
    pub search: Option<String>,
    pub rol: Option<String>,
    pub activo: Option<bool>,
}

impl Filter<Profile> for UserFilter {
    fn matches(&self, p: &Profile) -> bool {
        if let Some(term) = normalize_search(self.search.as_deref()) {
            let hit = contains_term(Some(&p.email), &term)
                || contains_term(p.nombre_completo.as_deref(), &term)
                || contains_term(p.telefono.as_deref(), &term);
            if !hit {
                return false;
            }
        }
        if let Some(rol) = self.rol.as_deref().filter(|r| !r.trim().is_empty()) {
            if !p.rol_nombre().is_some_and(|r| r.eq_ignore_ascii_case(rol.trim())) {
                return false;
            }
        }
        self.activo.is_none_or(|a| p.activo == a)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RoleFilter {
    pub search: Option<String>,
    pub activo: Option<bool>,
}

impl Filter<Role> for RoleFilter {
    fn matches(&self, r: &Role) -> bool {
        if let Some(term) = normalize_search(self.search.as_deref()) {
            if !(contains_term(Some(&r.nombre), &term) || contains_term(r.descripcion.as_deref(), &term)) {
                return false;
            }
        }
        self.activo.is_none_or(|a| r.activo == a)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ReportFilter {
    pub search: Option<String>,
    pub estado: Option<ReportStatus>,
    pub prioridad: Option<ReportPriority>,
    pub categoria: Option<String>,
    pub asignado_a: Option<Uuid>,
    pub bbox: Option<BoundingBox>,
}

impl Filter<Report> for ReportFilter {
    fn matches(&self, r: &Report) -> bool {
        if let Some(term) = normalize_search(self.search.as_deref()) {
            let hit = contains_term(Some(&r.titulo), &term)
                || contains_term(r.descripcion.as_deref(), &term)
                || contains_term(r.direccion.as_deref(), &term);
            if !hit {
                return false;
            }
        }
        if self.estado.is_some_and(|e| r.estado != e) {
            return false;
        }
        if self.prioridad.is_some_and(|p| r.prioridad != p) {
            return false;
        }
        if let Some(cat) = self.categoria.as_deref().filter(|c| !c.trim().is_empty()) {
            if !r.categoria.as_deref().is_some_and(|c| c.eq_ignore_ascii_case(cat.trim())) {
                return false;
            }
        }
        if self.asignado_a.is_some_and(|id| r.asignado_a != Some(id)) {
            return false;
        }
        match &self.bbox {
            Some(bbox) => r.location().is_some_and(|p| bbox.contains(&p)),
            None => true,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ActivityFilter {
    pub accion: Option<String>,
    pub entidad: Option<String>,
    /// Matches the actor's email or id.
    pub usuario: Option<String>,
    pub desde: Option<DateTime<Utc>>,
    pub hasta: Option<DateTime<Utc>>,
}

impl Filter<ActivityEntry> for ActivityFilter {
    fn matches(&self, a: &ActivityEntry) -> bool {
        if let Some(accion) = self.accion.as_deref().filter(|s| !s.is_empty()) {
            if !a.accion.eq_ignore_ascii_case(accion) {
                return false;
            }
        }
        if let Some(entidad) = self.entidad.as_deref().filter(|s| !s.is_empty()) {
            if !a.entidad.eq_ignore_ascii_case(entidad) {
                return false;
            }
        }
        if let Some(term) = normalize_search(self.usuario.as_deref()) {
            let by_id = a.usuario_id.is_some_and(|id| id.to_string() == term);
            if !by_id && !contains_term(a.usuario_email.as_deref(), &term) {
                return false;
            }
        }
        if self.desde.is_some_and(|d| a.created_at < d) {
            return false;
        }
        self.hasta.is_none_or(|h| a.created_at <= h)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChangeFilter {
    pub tabla: Option<String>,
    pub operacion: Option<Operation>,
    pub registro_id: Option<String>,
}

impl Filter<ChangeRecord> for ChangeFilter {
    fn matches(&self, c: &ChangeRecord) -> bool {
        if let Some(tabla) = self.tabla.as_deref().filter(|s| !s.is_empty()) {
            if c.tabla != tabla {
                return false;
            }
        }
        if self.operacion.is_some_and(|op| c.operacion != op) {
            return false;
        }
        self.registro_id
            .as_deref()
            .filter(|s| !s.is_empty())
            .is_none_or(|id| c.registro_id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::profile::sample_profile;
    use crate::domain::report::sample_report;
    use crate::domain::role::sample_role;
    use chrono::Duration;

    #[test]
    fn test_user_filter() {
        let mut ana = sample_profile("ana@example.com", Some("supervisor"));
        ana.nombre_completo = Some("Ana Pérez".into());
        let mut luis = sample_profile("luis@example.com", Some("usuario"));
        luis.activo = false;
        let users = vec![ana, luis];

        let by_name = UserFilter { search: Some("pérez".into()), ..Default::default() };
        assert_eq!(apply(users.clone(), &by_name, &Pagination::default()).total, 1);

        let by_role = UserFilter { rol: Some("USUARIO".into()), ..Default::default() };
        let page = apply(users.clone(), &by_role, &Pagination::default());
        assert_eq!(page.items[0].email, "luis@example.com");

        let active = UserFilter { activo: Some(true), ..Default::default() };
        assert_eq!(apply(users, &active, &Pagination::default()).total, 1);
    }

    #[test]
    fn test_role_filter() {
        let mut roles = vec![sample_role("Inspector", vec![]), sample_role("Capturista", vec![])];
        roles[1].activo = false;
        let f = RoleFilter { search: Some("insp".into()), activo: Some(true) };
        assert_eq!(apply(roles, &f, &Pagination::default()).total, 1);
    }

    #[test]
    fn test_report_filter_with_bbox() {
        let mut a = sample_report("Bache en avenida", Some(19.43), Some(-99.13));
        a.prioridad = ReportPriority::Alta;
        let b = sample_report("Luminaria", Some(25.0), Some(-100.0));
        let c = sample_report("Sin coordenadas", None, None);
        let reports = vec![a, b, c];

        let f = ReportFilter {
            bbox: BoundingBox::parse("-99.3,19.2,-98.9,19.6"),
            ..Default::default()
        };
        let page = apply(reports.clone(), &f, &Pagination::default());
        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].titulo, "Bache en avenida");

        let f = ReportFilter { prioridad: Some(ReportPriority::Media), ..Default::default() };
        assert_eq!(apply(reports.clone(), &f, &Pagination::default()).total, 2);

        let f = ReportFilter { categoria: Some("Alumbrado".into()), search: Some("lumin".into()), ..Default::default() };
        assert_eq!(apply(reports, &f, &Pagination::default()).total, 1);
    }

    #[test]
    fn test_activity_filter_date_range() {
        let now = Utc::now();
        let entry = ActivityEntry {
            id: Uuid::new_v4(),
            usuario_id: None,
            usuario_email: Some("admin@example.com".into()),
            accion: "crear".into(),
            entidad: "roles".into(),
            entidad_id: None,
            descripcion: None,
            metadata: None,
            ip: None,
            created_at: now,
        };
        let f = ActivityFilter { desde: Some(now - Duration::hours(1)), hasta: Some(now), ..Default::default() };
        assert!(f.matches(&entry));
        let f = ActivityFilter { desde: Some(now + Duration::seconds(1)), ..Default::default() };
        assert!(!f.matches(&entry));
        let f = ActivityFilter { usuario: Some("ADMIN@".into()), accion: Some("CREAR".into()), ..Default::default() };
        assert!(f.matches(&entry));
    }
}
