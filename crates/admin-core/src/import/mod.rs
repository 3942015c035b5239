//! # Bulk import
//!
//! CSV-driven creation of users and roles: template download, parsing,
//! per-row validation with defaults, preview, and a commit loop that skips
//! failing rows.

pub mod template;
pub mod reader;
pub mod row;
pub mod users;
pub mod roles;
pub mod commit;

use serde::{Deserialize, Serialize};

pub use commit::{BulkImporter, CreatedItem, CreatedRow, FailedRow, ImportReport, Labelled};
pub use reader::{read_csv, CsvRow, CsvTable};
pub use row::{ImportPreview, ImportRow, ImportSummary, RowStatus};
pub use roles::{validate_role_rows, RoleImportContext};
pub use template::{template_csv, ROLE_COLUMNS, USER_COLUMNS};
pub use users::{validate_user_rows, ImportedUser, UserImportContext};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImportKind {
    Users,
    Roles,
}

impl ImportKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImportKind::Users => "users",
            ImportKind::Roles => "roles",
        }
    }

    /// Accepts the English and Spanish path segments.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "users" | "usuarios" => Some(ImportKind::Users),
            "roles" => Some(ImportKind::Roles),
            _ => None,
        }
    }

    pub fn columns(&self) -> &'static [&'static str] {
        match self {
            ImportKind::Users => &USER_COLUMNS,
            ImportKind::Roles => &ROLE_COLUMNS,
        }
    }

    pub fn required_columns(&self) -> &'static [&'static str] {
        match self {
            ImportKind::Users => &["email"],
            ImportKind::Roles => &["nombre"],
        }
    }

    /// Backend table the rows end up in; used as the activity entity.
    pub fn table(&self) -> &'static str {
        match self {
            ImportKind::Users => "profiles",
            ImportKind::Roles => "roles",
        }
    }

    pub fn template_filename(&self) -> &'static str {
        match self {
            ImportKind::Users => "plantilla_usuarios.csv",
            ImportKind::Roles => "plantilla_roles.csv",
        }
    }
}
