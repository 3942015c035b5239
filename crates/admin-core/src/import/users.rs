//! Validation of user rows

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use admin_security::{generate_temporary_password, password_strength};

use super::reader::{parse_bool, CsvTable};
use super::row::ImportRow;
use crate::domain::{validation_messages, NewUser};

// Bounds of NewUser::nombre_completo
const MIN_NAME_CHARS: usize = 2;
const MAX_NAME_CHARS: usize = 100;

/// User ready to be created, plus whether its password was generated.
#[derive(Debug, Clone, Serialize)]
pub struct ImportedUser {
    #[serde(flatten)]
    pub user: NewUser,
    pub password_generada: bool,
}

/// Backend state the rows are checked against.
#[derive(Debug, Clone)]
pub struct UserImportContext {
    existing_emails: HashSet<String>,
    /// lowercase name -> stored name
    roles: HashMap<String, String>,
    default_role: String,
}

impl UserImportContext {
    pub fn new<E, R>(existing_emails: E, role_names: R, default_role: impl Into<String>) -> Self
    where
        E: IntoIterator<Item = String>,
        R: IntoIterator<Item = String>,
    {
        Self {
            existing_emails: existing_emails.into_iter().map(|e| e.trim().to_lowercase()).collect(),
            roles: role_names.into_iter().map(|r| (r.trim().to_lowercase(), r)).collect(),
            default_role: default_role.into(),
        }
    }

    fn resolve_role(&self, name: &str) -> Option<&str> {
        self.roles.get(&name.trim().to_lowercase()).map(String::as_str)
    }
}

/// `ana.perez_lopez@x.com` -> `Ana Perez Lopez`. Falls back to the local part,
/// then to the whole email, when the result would be too short to be a name.
fn name_from_email(email: &str) -> String {
    let local = email.split('@').next().unwrap_or_default();
    let derived = local
        .split(['.', '_', '-', '+'])
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ");

    let name = [derived.as_str(), local, email]
        .into_iter()
        .find(|candidate| candidate.chars().count() >= MIN_NAME_CHARS)
        .unwrap_or(email)
        .chars()
        .take(MAX_NAME_CHARS)
        .collect();
    name
}

pub fn validate_user_rows(table: &CsvTable, ctx: &UserImportContext) -> Vec<ImportRow<ImportedUser>> {
    // email -> first line it appeared on
    let mut seen: HashMap<String, u64> = HashMap::new();

    table
        .rows
        .iter()
        .map(|csv_row| {
            let mut row = ImportRow::new(csv_row.line, csv_row.values.clone());

            let email = csv_row.get("email").map(str::to_lowercase);
            match &email {
                None => row.error("El email es obligatorio"),
                Some(email) if !email_address::EmailAddress::is_valid(email) => {
                    row.error(format!("Email inválido: {}", email))
                }
                Some(email) => {
                    if let Some(first) = seen.get(email) {
                        row.error(format!("Email duplicado en el archivo (línea {})", first));
                    } else {
                        seen.insert(email.clone(), csv_row.line);
                    }
                    if ctx.existing_emails.contains(email) {
                        row.error(format!("El email {} ya está registrado", email));
                    }
                }
            }

            let nombre = match csv_row.get("nombre_completo") {
                Some(n) => n.to_string(),
                None => {
                    let derived = email.as_deref().map(name_from_email).unwrap_or_default();
                    if email.is_some() {
                        row.warn(format!("Nombre no indicado; se usará \"{}\"", derived));
                    }
                    derived
                }
            };

            let (password, generated) = match csv_row.get("password") {
                Some(pw) => {
                    let inputs: Vec<&str> = [email.as_deref(), Some(nombre.as_str())].into_iter().flatten().collect();
                    if pw.chars().count() >= 8 && password_strength(pw, &inputs).is_weak() {
                        row.warn("La contraseña es débil");
                    }
                    (pw.to_string(), false)
                }
                None => {
                    row.warn("Contraseña no indicada; se generará una contraseña temporal");
                    (generate_temporary_password(), true)
                }
            };

            let requested_role = csv_row.get("rol").unwrap_or(ctx.default_role.as_str());
            let rol = match ctx.resolve_role(requested_role) {
                Some(r) => r.to_string(),
                None => {
                    row.error(format!("El rol \"{}\" no existe", requested_role));
                    requested_role.to_string()
                }
            };

            let activo = match csv_row.get("activo") {
                None => true,
                Some(raw) => parse_bool(raw).unwrap_or_else(|| {
                    row.error(format!("Valor de activo inválido: {}", raw));
                    true
                }),
            };

            if row.has_errors() {
                return row.finish(None);
            }

            let telefono = csv_row.get("telefono").map(str::to_string);
            match NewUser::new(email.unwrap_or_default(), password, nombre, telefono, rol, activo) {
                Ok(user) => row.finish(Some(ImportedUser { user, password_generada: generated })),
                Err(errors) => {
                    for message in validation_messages(&errors) {
                        row.error(message);
                    }
                    row.finish(None)
                }
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::import::reader::read_csv;
    use crate::import::row::RowStatus;
    use crate::import::USER_COLUMNS;

    fn ctx() -> UserImportContext {
        UserImportContext::new(
            vec!["existente@example.com".to_string()],
            vec!["usuario".to_string(), "Supervisor".to_string()],
            "usuario",
        )
    }

    fn rows(csv: &str) -> Vec<ImportRow<ImportedUser>> {
        let table = read_csv(csv.as_bytes(), &["email"], &USER_COLUMNS, 100).unwrap();
        validate_user_rows(&table, &ctx())
    }

    #[test]
    fn test_missing_optional_fields_get_defaults() {
        let result = rows("email\nana.perez@example.com\n");
        let row = &result[0];
        assert_eq!(row.status, RowStatus::Warning);
        let imported = row.record.as_ref().unwrap();
        assert_eq!(imported.user.rol, "usuario");
        assert!(imported.user.activo);
        assert_eq!(imported.user.nombre_completo, "Ana Perez");
        assert!(imported.password_generada);
        assert_eq!(imported.user.password.len(), 14);
        assert_eq!(row.warnings.len(), 2);
    }

    #[test]
    fn test_complete_row_is_valid() {
        let result = rows(
            "email,nombre_completo,password,telefono,rol,activo\n\
             luis@example.com,Luis Gómez,Qz7!tranquilo-Marea#91,+52 55 1111 2222,supervisor,no\n",
        );
        let row = &result[0];
        assert_eq!(row.status, RowStatus::Valid, "{:?}", row.warnings);
        let user = &row.record.as_ref().unwrap().user;
        assert_eq!(user.rol, "Supervisor");
        assert!(!user.activo);
        assert_eq!(user.telefono.as_deref(), Some("+52 55 1111 2222"));
    }

    #[test]
    fn test_email_validation_rejects_malformed() {
        let result = rows("email\nno-es-un-correo\n@example.com\n");
        assert!(result.iter().all(|r| r.status == RowStatus::Invalid));
        assert!(result[0].errors[0].starts_with("Email inválido"));
    }

    #[test]
    fn test_duplicates_and_existing_emails() {
        let result = rows("email\nana@example.com\nANA@example.com\nexistente@example.com\n");
        assert_eq!(result[0].status, RowStatus::Warning);
        assert_eq!(result[1].status, RowStatus::Invalid);
        assert_eq!(result[1].errors, vec!["Email duplicado en el archivo (línea 2)".to_string()]);
        assert_eq!(result[2].status, RowStatus::Invalid);
        assert!(result[2].errors[0].contains("ya está registrado"));
    }

    #[test]
    fn test_unknown_role_and_bad_flag() {
        let result = rows("email,rol,activo\nana@example.com,gerente,tal vez\n");
        let row = &result[0];
        assert_eq!(row.status, RowStatus::Invalid);
        assert_eq!(row.errors.len(), 2);
        assert!(row.errors[0].contains("gerente"));
        assert!(row.errors[1].contains("tal vez"));
    }

    #[test]
    fn test_short_and_weak_passwords() {
        let result = rows("email,password\nana@example.com,corta\nluis@example.com,password123\n");
        assert_eq!(result[0].status, RowStatus::Invalid);
        assert!(result[0].errors[0].starts_with("password:"));
        assert_eq!(result[1].status, RowStatus::Warning);
        assert!(result[1].warnings.contains(&"La contraseña es débil".to_string()));
    }

    #[test]
    fn test_preview_serialization_hides_password() {
        let result = rows("email,password\nana@example.com,Qz7!tranquilo-Marea#91\n");
        let json = serde_json::to_value(&result[0]).unwrap();
        assert!(json["record"].get("password").is_none());
        assert_eq!(json["record"]["password_generada"], false);
        assert_eq!(json["record"]["email"], "ana@example.com");
    }

    #[test]
    fn test_name_from_email() {
        assert_eq!(name_from_email("maria_jose.lopez@x.com"), "Maria Jose Lopez");
        assert_eq!(name_from_email("jo@x.com"), "Jo");
        assert_eq!(name_from_email("x@x.com"), "x@x.com");
        assert_eq!(name_from_email("j.p@x.com"), "J P");
        assert_eq!(name_from_email("_a@x.com"), "_a");
    }

    #[test]
    fn test_short_local_part_still_gets_a_valid_name() {
        let result = rows("email\nx@example.com\n_@example.com\n");
        for row in &result {
            assert_eq!(row.status, RowStatus::Warning, "line {}: {:?}", row.line, row.errors);
        }
        assert_eq!(result[0].record.as_ref().unwrap().user.nombre_completo, "x@example.com");
        assert_eq!(result[1].record.as_ref().unwrap().user.nombre_completo, "_@example.com");
        assert!(result[0].warnings[0].contains("x@example.com"));
    }
}
