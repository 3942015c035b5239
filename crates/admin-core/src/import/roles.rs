//! Validation of role rows

use std::collections::{HashMap, HashSet};

use super::reader::{parse_bool, CsvTable};
use super::row::ImportRow;
use crate::domain::{is_protected_name, parse_permission_list, validation_messages, NewRole};

#[derive(Debug, Clone)]
pub struct RoleImportContext {
    /// Lowercased names already stored.
    existing_names: HashSet<String>,
    default_color: String,
}

impl RoleImportContext {
    pub fn new<I>(existing_names: I, default_color: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        Self {
            existing_names: existing_names.into_iter().map(|n| n.trim().to_lowercase()).collect(),
            default_color: default_color.into(),
        }
    }
}

pub fn validate_role_rows(table: &CsvTable, ctx: &RoleImportContext) -> Vec<ImportRow<NewRole>> {
    let mut seen: HashMap<String, u64> = HashMap::new();

    table
        .rows
        .iter()
        .map(|csv_row| {
            let mut row = ImportRow::new(csv_row.line, csv_row.values.clone());

            let nombre = csv_row.get("nombre").map(str::to_string);
            match &nombre {
                None => row.error("El nombre es obligatorio"),
                Some(nombre) => {
                    let key = nombre.to_lowercase();
                    if is_protected_name(nombre) {
                        row.error(format!("\"{}\" es un nombre reservado del sistema", nombre));
                    } else if ctx.existing_names.contains(&key) {
                        row.error(format!("El rol \"{}\" ya existe", nombre));
                    }
                    match seen.get(&key) {
                        Some(first) => row.error(format!("Rol duplicado en el archivo (línea {})", first)),
                        None => {
                            seen.insert(key, csv_row.line);
                        }
                    }
                }
            }

            let color = match csv_row.get("color") {
                Some(c) => c.to_string(),
                None => {
                    row.warn(format!("Color no indicado; se usará {}", ctx.default_color));
                    ctx.default_color.clone()
                }
            };

            let permisos = match csv_row.get("permisos") {
                None => {
                    row.warn("El rol no tiene permisos asignados");
                    Vec::new()
                }
                Some(raw) => {
                    let (permisos, unknown) = parse_permission_list(raw);
                    if !unknown.is_empty() {
                        row.warn(format!("Permisos desconocidos ignorados: {}", unknown.join(", ")));
                    }
                    if permisos.is_empty() {
                        row.warn("El rol no tiene permisos asignados");
                    }
                    permisos
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

            let descripcion = csv_row.get("descripcion").map(str::to_string);
            match NewRole::new(nombre.unwrap_or_default(), descripcion, color, permisos, activo) {
                Ok(role) => row.finish(Some(role)),
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
