//! CSV templates offered for download

use super::ImportKind;
use crate::error::DomainError;

pub const USER_COLUMNS: [&str; 6] = ["email", "nombre_completo", "password", "telefono", "rol", "activo"];
pub const ROLE_COLUMNS: [&str; 5] = ["nombre", "descripcion", "color", "permisos", "activo"];

const USER_EXAMPLE: [&str; 6] = ["ana.perez@example.com", "Ana Pérez", "", "+52 55 1234 5678", "usuario", "true"];
const ROLE_EXAMPLE: [&str; 5] = [
    "Inspector",
    "Revisa reportes en campo",
    "#2563EB",
    "ver_reportes;ver_mapa;cambiar_estado_reportes",
    "true",
];

/// Header line plus one example row.
pub fn template_csv(kind: ImportKind) -> Result<String, DomainError> {
    let (header, example): (&[&str], &[&str]) = match kind {
        ImportKind::Users => (&USER_COLUMNS, &USER_EXAMPLE),
        ImportKind::Roles => (&ROLE_COLUMNS, &ROLE_EXAMPLE),
    };

    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(header)
        .and_then(|_| writer.write_record(example))
        .map_err(|e| DomainError::InternalError(format!("Failed to write template: {}", e)))?;
    let bytes = writer
        .into_inner()
        .map_err(|e| DomainError::InternalError(format!("Failed to flush template: {}", e)))?;

    String::from_utf8(bytes).map_err(|e| DomainError::InternalError(e.to_string()))
}
