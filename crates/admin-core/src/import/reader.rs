//! CSV parsing into header-keyed rows

use std::collections::BTreeMap;

use tracing::debug;

use crate::error::DomainError;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

#[derive(Debug, Clone, PartialEq)]
pub struct CsvRow {
    /// 1-based line number in the uploaded file.
    pub line: u64,
    pub values: BTreeMap<String, String>,
}

impl CsvRow {
    /// Trimmed value, `None` when the column is absent or blank.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.values.get(column).map(|v| v.trim()).filter(|v| !v.is_empty())
    }
}

#[derive(Debug, Clone, Default)]
pub struct CsvTable {
    pub headers: Vec<String>,
    pub rows: Vec<CsvRow>,
    /// File-level notices, e.g. unknown columns.
    pub warnings: Vec<String>,
}

/// Picks `;` when the header line uses it and has no commas (spreadsheet
/// exports in Spanish locales).
fn detect_delimiter(bytes: &[u8]) -> u8 {
    let first_line = bytes.split(|b| *b == b'\n').next().unwrap_or_default();
    let commas = first_line.iter().filter(|b| **b == b',').count();
    let semicolons = first_line.iter().filter(|b| **b == b';').count();
    if semicolons > 0 && commas == 0 {
        b';'
    } else {
        b','
    }
}

/// Parses an uploaded CSV. Headers are trimmed and lowercased; fully blank
/// rows are skipped. Fails when a required column is missing, the file has
/// no data rows, or it exceeds `max_rows`.
pub fn read_csv(
    bytes: &[u8],
    required: &[&str],
    known: &[&str],
    max_rows: usize,
) -> Result<CsvTable, DomainError> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Err(DomainError::ImportError("El archivo está vacío".to_string()));
    }

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(detect_delimiter(bytes))
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(bytes);

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| DomainError::ImportError(format!("Encabezado CSV inválido: {}", e)))?
        .iter()
        .map(|h| h.trim().to_lowercase())
        .collect();

    let missing: Vec<&str> = required
        .iter()
        .copied()
        .filter(|r| !headers.iter().any(|h| h == r))
        .collect();
    if !missing.is_empty() {
        return Err(DomainError::ImportError(format!(
            "Faltan columnas obligatorias: {}",
            missing.join(", ")
        )));
    }

    let mut warnings = Vec::new();
    let unknown: Vec<&str> = headers
        .iter()
        .map(String::as_str)
        .filter(|h| !h.is_empty() && !known.contains(h))
        .collect();
    if !unknown.is_empty() {
        warnings.push(format!("Columnas desconocidas ignoradas: {}", unknown.join(", ")));
    }

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| DomainError::ImportError(format!("CSV mal formado: {}", e)))?;
        if record.iter().all(|v| v.trim().is_empty()) {
            continue;
        }
        if rows.len() == max_rows {
            return Err(DomainError::ImportError(format!(
                "El archivo supera el máximo de {} filas",
                max_rows
            )));
        }

        let line = record.position().map(|p| p.line()).unwrap_or(rows.len() as u64 + 2);
        let values = headers
            .iter()
            .zip(record.iter())
            .filter(|(h, _)| known.contains(&h.as_str()))
            .map(|(h, v)| (h.clone(), v.to_string()))
            .collect();
        rows.push(CsvRow { line, values });
    }

    if rows.is_empty() {
        return Err(DomainError::ImportError("El archivo no contiene filas de datos".to_string()));
    }

    debug!("Parsed CSV with {} columns and {} rows", headers.len(), rows.len());
    Ok(CsvTable { headers, rows, warnings })
}

/// Boolean cell parser; `None` for unrecognised values.
pub fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "true" | "1" | "si" | "sí" | "yes" | "y" | "s" | "activo" | "verdadero" => Some(true),
        "false" | "0" | "no" | "n" | "inactivo" | "falso" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KNOWN: [&str; 3] = ["email", "rol", "activo"];

    #[test]
    fn test_reads_rows_with_bom_and_case_insensitive_headers() {
        let data = "\u{FEFF}Email , ROL,Activo\nana@example.com, admin ,true\n,,\nluis@example.com,,\n";
        let table = read_csv(data.as_bytes(), &["email"], &KNOWN, 10).unwrap();
        assert_eq!(table.headers, vec!["email", "rol", "activo"]);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0].line, 2);
        assert_eq!(table.rows[0].get("rol"), Some("admin"));
        assert_eq!(table.rows[1].get("rol"), None);
        assert_eq!(table.rows[1].line, 4);
        assert!(table.warnings.is_empty());
    }

    #[test]
    fn test_short_rows_are_accepted() {
        let table = read_csv(b"email,rol,activo\nana@example.com\n", &["email"], &KNOWN, 10).unwrap();
        assert_eq!(table.rows[0].get("email"), Some("ana@example.com"));
        assert_eq!(table.rows[0].get("activo"), None);
    }

    #[test]
    fn test_semicolon_delimiter() {
        let table = read_csv(b"email;rol\nana@example.com;usuario\n", &["email"], &KNOWN, 10).unwrap();
        assert_eq!(table.rows[0].get("rol"), Some("usuario"));
    }

    #[test]
    fn test_missing_required_column() {
        let err = read_csv(b"nombre,rol\nAna,admin\n", &["email"], &KNOWN, 10).unwrap_err();
        assert!(err.to_string().contains("email"));
    }

    #[test]
    fn test_unknown_columns_warned() {
        let table = read_csv(b"email,edad\nana@example.com,30\n", &["email"], &KNOWN, 10).unwrap();
        assert_eq!(table.warnings, vec!["Columnas desconocidas ignoradas: edad".to_string()]);
        assert!(!table.rows[0].values.contains_key("edad"));
    }

    #[test]
    fn test_limits() {
        assert!(read_csv(b"", &["email"], &KNOWN, 10).is_err());
        assert!(read_csv(b"email\n", &["email"], &KNOWN, 10).is_err());
        let data = "email\na@x.com\nb@x.com\nc@x.com\n";
        assert!(read_csv(data.as_bytes(), &["email"], &KNOWN, 2).is_err());
        assert!(read_csv(data.as_bytes(), &["email"], &KNOWN, 3).is_ok());
    }

    #[test]
    fn test_parse_bool() {
        assert_eq!(parse_bool("Sí"), Some(true));
        assert_eq!(parse_bool(" 0 "), Some(false));
        assert_eq!(parse_bool("Inactivo"), Some(false));
        assert_eq!(parse_bool("quizá"), None);
    }
}
