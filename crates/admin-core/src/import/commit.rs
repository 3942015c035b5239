//! Commit loop: creates every submittable row, one at a time

use std::future::Future;

use serde::Serialize;
use tracing::{info, warn};

use super::row::ImportRow;
use super::users::ImportedUser;
use super::ImportKind;
use crate::domain::NewRole;
use crate::error::DomainError;

/// Human identifier used in the report for a record.
pub trait Labelled {
    fn etiqueta(&self) -> String;
}

impl Labelled for ImportedUser {
    fn etiqueta(&self) -> String {
        self.user.email.clone()
    }
}

impl Labelled for NewRole {
    fn etiqueta(&self) -> String {
        self.nombre.clone()
    }
}

/// What the creation port hands back for one record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreatedItem {
    pub id: String,
    pub etiqueta: String,
    /// Only set for users whose password was generated during import.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password_temporal: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreatedRow {
    pub line: u64,
    #[serde(flatten)]
    pub item: CreatedItem,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FailedRow {
    pub line: u64,
    pub etiqueta: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ImportReport {
    pub kind: ImportKind,
    pub total: usize,
    pub created: Vec<CreatedRow>,
    pub failed: Vec<FailedRow>,
    /// Rows left out because they did not pass validation.
    pub skipped: usize,
}

impl ImportReport {
    pub fn created_count(&self) -> usize {
        self.created.len()
    }

    pub fn failed_count(&self) -> usize {
        self.failed.len()
    }
}

pub struct BulkImporter {
    kind: ImportKind,
}

impl BulkImporter {
    pub fn new(kind: ImportKind) -> Self {
        Self { kind }
    }

    /// Calls `create` for each submittable row in file order. A failing row
    /// is recorded and the loop moves on.
    pub async fn run<T, F, Fut>(&self, rows: Vec<ImportRow<T>>, mut create: F) -> ImportReport
    where
        T: Labelled,
        F: FnMut(T) -> Fut,
        Fut: Future<Output = Result<CreatedItem, DomainError>>,
    {
        let mut report = ImportReport {
            kind: self.kind,
            total: rows.len(),
            created: Vec::new(),
            failed: Vec::new(),
            skipped: 0,
        };

        for row in rows {
            let line = row.line;
            let submittable = row.is_submittable();
            let record = match row.record {
                Some(record) if submittable => record,
                _ => {
                    report.skipped += 1;
                    continue;
                }
            };

            let etiqueta = record.etiqueta();
            match create(record).await {
                Ok(item) => report.created.push(CreatedRow { line, item }),
                Err(e) => {
                    warn!(kind = self.kind.as_str(), line, etiqueta = %etiqueta, "Import row failed: {}", e);
                    report.failed.push(FailedRow { line, etiqueta, message: e.to_string() });
                }
            }
        }

        info!(
            kind = self.kind.as_str(),
            total = report.total,
            created = report.created.len(),
            failed = report.failed.len(),
            skipped = report.skipped,
            "Bulk import finished"
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    fn role_row(line: u64, nombre: &str, valid: bool) -> ImportRow<NewRole> {
        let mut row = ImportRow::new(line, BTreeMap::new());
        if !valid {
            row.error("nombre inválido");
        }
        let role = NewRole::new(nombre.to_string(), None, "#FFF".to_string(), vec![], true).unwrap();
        row.finish(Some(role))
    }

    #[tokio::test]
    async fn test_failures_do_not_abort_the_loop() {
        let rows = vec![
            role_row(2, "Operador", true),
            role_row(3, "Invalido", false),
            role_row(4, "Chocante", true),
            role_row(5, "Consulta", true),
        ];

        let mut calls = Vec::new();
        let report = BulkImporter::new(ImportKind::Roles)
            .run(rows, |role: NewRole| {
                calls.push(role.nombre.clone());
                let result = if role.nombre == "Chocante" {
                    Err(DomainError::BackendError("duplicate key".to_string()))
                } else {
                    Ok(CreatedItem { id: format!("id-{}", role.nombre), etiqueta: role.nombre, password_temporal: None })
                };
                async move { result }
            })
            .await;

        assert_eq!(calls, vec!["Operador", "Chocante", "Consulta"]);
        assert_eq!(report.total, 4);
        assert_eq!(report.skipped, 1);
        assert_eq!(report.created_count(), 2);
        assert_eq!(report.created[1].line, 5);
        assert_eq!(report.failed_count(), 1);
        assert_eq!(report.failed[0].line, 4);
        assert_eq!(report.failed[0].etiqueta, "Chocante");
        assert!(report.failed[0].message.contains("duplicate key"));
    }

    #[test]
    fn test_created_row_serialization() {
        let row = CreatedRow {
            line: 2,
            item: CreatedItem { id: "1".into(), etiqueta: "ana@example.com".into(), password_temporal: None },
        };
        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(json, serde_json::json!({"line": 2, "id": "1", "etiqueta": "ana@example.com"}));
    }
}
