//! Per-row validation results and the preview built from them

use std::collections::BTreeMap;

use serde::Serialize;

use super::ImportKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RowStatus {
    Valid,
    Warning,
    Invalid,
}

#[derive(Debug, Clone, Serialize)]
pub struct ImportRow<T> {
    pub line: u64,
    /// Raw cell values as uploaded, for the preview table.
    pub values: BTreeMap<String, String>,
    /// Record to submit; only set when the row has no errors.
    pub record: Option<T>,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub status: RowStatus,
}

impl<T> ImportRow<T> {
    pub fn new(line: u64, values: BTreeMap<String, String>) -> Self {
        Self {
            line,
            values,
            record: None,
            errors: Vec::new(),
            warnings: Vec::new(),
            status: RowStatus::Valid,
        }
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
    }

    pub fn warn(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Sets the record unless errors were collected, and fixes the status.
    pub fn finish(mut self, record: Option<T>) -> Self {
        if self.errors.is_empty() {
            self.record = record;
        } else {
            self.record = None;
        }
        self.status = if self.record.is_none() {
            RowStatus::Invalid
        } else if self.warnings.is_empty() {
            RowStatus::Valid
        } else {
            RowStatus::Warning
        };
        self
    }

    pub fn is_submittable(&self) -> bool {
        self.status != RowStatus::Invalid && self.record.is_some()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub total: usize,
    pub valid: usize,
    pub with_warnings: usize,
    pub invalid: usize,
}

impl ImportSummary {
    pub fn from_rows<T>(rows: &[ImportRow<T>]) -> Self {
        let mut summary = ImportSummary { total: rows.len(), ..Default::default() };
        for row in rows {
            match row.status {
                RowStatus::Valid => summary.valid += 1,
                RowStatus::Warning => summary.with_warnings += 1,
                RowStatus::Invalid => summary.invalid += 1,
            }
        }
        summary
    }

    pub fn submittable(&self) -> usize {
        self.valid + self.with_warnings
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ImportPreview<T> {
    pub kind: ImportKind,
    pub file_digest: String,
    pub file_warnings: Vec<String>,
    pub summary: ImportSummary,
    pub rows: Vec<ImportRow<T>>,
}

impl<T> ImportPreview<T> {
    pub fn new(kind: ImportKind, file_digest: String, file_warnings: Vec<String>, rows: Vec<ImportRow<T>>) -> Self {
        Self {
            kind,
            file_digest,
            file_warnings,
            summary: ImportSummary::from_rows(&rows),
            rows,
        }
    }
}
