// ============================================================================
// Admin Core - Audit Records
// File: crates/admin-core/src/domain/audit.rs
// Description: Activity log entries, row change history and field diffs
// ============================================================================

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// Columns maintained by the backend on every write; never shown in diffs.
pub const IGNORED_DIFF_FIELDS: [&str; 2] = ["created_at", "updated_at"];

/// Entry from the `actividades` log
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityEntry {
    pub id: Uuid,
    #[serde(default)]
    pub usuario_id: Option<Uuid>,
    #[serde(default)]
    pub usuario_email: Option<String>,
    pub accion: String,
    pub entidad: String,
    #[serde(default)]
    pub entidad_id: Option<String>,
    #[serde(default)]
    pub descripcion: Option<String>,
    #[serde(default)]
    pub metadata: Option<Value>,
    #[serde(default)]
    pub ip: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Activity to be written to the `actividades` log
#[derive(Debug, Clone, Serialize)]
pub struct NewActivity {
    pub usuario_id: Option<Uuid>,
    pub usuario_email: Option<String>,
    pub accion: String,
    pub entidad: String,
    pub entidad_id: Option<String>,
    pub descripcion: Option<String>,
    pub metadata: Option<Value>,
}

impl NewActivity {
    pub fn builder(accion: impl Into<String>, entidad: impl Into<String>) -> NewActivityBuilder {
        NewActivityBuilder::new(accion, entidad)
    }
}

/// Builder pattern for NewActivity
pub struct NewActivityBuilder {
    activity: NewActivity,
}

impl NewActivityBuilder {
    pub fn new(accion: impl Into<String>, entidad: impl Into<String>) -> Self {
        Self {
            activity: NewActivity {
                usuario_id: None,
                usuario_email: None,
                accion: accion.into(),
                entidad: entidad.into(),
                entidad_id: None,
                descripcion: None,
                metadata: None,
            },
        }
    }

    pub fn usuario(mut self, id: Uuid, email: impl Into<String>) -> Self {
        self.activity.usuario_id = Some(id);
        self.activity.usuario_email = Some(email.into());
        self
    }

    pub fn entidad_id(mut self, id: impl ToString) -> Self {
        self.activity.entidad_id = Some(id.to_string());
        self
    }

    pub fn descripcion(mut self, text: impl Into<String>) -> Self {
        self.activity.descripcion = Some(text.into());
        self
    }

    /// Adds one key to the metadata object.
    pub fn metadata(mut self, key: &str, value: impl Into<Value>) -> Self {
        let meta = self
            .activity
            .metadata
            .get_or_insert_with(|| Value::Object(Map::new()));
        if let Value::Object(map) = meta {
            map.insert(key.to_string(), value.into());
        }
        self
    }

    pub fn build(self) -> NewActivity {
        self.activity
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Operation {
    Insert,
    Update,
    Delete,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Insert => "INSERT",
            Operation::Update => "UPDATE",
            Operation::Delete => "DELETE",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "INSERT" => Some(Operation::Insert),
            "UPDATE" => Some(Operation::Update),
            "DELETE" => Some(Operation::Delete),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Operation::Insert => "Creación",
            Operation::Update => "Modificación",
            Operation::Delete => "Eliminación",
        }
    }
}

/// Row-level change captured by the backend triggers (`cambios_historial`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangeRecord {
    pub id: Uuid,
    pub tabla: String,
    pub registro_id: String,
    pub operacion: Operation,
    #[serde(default)]
    pub datos_anteriores: Option<Value>,
    #[serde(default)]
    pub datos_nuevos: Option<Value>,
    #[serde(default)]
    pub usuario_id: Option<Uuid>,
    #[serde(default)]
    pub usuario_email: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    Added,
    Removed,
    Modified,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldChange {
    pub campo: String,
    pub kind: ChangeKind,
    pub anterior: Option<Value>,
    pub nuevo: Option<Value>,
    pub anterior_texto: String,
    pub nuevo_texto: String,
}

fn as_object(value: Option<&Value>) -> Option<&Map<String, Value>> {
    value.and_then(Value::as_object)
}

/// Field-level diff between two row snapshots, sorted by field name.
/// A missing snapshot (INSERT/DELETE) diffs against an empty row.
pub fn diff_rows(before: Option<&Value>, after: Option<&Value>) -> Vec<FieldChange> {
    let empty = Map::new();
    let before = as_object(before).unwrap_or(&empty);
    let after = as_object(after).unwrap_or(&empty);

    let fields: BTreeSet<&String> = before.keys().chain(after.keys()).collect();

    fields
        .into_iter()
        .filter(|f| !IGNORED_DIFF_FIELDS.contains(&f.as_str()))
        .filter_map(|field| {
            let old = before.get(field);
            let new = after.get(field);
            let kind = match (old, new) {
                (None, Some(_)) => ChangeKind::Added,
                (Some(_), None) => ChangeKind::Removed,
                (Some(o), Some(n)) if o != n => ChangeKind::Modified,
                _ => return None,
            };
            Some(FieldChange {
                campo: field.clone(),
                kind,
                anterior: old.cloned(),
                nuevo: new.cloned(),
                anterior_texto: old.map(display_value).unwrap_or_else(|| display_value(&Value::Null)),
                nuevo_texto: new.map(display_value).unwrap_or_else(|| display_value(&Value::Null)),
            })
        })
        .collect()
}

/// Human-readable rendering of a JSON value for the history table.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::Null => "—".to_string(),
        Value::Bool(true) => "Sí".to_string(),
        Value::Bool(false) => "No".to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        Value::Array(items) => items.iter().map(display_value).collect::<Vec<_>>().join(", "),
        Value::Object(_) => value.to_string(),
    }
}

/// Change record plus its computed diff, as rendered by the history viewer
#[derive(Debug, Clone, Serialize)]
pub struct ChangeView {
    pub id: Uuid,
    pub tabla: String,
    pub registro_id: String,
    pub operacion: Operation,
    pub operacion_label: &'static str,
    pub usuario_id: Option<Uuid>,
    pub usuario_email: Option<String>,
    pub created_at: DateTime<Utc>,
    pub cambios: Vec<FieldChange>,
}

impl From<ChangeRecord> for ChangeView {
    fn from(record: ChangeRecord) -> Self {
        let cambios = diff_rows(record.datos_anteriores.as_ref(), record.datos_nuevos.as_ref());
        Self {
            id: record.id,
            tabla: record.tabla,
            registro_id: record.registro_id,
            operacion: record.operacion,
            operacion_label: record.operacion.label(),
            usuario_id: record.usuario_id,
            usuario_email: record.usuario_email,
            created_at: record.created_at,
            cambios,
        }
    }
}
