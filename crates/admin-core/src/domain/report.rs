// ============================================================================
// Admin Core - Report Entity
// File: crates/admin-core/src/domain/report.rs
// Description: Geo-located issue records (`reportes` table)
// ============================================================================

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{json, Value};
use tracing::warn;
use uuid::Uuid;

/// Report status enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    Pendiente,
    EnProceso,
    Resuelto,
    Rechazado,
}

impl ReportStatus {
    pub const ALL: [ReportStatus; 4] = [
        ReportStatus::Pendiente,
        ReportStatus::EnProceso,
        ReportStatus::Resuelto,
        ReportStatus::Rechazado,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ReportStatus::Pendiente => "pendiente",
            ReportStatus::EnProceso => "en_proceso",
            ReportStatus::Resuelto => "resuelto",
            ReportStatus::Rechazado => "rechazado",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|st| st.as_str() == s.trim().to_lowercase())
    }

    pub fn label(&self) -> &'static str {
        match self {
            ReportStatus::Pendiente => "Pendiente",
            ReportStatus::EnProceso => "En proceso",
            ReportStatus::Resuelto => "Resuelto",
            ReportStatus::Rechazado => "Rechazado",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, ReportStatus::Resuelto | ReportStatus::Rechazado)
    }

    /// Terminal states only reopen to `pendiente`; staying in place is not a
    /// transition.
    pub fn can_transition_to(&self, next: ReportStatus) -> bool {
        if *self == next {
            return false;
        }
        if self.is_terminal() {
            return next == ReportStatus::Pendiente;
        }
        true
    }
}

impl Default for ReportStatus {
    fn default() -> Self {
        ReportStatus::Pendiente
    }
}

/// Report priority enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportPriority {
    Baja,
    Media,
    Alta,
    Urgente,
}

impl ReportPriority {
    pub const ALL: [ReportPriority; 4] = [
        ReportPriority::Baja,
        ReportPriority::Media,
        ReportPriority::Alta,
        ReportPriority::Urgente,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ReportPriority::Baja => "baja",
            ReportPriority::Media => "media",
            ReportPriority::Alta => "alta",
            ReportPriority::Urgente => "urgente",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|p| p.as_str() == s.trim().to_lowercase())
    }
}

impl Default for ReportPriority {
    fn default() -> Self {
        ReportPriority::Media
    }
}

// Unknown stored values decode to the default instead of failing the row.
fn lenient_status<'de, D>(deserializer: D) -> Result<ReportStatus, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(match raw {
        Some(value) => ReportStatus::from_str(&value).unwrap_or_else(|| {
            warn!("Unknown report estado '{}', using {}", value, ReportStatus::default().as_str());
            ReportStatus::default()
        }),
        None => ReportStatus::default(),
    })
}

fn lenient_priority<'de, D>(deserializer: D) -> Result<ReportPriority, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(match raw {
        Some(value) => ReportPriority::from_str(&value).unwrap_or_else(|| {
            warn!("Unknown report prioridad '{}', using {}", value, ReportPriority::default().as_str());
            ReportPriority::default()
        }),
        None => ReportPriority::default(),
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Option<Self> {
        let point = Self { lat, lon };
        point.is_valid().then_some(point)
    }

    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lon.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lon)
    }
}

/// Map viewport. Does not handle boxes crossing the antimeridian.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub min_lon: f64,
    pub max_lat: f64,
    pub max_lon: f64,
}

impl BoundingBox {
    /// Parses `min_lon,min_lat,max_lon,max_lat` (GeoJSON bbox order).
    pub fn parse(raw: &str) -> Option<Self> {
        let parts: Vec<f64> = raw
            .split(',')
            .map(|p| p.trim().parse::<f64>())
            .collect::<Result<_, _>>()
            .ok()?;
        let [min_lon, min_lat, max_lon, max_lat] = parts.as_slice() else {
            return None;
        };
        let bbox = Self {
            min_lat: *min_lat,
            min_lon: *min_lon,
            max_lat: *max_lat,
            max_lon: *max_lon,
        };
        let corners_valid = GeoPoint { lat: bbox.min_lat, lon: bbox.min_lon }.is_valid()
            && GeoPoint { lat: bbox.max_lat, lon: bbox.max_lon }.is_valid();
        (corners_valid && bbox.min_lat <= bbox.max_lat && bbox.min_lon <= bbox.max_lon).then_some(bbox)
    }

    pub fn contains(&self, point: &GeoPoint) -> bool {
        (self.min_lat..=self.max_lat).contains(&point.lat)
            && (self.min_lon..=self.max_lon).contains(&point.lon)
    }
}

/// Report record as stored by the backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub id: Uuid,
    pub titulo: String,
    #[serde(default)]
    pub descripcion: Option<String>,
    #[serde(default)]
    pub categoria: Option<String>,
    #[serde(default, deserialize_with = "lenient_status")]
    pub estado: ReportStatus,
    #[serde(default, deserialize_with = "lenient_priority")]
    pub prioridad: ReportPriority,
    #[serde(default)]
    pub latitud: Option<f64>,
    #[serde(default)]
    pub longitud: Option<f64>,
    #[serde(default)]
    pub direccion: Option<String>,
    #[serde(default)]
    pub usuario_id: Option<Uuid>,
    #[serde(default)]
    pub asignado_a: Option<Uuid>,
    #[serde(default)]
    pub imagen_url: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Report {
    /// Location, when both coordinates are present and in range.
    pub fn location(&self) -> Option<GeoPoint> {
        match (self.latitud, self.longitud) {
            (Some(lat), Some(lon)) => GeoPoint::new(lat, lon),
            _ => None,
        }
    }
}

/// GeoJSON FeatureCollection of the reports that have a valid location.
pub fn to_feature_collection(reports: &[Report]) -> Value {
    let features: Vec<Value> = reports
        .iter()
        .filter_map(|r| {
            let point = r.location()?;
            Some(json!({
                "type": "Feature",
                "id": r.id,
                "geometry": {
                    "type": "Point",
                    "coordinates": [point.lon, point.lat],
                },
                "properties": {
                    "id": r.id,
                    "titulo": r.titulo,
                    "estado": r.estado,
                    "prioridad": r.prioridad,
                    "categoria": r.categoria,
                    "direccion": r.direccion,
                },
            }))
        })
        .collect();

    json!({
        "type": "FeatureCollection",
        "features": features,
    })
}

/// Dashboard counters
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ReportStats {
    pub total: usize,
    pub sin_ubicacion: usize,
    pub sin_asignar: usize,
    pub por_estado: BTreeMap<&'static str, usize>,
    pub por_prioridad: BTreeMap<&'static str, usize>,
}

impl ReportStats {
    pub fn from_reports(reports: &[Report]) -> Self {
        let mut stats = ReportStats {
            total: reports.len(),
            por_estado: ReportStatus::ALL.iter().map(|s| (s.as_str(), 0)).collect(),
            por_prioridad: ReportPriority::ALL.iter().map(|p| (p.as_str(), 0)).collect(),
            ..Default::default()
        };
        for r in reports {
            *stats.por_estado.entry(r.estado.as_str()).or_default() += 1;
            *stats.por_prioridad.entry(r.prioridad.as_str()).or_default() += 1;
            if r.location().is_none() {
                stats.sin_ubicacion += 1;
            }
            if r.asignado_a.is_none() {
                stats.sin_asignar += 1;
            }
        }
        stats
    }
}

#[cfg(test)]
pub(crate) fn sample_report(titulo: &str, lat: Option<f64>, lon: Option<f64>) -> Report {
    Report {
        id: Uuid::new_v4(),
        titulo: titulo.to_string(),
        descripcion: None,
        categoria: Some("alumbrado".to_string()),
        estado: ReportStatus::Pendiente,
        prioridad: ReportPriority::Media,
        latitud: lat,
        longitud: lon,
        direccion: None,
        usuario_id: None,
        asignado_a: None,
        imagen_url: None,
        created_at: Utc::now(),
        updated_at: None,
    }
}
