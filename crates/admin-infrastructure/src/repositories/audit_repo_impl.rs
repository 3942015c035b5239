// ============================================================================
// Admin Infrastructure - Audit Repository
// File: crates/admin-infrastructure/src/repositories/audit_repo_impl.rs
// Description: Activity log and change history through backend RPCs
// ============================================================================

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use admin_core::domain::{ActivityEntry, ChangeRecord, NewActivity};
use admin_core::error::DomainError;
use admin_core::repositories::AuditRepository;

use crate::backend::BackendClient;

const ACTIVITIES_TABLE: &str = "actividades";
const RECENT_ACTIVITIES_RPC: &str = "obtener_actividades_recientes";
const CHANGE_HISTORY_RPC: &str = "obtener_historial_cambios";

#[derive(Serialize)]
struct RecentActivitiesArgs {
    limite: usize,
}

#[derive(Serialize)]
struct ChangeHistoryArgs {
    p_tabla: Option<String>,
    p_registro_id: Option<String>,
    limite: usize,
}

pub struct BackendAuditRepository {
    client: Arc<BackendClient>,
}

impl BackendAuditRepository {
    pub fn new(client: Arc<BackendClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl AuditRepository for BackendAuditRepository {
    async fn recent_activities(&self, limit: usize) -> Result<Vec<ActivityEntry>, DomainError> {
        Ok(self
            .client
            .rpc(RECENT_ACTIVITIES_RPC, &RecentActivitiesArgs { limite: limit })
            .await?)
    }

    async fn change_history(
        &self,
        tabla: Option<String>,
        registro_id: Option<String>,
        limit: usize,
    ) -> Result<Vec<ChangeRecord>, DomainError> {
        let args = ChangeHistoryArgs { p_tabla: tabla, p_registro_id: registro_id, limite: limit };
        Ok(self.client.rpc(CHANGE_HISTORY_RPC, &args).await?)
    }

    async fn record(&self, activity: &NewActivity) -> Result<(), DomainError> {
        let _: Vec<Value> = self.client.insert(ACTIVITIES_TABLE, activity).await?;
        Ok(())
    }
}
