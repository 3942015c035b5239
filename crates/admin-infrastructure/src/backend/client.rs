// ============================================================================
// Admin Infrastructure - Backend Client
// File: crates/admin-infrastructure/src/backend/client.rs
// Description: REST/RPC client for the managed backend (tables, functions,
//              auth admin)
// ============================================================================

use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, error};
use uuid::Uuid;

use admin_shared::config::BackendSettings;

use super::error::BackendError;

/// Query pair for an equality filter, e.g. `eq("id", id)` -> `id=eq.<id>`.
pub fn eq(column: &'static str, value: impl ToString) -> (&'static str, String) {
    (column, format!("eq.{}", value.to_string()))
}

#[derive(Debug, Deserialize)]
struct AuthUser {
    id: Uuid,
}

#[derive(Clone)]
pub struct BackendClient {
    http: Client,
    base_url: String,
    service_key: String,
}

impl BackendClient {
    pub fn new(settings: &BackendSettings) -> Result<Self, BackendError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_seconds))
            .build()?;

        Ok(Self {
            http,
            base_url: settings.url.trim_end_matches('/').to_string(),
            service_key: settings.service_role_key.clone(),
        })
    }

    fn rest_url(&self, path: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, path)
    }

    fn auth_url(&self, path: &str) -> String {
        format!("{}/auth/v1/{}", self.base_url, path)
    }

    /// Every call runs with the service key, bypassing row-level policies.
    fn request(&self, method: Method, url: String) -> RequestBuilder {
        self.http
            .request(method, url)
            .header("apikey", &self.service_key)
            .bearer_auth(&self.service_key)
    }

    async fn check(response: Response) -> Result<Response, BackendError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<Value>(&body)
            .ok()
            .and_then(|v| {
                ["message", "msg", "error_description", "error"]
                    .iter()
                    .find_map(|k| v.get(*k).and_then(Value::as_str).map(str::to_string))
            })
            .unwrap_or(body);

        error!(status = status.as_u16(), "Backend request failed: {}", message);
        Err(BackendError::Status { status: status.as_u16(), message })
    }

    async fn parse<T: DeserializeOwned>(response: Response) -> Result<T, BackendError> {
        let response = Self::check(response).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| BackendError::Decode(e.to_string()))
    }

    /// `GET /rest/v1/{table}` with PostgREST query parameters.
    pub async fn select<T: DeserializeOwned>(
        &self,
        table: &str,
        query: &[(&str, String)],
    ) -> Result<Vec<T>, BackendError> {
        debug!(table, "select");
        let response = self
            .request(Method::GET, self.rest_url(table))
            .query(query)
            .send()
            .await?;
        Self::parse(response).await
    }

    /// Inserts and returns the stored rows.
    pub async fn insert<B, T>(&self, table: &str, body: &B) -> Result<Vec<T>, BackendError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        debug!(table, "insert");
        let response = self
            .request(Method::POST, self.rest_url(table))
            .header("Prefer", "return=representation")
            .json(body)
            .send()
            .await?;
        Self::parse(response).await
    }

    /// `PATCH` of the rows matching `filter`; returns them after the update.
    /// `filter` may also carry a `select` to embed related rows.
    pub async fn update<B, T>(
        &self,
        table: &str,
        filter: &[(&str, String)],
        body: &B,
    ) -> Result<Vec<T>, BackendError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        debug!(table, "update");
        let response = self
            .request(Method::PATCH, self.rest_url(table))
            .header("Prefer", "return=representation")
            .query(filter)
            .json(body)
            .send()
            .await?;
        Self::parse(response).await
    }

    pub async fn delete(&self, table: &str, filter: &[(&str, String)]) -> Result<(), BackendError> {
        debug!(table, "delete");
        let response = self
            .request(Method::DELETE, self.rest_url(table))
            .query(filter)
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    /// `POST /rest/v1/rpc/{function}` with named arguments.
    pub async fn rpc<A, T>(&self, function: &str, args: &A) -> Result<T, BackendError>
    where
        A: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        debug!(function, "rpc");
        let response = self
            .request(Method::POST, self.rest_url(&format!("rpc/{}", function)))
            .json(args)
            .send()
            .await?;
        Self::parse(response).await
    }

    /// Creates a confirmed auth account; the backend creates the matching
    /// `profiles` row.
    pub async fn create_auth_user(
        &self,
        email: &str,
        password: &str,
        metadata: Value,
    ) -> Result<Uuid, BackendError> {
        let response = self
            .request(Method::POST, self.auth_url("admin/users"))
            .json(&json!({
                "email": email,
                "password": password,
                "email_confirm": true,
                "user_metadata": metadata,
            }))
            .send()
            .await?;
        let user: AuthUser = Self::parse(response).await?;
        Ok(user.id)
    }

    pub async fn delete_auth_user(&self, id: &Uuid) -> Result<(), BackendError> {
        let response = self
            .request(Method::DELETE, self.auth_url(&format!("admin/users/{}", id)))
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    /// Cheap query used by the readiness probe.
    pub async fn ping(&self) -> Result<(), BackendError> {
        let _: Vec<Value> = self
            .select("roles", &[("select", "id".to_string()), ("limit", "1".to_string())])
            .await?;
        Ok(())
    }
}
