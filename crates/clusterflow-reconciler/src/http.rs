//! HTTP reconciler client
//!
//! Talks to the reconciler's REST API:
//!
//! - `POST   /v1/clusters` — register a configuration
//! - `GET    /v1/clusters/{runtime}/configs/{version}/status` — version status
//! - `GET    /v1/clusters/{runtime}/status` — latest status (existence)
//! - `DELETE /v1/clusters/{runtime}` — remove the registration
//!
//! Response codes are classified per [`crate::error::ReconcilerError`]:
//! 5xx and 429 are temporary, other non-success codes are permanent, and a
//! 404 on delete or existence queries is not an error at all.

use crate::client::ReconcilerClient;
use crate::error::{ReconcilerError, Result};
use crate::model::{ClusterConfiguration, ClusterState};
use async_trait::async_trait;
use reqwest::StatusCode;

const RECONCILER_URL_ENV: &str = "RECONCILER_URL";

/// Reconciler REST API client
#[derive(Debug)]
pub struct HttpReconcilerClient {
    http: reqwest::Client,
    base_url: String,
}

impl HttpReconcilerClient {
    /// Create a client for the reconciler at `base_url`
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Create a client with a host-configured transport (timeouts,
    /// authentication middleware, proxies)
    pub fn with_http_client(base_url: impl Into<String>, http: reqwest::Client) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }

    /// Create a client from the `RECONCILER_URL` environment variable
    pub fn from_env() -> Result<Self> {
        let base_url = std::env::var(RECONCILER_URL_ENV)
            .map_err(|_| ReconcilerError::MissingEnvVar(RECONCILER_URL_ENV.to_string()))?;
        Ok(Self::new(base_url))
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }
}

#[async_trait]
impl ReconcilerClient for HttpReconcilerClient {
    async fn apply_cluster_config(
        &self,
        configuration: &ClusterConfiguration,
    ) -> Result<ClusterState> {
        let url = self.url("/v1/clusters");
        let response = self.http.post(&url).json(configuration).send().await?;

        if !response.status().is_success() {
            return Err(response_error(response).await);
        }
        Ok(response.json::<ClusterState>().await?)
    }

    async fn get_cluster(
        &self,
        runtime_id: &str,
        configuration_version: i64,
    ) -> Result<ClusterState> {
        let url = self.url(&format!(
            "/v1/clusters/{}/configs/{}/status",
            runtime_id, configuration_version
        ));
        let response = self.http.get(&url).send().await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(ReconcilerError::ClusterNotFound {
                runtime_id: runtime_id.to_string(),
            });
        }
        if !response.status().is_success() {
            return Err(response_error(response).await);
        }

        // Decode by hand so the raw body is available at debug level;
        // unrecognized status values surface to the caller as Unknown.
        let body = response.text().await?;
        tracing::debug!("Cluster status response for {}: {}", runtime_id, body);
        serde_json::from_str(&body).map_err(|e| ReconcilerError::InvalidResponse(e.to_string()))
    }

    async fn delete_cluster(&self, runtime_id: &str) -> Result<()> {
        let url = self.url(&format!("/v1/clusters/{}", runtime_id));
        let response = self.http.delete(&url).send().await?;

        // Absence is success: deleting an unregistered cluster is a no-op
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(());
        }
        if !response.status().is_success() {
            return Err(response_error(response).await);
        }
        Ok(())
    }

    async fn cluster_exists(&self, runtime_id: &str) -> Result<bool> {
        let url = self.url(&format!("/v1/clusters/{}/status", runtime_id));
        let response = self.http.get(&url).send().await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(false);
        }
        if !response.status().is_success() {
            return Err(response_error(response).await);
        }
        Ok(true)
    }
}

/// Map a non-success response onto the error taxonomy
async fn response_error(response: reqwest::Response) -> ReconcilerError {
    let status = response.status();
    if status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
        return ReconcilerError::Unavailable {
            status: status.as_u16(),
        };
    }
    let message = response.text().await.unwrap_or_default();
    ReconcilerError::Rejected {
        status: status.as_u16(),
        message,
    }
}
