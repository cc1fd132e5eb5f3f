//! IFPI ISRC registry client
//!
//! Looks up recording metadata by ISRC code. Mirrors the ISWC client:
//! endpoint and Bearer key come from configuration, and an unconfigured
//! registry answers "no data" without going on the network.

use serde_json::Value;

use crate::config::RegistryEndpoint;
use crate::services::source::{non_null, LookupResult, SourceError};

/// IFPI ISRC registry client
#[derive(Debug, Clone)]
pub struct IfpiClient {
    http_client: reqwest::Client,
    endpoint: Option<RegistryEndpoint>,
}

impl IfpiClient {
    pub fn new(http_client: reqwest::Client, endpoint: Option<RegistryEndpoint>) -> Self {
        Self {
            http_client,
            endpoint,
        }
    }

    /// Look up an ISRC code in the IFPI registry.
    ///
    /// The code is forwarded verbatim; normalization (uppercasing, stripping
    /// separators) is left to the caller's presentation layer.
    pub async fn lookup(&self, isrc: &str) -> LookupResult {
        let Some(endpoint) = &self.endpoint else {
            tracing::debug!("IFPI registry not configured, skipping lookup");
            return Ok(None);
        };

        tracing::debug!(isrc = %isrc, "Querying IFPI registry");

        let response = self
            .http_client
            .get(&endpoint.url)
            .query(&[("isrc", isrc)])
            .header("Authorization", format!("Bearer {}", endpoint.api_key))
            .send()
            .await
            .map_err(|e| SourceError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(SourceError::Api(status.as_u16(), error_text));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| SourceError::Parse(e.to_string()))?;

        Ok(non_null(body))
    }
}
