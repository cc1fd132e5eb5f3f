//! ISWC registry client
//!
//! Looks up composition metadata (ISWC identifiers) by song title. The
//! registry endpoint and its Bearer API key come from configuration; when
//! either is missing the client stays disabled and reports "no data"
//! without any network traffic.

use serde_json::Value;

use crate::config::RegistryEndpoint;
use crate::services::source::{non_null, LookupResult, SourceError};

/// ISWC registry client
#[derive(Debug, Clone)]
pub struct IswcNetClient {
    http_client: reqwest::Client,
    endpoint: Option<RegistryEndpoint>,
}

impl IswcNetClient {
    pub fn new(http_client: reqwest::Client, endpoint: Option<RegistryEndpoint>) -> Self {
        Self {
            http_client,
            endpoint,
        }
    }

    /// Look up a song title in the ISWC registry.
    ///
    /// Returns `Ok(None)` immediately when the registry is not configured.
    pub async fn lookup(&self, song_name: &str) -> LookupResult {
        let Some(endpoint) = &self.endpoint else {
            tracing::debug!("ISWC registry not configured, skipping lookup");
            return Ok(None);
        };

        tracing::debug!(song_name = %song_name, "Querying ISWC registry");

        let response = self
            .http_client
            .get(&endpoint.url)
            .query(&[("search", song_name)])
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
