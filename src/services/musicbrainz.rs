//! MusicBrainz recording search client
//!
//! Queries the MusicBrainz `/ws/2/recording` search endpoint two ways: a
//! quoted full-text query on the recording title, or an `isrc:` field query.
//! MusicBrainz needs no API key, only a descriptive User-Agent, so this
//! client is always enabled.

use serde::Deserialize;
use serde_json::Value;

use crate::services::source::{LookupResult, SourceError};

const MUSICBRAINZ_BASE_URL: &str = "https://musicbrainz.org/ws/2";

/// Body shape of the recording search endpoint.
///
/// Recordings stay opaque JSON; the response is handed to the caller as-is
/// and any display shaping happens client-side.
#[derive(Debug, Deserialize)]
struct RecordingSearchResponse {
    #[serde(default)]
    recordings: Vec<Value>,
}

/// MusicBrainz API client
#[derive(Debug, Clone)]
pub struct MusicBrainzClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl MusicBrainzClient {
    pub fn new(http_client: reqwest::Client) -> Self {
        Self {
            http_client,
            base_url: MUSICBRAINZ_BASE_URL.to_string(),
        }
    }

    /// Point the client at a different server (tests run against a local mock).
    pub fn with_base_url(http_client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http_client,
            base_url: base_url.into(),
        }
    }

    /// Search recordings by song title, returning the first match
    pub async fn search_by_song_name(&self, song_name: &str) -> LookupResult {
        // Quoted phrase search against the recording title field
        let query = format!("recording:\"{}\"", song_name);
        self.search_recordings(&query).await
    }

    /// Search recordings by ISRC code, returning the first match
    pub async fn search_by_isrc(&self, isrc: &str) -> LookupResult {
        let query = format!("isrc:{}", isrc);
        self.search_recordings(&query).await
    }

    async fn search_recordings(&self, query: &str) -> LookupResult {
        let url = format!("{}/recording", self.base_url);

        tracing::debug!(query = %query, "Querying MusicBrainz recording search");

        let response = self
            .http_client
            .get(&url)
            .query(&[("query", query), ("fmt", "json")])
            .send()
            .await
            .map_err(|e| SourceError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(SourceError::Api(status.as_u16(), error_text));
        }

        let parsed: RecordingSearchResponse = response
            .json()
            .await
            .map_err(|e| SourceError::Parse(e.to_string()))?;

        Ok(first_recording(parsed.recordings))
    }
}

/// The search endpoint ranks by score; the first entry is the best match.
fn first_recording(recordings: Vec<Value>) -> Option<Value> {
    recordings.into_iter().next()
}
