//! Music metadata search endpoint

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{error, info};

use crate::services::SearchResults;
use crate::AppState;

/// Query parameters for the search endpoint.
///
/// Also serialized back into the response `query` block, so the caller sees
/// exactly what was searched for.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchQuery {
    /// Song title to search by
    #[serde(rename = "songName", default)]
    pub song_name: Option<String>,

    /// ISRC code to search by, forwarded verbatim (no normalization)
    #[serde(default)]
    pub isrc: Option<String>,
}

impl SearchQuery {
    /// The song name, if it carries any non-whitespace content
    pub fn provided_song_name(&self) -> Option<&str> {
        provided(self.song_name.as_deref())
    }

    /// The ISRC code, if it carries any non-whitespace content
    pub fn provided_isrc(&self) -> Option<&str> {
        provided(self.isrc.as_deref())
    }
}

/// A parameter counts as provided only when it has non-whitespace content.
/// The returned value is still the raw parameter, not a trimmed copy.
fn provided(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// Response envelope: the echoed query plus one result slot per source
#[derive(Debug, Clone, Serialize)]
pub struct SearchResponse {
    pub query: SearchQuery,
    pub results: SearchResults,
}

/// GET /api/music/search?songName=...&isrc=...
///
/// Requires at least one of `songName` / `isrc`. Fans out to every source
/// the provided identifiers apply to, in parallel, and answers with one
/// slot per source; a source that was skipped, failed, or found nothing is
/// `null`.
pub async fn search_music(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<SearchResponse>, SearchError> {
    let song_name = query.provided_song_name();
    let isrc = query.provided_isrc();

    if song_name.is_none() && isrc.is_none() {
        return Err(SearchError::MissingQuery);
    }

    info!(
        song_name = song_name.unwrap_or("-"),
        isrc = isrc.unwrap_or("-"),
        "Music metadata search"
    );

    let results = state.aggregator.search(song_name, isrc).await;

    Ok(Json(SearchResponse { query, results }))
}

/// Search errors
#[derive(Debug, PartialEq, Eq)]
pub enum SearchError {
    /// Neither identifier carried content
    MissingQuery,
    /// Unexpected failure while assembling the response
    Internal(String),
}

impl IntoResponse for SearchError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            SearchError::MissingQuery => (
                StatusCode::BAD_REQUEST,
                "Please provide at least a song name or an ISRC code",
            ),
            SearchError::Internal(detail) => {
                // Log the cause; the caller only gets the generic message
                error!("Search failed: {}", detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to fetch metadata. Please try again later.",
                )
            }
        };

        let body = Json(json!({
            "error": message,
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(song_name: Option<&str>, isrc: Option<&str>) -> SearchQuery {
        SearchQuery {
            song_name: song_name.map(String::from),
            isrc: isrc.map(String::from),
        }
    }

    #[test]
    fn test_whitespace_only_parameter_is_absent() {
        assert_eq!(query(Some("   "), None).provided_song_name(), None);
        assert_eq!(query(None, Some("\t")).provided_isrc(), None);
    }

    #[test]
    fn test_provided_value_keeps_raw_form() {
        // Interior whitespace and case are preserved, not trimmed away
        let q = query(Some("  Hey Jude "), Some("gbUM71505078"));
        assert_eq!(q.provided_song_name(), Some("  Hey Jude "));
        assert_eq!(q.provided_isrc(), Some("gbUM71505078"));
    }

    #[test]
    fn test_query_deserializes_wire_names() {
        let q: SearchQuery =
            serde_json::from_str(r#"{ "songName": "Yesterday", "isrc": "GBUM71505078" }"#).unwrap();
        assert_eq!(q.song_name.as_deref(), Some("Yesterday"));
        assert_eq!(q.isrc.as_deref(), Some("GBUM71505078"));
    }

    #[test]
    fn test_query_echo_serializes_missing_field_as_null() {
        let value = serde_json::to_value(query(None, Some("GBUM71505078"))).unwrap();
        assert_eq!(
            value,
            serde_json::json!({ "songName": null, "isrc": "GBUM71505078" })
        );
    }
}
