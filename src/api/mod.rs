//! HTTP API handlers for tunelens

pub mod health;
pub mod search;
pub mod ui;

pub use health::health_check;
pub use search::{search_music, SearchError, SearchQuery, SearchResponse};
pub use ui::{app_js, index};

use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

/// Fallback for unknown routes: a JSON body instead of axum's empty 404
pub async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "error": "Resource not found",
        })),
    )
}
