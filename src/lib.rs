//! tunelens library - aggregated music metadata search
//!
//! One endpoint fans a search out to up to four sources (ISWC registry,
//! IFPI ISRC registry, MusicBrainz by title and by ISRC) and returns their
//! answers side by side, each in its own named slot.

use axum::Router;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod config;
pub mod services;

use services::SearchAggregator;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Fan-out aggregator holding the source clients
    pub aggregator: Arc<SearchAggregator>,
    /// Startup timestamp for uptime reporting
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    /// Create new application state
    pub fn new(aggregator: SearchAggregator) -> Self {
        Self {
            aggregator: Arc::new(aggregator),
            startup_time: Utc::now(),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::get;

    Router::new()
        .route("/", get(api::index))
        .route("/static/app.js", get(api::app_js))
        .route("/api/music/search", get(api::search_music))
        .route("/health", get(api::health_check))
        .fallback(api::not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
