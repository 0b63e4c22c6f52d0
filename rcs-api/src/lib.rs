//! rcs-api library - playlist ingestion and track statistics service

use axum::Router;
use rcs_common::config::ServiceConfig;
use sqlx::SqlitePool;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod error;
pub mod ingest;
pub mod query;

use ingest::Ingestor;
use query::QueryEngine;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Read-only queries and statistics
    pub queries: QueryEngine,
    /// Full playlist reload
    pub ingestor: Arc<Ingestor>,
}

impl AppState {
    pub fn new(queries: QueryEngine, ingestor: Arc<Ingestor>) -> Self {
        Self { queries, ingestor }
    }

    /// Wire the query engine and ingestor to one pool
    pub fn from_config(pool: SqlitePool, config: &ServiceConfig) -> rcs_common::Result<Self> {
        let ingestor = Ingestor::from_config(pool.clone(), config)?;
        Ok(Self::new(QueryEngine::new(pool), Arc::new(ingestor)))
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::{get, post};

    let routes = Router::new()
        .route("/api/tracks/by-artist", get(api::search_by_artist))
        .route("/api/tracks/by-title", get(api::search_by_title))
        .route("/api/tracks/by-added", get(api::search_by_added))
        .route("/api/playlists", get(api::list_playlists))
        .route("/api/playlists/tracks", get(api::get_playlist_tracks))
        .route("/api/playlists/load", post(api::load_playlists))
        .route("/api/stats/total-songs", get(api::total_songs))
        .route("/api/stats/most-tracks-by-user", get(api::most_tracks_by_user))
        .route("/api/stats/most-played-artists", get(api::most_played_artists))
        .route("/api/stats/most-played-titles", get(api::most_played_titles));

    Router::new()
        .merge(routes)
        .merge(api::health_routes())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
