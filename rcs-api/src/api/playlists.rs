//! Playlist endpoints: per-period track lists and the reload trigger

use axum::{
    extract::{Query, State},
    Json,
};
use rcs_common::db::{PeriodSummary, TrackRecord};
use serde::Deserialize;
use tracing::{error, info};

use crate::error::ApiError;
use crate::ingest::IngestReport;
use crate::AppState;

/// Query parameters for a period's track list
#[derive(Debug, Deserialize)]
pub struct PlaylistQuery {
    /// Canonical period, e.g. "March 2024"
    #[serde(default)]
    pub playlist_date: String,
}

/// GET /api/playlists/tracks?playlist_date=March%202024
///
/// Tracks of one period in original playlist order.
pub async fn get_playlist_tracks(
    State(state): State<AppState>,
    Query(query): Query<PlaylistQuery>,
) -> Json<Vec<TrackRecord>> {
    Json(state.queries.period_tracks(&query.playlist_date).await)
}

/// GET /api/playlists
pub async fn list_playlists(State(state): State<AppState>) -> Json<Vec<PeriodSummary>> {
    Json(state.queries.list_periods().await)
}

/// POST /api/playlists/load
///
/// Rebuilds the track store from the playlist directory. On failure the
/// previously loaded tracks stay in place and the response reports how many
/// records had been staged.
pub async fn load_playlists(State(state): State<AppState>) -> Result<Json<IngestReport>, ApiError> {
    info!("Playlist reload requested");

    match state.ingestor.run().await {
        Ok(report) => Ok(Json(report)),
        Err(e) => {
            error!("Error loading playlists: {}", e);
            Err(e.into())
        }
    }
}
