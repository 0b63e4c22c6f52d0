//! Statistics endpoints

use axum::{
    extract::{Query, State},
    Json,
};
use rcs_common::db::ContributorCount;
use serde::{Deserialize, Serialize};

use crate::query::{ArtistCount, TitleCount};
use crate::AppState;

/// Optional top-N limit (default 10, at least 1)
#[derive(Debug, Deserialize)]
pub struct LimitQuery {
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct TotalResponse {
    pub total: i64,
}

/// GET /api/stats/total-songs
pub async fn total_songs(State(state): State<AppState>) -> Json<TotalResponse> {
    Json(TotalResponse {
        total: state.queries.total_count().await,
    })
}

/// GET /api/stats/most-tracks-by-user
pub async fn most_tracks_by_user(State(state): State<AppState>) -> Json<Vec<ContributorCount>> {
    Json(state.queries.top_contributors().await)
}

/// GET /api/stats/most-played-artists?limit=10
pub async fn most_played_artists(
    State(state): State<AppState>,
    Query(query): Query<LimitQuery>,
) -> Json<Vec<ArtistCount>> {
    Json(state.queries.top_artists(query.limit).await)
}

/// GET /api/stats/most-played-titles?limit=10
pub async fn most_played_titles(
    State(state): State<AppState>,
    Query(query): Query<LimitQuery>,
) -> Json<Vec<TitleCount>> {
    Json(state.queries.top_titles(query.limit).await)
}
