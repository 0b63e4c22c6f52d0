//! Track search endpoints
//!
//! A missing query parameter behaves like a blank query: no results.

use axum::{
    extract::{Query, State},
    Json,
};
use rcs_common::db::TrackRecord;
use serde::Deserialize;

use crate::AppState;

/// Query parameters for artist search
#[derive(Debug, Deserialize)]
pub struct ArtistQuery {
    #[serde(default)]
    pub artist: String,
}

/// Query parameters for title search
#[derive(Debug, Deserialize)]
pub struct TitleQuery {
    #[serde(default)]
    pub title: String,
}

/// Query parameters for contributor search
#[derive(Debug, Deserialize)]
pub struct AddedQuery {
    #[serde(default)]
    pub added: String,
}

/// GET /api/tracks/by-artist?artist=Dr%20Dre
///
/// Whole-word, case-insensitive artist match tolerant of spaces, hyphens
/// and abbreviation periods. Most recent playlists first.
pub async fn search_by_artist(
    State(state): State<AppState>,
    Query(query): Query<ArtistQuery>,
) -> Json<Vec<TrackRecord>> {
    Json(state.queries.find_by_artist(&query.artist).await)
}

/// GET /api/tracks/by-title?title=song
pub async fn search_by_title(
    State(state): State<AppState>,
    Query(query): Query<TitleQuery>,
) -> Json<Vec<TrackRecord>> {
    Json(state.queries.find_by_title(&query.title).await)
}

/// GET /api/tracks/by-added?added=alice
pub async fn search_by_added(
    State(state): State<AppState>,
    Query(query): Query<AddedQuery>,
) -> Json<Vec<TrackRecord>> {
    Json(state.queries.find_by_contributor(&query.added).await)
}
