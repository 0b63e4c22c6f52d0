//! HTTP API handlers for rcs-api

pub mod health;
pub mod playlists;
pub mod stats;
pub mod tracks;

pub use health::health_routes;
pub use playlists::{get_playlist_tracks, list_playlists, load_playlists};
pub use stats::{most_played_artists, most_played_titles, most_tracks_by_user, total_songs};
pub use tracks::{search_by_added, search_by_artist, search_by_title};
