//! Track store operations
//!
//! Every function takes a single connection so callers decide its scope:
//! the query engine acquires one per query, ingestion holds one for a whole
//! run. Writes from ingestion only touch `tracks_staging` until
//! [`promote_staging`] swaps the staged rows into `tracks` in one transaction.

use super::models::{ContributorCount, NewTrack, PeriodSummary, TrackRecord};
use crate::Result;
use sqlx::{Connection, QueryBuilder, Sqlite, SqliteConnection};

const SELECT_TRACKS: &str = "SELECT id, title, artist, added, playlist_period, \
     playlist_period_date, playlist_sequence, original_order, search_link, source_file \
     FROM tracks";

const TRACK_COLUMNS: &str = "title, artist, added, playlist_period, playlist_period_date, \
     playlist_sequence, original_order, search_link, source_file";

/// Row filter for [`find_tracks`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackFilter {
    All,
    /// ASCII case-insensitive substring of `title`
    TitleContains(String),
    /// ASCII case-insensitive substring of `artist`
    ArtistContains(String),
    /// ASCII case-insensitive substring of `added`
    AddedContains(String),
    /// Exact `playlist_period`
    Period(String),
}

/// Sort order for [`find_tracks`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackOrder {
    /// Most recent period first, undated periods last
    NewestFirst,
    /// Source order: sequence, then row position
    PlaylistOrder,
}

impl TrackOrder {
    fn sql(self) -> &'static str {
        match self {
            TrackOrder::NewestFirst => {
                " ORDER BY playlist_period_date IS NULL, playlist_period_date DESC, \
                 playlist_sequence, original_order, id"
            }
            TrackOrder::PlaylistOrder => " ORDER BY playlist_sequence, original_order, id",
        }
    }
}

/// Fetch tracks matching `filter`
///
/// SQLite's `lower()` only folds ASCII, so the substring filters are exact
/// for ASCII needles only. Callers with non-ASCII needles fetch
/// [`TrackFilter::All`] and match in Rust.
pub async fn find_tracks(
    conn: &mut SqliteConnection,
    filter: &TrackFilter,
    order: TrackOrder,
) -> Result<Vec<TrackRecord>> {
    let mut query = QueryBuilder::<Sqlite>::new(SELECT_TRACKS);

    match filter {
        TrackFilter::All => {}
        TrackFilter::TitleContains(needle) => {
            query
                .push(" WHERE instr(lower(title), lower(")
                .push_bind(needle.clone())
                .push(")) > 0");
        }
        TrackFilter::ArtistContains(needle) => {
            query
                .push(" WHERE instr(lower(artist), lower(")
                .push_bind(needle.clone())
                .push(")) > 0");
        }
        TrackFilter::AddedContains(needle) => {
            query
                .push(" WHERE instr(lower(added), lower(")
                .push_bind(needle.clone())
                .push(")) > 0");
        }
        TrackFilter::Period(period) => {
            query.push(" WHERE playlist_period = ").push_bind(period.clone());
        }
    }

    query.push(order.sql());

    let tracks = query
        .build_query_as::<TrackRecord>()
        .fetch_all(&mut *conn)
        .await?;

    Ok(tracks)
}

/// Number of live tracks
pub async fn count_tracks(conn: &mut SqliteConnection) -> Result<i64> {
    let count = sqlx::query_scalar("SELECT COUNT(*) FROM tracks")
        .fetch_one(&mut *conn)
        .await?;

    Ok(count)
}

/// Tracks per contributor, largest first (ties alphabetical)
pub async fn count_by_contributor(conn: &mut SqliteConnection) -> Result<Vec<ContributorCount>> {
    let counts = sqlx::query_as::<_, ContributorCount>(
        r#"
        SELECT added, COUNT(*) AS track_count
        FROM tracks
        GROUP BY added
        ORDER BY track_count DESC, added ASC
        "#,
    )
    .fetch_all(&mut *conn)
    .await?;

    Ok(counts)
}

/// Raw `artist` values of every live track
pub async fn artist_values(conn: &mut SqliteConnection) -> Result<Vec<String>> {
    let values = sqlx::query_scalar("SELECT artist FROM tracks")
        .fetch_all(&mut *conn)
        .await?;

    Ok(values)
}

/// Raw `title` values of every live track
pub async fn title_values(conn: &mut SqliteConnection) -> Result<Vec<String>> {
    let values = sqlx::query_scalar("SELECT title FROM tracks")
        .fetch_all(&mut *conn)
        .await?;

    Ok(values)
}

/// Distinct periods with their track counts, most recent first
pub async fn list_periods(conn: &mut SqliteConnection) -> Result<Vec<PeriodSummary>> {
    let periods = sqlx::query_as::<_, PeriodSummary>(
        r#"
        SELECT playlist_period, playlist_period_date, COUNT(*) AS track_count
        FROM tracks
        GROUP BY playlist_period, playlist_period_date
        ORDER BY playlist_period_date IS NULL, playlist_period_date DESC, playlist_period
        "#,
    )
    .fetch_all(&mut *conn)
    .await?;

    Ok(periods)
}

/// Empty the staging table ahead of a new ingestion run
pub async fn reset_staging(conn: &mut SqliteConnection) -> Result<()> {
    sqlx::query("DELETE FROM tracks_staging")
        .execute(&mut *conn)
        .await?;

    Ok(())
}

/// Insert a batch of tracks into staging with one multi-row statement
pub async fn insert_staged(conn: &mut SqliteConnection, tracks: &[NewTrack]) -> Result<u64> {
    if tracks.is_empty() {
        return Ok(0);
    }

    let mut query =
        QueryBuilder::<Sqlite>::new(format!("INSERT INTO tracks_staging ({}) ", TRACK_COLUMNS));

    query.push_values(tracks, |mut row, track| {
        row.push_bind(track.title.as_str())
            .push_bind(track.artist.as_str())
            .push_bind(track.added.as_str())
            .push_bind(track.playlist_period.as_str())
            .push_bind(track.playlist_period_date)
            .push_bind(track.playlist_sequence)
            .push_bind(track.original_order)
            .push_bind(track.search_link.as_str())
            .push_bind(track.source_file.as_str());
    });

    let result = query.build().execute(&mut *conn).await?;

    Ok(result.rows_affected())
}

/// Replace the live tracks with the staged ones atomically
///
/// Returns the number of promoted rows. Staging is left empty.
pub async fn promote_staging(conn: &mut SqliteConnection) -> Result<u64> {
    let mut tx = conn.begin().await?;

    sqlx::query("DELETE FROM tracks").execute(&mut *tx).await?;

    let promoted = sqlx::query(&format!(
        "INSERT INTO tracks ({cols}) SELECT {cols} FROM tracks_staging ORDER BY id",
        cols = TRACK_COLUMNS
    ))
    .execute(&mut *tx)
    .await?
    .rows_affected();

    sqlx::query("DELETE FROM tracks_staging")
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    Ok(promoted)
}
