//! Database initialization
//!
//! Creates the database file on first run and brings the track schema up to
//! date. All statements are idempotent.

use crate::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::path::Path;
use std::time::Duration;
use tracing::info;

/// Live table read by queries
pub const TRACKS_TABLE: &str = "tracks";

/// Table that an ingestion run fills before promoting it to `tracks`
pub const STAGING_TABLE: &str = "tracks_staging";

/// How long a connection waits on a locked database before failing
pub const BUSY_TIMEOUT: Duration = Duration::from_millis(5000);

/// Open (creating if needed) the database and ensure the schema exists
///
/// Every pooled connection runs in WAL mode with [`BUSY_TIMEOUT`]. WAL lets
/// readers keep reading the old rows while an ingestion run promotes the
/// staging table.
pub async fn init_database(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let options = SqliteConnectOptions::new()
        .filename(db_path)
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(BUSY_TIMEOUT);

    let pool = SqlitePoolOptions::new()
        .max_connections(8)
        .connect_with(options)
        .await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    create_schema(&pool).await?;

    Ok(pool)
}

/// Create the live and staging track tables plus query indexes
pub async fn create_schema(pool: &SqlitePool) -> Result<()> {
    create_track_table(pool, TRACKS_TABLE).await?;
    create_track_table(pool, STAGING_TABLE).await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_tracks_period_order
         ON tracks (playlist_period, playlist_sequence, original_order)",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_tracks_period_date
         ON tracks (playlist_period_date)",
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_track_table(pool: &SqlitePool, table: &str) -> Result<()> {
    let sql = format!(
        r#"
        CREATE TABLE IF NOT EXISTS {} (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL,
            artist TEXT NOT NULL,
            added TEXT NOT NULL,
            playlist_period TEXT NOT NULL,
            playlist_period_date TEXT,
            playlist_sequence INTEGER,
            original_order INTEGER NOT NULL CHECK (original_order >= 1),
            search_link TEXT NOT NULL,
            source_file TEXT NOT NULL,
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
        table
    );

    sqlx::query(&sql).execute(pool).await?;

    Ok(())
}
