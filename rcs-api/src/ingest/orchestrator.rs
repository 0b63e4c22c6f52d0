//! Full playlist reload
//!
//! One run rebuilds the whole track store from the playlist directory:
//!
//! 1. Empty the staging table
//! 2. For each export file (sorted by name): derive the period from the file
//!    name, stream its rows, number them from 1, attach search links, and
//!    write them to staging in batches
//! 3. Swap staging into the live table in a single transaction
//!
//! A failure anywhere before step 3 leaves the live tracks as they were.

use crate::error::{IngestionError, ParseFailure, StoreUnavailable};
use crate::ingest::filename::{FileMetadata, FilenameParser};
use crate::ingest::link::LinkSynthesizer;
use crate::ingest::rows::{self, RawTrack};
use rcs_common::config::ServiceConfig;
use rcs_common::db::{tracks, NewTrack};
use serde::Serialize;
use sqlx::{SqliteConnection, SqlitePool};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Outcome of a successful run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IngestReport {
    /// Records now in the live table
    pub inserted: u64,
    /// Export files read
    pub files: usize,
}

/// Ingestion settings derived from the service config
#[derive(Debug, Clone)]
pub struct IngestSettings {
    pub playlists_dir: PathBuf,
    pub file_extension: String,
    pub batch_size: usize,
    pub write_pause: Duration,
}

impl From<&ServiceConfig> for IngestSettings {
    fn from(config: &ServiceConfig) -> Self {
        Self {
            playlists_dir: config.playlists_dir.clone(),
            file_extension: config.file_extension.clone(),
            batch_size: config.batch_size,
            write_pause: config.write_pause,
        }
    }
}

/// Runs full reloads of the track store
pub struct Ingestor {
    pool: SqlitePool,
    settings: IngestSettings,
    filenames: FilenameParser,
    links: LinkSynthesizer,
    run_lock: Mutex<()>,
}

impl Ingestor {
    pub fn new(
        pool: SqlitePool,
        settings: IngestSettings,
        filenames: FilenameParser,
        links: LinkSynthesizer,
    ) -> Self {
        Self {
            pool,
            settings,
            filenames,
            links,
            run_lock: Mutex::new(()),
        }
    }

    /// Build an ingestor from the resolved service config
    pub fn from_config(pool: SqlitePool, config: &ServiceConfig) -> rcs_common::Result<Self> {
        let filenames = FilenameParser::new(&config.file_prefix, &config.file_extension)
            .map_err(|e| rcs_common::Error::Config(format!("Invalid file name pattern: {}", e)))?;

        Ok(Self::new(
            pool,
            IngestSettings::from(config),
            filenames,
            LinkSynthesizer::new(config.search_base_url.clone()),
        ))
    }

    /// Rebuild the track store from the playlist directory
    ///
    /// Concurrent calls are serialized.
    pub async fn run(&self) -> Result<IngestReport, IngestionError> {
        let _running = self.run_lock.lock().await;

        let mut conn = self
            .pool
            .acquire()
            .await
            .map_err(|e| IngestionError::new(0, StoreUnavailable::from(e)))?;

        let mut staged = 0u64;
        let result = self.stage_all(&mut conn, &mut staged).await;

        let files = match result {
            Ok(files) => files,
            Err(err) => {
                if let Err(cleanup) = tracks::reset_staging(&mut conn).await {
                    warn!("Could not clear staging after failed run: {}", cleanup);
                }
                return Err(err);
            }
        };

        let inserted = tracks::promote_staging(&mut conn)
            .await
            .map_err(|e| IngestionError::new(staged, StoreUnavailable::from(e)))?;

        info!(inserted, files, "All playlists have been loaded");

        Ok(IngestReport { inserted, files })
    }

    async fn stage_all(
        &self,
        conn: &mut SqliteConnection,
        staged: &mut u64,
    ) -> Result<usize, IngestionError> {
        tracks::reset_staging(conn)
            .await
            .map_err(|e| IngestionError::new(0, StoreUnavailable::from(e)))?;

        let files = discover_files(&self.settings.playlists_dir, &self.settings.file_extension)
            .map_err(|e| IngestionError::new(0, e))?;

        info!(
            dir = %self.settings.playlists_dir.display(),
            files = files.len(),
            "Loading playlists"
        );

        for path in &files {
            let rows = self.stage_file(conn, path, staged).await?;
            debug!(file = %path.display(), rows, "Staged playlist file");
        }

        Ok(files.len())
    }

    /// Stream one file into staging, returning its row count
    async fn stage_file(
        &self,
        conn: &mut SqliteConnection,
        path: &Path,
        staged: &mut u64,
    ) -> Result<u64, IngestionError> {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let metadata = match self.filenames.try_extract(&file_name) {
            Ok(metadata) => metadata,
            Err(mismatch) => {
                warn!("{}; loading as \"Unknown\" period", mismatch);
                FileMetadata::unknown()
            }
        };

        let batch_size = self.settings.batch_size.max(1);
        let mut rows = rows::stream_file(path.to_path_buf(), batch_size);
        let mut batch = Vec::with_capacity(batch_size);
        let mut order = 0i64;

        while let Some(row) = rows.recv().await {
            let raw = row.map_err(|e| IngestionError::new(*staged, e))?;
            order += 1;
            batch.push(self.compose(raw, &metadata, order, &file_name));

            if batch.len() >= batch_size {
                self.flush(conn, &mut batch, staged).await?;
            }
        }
        self.flush(conn, &mut batch, staged).await?;

        Ok(order as u64)
    }

    fn compose(&self, raw: RawTrack, metadata: &FileMetadata, order: i64, file_name: &str) -> NewTrack {
        let search_link = self.links.synthesize(&raw.artist, &raw.title);
        NewTrack {
            title: raw.title,
            artist: raw.artist,
            added: raw.added,
            playlist_period: metadata.period.clone(),
            playlist_period_date: metadata.period_date,
            playlist_sequence: metadata.sequence,
            original_order: order,
            search_link,
            source_file: file_name.to_string(),
        }
    }

    async fn flush(
        &self,
        conn: &mut SqliteConnection,
        batch: &mut Vec<NewTrack>,
        staged: &mut u64,
    ) -> Result<(), IngestionError> {
        if batch.is_empty() {
            return Ok(());
        }

        let written = tracks::insert_staged(conn, batch)
            .await
            .map_err(|e| IngestionError::new(*staged, StoreUnavailable::from(e)))?;
        *staged += written;
        batch.clear();

        if !self.settings.write_pause.is_zero() {
            tokio::time::sleep(self.settings.write_pause).await;
        }

        Ok(())
    }
}

/// Export files directly inside `dir` with the given extension, sorted by name
pub fn discover_files(dir: &Path, extension: &str) -> Result<Vec<PathBuf>, ParseFailure> {
    let extension = extension.trim_start_matches('.');
    let mut files = Vec::new();

    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|e| ParseFailure::Unreadable {
            path: e.path().unwrap_or(dir).to_path_buf(),
            source: e
                .into_io_error()
                .unwrap_or_else(|| std::io::Error::other("directory walk failed")),
        })?;

        let matches_extension = entry
            .path()
            .extension()
            .map(|ext| ext.to_string_lossy().eq_ignore_ascii_case(extension))
            .unwrap_or(false);

        if entry.file_type().is_file() && matches_extension {
            files.push(entry.into_path());
        }
    }

    Ok(files)
}
