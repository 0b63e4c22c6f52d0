//! Shared fixtures for rcs-api integration tests
//!
//! Each fixture owns a temporary directory holding the SQLite file and a
//! playlist export directory.

#![allow(dead_code)]

use rcs_api::ingest::{FilenameParser, IngestSettings, Ingestor, LinkSynthesizer};
use rcs_api::query::QueryEngine;
use rcs_api::AppState;
use sqlx::SqlitePool;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

pub const PREFIX: &str = "rate_wonder_spotify_stream";
pub const SEARCH_BASE: &str = "https://open.spotify.com/search/";

pub struct Fixture {
    _dir: TempDir,
    pub playlists: PathBuf,
    pub pool: SqlitePool,
}

impl Fixture {
    pub async fn new() -> Self {
        let dir = tempfile::tempdir().expect("Should create temp dir");
        let playlists = dir.path().join("playlists");
        std::fs::create_dir(&playlists).expect("Should create playlist dir");

        let pool = rcs_common::db::init_database(&dir.path().join("tracks.db"))
            .await
            .expect("Should create database");

        Self {
            _dir: dir,
            playlists,
            pool,
        }
    }

    /// Ingestor over this fixture with a deliberately small batch size
    pub fn ingestor(&self, batch_size: usize) -> Ingestor {
        Ingestor::new(
            self.pool.clone(),
            IngestSettings {
                playlists_dir: self.playlists.clone(),
                file_extension: "csv".to_string(),
                batch_size,
                write_pause: Duration::ZERO,
            },
            FilenameParser::new(PREFIX, "csv").expect("Should compile file name pattern"),
            LinkSynthesizer::new(SEARCH_BASE),
        )
    }

    pub fn queries(&self) -> QueryEngine {
        QueryEngine::new(self.pool.clone())
    }

    pub fn state(&self) -> AppState {
        AppState::new(self.queries(), Arc::new(self.ingestor(2)))
    }

    /// Write an export with the standard header and `(title, artist, added)` rows
    pub fn write_playlist(&self, name: &str, rows: &[(&str, &str, &str)]) -> PathBuf {
        write_playlist(&self.playlists, name, rows)
    }

    /// Write a file verbatim
    pub fn write_raw(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.playlists.join(name);
        std::fs::write(&path, contents).expect("Should write file");
        path
    }
}

pub fn write_playlist(dir: &Path, name: &str, rows: &[(&str, &str, &str)]) -> PathBuf {
    let path = dir.join(name);
    let mut writer = csv::Writer::from_path(&path).expect("Should create CSV");
    writer
        .write_record(["title", "artist", "added"])
        .expect("Should write header");
    for (title, artist, added) in rows {
        writer
            .write_record([*title, *artist, *added])
            .expect("Should write row");
    }
    writer.flush().expect("Should flush CSV");
    path
}

/// Export file name for a period, with optional sequence
pub fn export_name(sequence: Option<u32>, month: &str, year: u32) -> String {
    match sequence {
        Some(seq) => format!("{}_{}_{}_{}.csv", PREFIX, seq, month, year),
        None => format!("{}_{}_{}.csv", PREFIX, month, year),
    }
}
