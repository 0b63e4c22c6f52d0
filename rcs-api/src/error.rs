//! Error types for rcs-api
//!
//! Ingestion failures carry how far the run got. Query failures never leave
//! the query engine (it logs them and returns empty results), so only the
//! ingestion trigger maps errors onto HTTP responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::path::PathBuf;
use thiserror::Error;

/// A playlist file (or the playlist directory) could not be read or decoded
#[derive(Debug, Error)]
pub enum ParseFailure {
    /// Opening or listing failed
    #[error("cannot read {path}: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Header row lacks a required column
    #[error("{file}: missing required column `{column}`")]
    MissingColumn { file: String, column: &'static str },

    /// CSV decoding failed (bad UTF-8, ragged row, I/O error mid-stream)
    #[error("{file}: malformed row{}: {source}", at_line(.line))]
    Malformed {
        file: String,
        line: Option<u64>,
        #[source]
        source: csv::Error,
    },
}

fn at_line(line: &Option<u64>) -> String {
    line.map(|l| format!(" at line {}", l)).unwrap_or_default()
}

/// The track store could not be reached or rejected a statement
#[derive(Debug, Error)]
#[error("track store unavailable: {0}")]
pub struct StoreUnavailable(#[from] pub rcs_common::Error);

impl From<sqlx::Error> for StoreUnavailable {
    fn from(err: sqlx::Error) -> Self {
        Self(rcs_common::Error::Database(err))
    }
}

/// What stopped an ingestion run
#[derive(Debug, Error)]
pub enum IngestFault {
    #[error(transparent)]
    Parse(#[from] ParseFailure),

    #[error(transparent)]
    Store(#[from] StoreUnavailable),
}

/// Ingestion run aborted after staging `inserted` records
///
/// The live tracks are untouched: staged rows are only promoted once every
/// file has been read.
#[derive(Debug, Error)]
#[error("ingestion aborted after {inserted} staged records: {source}")]
pub struct IngestionError {
    pub inserted: u64,
    #[source]
    pub source: IngestFault,
}

impl IngestionError {
    pub fn new(inserted: u64, source: impl Into<IngestFault>) -> Self {
        Self {
            inserted,
            source: source.into(),
        }
    }
}

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Ingestion run failed (500)
    #[error(transparent)]
    Ingestion(#[from] IngestionError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::Ingestion(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({
                    "error": {
                        "code": "INGESTION_FAILED",
                        "message": err.to_string(),
                        "inserted": err.inserted,
                    }
                }),
            ),
        };

        (status, Json(body)).into_response()
    }
}
