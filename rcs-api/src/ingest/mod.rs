//! Playlist ingestion pipeline
//!
//! file name → period metadata, CSV rows → raw tracks, artist + title →
//! search link, all composed by [`Ingestor`] into a full store reload.

pub mod filename;
pub mod link;
pub mod orchestrator;
pub mod rows;

pub use filename::{ExtractionMismatch, FileMetadata, FilenameParser, UNKNOWN_PERIOD};
pub use link::LinkSynthesizer;
pub use orchestrator::{discover_files, IngestReport, IngestSettings, Ingestor};
pub use rows::{RawTrack, RowReader};
