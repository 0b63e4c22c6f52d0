//! Database layer
//!
//! - `init`: pool creation and schema
//! - `models`: track record and aggregate row types
//! - `tracks`: track store operations

pub mod init;
pub mod models;
pub mod tracks;

pub use init::init_database;
pub use models::{ContributorCount, NewTrack, PeriodSummary, TrackRecord};
