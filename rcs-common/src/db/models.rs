//! Track store row types

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A persisted track, one row of a playlist export plus derived fields
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct TrackRecord {
    /// Store-generated identifier (not stable across ingestion runs)
    pub id: i64,
    pub title: String,
    /// Possibly several comma-separated credits
    pub artist: String,
    /// Contributor who added the track
    pub added: String,
    /// Canonical "Month Year", or "Unknown"
    pub playlist_period: String,
    /// First day of `playlist_period`, absent for "Unknown"
    pub playlist_period_date: Option<NaiveDate>,
    pub playlist_sequence: Option<i64>,
    /// 1-based row position within the source file
    pub original_order: i64,
    pub search_link: String,
    pub source_file: String,
}

/// A track composed by ingestion, not yet stored
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTrack {
    pub title: String,
    pub artist: String,
    pub added: String,
    pub playlist_period: String,
    pub playlist_period_date: Option<NaiveDate>,
    pub playlist_sequence: Option<i64>,
    pub original_order: i64,
    pub search_link: String,
    pub source_file: String,
}

/// One loaded period and how many tracks it holds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct PeriodSummary {
    pub playlist_period: String,
    pub playlist_period_date: Option<NaiveDate>,
    pub track_count: i64,
}

/// Tracks added per contributor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ContributorCount {
    pub added: String,
    pub track_count: i64,
}
