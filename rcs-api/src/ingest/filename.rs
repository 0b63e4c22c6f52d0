//! Playlist period extraction from export file names
//!
//! Exports are named `<prefix>_[<sequence>_]<month>_<year>.<ext>`, e.g.
//! `rate_wonder_spotify_stream_march_2024.csv` or
//! `rate_wonder_spotify_stream_2_march_2024.csv`.

use chrono::{Month, NaiveDate};
use regex::Regex;
use thiserror::Error;

/// Period assigned to files that do not follow the naming convention
pub const UNKNOWN_PERIOD: &str = "Unknown";

/// Why a file name could not be classified
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractionMismatch {
    #[error("`{0}` does not follow the playlist file naming convention")]
    Pattern(String),

    #[error("`{file}`: `{month}` is not a month name")]
    Month { file: String, month: String },
}

/// Period metadata derived from a file name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileMetadata {
    /// Canonical "Month Year", or [`UNKNOWN_PERIOD`]
    pub period: String,
    /// First day of the period's month
    pub period_date: Option<NaiveDate>,
    /// Export ordinal when a period has several files
    pub sequence: Option<i64>,
}

impl FileMetadata {
    /// Sentinel for unclassified files
    pub fn unknown() -> Self {
        Self {
            period: UNKNOWN_PERIOD.to_string(),
            period_date: None,
            sequence: None,
        }
    }

    pub fn is_unknown(&self) -> bool {
        self.period == UNKNOWN_PERIOD
    }
}

/// Matches export file names for one prefix/extension pair
#[derive(Debug, Clone)]
pub struct FilenameParser {
    pattern: Regex,
}

impl FilenameParser {
    pub fn new(prefix: &str, extension: &str) -> Result<Self, regex::Error> {
        let pattern = Regex::new(&format!(
            r"(?i)^{}_(?:(?P<sequence>\d+)_)?(?P<month>[a-z]+)_(?P<year>\d{{4}})\.{}$",
            regex::escape(prefix),
            regex::escape(extension.trim_start_matches('.')),
        ))?;

        Ok(Self { pattern })
    }

    /// Classify a file name, reporting why it could not be classified
    pub fn try_extract(&self, file_name: &str) -> Result<FileMetadata, ExtractionMismatch> {
        let caps = self
            .pattern
            .captures(file_name)
            .ok_or_else(|| ExtractionMismatch::Pattern(file_name.to_string()))?;

        let month_token = &caps["month"];
        let month: Month = month_token.parse().map_err(|_| ExtractionMismatch::Month {
            file: file_name.to_string(),
            month: month_token.to_string(),
        })?;

        // \d{4} always parses
        let year: i32 = caps["year"]
            .parse()
            .map_err(|_| ExtractionMismatch::Pattern(file_name.to_string()))?;

        let sequence = caps
            .name("sequence")
            .and_then(|m| m.as_str().parse::<i64>().ok());

        Ok(FileMetadata {
            period: format!("{} {}", month.name(), year),
            period_date: NaiveDate::from_ymd_opt(year, month.number_from_month(), 1),
            sequence,
        })
    }

    /// Classify a file name, falling back to the "Unknown" period
    pub fn extract(&self, file_name: &str) -> FileMetadata {
        self.try_extract(file_name)
            .unwrap_or_else(|_| FileMetadata::unknown())
    }
}
