//! Read-only track queries and statistics
//!
//! Each operation acquires its own connection from the pool and releases it
//! when done. Store errors are logged and turned into empty results; callers
//! cannot tell a failed query from one with no matches.

use crate::query::matcher::{ArtistMatcher, TextMatcher};
use crate::query::stats::{self, ArtistCount, TitleCount, DEFAULT_LIMIT};
use rcs_common::db::tracks::{self, TrackFilter, TrackOrder};
use rcs_common::db::{ContributorCount, PeriodSummary, TrackRecord};
use sqlx::SqlitePool;
use tracing::{debug, error};

/// Query and aggregation entry points over the track store
#[derive(Clone)]
pub struct QueryEngine {
    pool: SqlitePool,
}

impl QueryEngine {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Tracks whose artist field contains `query` as whole words, newest first
    pub async fn find_by_artist(&self, query: &str) -> Vec<TrackRecord> {
        let Some(matcher) = ArtistMatcher::new(query) else {
            return Vec::new();
        };

        let filter = matcher
            .sql_prefilter()
            .map(|token| TrackFilter::ArtistContains(token.to_string()))
            .unwrap_or(TrackFilter::All);

        let mut found = self
            .fetch("find_by_artist", &filter, TrackOrder::NewestFirst)
            .await;
        found.retain(|track| matcher.is_match(&track.artist));
        debug!(query, matches = found.len(), "Artist search");
        found
    }

    /// Tracks whose title contains `query`, newest first
    pub async fn find_by_title(&self, query: &str) -> Vec<TrackRecord> {
        self.find_containing("find_by_title", query, TrackFilter::TitleContains, |t| {
            t.title.as_str()
        })
        .await
    }

    /// Tracks whose contributor contains `query`, newest first
    pub async fn find_by_contributor(&self, query: &str) -> Vec<TrackRecord> {
        self.find_containing("find_by_contributor", query, TrackFilter::AddedContains, |t| {
            t.added.as_str()
        })
        .await
    }

    /// All tracks of one period in their original playlist order
    pub async fn period_tracks(&self, period: &str) -> Vec<TrackRecord> {
        let filter = TrackFilter::Period(period.to_string());
        self.fetch("period_tracks", &filter, TrackOrder::PlaylistOrder)
            .await
    }

    /// Loaded periods, most recent first
    pub async fn list_periods(&self) -> Vec<PeriodSummary> {
        let result = async {
            let mut conn = self.pool.acquire().await?;
            tracks::list_periods(&mut conn).await
        }
        .await;

        fail_closed("list_periods", result)
    }

    pub async fn total_count(&self) -> i64 {
        let result = async {
            let mut conn = self.pool.acquire().await?;
            tracks::count_tracks(&mut conn).await
        }
        .await;

        fail_closed("total_count", result)
    }

    /// Every contributor with their track count, largest first
    pub async fn top_contributors(&self) -> Vec<ContributorCount> {
        let result = async {
            let mut conn = self.pool.acquire().await?;
            tracks::count_by_contributor(&mut conn).await
        }
        .await;

        fail_closed("top_contributors", result)
    }

    /// Most credited artists (each comma-separated credit counts once)
    pub async fn top_artists(&self, limit: Option<i64>) -> Vec<ArtistCount> {
        let result = async {
            let mut conn = self.pool.acquire().await?;
            tracks::artist_values(&mut conn).await
        }
        .await;

        let artists = fail_closed("top_artists", result);
        stats::top_artists(artists.iter().map(String::as_str), clamp_limit(limit))
    }

    /// Most repeated base titles, only those seen more than once
    pub async fn top_titles(&self, limit: Option<i64>) -> Vec<TitleCount> {
        let result = async {
            let mut conn = self.pool.acquire().await?;
            tracks::title_values(&mut conn).await
        }
        .await;

        let titles = fail_closed("top_titles", result);
        stats::top_titles(titles.iter().map(String::as_str), clamp_limit(limit))
    }

    /// Substring search on one column, case folded with Unicode rules
    ///
    /// SQL narrows the rows only when its ASCII folding agrees with the
    /// matcher; the matcher has the final say.
    async fn find_containing(
        &self,
        operation: &'static str,
        query: &str,
        filter: fn(String) -> TrackFilter,
        field: fn(&TrackRecord) -> &str,
    ) -> Vec<TrackRecord> {
        let Some(matcher) = TextMatcher::new(query) else {
            return Vec::new();
        };

        let filter = matcher
            .sql_prefilter()
            .map(|needle| filter(needle.to_string()))
            .unwrap_or(TrackFilter::All);

        let mut found = self.fetch(operation, &filter, TrackOrder::NewestFirst).await;
        found.retain(|track| matcher.is_match(field(track)));
        found
    }

    async fn fetch(
        &self,
        operation: &'static str,
        filter: &TrackFilter,
        order: TrackOrder,
    ) -> Vec<TrackRecord> {
        let result = async {
            let mut conn = self.pool.acquire().await?;
            tracks::find_tracks(&mut conn, filter, order).await
        }
        .await;

        fail_closed(operation, result)
    }
}

/// Top-N limit: default when absent, at least 1
pub fn clamp_limit(limit: Option<i64>) -> usize {
    match limit {
        None => DEFAULT_LIMIT,
        Some(n) => usize::try_from(n.max(1)).unwrap_or(usize::MAX),
    }
}

fn fail_closed<T: Default>(operation: &str, result: rcs_common::Result<T>) -> T {
    result.unwrap_or_else(|e| {
        error!(operation, "Track query failed: {}", e);
        T::default()
    })
}
