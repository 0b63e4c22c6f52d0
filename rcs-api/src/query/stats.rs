//! Artist and title play counts
//!
//! Counts are computed over raw column values so the rules stay testable
//! without a database.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Default number of entries returned by the top-N statistics
pub const DEFAULT_LIMIT: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtistCount {
    pub artist: String,
    pub play_count: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TitleCount {
    pub title: String,
    pub play_count: i64,
}

/// Individual credits of a comma-separated artist field
pub fn artist_credits(artist: &str) -> impl Iterator<Item = &str> {
    artist
        .split(',')
        .map(str::trim)
        .filter(|credit| !credit.is_empty())
}

/// Title with version suffixes dropped: text before the first `-` or `(`
///
/// "Song - Remix" and "Song (Live)" both become "Song".
pub fn base_title(title: &str) -> &str {
    let end = title.find(['-', '(']).unwrap_or(title.len());
    title[..end].trim()
}

/// Most credited artists; one count per credit, not per record
pub fn top_artists<'a, I>(artists: I, limit: usize) -> Vec<ArtistCount>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut counts: HashMap<&str, i64> = HashMap::new();
    for artist in artists {
        for credit in artist_credits(artist) {
            *counts.entry(credit).or_insert(0) += 1;
        }
    }

    rank(counts, 1, limit)
        .into_iter()
        .map(|(artist, play_count)| ArtistCount { artist, play_count })
        .collect()
}

/// Most repeated base titles; titles seen only once are left out
pub fn top_titles<'a, I>(titles: I, limit: usize) -> Vec<TitleCount>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut counts: HashMap<&str, i64> = HashMap::new();
    for title in titles {
        let base = base_title(title);
        if !base.is_empty() {
            *counts.entry(base).or_insert(0) += 1;
        }
    }

    rank(counts, 2, limit)
        .into_iter()
        .map(|(title, play_count)| TitleCount { title, play_count })
        .collect()
}

/// Groups with at least `min_count`, by count descending then name, truncated
fn rank(counts: HashMap<&str, i64>, min_count: i64, limit: usize) -> Vec<(String, i64)> {
    let mut ranked: Vec<(&str, i64)> = counts
        .into_iter()
        .filter(|&(_, count)| count >= min_count)
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    ranked.truncate(limit);

    ranked
        .into_iter()
        .map(|(name, count)| (name.to_string(), count))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_title() {
        assert_eq!(base_title("Song X"), "Song X");
        assert_eq!(base_title("Song X (Live)"), "Song X");
        assert_eq!(base_title("Song X - 2011 Remaster"), "Song X");
        assert_eq!(base_title("Song X (feat. Y) - Remix"), "Song X");
        assert_eq!(base_title("(Intro)"), "");
    }

    #[test]
    fn test_multi_artist_record_counts_each_credit() {
        let top = top_artists(["A, B", "A", " B ,C,"], 10);
        assert_eq!(
            top,
            vec![
                ArtistCount { artist: "A".into(), play_count: 2 },
                ArtistCount { artist: "B".into(), play_count: 2 },
                ArtistCount { artist: "C".into(), play_count: 1 },
            ]
        );
    }

    #[test]
    fn test_top_artists_limit() {
        let top = top_artists(["A", "B", "B", "C", "C", "C"], 2);
        let names: Vec<_> = top.iter().map(|a| a.artist.as_str()).collect();
        assert_eq!(names, vec!["C", "B"]);
    }

    #[test]
    fn test_top_titles_groups_versions_and_drops_singletons() {
        let top = top_titles(["Song X", "Song X (Live)", "Other", "Third - Remix", "Third"], 10);
        assert_eq!(
            top,
            vec![
                TitleCount { title: "Song X".into(), play_count: 2 },
                TitleCount { title: "Third".into(), play_count: 2 },
            ]
        );
        assert!(top.iter().all(|t| t.play_count > 1));
    }

    #[test]
    fn test_top_titles_nothing_repeated() {
        assert!(top_titles(["A", "B", "(Live)", "(Intro)"], 10).is_empty());
    }

    #[test]
    fn test_serialized_field_names() {
        let json = serde_json::to_value(TitleCount { title: "Song X".into(), play_count: 2 }).unwrap();
        assert_eq!(json, serde_json::json!({ "title": "Song X", "playCount": 2 }));
    }
}
