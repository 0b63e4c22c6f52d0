//! Integration tests for the query engine over loaded playlists
//!
//! Tests cover:
//! - artist search (period tolerant, whole words, multi-credit fields)
//! - title and contributor substring search
//! - Unicode case folding in all three searches
//! - newest-first ordering across periods
//! - counts and top-N statistics

mod helpers;

use helpers::{export_name, Fixture};

/// Three months of exports across several contributors
async fn loaded() -> Fixture {
    let fx = Fixture::new().await;
    fx.write_playlist(
        &export_name(None, "january", 2024),
        &[
            ("Still D.R.E.", "Dr. Dre, Snoop Dogg", "alice"),
            ("Song X", "Band A", "Bob"),
        ],
    );
    fx.write_playlist(
        &export_name(None, "february", 2024),
        &[
            ("The Next Episode", "Dr Dre", "alice"),
            ("Song X - Radio Edit", "Band A", "carol"),
            ("Hey Ya!", "Outkast", "alice"),
        ],
    );
    fx.write_playlist(
        &export_name(None, "march", 2024),
        &[
            ("Forgot About Dre", "Dr.Dre, Eminem", "ALICE"),
            ("Song X (Live)", "Band A", "bob"),
            ("Ms. Jackson", "Andre 3000, Big Boi", "carol"),
        ],
    );
    fx.ingestor(200).run().await.unwrap();
    fx
}

#[tokio::test]
async fn test_artist_search_tolerates_periods() {
    let fx = loaded().await;
    let queries = fx.queries();

    let found = queries.find_by_artist("Dr Dre").await;
    let titles: Vec<&str> = found.iter().map(|t| t.title.as_str()).collect();
    // Newest period first
    assert_eq!(titles, vec!["Forgot About Dre", "The Next Episode", "Still D.R.E."]);

    assert_eq!(queries.find_by_artist("dr. dre").await.len(), 3);
    assert_eq!(queries.find_by_artist("DR-DRE").await.len(), 3);
}

#[tokio::test]
async fn test_artist_search_whole_words_only() {
    let fx = loaded().await;
    let queries = fx.queries();

    // "Andre 3000" must not match "Dre"
    let found = queries.find_by_artist("Dre").await;
    assert_eq!(found.len(), 3);
    assert!(found.iter().all(|t| !t.artist.contains("Andre")));

    assert_eq!(queries.find_by_artist("Snoop Dogg").await.len(), 1);
    assert!(queries.find_by_artist("Snoop Dog").await.is_empty());
}

#[tokio::test]
async fn test_title_search_case_insensitive() {
    let fx = loaded().await;
    let found = fx.queries().find_by_title("song x").await;

    let periods: Vec<&str> = found.iter().map(|t| t.playlist_period.as_str()).collect();
    assert_eq!(periods, vec!["March 2024", "February 2024", "January 2024"]);
}

#[tokio::test]
async fn test_contributor_search_substring() {
    let fx = loaded().await;
    let queries = fx.queries();

    assert_eq!(queries.find_by_contributor("alice").await.len(), 4);
    assert_eq!(queries.find_by_contributor("LIC").await.len(), 4);
    assert_eq!(queries.find_by_contributor("bob").await.len(), 2);
    assert!(queries.find_by_contributor("zed").await.is_empty());
}

#[tokio::test]
async fn test_searches_fold_non_ascii_case() {
    let fx = Fixture::new().await;
    fx.write_playlist(
        &export_name(None, "august", 2024),
        &[("Été Indien", "Joe Dassin", "Zoë"), ("Ete Plain", "Someone", "Zoe")],
    );
    fx.ingestor(200).run().await.unwrap();
    let queries = fx.queries();

    let found = queries.find_by_title("ÉTÉ").await;
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].title, "Été Indien");
    assert_eq!(queries.find_by_title("été indien").await.len(), 1);

    let found = queries.find_by_contributor("ZOË").await;
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].added, "Zoë");

    assert_eq!(queries.find_by_artist("JOE DASSIN").await.len(), 1);
}

#[tokio::test]
async fn test_narrowed_searches_keep_unicode_only_matches() {
    let fx = Fixture::new().await;
    // KELVIN SIGN folds to k
    fx.write_playlist(
        &export_name(None, "august", 2024),
        &[("\u{212A}araoke Night", "\u{212A}iss", "Fran\u{212A}")],
    );
    fx.ingestor(200).run().await.unwrap();
    let queries = fx.queries();

    assert_eq!(queries.find_by_artist("kiss").await.len(), 1);
    assert_eq!(queries.find_by_title("karaoke").await.len(), 1);
    assert_eq!(queries.find_by_contributor("frank").await.len(), 1);
    assert!(queries.find_by_title("Night Fever").await.is_empty());
}

#[tokio::test]
async fn test_blank_queries_return_nothing() {
    let fx = loaded().await;
    let queries = fx.queries();

    assert!(queries.find_by_artist("").await.is_empty());
    assert!(queries.find_by_artist("   ").await.is_empty());
    assert!(queries.find_by_title("").await.is_empty());
    assert!(queries.find_by_contributor(" ").await.is_empty());
}

#[tokio::test]
async fn test_period_tracks_exact_period() {
    let fx = loaded().await;
    let queries = fx.queries();

    let tracks = queries.period_tracks("February 2024").await;
    let orders: Vec<i64> = tracks.iter().map(|t| t.original_order).collect();
    assert_eq!(orders, vec![1, 2, 3]);

    assert!(queries.period_tracks("february 2024").await.is_empty());
    assert!(queries.period_tracks("April 2024").await.is_empty());
}

#[tokio::test]
async fn test_list_periods_newest_first() {
    let fx = loaded().await;
    let periods = fx.queries().list_periods().await;

    let listed: Vec<(&str, i64)> = periods
        .iter()
        .map(|p| (p.playlist_period.as_str(), p.track_count))
        .collect();
    assert_eq!(
        listed,
        vec![("March 2024", 3), ("February 2024", 3), ("January 2024", 2)]
    );
}

#[tokio::test]
async fn test_total_count() {
    let fx = loaded().await;
    assert_eq!(fx.queries().total_count().await, 8);
}

#[tokio::test]
async fn test_top_contributors_exact_grouping() {
    let fx = loaded().await;
    let top = fx.queries().top_contributors().await;

    let counts: Vec<(&str, i64)> = top.iter().map(|c| (c.added.as_str(), c.track_count)).collect();
    // Grouping is exact: "ALICE" and "Bob" are their own contributors
    assert_eq!(
        counts,
        vec![
            ("alice", 3),
            ("carol", 2),
            ("ALICE", 1),
            ("Bob", 1),
            ("bob", 1),
        ]
    );
}

#[tokio::test]
async fn test_top_artists_counts_each_credit() {
    let fx = loaded().await;
    let top = fx.queries().top_artists(Some(3)).await;

    let counts: Vec<(&str, i64)> = top.iter().map(|a| (a.artist.as_str(), a.play_count)).collect();
    assert_eq!(counts, vec![("Band A", 3), ("Andre 3000", 1), ("Big Boi", 1)]);

    let all = fx.queries().top_artists(Some(100)).await;
    let credits: i64 = all.iter().map(|a| a.play_count).sum();
    // Eleven credits across eight records
    assert_eq!(credits, 11);
    assert!(all.iter().any(|a| a.artist == "Dr. Dre" && a.play_count == 1));
    assert!(all.iter().any(|a| a.artist == "Dr Dre" && a.play_count == 1));
}

#[tokio::test]
async fn test_top_titles_repeated_only() {
    let fx = loaded().await;
    let top = fx.queries().top_titles(None).await;

    assert_eq!(top.len(), 1);
    assert_eq!(top[0].title, "Song X");
    assert_eq!(top[0].play_count, 3);
}

#[tokio::test]
async fn test_empty_store() {
    let fx = Fixture::new().await;
    let queries = fx.queries();

    assert_eq!(queries.total_count().await, 0);
    assert!(queries.find_by_artist("anyone").await.is_empty());
    assert!(queries.list_periods().await.is_empty());
    assert!(queries.top_contributors().await.is_empty());
    assert!(queries.top_artists(None).await.is_empty());
    assert!(queries.top_titles(None).await.is_empty());
}
