//! Query matchers for track searches
//!
//! Artist rules:
//! - case-insensitive
//! - whole words: the query must not start or end inside a word
//! - spaces and hyphens between tokens are interchangeable
//! - a period after any token is optional ("Dr Dre" = "Dr. Dre" = "Dr.Dre")
//! - everything else in the query is literal (regex metacharacters escaped)
//!
//! Title and contributor searches are case-insensitive literal substrings.
//!
//! Both fold case with Unicode rules. SQLite's `lower()` only folds ASCII, so
//! the SQL pre-filter each matcher offers is restricted to needles where the
//! two agree.

use regex::{Regex, RegexBuilder};

/// Compiled artist query
#[derive(Debug, Clone)]
pub struct ArtistMatcher {
    regex: Regex,
    prefilter: Option<String>,
}

impl ArtistMatcher {
    /// Compile `query`; `None` when it has no tokens
    pub fn new(query: &str) -> Option<Self> {
        let tokens: Vec<&str> = query
            .split(|c: char| c.is_whitespace() || c == '-')
            .map(|token| token.trim_end_matches('.'))
            .filter(|token| !token.is_empty())
            .collect();

        if tokens.is_empty() {
            return None;
        }

        // Between tokens: a period with optional delimiters, or delimiters alone
        let escaped: Vec<String> = tokens.iter().map(|t| regex::escape(t)).collect();
        let body = escaped.join(r"(?:\.[\s\-]*|[\s\-]+)");
        let pattern = format!(r"(?:^|\W){}\.?(?:\W|$)", body);

        // Every match contains each token, so the longest foldable one narrows best
        let prefilter = tokens
            .iter()
            .filter(|t| sql_foldable(t))
            .max_by_key(|t| t.len())
            .map(|t| t.to_string());

        RegexBuilder::new(&pattern)
            .case_insensitive(true)
            .build()
            .ok()
            .map(|regex| Self { regex, prefilter })
    }

    pub fn is_match(&self, artist: &str) -> bool {
        self.regex.is_match(artist)
    }

    /// Substring every matching artist contains, safe for SQLite `lower()`
    pub fn sql_prefilter(&self) -> Option<&str> {
        self.prefilter.as_deref()
    }
}

/// Compiled case-insensitive substring query
#[derive(Debug, Clone)]
pub struct TextMatcher {
    regex: Regex,
    needle: String,
}

impl TextMatcher {
    /// Compile the trimmed `query`; `None` when it is blank
    pub fn new(query: &str) -> Option<Self> {
        let needle = query.trim();
        if needle.is_empty() {
            return None;
        }

        RegexBuilder::new(&regex::escape(needle))
            .case_insensitive(true)
            .build()
            .ok()
            .map(|regex| Self {
                regex,
                needle: needle.to_string(),
            })
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }

    /// The needle itself when SQLite `lower()` matches it the same way
    pub fn sql_prefilter(&self) -> Option<&str> {
        sql_foldable(&self.needle).then_some(self.needle.as_str())
    }
}

/// ASCII text whose case folding never reaches outside ASCII
///
/// `k` and `s` also fold from KELVIN SIGN and LONG S.
fn sql_foldable(text: &str) -> bool {
    text.is_ascii()
        && !text
            .bytes()
            .any(|b| matches!(b.to_ascii_lowercase(), b'k' | b's'))
}
