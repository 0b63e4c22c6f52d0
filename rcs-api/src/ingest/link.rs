//! Search link synthesis

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Characters left unescaped in a URI component: `A-Z a-z 0-9 - _ . ! ~ * ' ( )`
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Marker some exports append to titles; it only confuses search
const EXPLICIT_MARKER: &str = "(Explicit)";

/// Builds search URLs from artist and title
#[derive(Debug, Clone)]
pub struct LinkSynthesizer {
    base_url: String,
    encoded_marker: String,
}

impl LinkSynthesizer {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            encoded_marker: encode_component(EXPLICIT_MARKER),
        }
    }

    /// Percent-encode "artist title" and append it to the base URL
    ///
    /// Every encoded `(Explicit)` is removed. The space in front of it stays,
    /// so a title ending in the marker yields a link ending in `%20`.
    pub fn synthesize(&self, artist: &str, title: &str) -> String {
        let query = encode_component(&format!("{} {}", artist, title))
            .replace(&self.encoded_marker, "");

        format!("{}{}", self.base_url, query)
    }
}

fn encode_component(text: &str) -> String {
    utf8_percent_encode(text, COMPONENT).to_string()
}
