//! Track lookups and play statistics

pub mod engine;
pub mod matcher;
pub mod stats;

pub use engine::QueryEngine;
pub use matcher::{ArtistMatcher, TextMatcher};
pub use stats::{ArtistCount, TitleCount};
