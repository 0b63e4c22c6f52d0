//! # RCS Common Library
//!
//! Shared code for the Rates Community Stats service:
//! - Track record model and store queries
//! - Database initialization
//! - Configuration loading
//! - Common error type

pub mod config;
pub mod db;
pub mod error;

pub use error::{Error, Result};
