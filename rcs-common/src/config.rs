//! Configuration loading and resolution
//!
//! Every setting is resolved in priority order:
//! 1. Command-line argument / environment variable (merged by the binary's clap parser)
//! 2. TOML config file
//! 3. Compiled default

use crate::{Error, Result};
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

/// Environment variable naming an explicit TOML config file
pub const CONFIG_FILE_ENV: &str = "RCS_CONFIG";

/// Generic port variable honoured when no bind address is configured
pub const PORT_ENV: &str = "PORT";

/// Largest accepted insert batch
pub const MAX_BATCH_SIZE: usize = 1000;

/// Compiled defaults for the current platform
#[derive(Debug, Clone)]
pub struct CompiledDefaults {
    pub database_path: PathBuf,
    pub playlists_dir: PathBuf,
    pub bind_addr: String,
    pub file_prefix: String,
    pub file_extension: String,
    pub search_base_url: String,
    pub batch_size: usize,
    pub write_pause_ms: u64,
    pub log_level: String,
}

impl CompiledDefaults {
    pub fn for_current_platform() -> Self {
        let data_dir = dirs::data_local_dir()
            .map(|d| d.join("rcs"))
            .unwrap_or_else(|| PathBuf::from("./rcs_data"));

        Self {
            database_path: data_dir.join("tracks.db"),
            playlists_dir: PathBuf::from("./playlists"),
            bind_addr: "127.0.0.1:4000".to_string(),
            file_prefix: "rate_wonder_spotify_stream".to_string(),
            file_extension: "csv".to_string(),
            search_base_url: "https://open.spotify.com/search/".to_string(),
            batch_size: 200,
            write_pause_ms: 0,
            log_level: "info".to_string(),
        }
    }
}

/// Settings read from the TOML config file (all optional)
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub database_path: Option<PathBuf>,
    pub playlists_dir: Option<PathBuf>,
    pub bind_addr: Option<String>,
    pub file_prefix: Option<String>,
    pub file_extension: Option<String>,
    pub search_base_url: Option<String>,
    pub batch_size: Option<usize>,
    pub write_pause_ms: Option<u64>,
    pub log_level: Option<String>,
}

impl TomlConfig {
    /// Parse a TOML config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))
    }

    /// Parse TOML text
    pub fn parse(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}

/// Explicit overrides from the command line or environment
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub database_path: Option<PathBuf>,
    pub playlists_dir: Option<PathBuf>,
    pub bind_addr: Option<String>,
    pub file_prefix: Option<String>,
    pub file_extension: Option<String>,
    pub search_base_url: Option<String>,
    pub batch_size: Option<usize>,
    pub write_pause_ms: Option<u64>,
    pub log_level: Option<String>,
}

/// Fully resolved service configuration
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// SQLite database file holding the track store
    pub database_path: PathBuf,
    /// Directory scanned for playlist exports
    pub playlists_dir: PathBuf,
    /// HTTP listen address
    pub bind_addr: SocketAddr,
    /// File name prefix of playlist exports
    pub file_prefix: String,
    /// File extension of playlist exports, without the leading dot
    pub file_extension: String,
    /// Base URL that search links are appended to
    pub search_base_url: String,
    /// Rows per insert statement during ingestion
    pub batch_size: usize,
    /// Pause between insert batches
    pub write_pause: Duration,
    /// Default tracing filter when RUST_LOG is unset
    pub log_level: String,
}

impl ServiceConfig {
    /// Resolve configuration: overrides > TOML > `PORT` (bind address only) > compiled defaults
    pub fn resolve(overrides: ConfigOverrides, file: TomlConfig) -> Result<Self> {
        let defaults = CompiledDefaults::for_current_platform();

        let bind_addr = overrides
            .bind_addr
            .or(file.bind_addr)
            .or_else(|| port_from_env().map(|port| format!("0.0.0.0:{}", port)))
            .unwrap_or(defaults.bind_addr);
        let bind_addr: SocketAddr = bind_addr
            .parse()
            .map_err(|_| Error::Config(format!("Invalid bind address: {}", bind_addr)))?;

        let file_prefix = overrides
            .file_prefix
            .or(file.file_prefix)
            .unwrap_or(defaults.file_prefix);
        if file_prefix.trim().is_empty() {
            return Err(Error::InvalidInput("file_prefix must not be empty".to_string()));
        }

        let file_extension = overrides
            .file_extension
            .or(file.file_extension)
            .unwrap_or(defaults.file_extension)
            .trim_start_matches('.')
            .to_string();
        if file_extension.is_empty() {
            return Err(Error::InvalidInput("file_extension must not be empty".to_string()));
        }

        let batch_size = overrides
            .batch_size
            .or(file.batch_size)
            .unwrap_or(defaults.batch_size);
        if !(1..=MAX_BATCH_SIZE).contains(&batch_size) {
            return Err(Error::InvalidInput(format!(
                "batch_size must be between 1 and {}, got {}",
                MAX_BATCH_SIZE, batch_size
            )));
        }

        let write_pause_ms = overrides
            .write_pause_ms
            .or(file.write_pause_ms)
            .unwrap_or(defaults.write_pause_ms);

        Ok(Self {
            database_path: overrides
                .database_path
                .or(file.database_path)
                .unwrap_or(defaults.database_path),
            playlists_dir: overrides
                .playlists_dir
                .or(file.playlists_dir)
                .unwrap_or(defaults.playlists_dir),
            bind_addr,
            file_prefix,
            file_extension,
            search_base_url: overrides
                .search_base_url
                .or(file.search_base_url)
                .unwrap_or(defaults.search_base_url),
            batch_size,
            write_pause: Duration::from_millis(write_pause_ms),
            log_level: overrides
                .log_level
                .or(file.log_level)
                .unwrap_or(defaults.log_level),
        })
    }

    /// Locate and read the TOML file (if any), then resolve
    pub fn load(explicit_file: Option<&Path>, overrides: ConfigOverrides) -> Result<Self> {
        let file = match locate_config_file(explicit_file)? {
            Some(path) => {
                info!("Loading config file: {}", path.display());
                TomlConfig::load(&path)?
            }
            None => {
                debug!("No config file found, using defaults");
                TomlConfig::default()
            }
        };

        Self::resolve(overrides, file)
    }
}

/// Find the TOML config file
///
/// An explicitly named file (argument or `RCS_CONFIG`) must exist. The
/// per-user default location is optional.
pub fn locate_config_file(explicit_file: Option<&Path>) -> Result<Option<PathBuf>> {
    let explicit = explicit_file
        .map(Path::to_path_buf)
        .or_else(|| std::env::var_os(CONFIG_FILE_ENV).map(PathBuf::from));

    if let Some(path) = explicit {
        if !path.is_file() {
            return Err(Error::Config(format!("Config file not found: {}", path.display())));
        }
        return Ok(Some(path));
    }

    Ok(dirs::config_dir()
        .map(|d| d.join("rcs").join("config.toml"))
        .filter(|p| p.is_file()))
}

fn port_from_env() -> Option<u16> {
    std::env::var(PORT_ENV).ok()?.trim().parse().ok()
}
