//! rcs-api - Rates Community Stats service
//!
//! Loads monthly playlist exports into the track store and serves searches
//! and play statistics over HTTP. With `--load` it performs one reload and
//! exits instead of serving.

use anyhow::{Context, Result};
use clap::Parser;
use rcs_api::{build_router, AppState};
use rcs_common::config::{ConfigOverrides, ServiceConfig};
use rcs_common::db::init_database;
use std::path::PathBuf;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(name = "rcs-api")]
#[command(about = "Playlist ingestion and track statistics service")]
#[command(version)]
struct Args {
    /// TOML config file
    #[arg(short, long, env = "RCS_CONFIG")]
    config: Option<PathBuf>,

    /// SQLite database file
    #[arg(long, env = "RCS_DATABASE_PATH")]
    database_path: Option<PathBuf>,

    /// Directory containing playlist exports
    #[arg(long, env = "RCS_PLAYLISTS_DIR")]
    playlists_dir: Option<PathBuf>,

    /// Address to listen on, e.g. 127.0.0.1:4000
    #[arg(long, env = "RCS_BIND_ADDR")]
    bind_addr: Option<String>,

    /// File name prefix of playlist exports
    #[arg(long, env = "RCS_FILE_PREFIX")]
    file_prefix: Option<String>,

    /// File extension of playlist exports
    #[arg(long, env = "RCS_FILE_EXTENSION")]
    file_extension: Option<String>,

    /// Base URL for generated search links
    #[arg(long, env = "RCS_SEARCH_BASE_URL")]
    search_base_url: Option<String>,

    /// Rows per insert batch during a reload
    #[arg(long, env = "RCS_BATCH_SIZE")]
    batch_size: Option<usize>,

    /// Pause between insert batches (milliseconds)
    #[arg(long, env = "RCS_WRITE_PAUSE_MS")]
    write_pause_ms: Option<u64>,

    /// Default log filter when RUST_LOG is unset
    #[arg(long)]
    log_level: Option<String>,

    /// Reload playlists once and exit
    #[arg(long)]
    load: bool,
}

impl Args {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            database_path: self.database_path.clone(),
            playlists_dir: self.playlists_dir.clone(),
            bind_addr: self.bind_addr.clone(),
            file_prefix: self.file_prefix.clone(),
            file_extension: self.file_extension.clone(),
            search_base_url: self.search_base_url.clone(),
            batch_size: self.batch_size,
            write_pause_ms: self.write_pause_ms,
            log_level: self.log_level.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // .env is optional
    let _ = dotenvy::dotenv();

    let args = Args::parse();
    let config = ServiceConfig::load(args.config.as_deref(), args.overrides())
        .context("Failed to load configuration")?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level)),
        )
        .init();

    info!(
        "Starting rcs-api v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );
    info!("Database path: {}", config.database_path.display());
    info!("Playlists directory: {}", config.playlists_dir.display());

    let pool = match init_database(&config.database_path).await {
        Ok(pool) => pool,
        Err(e) => {
            error!("Failed to open database: {}", e);
            return Err(e.into());
        }
    };

    let state = AppState::from_config(pool, &config)?;

    if args.load {
        let report = state.ingestor.run().await?;
        info!(
            "Loaded {} tracks from {} playlist files",
            report.inserted, report.files
        );
        return Ok(());
    }

    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind to {}", config.bind_addr))?;
    info!("rcs-api listening on http://{}", config.bind_addr);
    info!("Health check: http://{}/health", config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
