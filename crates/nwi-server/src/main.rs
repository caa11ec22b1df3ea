//! NWI score server binary.
//!
//! Reads `config.toml` (or the path given with `--config`), opens the SQLite
//! store written by the `nwi` ingestion tool, and serves the score API over
//! HTTP.

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use clap::Parser;
use nwi_api::ScoreResolver;
use nwi_server::{CensusGeocoder, ServerConfig};
use nwi_store_sqlite::SqliteStore;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "National Walkability Index score server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  let server_cfg = ServerConfig::load(&cli.config).context("failed to load configuration")?;

  let store_path = server_cfg.store_path();
  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;

  let geocoder =
    CensusGeocoder::new(server_cfg.geocoder.clone()).context("failed to build geocoder client")?;

  let resolver = ScoreResolver::new(Arc::new(store), Arc::new(geocoder))
    .with_geocode_timeout(server_cfg.geocoder.timeout());

  let app = nwi_server::router(Arc::new(resolver));
  let address = format!("{}:{}", server_cfg.host, server_cfg.port);

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}

