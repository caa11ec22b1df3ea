//! `nwi` — loads the walkability extracts into the score store.
//!
//! ```text
//! nwi tracts     # tract facts and scores
//! nwi zipcodes   # zip → CBSA crosswalk
//! nwi enrich     # transit usage, then bike ridership, onto CBSA rows
//! nwi all        # tracts, then zipcodes alongside enrich
//! ```
//!
//! Loading is append-only: run against an empty store.

mod config;

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use nwi_ingest::{Ingestor, enrich::EnrichmentReport};
use nwi_store_sqlite::SqliteStore;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use crate::config::IngestConfig;

#[derive(Parser)]
#[command(author, version, about = "National Walkability Index ingestion")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand)]
enum Command {
  /// Load the tract extract.
  Tracts,
  /// Load the zip code to CBSA crosswalk.
  Zipcodes,
  /// Write transit usage and bike ridership onto CBSA rows.
  Enrich,
  /// Run every stage.
  All,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();
  let cfg = IngestConfig::load(&cli.config)?;

  let store_path = cfg.store_path();
  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;
  let ingestor = Ingestor::new(Arc::new(store), cfg.batch_size()?);
  let paths = cfg.extract_paths();

  match cli.command {
    Command::Tracts => {
      ingestor
        .load_tracts(&paths.tracts)
        .await
        .with_context(|| format!("tract load from {:?} failed", paths.tracts))?;
    }
    Command::Zipcodes => {
      ingestor
        .load_zipcodes(&paths.zipcodes)
        .await
        .with_context(|| format!("zip code load from {:?} failed", paths.zipcodes))?;
    }
    Command::Enrich => {
      let transit = ingestor
        .enrich_transit(&paths.transit)
        .await
        .with_context(|| format!("transit enrichment from {:?} failed", paths.transit))?;
      let bike = ingestor
        .enrich_bike(&paths.bike)
        .await
        .with_context(|| format!("bike enrichment from {:?} failed", paths.bike))?;
      log_enrichment(&transit, &bike);
    }
    Command::All => {
      let report = ingestor.run_all(&paths).await.context("ingestion failed")?;
      tracing::info!(
        tracts = report.tracts.tracts,
        zipcodes = report.zipcodes.batches.rows,
        skipped = report.tracts.issues.len() + report.zipcodes.issues.len(),
        "ingestion complete"
      );
      log_enrichment(&report.transit, &report.bike);
    }
  }

  Ok(())
}

fn log_enrichment(transit: &EnrichmentReport, bike: &EnrichmentReport) {
  tracing::info!(
    transit_rows = transit.rows_updated,
    bike_rows = bike.rows_updated,
    unmatched = transit.unmatched + bike.unmatched,
    skipped = transit.issues.len() + bike.issues.len(),
    "enrichment complete"
  );
}
