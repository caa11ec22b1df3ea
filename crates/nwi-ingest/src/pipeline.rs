//! [`Ingestor`] — runs the ingestion stages against a store.
//!
//! ```text
//! tracts:   read + aggregate (blocking worker) ──► batch load
//! then, concurrently:
//!   zipcodes: read + match ──► batch load
//!   enrich:   transit pass ──► bike pass
//! ```
//!
//! Any stage error aborts the job. The job is idempotent only against an
//! empty store; reloading means truncating first.

use std::{
  num::NonZeroUsize,
  path::{Path, PathBuf},
  sync::Arc,
};

use nwi_core::{store::ScoreStore, tract::GroupTract, zipcode::Zipcode};

use crate::{
  Error, Result,
  aggregate::aggregate_tracts,
  batch::{BatchSummary, load_in_batches},
  columns,
  enrich::{EnrichmentReport, enrich_bike, enrich_transit},
  reader::{Row, read_extract},
  report::{RecordIssue, log_issues},
  zipcodes::match_zip_to_cbsa,
};

/// Locations of the four extracts.
#[derive(Debug, Clone)]
pub struct ExtractPaths {
  pub tracts:   PathBuf,
  pub transit:  PathBuf,
  pub bike:     PathBuf,
  pub zipcodes: PathBuf,
}

// ─── Reports ─────────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct TractLoadReport {
  pub tracts:     usize,
  pub duplicates: usize,
  pub batches:    BatchSummary,
  pub issues:     Vec<RecordIssue>,
}

#[derive(Debug, Default)]
pub struct ZipLoadReport {
  pub batches: BatchSummary,
  pub issues:  Vec<RecordIssue>,
}

#[derive(Debug, Default)]
pub struct IngestReport {
  pub tracts:   TractLoadReport,
  pub zipcodes: ZipLoadReport,
  pub transit:  EnrichmentReport,
  pub bike:     EnrichmentReport,
}

// ─── Ingestor ────────────────────────────────────────────────────────────────

pub struct Ingestor<S> {
  store:      Arc<S>,
  batch_size: NonZeroUsize,
}

impl<S: ScoreStore> Ingestor<S> {
  pub fn new(store: Arc<S>, batch_size: NonZeroUsize) -> Self { Self { store, batch_size } }

  /// Read, aggregate and bulk-load the tract extract.
  ///
  /// Parsing and aggregation run on a blocking worker; this task waits for
  /// its single result before persisting.
  pub async fn load_tracts(&self, path: &Path) -> Result<TractLoadReport> {
    tracing::info!(?path, "loading tracts");
    let path = path.to_path_buf();
    let aggregation = tokio::task::spawn_blocking(move || {
      let rows = read_extract(&path, columns::tract::REQUIRED_ARITY)?;
      Ok::<_, Error>(aggregate_tracts(&rows))
    })
    .await??;
    log_issues("tracts", &aggregation.issues);

    let store = &self.store;
    let batches = load_in_batches(
      &aggregation.tracts,
      self.batch_size,
      async |batch: &[GroupTract]| store.insert_group_tracts(batch).await,
    )
    .await?;

    let report = TractLoadReport {
      tracts: aggregation.tracts.len(),
      duplicates: aggregation.duplicates,
      batches,
      issues: aggregation.issues,
    };
    tracing::info!(
      tracts = report.tracts,
      duplicates = report.duplicates,
      batches = report.batches.batches,
      skipped = report.issues.len(),
      "tracts loaded"
    );
    Ok(report)
  }

  /// Read, match and bulk-load the zip → CBSA crosswalk.
  pub async fn load_zipcodes(&self, path: &Path) -> Result<ZipLoadReport> {
    tracing::info!(?path, "loading zip codes");
    let rows = read_rows(path, columns::zipcode::REQUIRED_ARITY).await?;
    let matched = match_zip_to_cbsa(&rows);
    log_issues("zipcodes", &matched.issues);

    let store = &self.store;
    let batches = load_in_batches(
      &matched.zipcodes,
      self.batch_size,
      async |batch: &[Zipcode]| store.insert_zipcodes(batch).await,
    )
    .await?;

    tracing::info!(rows = batches.rows, skipped = matched.issues.len(), "zip codes loaded");
    Ok(ZipLoadReport { batches, issues: matched.issues })
  }

  pub async fn enrich_transit(&self, path: &Path) -> Result<EnrichmentReport> {
    let rows = read_rows(path, columns::transit::REQUIRED_ARITY).await?;
    enrich_transit(self.store.as_ref(), &rows).await
  }

  pub async fn enrich_bike(&self, path: &Path) -> Result<EnrichmentReport> {
    let rows = read_rows(path, columns::bike::REQUIRED_ARITY).await?;
    enrich_bike(self.store.as_ref(), &rows).await
  }

  /// Run every stage. Tracts load first; the zip load and the enrichment
  /// passes then run concurrently.
  pub async fn run_all(&self, paths: &ExtractPaths) -> Result<IngestReport> {
    let tracts = self.load_tracts(&paths.tracts).await?;

    let (zipcodes, (transit, bike)) = tokio::try_join!(
      self.load_zipcodes(&paths.zipcodes),
      async {
        let transit = self.enrich_transit(&paths.transit).await?;
        let bike = self.enrich_bike(&paths.bike).await?;
        Ok::<_, Error>((transit, bike))
      },
    )?;

    Ok(IngestReport { tracts, zipcodes, transit, bike })
  }
}

/// Read an extract on a blocking worker.
async fn read_rows(path: &Path, required: usize) -> Result<Vec<Row>> {
  let path = path.to_path_buf();
  tokio::task::spawn_blocking(move || read_extract(&path, required)).await?
}
