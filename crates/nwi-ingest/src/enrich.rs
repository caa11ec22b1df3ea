//! CBSA enrichment pass.
//!
//! Each transit or bike record names a CBSA code. Every CBSA row carrying that
//! code (one per member tract) is read, updated and written back in place.
//! Read-then-update is not transactional, so two passes touching the same row
//! concurrently race and the last writer wins.

use nwi_core::{store::ScoreStore, tract::Cbsa};

use crate::{
  Error, Result,
  columns::{Column, bike, transit},
  reader::Row,
  report::{RecordIssue, log_issues},
};

#[derive(Debug, Default, Clone, PartialEq)]
pub struct EnrichmentReport {
  /// Records read from the extract.
  pub records:      usize,
  /// CBSA rows written back.
  pub rows_updated: usize,
  /// Usable records whose code matched no CBSA row.
  pub unmatched:    usize,
  pub issues:       Vec<RecordIssue>,
}

/// The metric one record contributes to its CBSA rows.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Metric {
  Transit { usage: f64, percentage: f64 },
  Bike { ridership: u64 },
}

impl Metric {
  fn apply(self, cbsa: &mut Cbsa) {
    match self {
      Metric::Transit { usage, percentage } => {
        cbsa.public_transit_usage = usage;
        cbsa.public_transit_percentage = percentage;
      }
      Metric::Bike { ridership } => cbsa.bike_ridership = ridership,
    }
  }
}

fn code(row: &Row, column: Column) -> Result<u32, RecordIssue> {
  row
    .parse_optional(column)?
    .ok_or_else(|| RecordIssue::new(row.line(), column, "", "missing CBSA code"))
}

fn transit_metric(row: &Row) -> Result<(u32, Metric), RecordIssue> {
  Ok((
    code(row, transit::CBSA)?,
    Metric::Transit {
      usage:      row.parse(transit::ESTIMATE)?,
      percentage: row.parse(transit::PERCENTAGE)?,
    },
  ))
}

fn bike_metric(row: &Row) -> Result<(u32, Metric), RecordIssue> {
  Ok((
    code(row, bike::CBSA)?,
    Metric::Bike { ridership: row.parse(bike::RIDERSHIP)? },
  ))
}

/// Write public transit usage onto every matching CBSA row.
pub async fn enrich_transit<S: ScoreStore>(store: &S, rows: &[Row]) -> Result<EnrichmentReport> {
  apply(store, rows, "transit", transit_metric).await
}

/// Write bike ridership onto every matching CBSA row.
pub async fn enrich_bike<S: ScoreStore>(store: &S, rows: &[Row]) -> Result<EnrichmentReport> {
  apply(store, rows, "bike", bike_metric).await
}

async fn apply<S: ScoreStore>(
  store: &S,
  rows: &[Row],
  stage: &'static str,
  metric_of: fn(&Row) -> Result<(u32, Metric), RecordIssue>,
) -> Result<EnrichmentReport> {
  let mut report = EnrichmentReport { records: rows.len(), ..Default::default() };

  for row in rows {
    let (code, metric) = match metric_of(row) {
      Ok(m) => m,
      Err(issue) => {
        report.issues.push(issue);
        continue;
      }
    };

    let cbsas = store
      .cbsas_by_code(code)
      .await
      .map_err(|e| Error::Store(Box::new(e)))?;
    if cbsas.is_empty() {
      report.unmatched += 1;
      continue;
    }

    for mut cbsa in cbsas {
      metric.apply(&mut cbsa);
      if store
        .update_cbsa(cbsa)
        .await
        .map_err(|e| Error::Store(Box::new(e)))?
      {
        report.rows_updated += 1;
      }
    }
  }

  log_issues(stage, &report.issues);
  tracing::info!(
    stage,
    records = report.records,
    rows_updated = report.rows_updated,
    unmatched = report.unmatched,
    skipped = report.issues.len(),
    "cbsa enrichment finished"
  );
  Ok(report)
}
