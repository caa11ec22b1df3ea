//! Error type for `nwi-ingest`.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("csv error: {0}")]
  Csv(#[from] csv::Error),

  #[error("malformed record at line {line}: expected {expected} fields, found {found}")]
  MalformedRecord { line: u64, expected: usize, found: usize },

  #[error("{path:?} has {found} columns, at least {expected} are required")]
  MissingColumns { path: PathBuf, expected: usize, found: usize },

  #[error("persisting batch {batch} failed: {source}")]
  Persistence {
    batch:  usize,
    #[source]
    source: Box<dyn std::error::Error + Send + Sync>,
  },

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),

  #[error("ingestion worker failed: {0}")]
  Join(#[from] tokio::task::JoinError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
