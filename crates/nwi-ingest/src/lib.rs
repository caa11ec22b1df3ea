//! Ingestion pipeline for the walkability score store.
//!
//! Reads the government CSV extracts, derives [`GroupTract`] entities and
//! zip → CBSA mappings, bulk-loads them through a [`ScoreStore`] in fixed-size
//! batches, then enriches CBSA rows with transit and bike metrics.
//!
//! Structural problems (a row of the wrong width, a rejected write) abort the
//! job. Bad values inside an otherwise well-formed row only skip that row and
//! are collected as [`RecordIssue`]s in the stage report.
//!
//! [`GroupTract`]: nwi_core::tract::GroupTract
//! [`ScoreStore`]: nwi_core::store::ScoreStore

pub mod aggregate;
pub mod batch;
pub mod columns;
pub mod enrich;
pub mod error;
pub mod pipeline;
pub mod reader;
pub mod report;
pub mod zipcodes;

pub use error::{Error, Result};
pub use pipeline::{ExtractPaths, Ingestor};
pub use report::RecordIssue;

#[cfg(test)]
mod testing;
