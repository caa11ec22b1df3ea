//! CSV record reader.
//!
//! The first row of an extract is its header and fixes the arity every data
//! row must match. Rows are produced lazily, one pass, in file order.

use std::{fmt, fs::File, io, path::Path, str::FromStr};

use csv::{ReaderBuilder, StringRecord, StringRecordsIntoIter, Trim};

use crate::{
  Error, Result,
  columns::{Column, SCHEMA_VERSION},
  report::RecordIssue,
};

// ─── Row ─────────────────────────────────────────────────────────────────────

/// One data row of an extract.
#[derive(Debug, Clone)]
pub struct Row {
  line:   u64,
  fields: StringRecord,
}

impl Row {
  pub fn line(&self) -> u64 { self.line }

  /// The raw text of `column`.
  pub fn text(&self, column: Column) -> Result<&str, RecordIssue> {
    self
      .fields
      .get(column.index)
      .ok_or_else(|| RecordIssue::new(self.line, column, "", "column missing"))
  }

  /// The raw text of `column`, or `""` when the row is too short to have it.
  pub fn text_or_empty(&self, column: Column) -> &str {
    self.fields.get(column.index).unwrap_or_default()
  }

  /// Parse `column` as a `T`.
  pub fn parse<T>(&self, column: Column) -> Result<T, RecordIssue>
  where
    T: FromStr,
    T::Err: fmt::Display,
  {
    let raw = self.text(column)?;
    raw
      .parse()
      .map_err(|e| RecordIssue::new(self.line, column, raw, e))
  }

  /// Parse `column` as a `T`, treating an empty field as `None`.
  pub fn parse_optional<T>(&self, column: Column) -> Result<Option<T>, RecordIssue>
  where
    T: FromStr,
    T::Err: fmt::Display,
  {
    if self.text(column)?.is_empty() {
      Ok(None)
    } else {
      self.parse(column).map(Some)
    }
  }
}

// ─── Records ─────────────────────────────────────────────────────────────────

/// Lazy iterator over the data rows of one extract.
pub struct Records<R> {
  inner: StringRecordsIntoIter<R>,
  arity: usize,
}

impl<R: io::Read> Records<R> {
  /// Read the header from `reader` and prepare to iterate the data rows.
  pub fn from_reader(reader: R) -> Result<Self> {
    let mut csv = ReaderBuilder::new()
      .has_headers(true)
      .flexible(true)
      .trim(Trim::All)
      .from_reader(reader);
    let arity = csv.headers()?.len();
    Ok(Self { inner: csv.into_records(), arity })
  }

  /// Number of fields in the header, and so in every data row.
  pub fn arity(&self) -> usize { self.arity }
}

impl Records<File> {
  pub fn open(path: impl AsRef<Path>) -> Result<Self> {
    Self::from_reader(File::open(path.as_ref()).map_err(csv::Error::from)?)
  }
}

impl<R: io::Read> Iterator for Records<R> {
  type Item = Result<Row>;

  fn next(&mut self) -> Option<Self::Item> {
    let record = match self.inner.next()? {
      Ok(r) => r,
      Err(e) => return Some(Err(e.into())),
    };
    let line = record.position().map_or(0, |p| p.line());
    if record.len() != self.arity {
      return Some(Err(Error::MalformedRecord {
        line,
        expected: self.arity,
        found: record.len(),
      }));
    }
    Some(Ok(Row { line, fields: record }))
  }
}

/// Read every row of the extract at `path`, requiring at least `required`
/// columns. Stops at the first malformed row.
pub fn read_extract(path: &Path, required: usize) -> Result<Vec<Row>> {
  tracing::debug!(?path, schema_version = SCHEMA_VERSION, "reading extract");
  let records = Records::open(path)?;
  if records.arity() < required {
    return Err(Error::MissingColumns {
      path:     path.to_path_buf(),
      expected: required,
      found:    records.arity(),
    });
  }
  records.collect()
}
