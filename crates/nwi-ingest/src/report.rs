//! Per-record problems collected while ingesting an extract.

use std::fmt;

use crate::columns::Column;

/// A record skipped because one of its fields could not be used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordIssue {
  /// 1-based line number in the extract.
  pub line:   u64,
  pub column: &'static str,
  pub value:  String,
  pub reason: String,
}

impl RecordIssue {
  pub fn new(
    line: u64,
    column: Column,
    value: impl Into<String>,
    reason: impl fmt::Display,
  ) -> Self {
    Self {
      line,
      column: column.name,
      value: value.into(),
      reason: reason.to_string(),
    }
  }
}

impl fmt::Display for RecordIssue {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(
      f,
      "line {}: column {} = {:?}: {}",
      self.line, self.column, self.value, self.reason
    )
  }
}

/// Log every issue of a stage at `warn`.
pub(crate) fn log_issues(stage: &str, issues: &[RecordIssue]) {
  for issue in issues {
    tracing::warn!(stage, %issue, "skipped record");
  }
}
