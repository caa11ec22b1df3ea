//! Read-side result types and pagination.

use serde::{Deserialize, Serialize};

use crate::geoid::Geoid;

// ─── Pagination ──────────────────────────────────────────────────────────────

/// Limit/offset window over rank rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
  pub limit:  usize,
  pub offset: usize,
}

impl Page {
  pub const DEFAULT_LIMIT: usize = 50;

  /// Build a page from raw query values. Missing or unparseable values fall
  /// back to the defaults rather than failing.
  pub fn from_raw(limit: Option<&str>, offset: Option<&str>) -> Self {
    let parse = |v: Option<&str>| v.and_then(|s| s.trim().parse::<usize>().ok());
    Self {
      limit:  parse(limit).unwrap_or(Self::DEFAULT_LIMIT),
      offset: parse(offset).unwrap_or(0),
    }
  }
}

impl Default for Page {
  fn default() -> Self { Self { limit: Self::DEFAULT_LIMIT, offset: 0 } }
}

// ─── Results ─────────────────────────────────────────────────────────────────

/// The score for a single geocoded address.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename = "score")]
pub struct AddressScore {
  pub geoid:                             Geoid,
  pub nwi:                               f64,
  pub searched_address:                  String,
  pub regional_transit_usage_percentage: f64,
  pub regional_transit_usage:            f64,
  pub regional_bike_ridership:           u64,
}

/// One row of a score listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename = "score")]
pub struct ScoreEntry {
  /// Position in the overall listing (row index plus page offset).
  pub id:                                usize,
  pub geoid:                             Geoid,
  pub csa_name:                          String,
  pub cbsa_name:                         String,
  pub nwi:                               f64,
  pub regional_transit_usage_percentage: f64,
  pub regional_transit_usage:            f64,
  pub regional_bike_ridership:           u64,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn missing_values_use_defaults() {
    assert_eq!(Page::from_raw(None, None), Page { limit: 50, offset: 0 });
  }

  #[test]
  fn invalid_values_use_defaults() {
    assert_eq!(Page::from_raw(Some("ten"), Some("-3")), Page::default());
  }

  #[test]
  fn valid_values_are_kept() {
    assert_eq!(
      Page::from_raw(Some("10"), Some("20")),
      Page { limit: 10, offset: 20 }
    );
  }
}
