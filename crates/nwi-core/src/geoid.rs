//! Geographic identifiers.
//!
//! A geoid is a fixed-width digit string encoding nested census geography:
//!
//! ```text
//! SS CCC TTTTTT G BBB
//! │  │   │      │ └─ rest of the block code
//! │  │   │      └─── block group (first digit of the block code)
//! │  │   └────────── tract
//! │  └────────────── county
//! └───────────────── state
//! ```
//!
//! Precision is inferred from the digit count: 11 digits is a tract, 12 a block
//! group, 15 a block. Scores are stored at tract precision, keyed by the
//! integer value of the tract digits. Leading zeros vanish in the integer form,
//! so California tract `06001400100` is stored as `6001400100`.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

pub const STATE_WIDTH: usize = 2;
pub const COUNTY_WIDTH: usize = 3;
pub const TRACT_CODE_WIDTH: usize = 6;
pub const BLOCK_GROUP_CODE_WIDTH: usize = 1;

/// Digit count of a tract-level geoid.
pub const TRACT_WIDTH: usize = STATE_WIDTH + COUNTY_WIDTH + TRACT_CODE_WIDTH;
/// Digit count of a block-group-level geoid.
pub const BLOCK_GROUP_WIDTH: usize = TRACT_WIDTH + BLOCK_GROUP_CODE_WIDTH;
/// Digit count of a block-level geoid, as returned by the Census geocoder.
pub const BLOCK_WIDTH: usize = TRACT_WIDTH + 4;

// ─── Geoid ───────────────────────────────────────────────────────────────────

/// A tract-precision geoid in canonical integer form.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Geoid(u64);

impl Geoid {
  pub const fn new(value: u64) -> Self { Self(value) }

  pub const fn get(self) -> u64 { self.0 }

  /// Assemble a tract geoid from the state, county and tract code columns of
  /// an extract row.
  pub fn from_components(state: &str, county: &str, tract: &str) -> Result<Self> {
    let state  = parse_component(state, STATE_WIDTH)?;
    let county = parse_component(county, COUNTY_WIDTH)?;
    let tract  = parse_component(tract, TRACT_CODE_WIDTH)?;
    Ok(Self::from_parts(state, county, tract))
  }

  fn from_parts(state: u64, county: u64, tract: u64) -> Self {
    Self(state * 1_000_000_000 + county * 1_000_000 + tract)
  }

  /// Parse a block-group geoid column into a tract geoid.
  ///
  /// Extracts often store geoids as numbers, which drops the leading zero of
  /// states 01–09. An 11-digit value without a leading zero in this column is
  /// therefore re-padded to block-group width before truncation; one that
  /// already starts with `0` is a padded tract geoid and is taken as is.
  pub fn from_block_group_column(value: &str) -> Result<Self> {
    let value = value.trim();
    if value.len() == BLOCK_GROUP_WIDTH - 1 && is_all_digits(value) && !value.starts_with('0') {
      truncate_to_tract(&format!("0{value}"))
    } else {
      truncate_to_tract(value)
    }
  }
}

impl fmt::Display for Geoid {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{:0width$}", self.0, width = TRACT_WIDTH)
  }
}

/// Accepts a tract geoid in padded (`06001400100`) or integer (`6001400100`)
/// form. Longer inputs are truncated to tract precision.
impl FromStr for Geoid {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> {
    let s = s.trim();
    if s.len() > TRACT_WIDTH {
      return truncate_to_tract(s);
    }
    if s.is_empty() || !is_all_digits(s) {
      return Err(malformed(s, "not a tract geoid"));
    }
    s.parse().map(Self).map_err(|_| malformed(s, "not an unsigned integer"))
  }
}

impl From<Geoid> for u64 {
  fn from(g: Geoid) -> Self { g.0 }
}

// ─── Truncation ──────────────────────────────────────────────────────────────

/// Truncate a block- or block-group-level geoid string to tract precision.
///
/// Drops every digit past [`TRACT_WIDTH`] and parses the rest. Fails if the
/// input contains non-digits or is shorter than a tract geoid.
pub fn truncate_to_tract(geoid: &str) -> Result<Geoid> {
  if !is_all_digits(geoid) {
    return Err(malformed(geoid, "contains non-digit characters"));
  }
  if geoid.len() < TRACT_WIDTH {
    return Err(malformed(geoid, "shorter than a tract geoid"));
  }
  geoid[..TRACT_WIDTH]
    .parse::<u64>()
    .map(Geoid)
    .map_err(|_| malformed(geoid, "not an unsigned integer"))
}

// ─── GeoidDetail ─────────────────────────────────────────────────────────────

/// The per-level codes a block-group geoid decomposes into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeoidDetail {
  pub geoid:    Geoid,
  pub statefp:  u8,
  pub countyfp: u16,
  pub tractce:  u32,
  pub blkgrpce: u8,
}

impl GeoidDetail {
  pub fn from_components(
    state: &str,
    county: &str,
    tract: &str,
    block_group: &str,
  ) -> Result<Self> {
    let s = parse_component(state, STATE_WIDTH)?;
    let c = parse_component(county, COUNTY_WIDTH)?;
    let t = parse_component(tract, TRACT_CODE_WIDTH)?;
    let b = parse_component(block_group, BLOCK_GROUP_CODE_WIDTH)?;

    // Widths were checked above, so the narrowing casts cannot truncate.
    Ok(Self {
      geoid:    Geoid::from_parts(s, c, t),
      statefp:  s as u8,
      countyfp: c as u16,
      tractce:  t as u32,
      blkgrpce: b as u8,
    })
  }

  /// The full 12-digit block-group geoid, zero-padded.
  pub fn block_group_geoid(&self) -> String {
    format!(
      "{:02}{:03}{:06}{}",
      self.statefp, self.countyfp, self.tractce, self.blkgrpce
    )
  }
}

// ─── Helpers ─────────────────────────────────────────────────────────────────

fn is_all_digits(s: &str) -> bool { s.bytes().all(|b| b.is_ascii_digit()) }

fn parse_component(raw: &str, width: usize) -> Result<u64> {
  let value = raw.trim();
  if value.is_empty() {
    return Err(malformed(raw, "empty component"));
  }
  if !is_all_digits(value) {
    return Err(malformed(raw, "contains non-digit characters"));
  }
  if value.len() > width {
    return Err(malformed(raw, "component wider than its field"));
  }
  value
    .parse()
    .map_err(|_| malformed(raw, "not an unsigned integer"))
}

fn malformed(value: &str, reason: &'static str) -> Error {
  Error::MalformedGeoid { value: value.to_owned(), reason }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn components_assemble_tract_geoid() {
    let g = Geoid::from_components("06", "001", "400100").unwrap();
    assert_eq!(g.get(), 6_001_400_100);
    assert_eq!(g.to_string(), "06001400100");
  }

  #[test]
  fn unpadded_components_are_accepted() {
    let g = Geoid::from_components("6", "1", "400100").unwrap();
    assert_eq!(g, Geoid::new(6_001_400_100));
  }

  #[test]
  fn detail_reconstructs_block_group_geoid() {
    let d = GeoidDetail::from_components("06", "001", "400100", "1").unwrap();
    assert_eq!(d.block_group_geoid(), "060014001001");
    assert_eq!(d.geoid, Geoid::new(6_001_400_100));
    assert_eq!((d.statefp, d.countyfp, d.tractce, d.blkgrpce), (6, 1, 400_100, 1));
  }

  #[test]
  fn truncating_block_group_yields_tract() {
    assert_eq!(
      truncate_to_tract("060014001001").unwrap(),
      Geoid::new(6_001_400_100)
    );
  }

  #[test]
  fn truncation_matches_direct_prefix_parse() {
    for block in ["060014001001003", "360610001001000", "481130078011012", "010010201001000"] {
      assert_eq!(block.len(), BLOCK_WIDTH);
      let direct: u64 = block[..TRACT_WIDTH].parse().unwrap();
      let truncated = truncate_to_tract(block).unwrap();
      assert_eq!(truncated.get(), direct, "block {block}");
      // Already at tract precision: truncation is a no-op.
      assert_eq!(truncate_to_tract(&truncated.to_string()).unwrap(), truncated);
    }
  }

  #[test]
  fn short_geoid_is_malformed() {
    let err = truncate_to_tract("0600140").unwrap_err();
    assert!(matches!(err, Error::MalformedGeoid { .. }));
  }

  #[test]
  fn non_digit_geoid_is_malformed() {
    assert!(truncate_to_tract("06001A001001").is_err());
    assert!(truncate_to_tract("").is_err());
  }

  #[test]
  fn oversized_component_is_malformed() {
    assert!(Geoid::from_components("006", "001", "400100").is_err());
    assert!(GeoidDetail::from_components("06", "001", "400100", "12").is_err());
    assert!(Geoid::from_components("06", "", "400100").is_err());
  }

  #[test]
  fn numeric_block_group_column_is_repadded() {
    assert_eq!(
      Geoid::from_block_group_column("60014001001").unwrap(),
      Geoid::new(6_001_400_100)
    );
    assert_eq!(
      Geoid::from_block_group_column("360610001001").unwrap(),
      Geoid::new(36_061_000_100)
    );
  }

  #[test]
  fn padded_and_integer_forms_parse_alike() {
    let padded: Geoid = "06001400100".parse().unwrap();
    let bare: Geoid = "6001400100".parse().unwrap();
    assert_eq!(padded, bare);
    assert_eq!("060014001001003".parse::<Geoid>().unwrap(), padded);
    assert!("tract".parse::<Geoid>().is_err());
  }

  #[test]
  fn padded_tract_in_block_group_column_is_not_shifted() {
    assert_eq!(
      Geoid::from_block_group_column("06001400100").unwrap(),
      Geoid::new(6_001_400_100)
    );
  }

  #[test]
  fn geoid_serializes_as_bare_integer() {
    let json = serde_json::to_string(&Geoid::new(6_001_400_100)).unwrap();
    assert_eq!(json, "6001400100");
  }
}
