//! Zip code to CBSA mapping rows.

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

pub const ZIPCODE_WIDTH: usize = 5;

/// One zip → CBSA mapping. A zip split across metro areas appears once per
/// CBSA, so lookups by zip may return several rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Zipcode {
  pub zipcode: String,
  pub cbsa:    u32,
}

/// Validate a zip code and left-pad it to five digits.
pub fn normalize_zipcode(raw: &str) -> Result<String> {
  let zip = raw.trim();
  if zip.is_empty()
    || zip.len() > ZIPCODE_WIDTH
    || !zip.bytes().all(|b| b.is_ascii_digit())
  {
    return Err(Error::InvalidZipcode(raw.to_owned()));
  }
  Ok(format!("{zip:0>width$}", width = ZIPCODE_WIDTH))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn pads_short_zip() {
    assert_eq!(normalize_zipcode("2134").unwrap(), "02134");
    assert_eq!(normalize_zipcode(" 94601 ").unwrap(), "94601");
  }

  #[test]
  fn rejects_non_numeric_or_long_zip() {
    assert!(normalize_zipcode("9460A").is_err());
    assert!(normalize_zipcode("946011").is_err());
    assert!(normalize_zipcode("").is_err());
  }
}
