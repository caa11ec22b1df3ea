//! Zip → CBSA matcher.
//!
//! Every usable row becomes one [`Zipcode`]. Nothing is deduplicated: a zip
//! split across metro areas keeps one row per CBSA, and readers must expect a
//! zip to resolve to several CBSAs.

use nwi_core::zipcode::{Zipcode, normalize_zipcode};

use crate::{columns::zipcode as col, reader::Row, report::RecordIssue};

#[derive(Debug, Default)]
pub struct ZipMatch {
  pub zipcodes: Vec<Zipcode>,
  pub issues:   Vec<RecordIssue>,
}

pub fn match_zip_to_cbsa(rows: &[Row]) -> ZipMatch {
  let mut out = ZipMatch::default();
  for row in rows {
    match zipcode_from_row(row) {
      Ok(z) => out.zipcodes.push(z),
      Err(issue) => out.issues.push(issue),
    }
  }
  out
}

fn zipcode_from_row(row: &Row) -> Result<Zipcode, RecordIssue> {
  let raw = row.text(col::ZIP)?;
  let zipcode =
    normalize_zipcode(raw).map_err(|e| RecordIssue::new(row.line(), col::ZIP, raw, e))?;
  let cbsa = row
    .parse_optional(col::CBSA)?
    .ok_or_else(|| RecordIssue::new(row.line(), col::CBSA, "", "zip is outside any CBSA"))?;
  Ok(Zipcode { zipcode, cbsa })
}
