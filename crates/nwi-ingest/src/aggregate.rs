//! Tract aggregator: extract rows → [`GroupTract`] entities.
//!
//! Output order is first-seen order of each tract geoid. When a later row
//! carries an already-seen geoid, it replaces the earlier entity in place
//! (last write wins) and is counted as a duplicate.

use std::collections::HashMap;

use nwi_core::{
  Geoid,
  geoid::GeoidDetail,
  tract::{AreaComposition, Cbsa, Csa, GroupTract, Population, Rank, Shape},
};

use crate::{columns::tract as col, reader::Row, report::RecordIssue};

/// Result of aggregating one tract extract.
#[derive(Debug, Default)]
pub struct Aggregation {
  pub tracts:     Vec<GroupTract>,
  /// Rows that replaced an earlier row with the same tract geoid.
  pub duplicates: usize,
  /// Rows skipped because a field was unusable.
  pub issues:     Vec<RecordIssue>,
}

pub fn aggregate_tracts(rows: &[Row]) -> Aggregation {
  let mut out = Aggregation::default();
  let mut positions: HashMap<Geoid, usize> = HashMap::with_capacity(rows.len());

  for row in rows {
    let tract = match tract_from_row(row) {
      Ok(t) => t,
      Err(issue) => {
        out.issues.push(issue);
        continue;
      }
    };

    match positions.get(&tract.geoid10) {
      Some(&at) => {
        tracing::debug!(geoid = %tract.geoid10, line = row.line(), "duplicate tract geoid replaces earlier row");
        out.tracts[at] = tract;
        out.duplicates += 1;
      }
      None => {
        positions.insert(tract.geoid10, out.tracts.len());
        out.tracts.push(tract);
      }
    }
  }

  out
}

fn geoid_issue(row: &Row, column: crate::columns::Column, e: nwi_core::Error) -> RecordIssue {
  RecordIssue::new(row.line(), column, row.text_or_empty(column), e)
}

fn tract_from_row(row: &Row) -> Result<GroupTract, RecordIssue> {
  let detail = GeoidDetail::from_components(
    row.text(col::STATEFP)?,
    row.text(col::COUNTYFP)?,
    row.text(col::TRACTCE)?,
    row.text(col::BLKGRPCE)?,
  )
  .map_err(|e| geoid_issue(row, col::TRACTCE, e))?;
  let geoid = detail.geoid;

  // The block-group column must agree with the components it was built from.
  let geoid10_raw = row.text(col::GEOID10)?;
  if !geoid10_raw.is_empty() {
    let geoid10 = Geoid::from_block_group_column(geoid10_raw)
      .map_err(|e| geoid_issue(row, col::GEOID10, e))?;
    if geoid10 != geoid {
      return Err(RecordIssue::new(
        row.line(),
        col::GEOID10,
        geoid10_raw,
        format!("disagrees with state/county/tract codes ({geoid})"),
      ));
    }
  }

  let geoid20 = match row.text(col::GEOID20)? {
    "" => geoid,
    raw => Geoid::from_block_group_column(raw)
      .map_err(|e| geoid_issue(row, col::GEOID20, e))?,
  };

  Ok(GroupTract {
    geoid10: geoid,
    geoid20,
    detail,
    csa: Csa {
      geoid,
      code: row.parse_optional(col::CSA)?,
      name: row.text(col::CSA_NAME)?.to_owned(),
    },
    cbsa: Cbsa {
      geoid,
      code: row.parse_optional(col::CBSA)?,
      name: row.text(col::CBSA_NAME)?.to_owned(),
      public_transit_usage: 0.0,
      public_transit_percentage: 0.0,
      bike_ridership: 0,
    },
    area: AreaComposition {
      geoid,
      total:       row.parse(col::AC_TOTAL)?,
      water:       row.parse(col::AC_WATER)?,
      land:        row.parse(col::AC_LAND)?,
      unprotected: row.parse(col::AC_UNPR)?,
    },
    population: Population {
      geoid,
      total:         row.parse(col::TOT_POP)?,
      housing_units: row.parse(col::COUNT_HU)?,
      households:    row.parse(col::HH)?,
      workers:       row.parse(col::WORKERS)?,
    },
    rank: Rank {
      d2b_e8mixa: row.parse(col::D2B_E8MIXA)?,
      d2a_ephhm:  row.parse(col::D2A_EPHHM)?,
      d3b:        row.parse(col::D3B)?,
      d4a:        row.parse(col::D4A)?,
      d2a_ranked: row.parse(col::D2A_RANKED)?,
      d2b_ranked: row.parse(col::D2B_RANKED)?,
      d3b_ranked: row.parse(col::D3B_RANKED)?,
      d4a_ranked: row.parse(col::D4A_RANKED)?,
      nwi:        row.parse(col::NAT_WALK_IND)?,
      ..Rank::unscored(geoid)
    },
    shape: Shape {
      geoid,
      length:   row.parse(col::SHAPE_LENGTH)?,
      area:     row.parse(col::SHAPE_AREA)?,
      geometry: row.text_or_empty(col::GEOMETRY).to_owned(),
    },
  })
}
