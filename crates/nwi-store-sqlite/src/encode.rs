//! Encoding and decoding helpers between domain types and SQLite columns.
//!
//! Geoids are stored as `INTEGER`, timestamps as RFC 3339 strings. Each
//! `*_COLUMNS` list pairs with a `*_from_row` decoder that reads those columns
//! starting at a caller-supplied offset, so joined selects can reuse them.

use chrono::{DateTime, Utc};
use nwi_core::{
  Geoid,
  geoid::GeoidDetail,
  tract::{AreaComposition, Cbsa, Csa, Population, Rank, Shape},
};
use rusqlite::{Row, types::Type};

use crate::{Error, Result};

// ─── Scalars ─────────────────────────────────────────────────────────────────

pub fn encode_geoid(g: Geoid) -> i64 { i64::try_from(g.get()).unwrap_or(i64::MAX) }

pub fn encode_u64(v: u64) -> i64 { i64::try_from(v).unwrap_or(i64::MAX) }

pub fn encode_count(v: usize) -> i64 { i64::try_from(v).unwrap_or(i64::MAX) }

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

fn u64_at(row: &Row<'_>, idx: usize) -> rusqlite::Result<u64> {
  let v: i64 = row.get(idx)?;
  u64::try_from(v)
    .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Integer, Box::new(e)))
}

fn f32_at(row: &Row<'_>, idx: usize) -> rusqlite::Result<f32> {
  let v: f64 = row.get(idx)?;
  Ok(v as f32)
}

pub fn geoid_at(row: &Row<'_>, idx: usize) -> rusqlite::Result<Geoid> {
  u64_at(row, idx).map(Geoid::new)
}

// ─── Sub-entities ────────────────────────────────────────────────────────────

pub const DETAIL_COLUMNS: &str = "d.geoid, d.statefp, d.countyfp, d.tractce, d.blkgrpce";

pub fn detail_from_row(row: &Row<'_>, at: usize) -> rusqlite::Result<GeoidDetail> {
  Ok(GeoidDetail {
    geoid:    geoid_at(row, at)?,
    statefp:  row.get(at + 1)?,
    countyfp: row.get(at + 2)?,
    tractce:  row.get(at + 3)?,
    blkgrpce: row.get(at + 4)?,
  })
}

pub const CSA_COLUMNS: &str = "s.geoid, s.csa, s.csa_name";

pub fn csa_from_row(row: &Row<'_>, at: usize) -> rusqlite::Result<Csa> {
  Ok(Csa {
    geoid: geoid_at(row, at)?,
    code:  row.get(at + 1)?,
    name:  row.get(at + 2)?,
  })
}

pub const CBSA_COLUMNS: &str = "c.geoid, c.cbsa, c.cbsa_name, c.public_transit_usage, \
                                c.public_transit_percentage, c.bike_ridership";

pub fn cbsa_from_row(row: &Row<'_>, at: usize) -> rusqlite::Result<Cbsa> {
  Ok(Cbsa {
    geoid:                     geoid_at(row, at)?,
    code:                      row.get(at + 1)?,
    name:                      row.get(at + 2)?,
    public_transit_usage:      row.get(at + 3)?,
    public_transit_percentage: row.get(at + 4)?,
    bike_ridership:            u64_at(row, at + 5)?,
  })
}

pub const AREA_COLUMNS: &str = "a.geoid, a.ac_total, a.ac_water, a.ac_land, a.ac_unpr";

pub fn area_from_row(row: &Row<'_>, at: usize) -> rusqlite::Result<AreaComposition> {
  Ok(AreaComposition {
    geoid:       geoid_at(row, at)?,
    total:       row.get(at + 1)?,
    water:       row.get(at + 2)?,
    land:        row.get(at + 3)?,
    unprotected: row.get(at + 4)?,
  })
}

pub const POPULATION_COLUMNS: &str = "p.geoid, p.total_pop, p.count_hu, p.hh, p.workers";

pub fn population_from_row(row: &Row<'_>, at: usize) -> rusqlite::Result<Population> {
  Ok(Population {
    geoid:         geoid_at(row, at)?,
    total:         row.get(at + 1)?,
    housing_units: row.get(at + 2)?,
    households:    row.get(at + 3)?,
    workers:       row.get(at + 4)?,
  })
}

pub const RANK_COLUMNS: &str = "r.geoid, r.d2b_e8mixa, r.d2a_ephhm, r.d3b, r.d4a, \
                                r.d2a_ranked, r.d2b_ranked, r.d3b_ranked, r.d4a_ranked, r.nwi, \
                                r.bike_count_rank, r.bike_percentage_rank, r.bike_fatality_rank, \
                                r.bike_share_rank, r.transit_score, r.bike_score";

pub fn rank_from_row(row: &Row<'_>, at: usize) -> rusqlite::Result<Rank> {
  Ok(Rank {
    geoid:                geoid_at(row, at)?,
    d2b_e8mixa:           row.get(at + 1)?,
    d2a_ephhm:            row.get(at + 2)?,
    d3b:                  row.get(at + 3)?,
    d4a:                  row.get(at + 4)?,
    d2a_ranked:           f32_at(row, at + 5)?,
    d2b_ranked:           f32_at(row, at + 6)?,
    d3b_ranked:           f32_at(row, at + 7)?,
    d4a_ranked:           f32_at(row, at + 8)?,
    nwi:                  row.get(at + 9)?,
    bike_count_rank:      row.get(at + 10)?,
    bike_percentage_rank: row.get(at + 11)?,
    bike_fatality_rank:   row.get(at + 12)?,
    bike_share_rank:      row.get(at + 13)?,
    transit_score:        row.get(at + 14)?,
    bike_score:           row.get(at + 15)?,
  })
}

pub const SHAPE_COLUMNS: &str = "h.geoid, h.shape_length, h.shape_area, h.geometry";

pub fn shape_from_row(row: &Row<'_>, at: usize) -> rusqlite::Result<Shape> {
  Ok(Shape {
    geoid:    geoid_at(row, at)?,
    length:   row.get(at + 1)?,
    area:     row.get(at + 2)?,
    geometry: row.get(at + 3)?,
  })
}

/// Column counts of the lists above, in select order.
pub const DETAIL_WIDTH: usize = 5;
pub const CSA_WIDTH: usize = 3;
pub const CBSA_WIDTH: usize = 6;
pub const AREA_WIDTH: usize = 5;
pub const POPULATION_WIDTH: usize = 5;
pub const RANK_WIDTH: usize = 16;
