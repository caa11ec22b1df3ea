//! `GroupTract` — the composite per-tract entity — and its sub-entities.
//!
//! Every sub-entity carries the geoid of its owning tract and has no meaning
//! on its own. A tract always owns exactly one of each.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::geoid::{Geoid, GeoidDetail};

/// A tract and all of its derived facts, as produced by ingestion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupTract {
  pub geoid10:    Geoid,
  /// Identifier under the post-2020 boundary revision.
  pub geoid20:    Geoid,
  pub detail:     GeoidDetail,
  pub csa:        Csa,
  pub cbsa:       Cbsa,
  pub area:       AreaComposition,
  pub population: Population,
  pub rank:       Rank,
  pub shape:      Shape,
}

/// A [`GroupTract`] as read back from a store, with store-assigned timestamps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredTract {
  #[serde(flatten)]
  pub tract:      GroupTract,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

// ─── Metro areas ─────────────────────────────────────────────────────────────

/// Combined Statistical Area membership of a tract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Csa {
  pub geoid: Geoid,
  /// `None` for tracts outside any CSA.
  pub code:  Option<u16>,
  pub name:  String,
}

/// Core-Based Statistical Area membership of a tract.
///
/// The transit and bike fields start at zero and are filled in by the
/// enrichment pass after the tract load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cbsa {
  pub geoid:                     Geoid,
  /// `None` for tracts outside any CBSA.
  pub code:                      Option<u32>,
  pub name:                      String,
  pub public_transit_usage:      f64,
  pub public_transit_percentage: f64,
  pub bike_ridership:            u64,
}

// ─── Tract facts ─────────────────────────────────────────────────────────────

/// Area composition, in acres.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AreaComposition {
  pub geoid:       Geoid,
  pub total:       f64,
  pub water:       f64,
  pub land:        f64,
  pub unprotected: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Population {
  pub geoid:         Geoid,
  pub total:         u32,
  pub housing_units: f64,
  pub households:    f64,
  pub workers:       u32,
}

/// Walkability scores for a tract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rank {
  pub geoid:                Geoid,
  /// Employment and household entropy.
  pub d2b_e8mixa:           f64,
  /// Employment mix.
  pub d2a_ephhm:            f64,
  /// Street intersection density.
  pub d3b:                  f64,
  /// Distance to nearest transit stop.
  pub d4a:                  f64,
  pub d2a_ranked:           f32,
  pub d2b_ranked:           f32,
  pub d3b_ranked:           f32,
  pub d4a_ranked:           f32,
  /// National Walkability Index.
  pub nwi:                  f64,
  pub bike_count_rank:      u8,
  pub bike_percentage_rank: u8,
  pub bike_fatality_rank:   u8,
  pub bike_share_rank:      u8,
  pub transit_score:        u8,
  pub bike_score:           f64,
}

impl Rank {
  /// A rank with every metric zeroed and the bike-share rank at its floor of 1.
  pub fn unscored(geoid: Geoid) -> Self {
    Self {
      geoid,
      d2b_e8mixa:           0.0,
      d2a_ephhm:            0.0,
      d3b:                  0.0,
      d4a:                  0.0,
      d2a_ranked:           0.0,
      d2b_ranked:           0.0,
      d3b_ranked:           0.0,
      d4a_ranked:           0.0,
      nwi:                  0.0,
      bike_count_rank:      0,
      bike_percentage_rank: 0,
      bike_fatality_rank:   0,
      bike_share_rank:      1,
      transit_score:        0,
      bike_score:           0.0,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shape {
  pub geoid:    Geoid,
  pub length:   f64,
  pub area:     f64,
  /// Serialized geometry; empty when the extract carries none.
  pub geometry: String,
}
