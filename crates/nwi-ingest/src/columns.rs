//! Column positions of the consumed extracts.
//!
//! These positions are a contract with the extract producer. Bump
//! [`SCHEMA_VERSION`] whenever one changes.

pub const SCHEMA_VERSION: u32 = 1;

/// A named column position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
  pub index: usize,
  pub name:  &'static str,
}

impl Column {
  pub const fn new(index: usize, name: &'static str) -> Self { Self { index, name } }
}

/// EPA Smart Location walkability extract (`Natl_WI.csv`), one row per block
/// group.
pub mod tract {
  use super::Column;

  pub const GEOID10: Column = Column::new(1, "GEOID10");
  pub const GEOID20: Column = Column::new(2, "GEOID20");
  pub const STATEFP: Column = Column::new(3, "STATEFP");
  pub const COUNTYFP: Column = Column::new(4, "COUNTYFP");
  pub const TRACTCE: Column = Column::new(5, "TRACTCE");
  pub const BLKGRPCE: Column = Column::new(6, "BLKGRPCE");
  pub const CSA: Column = Column::new(7, "CSA");
  pub const CSA_NAME: Column = Column::new(8, "CSA_Name");
  pub const CBSA: Column = Column::new(9, "CBSA");
  pub const CBSA_NAME: Column = Column::new(10, "CBSA_Name");
  pub const AC_TOTAL: Column = Column::new(14, "Ac_Total");
  pub const AC_WATER: Column = Column::new(15, "Ac_Water");
  pub const AC_LAND: Column = Column::new(16, "Ac_Land");
  pub const AC_UNPR: Column = Column::new(17, "Ac_Unpr");
  pub const TOT_POP: Column = Column::new(18, "TotPop");
  pub const COUNT_HU: Column = Column::new(19, "CountHU");
  pub const HH: Column = Column::new(20, "HH");
  pub const WORKERS: Column = Column::new(21, "Workers");
  pub const D2B_E8MIXA: Column = Column::new(22, "D2B_E8MIXA");
  pub const D2A_EPHHM: Column = Column::new(23, "D2A_EPHHM");
  pub const D3B: Column = Column::new(24, "D3B");
  pub const D4A: Column = Column::new(25, "D4A");
  pub const D2A_RANKED: Column = Column::new(26, "D2A_Ranked");
  pub const D2B_RANKED: Column = Column::new(27, "D2B_Ranked");
  pub const D3B_RANKED: Column = Column::new(28, "D3B_Ranked");
  pub const D4A_RANKED: Column = Column::new(29, "D4A_Ranked");
  pub const NAT_WALK_IND: Column = Column::new(30, "NatWalkInd");
  pub const SHAPE_LENGTH: Column = Column::new(31, "Shape_Length");
  pub const SHAPE_AREA: Column = Column::new(32, "Shape_Area");
  /// Optional trailing column.
  pub const GEOMETRY: Column = Column::new(33, "geometry");

  pub const REQUIRED_ARITY: usize = SHAPE_AREA.index + 1;
}

/// Public transit usage per CBSA.
pub mod transit {
  use super::Column;

  pub const ESTIMATE: Column = Column::new(2, "estimate");
  pub const PERCENTAGE: Column = Column::new(3, "percentage");
  pub const CBSA: Column = Column::new(4, "cbsa");

  pub const REQUIRED_ARITY: usize = CBSA.index + 1;
}

/// Bicycle commuter ridership per CBSA.
pub mod bike {
  use super::Column;

  pub const RIDERSHIP: Column = Column::new(2, "ridership");
  pub const CBSA: Column = Column::new(3, "cbsa");

  pub const REQUIRED_ARITY: usize = CBSA.index + 1;
}

/// Zip code to CBSA crosswalk (`zip07_cbsa06.csv`).
pub mod zipcode {
  use super::Column;

  pub const ZIP: Column = Column::new(0, "zip5");
  pub const CBSA: Column = Column::new(1, "cbsa");

  pub const REQUIRED_ARITY: usize = CBSA.index + 1;
}
