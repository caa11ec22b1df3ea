//! Extract fixtures shared by the unit tests.

use crate::reader::{Records, Row};

pub const TRACT_HEADER: &str = "OBJECTID,GEOID10,GEOID20,STATEFP,COUNTYFP,TRACTCE,BLKGRPCE,\
CSA,CSA_Name,CBSA,CBSA_Name,CBSA_POP,CBSA_EMP,CBSA_WRK,Ac_Total,Ac_Water,Ac_Land,Ac_Unpr,\
TotPop,CountHU,HH,Workers,D2B_E8MIXA,D2A_EPHHM,D3B,D4A,D2A_Ranked,D2B_Ranked,D3B_Ranked,\
D4A_Ranked,NatWalkInd,Shape_Length,Shape_Area";

/// A tract-extract line for an Alameda County block group.
pub fn tract_line(tract: &str, block_group: &str, cbsa: &str, nwi: &str) -> String {
  let (csa, csa_name, cbsa_name) = match cbsa {
    "41860" => ("488", "San Jose-San Francisco-Oakland, CA", "San Francisco-Oakland-Berkeley, CA"),
    "31080" => ("348", "Los Angeles-Long Beach, CA", "Los Angeles-Long Beach-Anaheim, CA"),
    _ => ("", "", ""),
  };
  format!(
    "1,6001{tract}{block_group},6001{tract}{block_group},06,001,{tract},{block_group},\
     {csa},\"{csa_name}\",{cbsa},\"{cbsa_name}\",4731803,2784580,2236240,\
     120.5,0,120.5,119.0,1450,610,598,702,\
     0.62,0.48,98.4,310.5,14,15,17,12,{nwi},4213.7,487655.2"
  )
}

/// Build a tract extract from the given lines.
pub fn tract_extract(lines: &[String]) -> String {
  let mut text = String::from(TRACT_HEADER);
  for line in lines {
    text.push('\n');
    text.push_str(line);
  }
  text.push('\n');
  text
}

pub fn rows(text: &str) -> Vec<Row> {
  Records::from_reader(text.as_bytes())
    .unwrap()
    .collect::<crate::Result<Vec<_>>>()
    .unwrap()
}
