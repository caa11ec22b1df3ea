//! [`CensusGeocoder`] — the US Census Bureau one-line-address geocoder.
//!
//! `GET {base_url}/geographies/onelineaddress?address=..&benchmark=..&vintage=..&format=json`
//! answers with candidate matches, each carrying the census geographies that
//! contain it. The block layer's `GEOID` is the 15-digit block geoid.

use std::collections::HashMap;

use nwi_core::geocode::{AddressMatch, GeocodeResult, Geocoder};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use thiserror::Error;

use crate::config::GeocoderConfig;

/// Names the block layer goes by, depending on the requested vintage.
const BLOCK_LAYERS: [&str; 3] = ["2020 Census Blocks", "Census Blocks", "2010 Census Blocks"];

#[derive(Debug, Error)]
pub enum GeocodeError {
  #[error("geocoder request failed: {0}")]
  Http(#[from] reqwest::Error),

  #[error("geocoder answered {0}")]
  Status(StatusCode),
}

/// Cheap to clone — the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct CensusGeocoder {
  client: Client,
  config: GeocoderConfig,
}

impl CensusGeocoder {
  pub fn new(config: GeocoderConfig) -> Result<Self, GeocodeError> {
    let client = Client::builder().timeout(config.timeout()).build()?;
    Ok(Self { client, config })
  }

  fn url(&self) -> String {
    format!(
      "{}/geographies/onelineaddress",
      self.config.base_url.trim_end_matches('/')
    )
  }
}

impl Geocoder for CensusGeocoder {
  type Error = GeocodeError;

  async fn resolve_address(&self, address: &str) -> Result<GeocodeResult, GeocodeError> {
    let resp = self
      .client
      .get(self.url())
      .query(&[
        ("address", address),
        ("benchmark", self.config.benchmark.as_str()),
        ("vintage", self.config.vintage.as_str()),
        ("format", "json"),
      ])
      .send()
      .await?;

    let status = resp.status();
    if !status.is_success() {
      return Err(GeocodeError::Status(status));
    }
    let body: CensusResponse = resp.json().await?;
    Ok(body.into())
  }
}

// ─── Wire format ─────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct CensusResponse {
  result: CensusResult,
}

#[derive(Debug, Deserialize)]
struct CensusResult {
  #[serde(rename = "addressMatches", default)]
  address_matches: Vec<CensusMatch>,
}

#[derive(Debug, Deserialize)]
struct CensusMatch {
  #[serde(default)]
  geographies: HashMap<String, Vec<CensusGeography>>,
}

#[derive(Debug, Deserialize)]
struct CensusGeography {
  #[serde(rename = "GEOID")]
  geoid: Option<String>,
}

impl CensusMatch {
  fn block_geoid(&self) -> Option<&str> {
    BLOCK_LAYERS
      .iter()
      .filter_map(|layer| self.geographies.get(*layer))
      .find_map(|blocks| blocks.first()?.geoid.as_deref())
  }
}

impl From<CensusResponse> for GeocodeResult {
  fn from(resp: CensusResponse) -> Self {
    let matches = resp
      .result
      .address_matches
      .iter()
      .filter_map(CensusMatch::block_geoid)
      .map(|g| AddressMatch { block_geoid: g.to_owned() })
      .collect();
    Self { matches }
  }
}
