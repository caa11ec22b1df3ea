//! The `Geocoder` trait: external address → block geoid resolution.

use std::future::Future;

use serde::{Deserialize, Serialize};

/// One candidate match for a free-form address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressMatch {
  /// Block-level geoid of the matched location.
  pub block_geoid: String,
}

/// The geocoder's answer. An empty `matches` list means "no result" and is not
/// an error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeocodeResult {
  pub matches: Vec<AddressMatch>,
}

impl GeocodeResult {
  pub fn first_block_geoid(&self) -> Option<&str> {
    self.matches.first().map(|m| m.block_geoid.as_str())
  }
}

/// Resolves free-form addresses to census block geoids.
pub trait Geocoder: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  fn resolve_address<'a>(
    &'a self,
    address: &'a str,
  ) -> impl Future<Output = Result<GeocodeResult, Self::Error>> + Send + 'a;
}
