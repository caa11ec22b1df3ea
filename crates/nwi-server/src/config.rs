//! Server configuration.
//!
//! Read from an optional TOML file, then overridden by `NWI_*` environment
//! variables. Nested keys use a double underscore, e.g.
//! `NWI_GEOCODER__TIMEOUT_SECS=5`.

use std::{path::{Path, PathBuf}, time::Duration};

use nwi_core::paths::expand_tilde;
use serde::Deserialize;

/// Runtime server configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
  pub host:       String,
  pub port:       u16,
  pub store_path: PathBuf,
  pub geocoder:   GeocoderConfig,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:       "127.0.0.1".to_string(),
      port:       8080,
      store_path: PathBuf::from("nwi.sqlite3"),
      geocoder:   GeocoderConfig::default(),
    }
  }
}

/// Census geocoder endpoint and request parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GeocoderConfig {
  pub base_url:     String,
  pub benchmark:    String,
  pub vintage:      String,
  pub timeout_secs: u64,
}

impl Default for GeocoderConfig {
  fn default() -> Self {
    Self {
      base_url:     "https://geocoding.geo.census.gov/geocoder".to_string(),
      benchmark:    "2020".to_string(),
      vintage:      "Census2010_Census2020".to_string(),
      timeout_secs: 10,
    }
  }
}

impl GeocoderConfig {
  pub fn timeout(&self) -> Duration { Duration::from_secs(self.timeout_secs) }
}

impl ServerConfig {
  /// Layer `path` (if it exists) under the `NWI_*` environment.
  pub fn load(path: &Path) -> Result<Self, config::ConfigError> {
    config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(
        config::Environment::with_prefix("NWI")
          .prefix_separator("_")
          .separator("__")
          .try_parsing(true),
      )
      .build()?
      .try_deserialize()
  }

  /// `store_path` with a leading `~/` expanded.
  pub fn store_path(&self) -> PathBuf { expand_tilde(&self.store_path) }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn missing_file_yields_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = ServerConfig::load(&dir.path().join("absent.toml")).unwrap();
    assert_eq!(cfg.port, 8080);
    assert_eq!(cfg.geocoder.benchmark, "2020");
    assert_eq!(cfg.geocoder.timeout(), Duration::from_secs(10));
  }

  #[test]
  fn file_values_override_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
      &path,
      "port = 9000\nstore_path = \"~/nwi/scores.db\"\n\n[geocoder]\ntimeout_secs = 3\n",
    )
    .unwrap();

    let cfg = ServerConfig::load(&path).unwrap();
    assert_eq!(cfg.port, 9000);
    assert_eq!(cfg.host, "127.0.0.1");
    assert_eq!(cfg.store_path, PathBuf::from("~/nwi/scores.db"));
    assert_eq!(cfg.geocoder.timeout_secs, 3);
    assert_eq!(cfg.geocoder.vintage, "Census2010_Census2020");
  }

  #[test]
  fn store_path_expands_home() {
    let cfg = ServerConfig { store_path: PathBuf::from("~/nwi/scores.db"), ..Default::default() };
    match std::env::var_os("HOME") {
      Some(home) => assert_eq!(cfg.store_path(), PathBuf::from(home).join("nwi/scores.db")),
      None => assert_eq!(cfg.store_path(), PathBuf::from("~/nwi/scores.db")),
    }
    let plain = ServerConfig::default();
    assert_eq!(plain.store_path(), PathBuf::from("nwi.sqlite3"));
  }
}
