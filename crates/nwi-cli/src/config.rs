//! Ingestion configuration.
//!
//! Same layering as the server: optional TOML file, then `NWI_*` variables.

use std::{
  num::NonZeroUsize,
  path::{Path, PathBuf},
};

use anyhow::{Context as _, anyhow};
use nwi_core::paths::expand_tilde;
use nwi_ingest::ExtractPaths;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
  pub store_path:   PathBuf,
  /// Directory holding the four extracts.
  pub data_dir:     PathBuf,
  pub tract_file:   String,
  pub transit_file: String,
  pub bike_file:    String,
  pub zipcode_file: String,
  /// Rows per bulk insert.
  pub batch_size:   usize,
}

impl Default for IngestConfig {
  fn default() -> Self {
    Self {
      store_path:   PathBuf::from("nwi.sqlite3"),
      data_dir:     PathBuf::from("data"),
      tract_file:   "Natl_WI.csv".to_string(),
      transit_file: "CBSA_Public_Transit_Usage.csv".to_string(),
      bike_file:    "CBSA_Bicylce_Ridership.csv".to_string(),
      zipcode_file: "zip07_cbsa06.csv".to_string(),
      batch_size:   nwi_ingest::batch::DEFAULT_BATCH_SIZE.get(),
    }
  }
}

impl IngestConfig {
  pub fn load(path: &Path) -> anyhow::Result<Self> {
    config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(config::Environment::with_prefix("NWI").try_parsing(true))
      .build()
      .context("failed to read config file")?
      .try_deserialize()
      .context("failed to deserialise IngestConfig")
  }

  pub fn batch_size(&self) -> anyhow::Result<NonZeroUsize> {
    NonZeroUsize::new(self.batch_size).ok_or_else(|| anyhow!("batch_size must be at least 1"))
  }

  pub fn store_path(&self) -> PathBuf { expand_tilde(&self.store_path) }

  pub fn extract_paths(&self) -> ExtractPaths {
    let dir = expand_tilde(&self.data_dir);
    ExtractPaths {
      tracts:   dir.join(&self.tract_file),
      transit:  dir.join(&self.transit_file),
      bike:     dir.join(&self.bike_file),
      zipcodes: dir.join(&self.zipcode_file),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn defaults_name_the_published_extracts() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = IngestConfig::load(&dir.path().join("absent.toml")).unwrap();
    assert_eq!(cfg.batch_size().unwrap().get(), 500);
    let paths = cfg.extract_paths();
    assert_eq!(paths.tracts, PathBuf::from("data/Natl_WI.csv"));
    assert_eq!(paths.zipcodes, PathBuf::from("data/zip07_cbsa06.csv"));
  }

  #[test]
  fn file_overrides_data_dir_and_batch_size() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "data_dir = \"/srv/nwi\"\nbatch_size = 250\n").unwrap();

    let cfg = IngestConfig::load(&path).unwrap();
    assert_eq!(cfg.batch_size().unwrap().get(), 250);
    assert_eq!(cfg.extract_paths().bike, PathBuf::from("/srv/nwi/CBSA_Bicylce_Ridership.csv"));
  }

  #[test]
  fn tilde_data_dir_expands_home() {
    let cfg = IngestConfig { data_dir: PathBuf::from("~/nwi"), ..IngestConfig::default() };
    let expected = match std::env::var_os("HOME") {
      Some(home) => PathBuf::from(home).join("nwi/Natl_WI.csv"),
      None => PathBuf::from("~/nwi/Natl_WI.csv"),
    };
    assert_eq!(cfg.extract_paths().tracts, expected);
  }

  #[test]
  fn zero_batch_size_is_rejected() {
    let cfg = IngestConfig { batch_size: 0, ..IngestConfig::default() };
    assert!(cfg.batch_size().is_err());
  }
}
