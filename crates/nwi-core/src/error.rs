//! Error types for `nwi-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("malformed geoid {value:?}: {reason}")]
  MalformedGeoid { value: String, reason: &'static str },

  #[error("invalid zip code {0:?}")]
  InvalidZipcode(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
