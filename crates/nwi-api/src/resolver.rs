//! [`ScoreResolver`] — turns an address or a listing request into scores.
//!
//! Address mode geocodes the address, truncates the matched block to tract
//! precision and reads that tract's rank and CBSA rows. Listing mode pages
//! over rank rows, optionally restricted to the CBSAs a zip code falls in,
//! and decorates each row with CSA/CBSA names and metrics on a best-effort
//! basis.

use std::{fmt, future::Future, sync::Arc, time::Duration};

use nwi_core::{
  Geoid,
  geocode::Geocoder,
  geoid::truncate_to_tract,
  score::{AddressScore, Page, ScoreEntry},
  store::ScoreStore,
  tract::{Cbsa, Rank, StoredTract},
  zipcode::normalize_zipcode,
};
use thiserror::Error;

pub const DEFAULT_GEOCODE_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Error)]
pub enum ResolveError {
  #[error("{0}")]
  NotFound(String),

  #[error(transparent)]
  InvalidInput(#[from] nwi_core::Error),

  #[error("{0}")]
  UpstreamResolution(#[source] Box<dyn std::error::Error + Send + Sync>),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

fn store_err<E: std::error::Error + Send + Sync + 'static>(e: E) -> ResolveError {
  ResolveError::Store(Box::new(e))
}

fn upstream_err<E: std::error::Error + Send + Sync + 'static>(e: E) -> ResolveError {
  ResolveError::UpstreamResolution(Box::new(e))
}

// ─── Resolver ────────────────────────────────────────────────────────────────

pub struct ScoreResolver<S, G> {
  store:           Arc<S>,
  geocoder:        Arc<G>,
  geocode_timeout: Duration,
}

impl<S: ScoreStore, G: Geocoder> ScoreResolver<S, G> {
  pub fn new(store: Arc<S>, geocoder: Arc<G>) -> Self {
    Self { store, geocoder, geocode_timeout: DEFAULT_GEOCODE_TIMEOUT }
  }

  pub fn with_geocode_timeout(mut self, timeout: Duration) -> Self {
    self.geocode_timeout = timeout;
    self
  }

  /// Score the tract containing `address`.
  pub async fn score_for_address(&self, address: &str) -> Result<AddressScore, ResolveError> {
    let result = tokio::time::timeout(self.geocode_timeout, self.geocoder.resolve_address(address))
      .await
      .map_err(upstream_err)?
      .map_err(upstream_err)?;

    let block = result
      .first_block_geoid()
      .ok_or_else(|| ResolveError::NotFound(format!("no match for address {address:?}")))?;
    // A geoid the geocoder hands back that we cannot parse is its fault, not
    // the caller's.
    let geoid = truncate_to_tract(block).map_err(upstream_err)?;
    tracing::debug!(address, block, %geoid, "address geocoded");

    let (rank, cbsa) = tokio::try_join!(
      async { self.store.rank(geoid).await.map_err(store_err) },
      async { self.store.cbsa(geoid).await.map_err(store_err) },
    )?;
    let rank = rank.ok_or_else(|| ResolveError::NotFound(format!("no score for tract {geoid}")))?;
    let cbsa = cbsa.ok_or_else(|| ResolveError::NotFound(format!("no CBSA for tract {geoid}")))?;

    Ok(AddressScore {
      geoid,
      nwi: rank.nwi,
      searched_address: address.to_owned(),
      regional_transit_usage_percentage: cbsa.public_transit_percentage,
      regional_transit_usage: cbsa.public_transit_usage,
      regional_bike_ridership: cbsa.bike_ridership,
    })
  }

  /// A page of scores, optionally restricted to the CBSAs `zipcode` maps to.
  ///
  /// A zip split across several CBSAs yields each code's page in mapping
  /// order, concatenated without removing duplicates.
  pub async fn list_scores(
    &self,
    zipcode: Option<&str>,
    page: Page,
  ) -> Result<Vec<ScoreEntry>, ResolveError> {
    let ranks = match zipcode {
      None => self.store.list_ranks(page).await.map_err(store_err)?,
      Some(raw) => {
        let zipcode = normalize_zipcode(raw)?;
        let codes = self
          .store
          .cbsa_codes_for_zipcode(&zipcode)
          .await
          .map_err(store_err)?;
        tracing::debug!(%zipcode, ?codes, "zip code resolved");

        let mut ranks = Vec::new();
        for code in codes {
          ranks.extend(self.store.ranks_in_cbsa(code, page).await.map_err(store_err)?);
        }
        ranks
      }
    };

    let mut entries = Vec::with_capacity(ranks.len());
    for (position, rank) in ranks.into_iter().enumerate() {
      entries.push(self.entry(position + page.offset, rank).await);
    }
    Ok(entries)
  }

  /// The full composite tract stored under `geoid`.
  pub async fn tract(&self, geoid: Geoid) -> Result<StoredTract, ResolveError> {
    self
      .store
      .group_tract(geoid)
      .await
      .map_err(store_err)?
      .ok_or_else(|| ResolveError::NotFound(format!("tract {geoid} not found")))
  }

  async fn entry(&self, id: usize, rank: Rank) -> ScoreEntry {
    let geoid = rank.geoid;
    let csa = best_effort("csa", geoid, self.store.csa(geoid)).await;
    let cbsa = best_effort("cbsa", geoid, self.store.cbsa(geoid)).await;
    let cbsa = cbsa.unwrap_or_else(|| Cbsa {
      geoid,
      code: None,
      name: String::new(),
      public_transit_usage: 0.0,
      public_transit_percentage: 0.0,
      bike_ridership: 0,
    });

    ScoreEntry {
      id,
      geoid,
      csa_name: csa.map(|c| c.name).unwrap_or_default(),
      cbsa_name: cbsa.name,
      nwi: rank.nwi,
      regional_transit_usage_percentage: cbsa.public_transit_percentage,
      regional_transit_usage: cbsa.public_transit_usage,
      regional_bike_ridership: cbsa.bike_ridership,
    }
  }
}

/// Await a decorating lookup, logging and swallowing misses and failures.
async fn best_effort<T, E: fmt::Display>(
  what: &'static str,
  geoid: Geoid,
  lookup: impl Future<Output = Result<Option<T>, E>>,
) -> Option<T> {
  match lookup.await {
    Ok(Some(v)) => Some(v),
    Ok(None) => {
      tracing::warn!(%geoid, what, "lookup missed; using empty values");
      None
    }
    Err(e) => {
      tracing::warn!(%geoid, what, error = %e, "lookup failed; using empty values");
      None
    }
  }
}
