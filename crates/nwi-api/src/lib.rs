//! HTTP read API for walkability scores.
//!
//! Exposes an axum [`Router`] backed by any [`ScoreStore`] and [`Geocoder`].
//! Tracing, TLS and listening are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .merge(nwi_api::api_router(resolver.clone()))
//! ```

pub mod error;
pub mod format;
pub mod resolver;
pub mod scores;
pub mod tracts;

use std::sync::Arc;

use axum::{Router, routing::get};
use nwi_core::{geocode::Geocoder, store::ScoreStore};

pub use error::ApiError;
pub use format::OutputFormat;
pub use resolver::{ResolveError, ScoreResolver};

/// Build the API router for `resolver`.
///
/// The returned `Router<()>` can be merged into any parent router regardless
/// of its own state type.
pub fn api_router<S, G>(resolver: Arc<ScoreResolver<S, G>>) -> Router<()>
where
  S: ScoreStore + 'static,
  G: Geocoder + 'static,
{
  Router::new()
    .route("/scores", get(scores::handler::<S, G>))
    .route("/tracts/{geoid}", get(tracts::get_one::<S, G>))
    .with_state(resolver)
}

#[cfg(test)]
mod tests;
