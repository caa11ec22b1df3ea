//! Handler for `GET /tracts/{geoid}`.

use std::sync::Arc;

use axum::{
  extract::{Path, Query, State},
  response::Response,
};
use nwi_core::{Geoid, geocode::Geocoder, store::ScoreStore};
use serde::Deserialize;

use crate::{error::ApiError, format::OutputFormat, resolver::ScoreResolver};

#[derive(Debug, Deserialize, Default)]
pub struct TractParams {
  pub format: Option<String>,
}

/// `GET /tracts/{geoid}` — the full stored tract; 404 if absent.
pub async fn get_one<S, G>(
  State(resolver): State<Arc<ScoreResolver<S, G>>>,
  Path(raw): Path<String>,
  Query(params): Query<TractParams>,
) -> Result<Response, ApiError>
where
  S: ScoreStore,
  G: Geocoder,
{
  let format = OutputFormat::from_param(params.format.as_deref())?;
  let geoid: Geoid = raw.parse().map_err(|e: nwi_core::Error| ApiError::BadRequest(e.to_string()))?;
  let tract = resolver.tract(geoid).await?;
  format.render("tract", &tract)
}
