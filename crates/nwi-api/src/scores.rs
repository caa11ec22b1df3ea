//! Handler for `GET /scores`.
//!
//! | Query | Notes |
//! |-------|-------|
//! | `address` | Score one address; other params except `format` are ignored |
//! | `zipcode` | Restrict a listing to the CBSAs the zip falls in |
//! | `limit`, `offset` | Listing window; bad values fall back to 50 / 0 |
//! | `format` | `json` (default) or `xml` |

use std::sync::Arc;

use axum::{
  extract::{Query, State},
  response::Response,
};
use nwi_core::{geocode::Geocoder, score::Page, store::ScoreStore};
use serde::Deserialize;

use crate::{error::ApiError, format::OutputFormat, resolver::ScoreResolver};

/// Paging values stay strings so that garbage falls back to the defaults
/// instead of failing extraction.
#[derive(Debug, Deserialize, Default)]
pub struct ScoreParams {
  pub address: Option<String>,
  pub zipcode: Option<String>,
  pub limit:   Option<String>,
  pub offset:  Option<String>,
  pub format:  Option<String>,
}

fn non_blank(v: &Option<String>) -> Option<&str> {
  v.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// `GET /scores[?address=..|?zipcode=..][&limit=..][&offset=..][&format=..]`
pub async fn handler<S, G>(
  State(resolver): State<Arc<ScoreResolver<S, G>>>,
  Query(params): Query<ScoreParams>,
) -> Result<Response, ApiError>
where
  S: ScoreStore,
  G: Geocoder,
{
  let format = OutputFormat::from_param(params.format.as_deref())?;

  if let Some(address) = non_blank(&params.address) {
    let score = resolver.score_for_address(address).await?;
    return format.render("score", &score);
  }

  let page = Page::from_raw(params.limit.as_deref(), params.offset.as_deref());
  let entries = resolver
    .list_scores(non_blank(&params.zipcode), page)
    .await?;
  format.render_list(&entries)
}
