//! HTTP server for walkability scores.
//!
//! Wires the score API to a SQLite store and the Census geocoder, and adds
//! the service banner and request tracing.

pub mod config;
pub mod geocoder;

use std::sync::Arc;

use axum::{Json, Router, routing::get};
use nwi_api::ScoreResolver;
use nwi_core::{geocode::Geocoder, store::ScoreStore};
use serde_json::{Value, json};
use tower_http::trace::TraceLayer;

pub use config::{GeocoderConfig, ServerConfig};
pub use geocoder::CensusGeocoder;

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the full application router.
pub fn router<S, G>(resolver: Arc<ScoreResolver<S, G>>) -> Router
where
  S: ScoreStore + 'static,
  G: Geocoder + 'static,
{
  Router::new()
    .route("/", get(banner))
    .merge(nwi_api::api_router(resolver))
    .layer(TraceLayer::new_for_http())
}

/// `GET /`
async fn banner() -> Json<Value> {
  Json(json!({
    "service": "National Walkability Index",
    "version": env!("CARGO_PKG_VERSION"),
    "endpoints": ["/scores", "/tracts/{geoid}"],
  }))
}

#[cfg(test)]
mod tests {
  use std::io;

  use axum::{
    body::Body,
    http::{Request, StatusCode},
  };
  use nwi_core::geocode::GeocodeResult;
  use nwi_store_sqlite::SqliteStore;
  use tower::ServiceExt as _;

  use super::*;

  struct NoMatch;

  impl Geocoder for NoMatch {
    type Error = io::Error;

    async fn resolve_address(&self, _address: &str) -> Result<GeocodeResult, io::Error> {
      Ok(GeocodeResult::default())
    }
  }

  async fn app() -> Router {
    let store = SqliteStore::open_in_memory().await.unwrap();
    router(Arc::new(ScoreResolver::new(Arc::new(store), Arc::new(NoMatch))))
  }

  async fn get(uri: &str) -> (StatusCode, Value) {
    let req = Request::builder().uri(uri).body(Body::empty()).unwrap();
    let resp = app().await.oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
  }

  #[tokio::test]
  async fn banner_names_the_service() {
    let (status, body) = get("/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["service"], "National Walkability Index");
  }

  #[tokio::test]
  async fn api_routes_are_mounted() {
    let (status, body) = get("/scores").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));

    let (status, _) = get("/scores?address=nowhere").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
  }
}
