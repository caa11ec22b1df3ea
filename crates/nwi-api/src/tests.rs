//! Router tests against an in-memory store and a stub geocoder.

use std::{io, sync::Arc};

use axum::{
  Router,
  body::Body,
  http::{Request, StatusCode, header},
};
use nwi_core::{
  geocode::{AddressMatch, GeocodeResult, Geocoder},
  geoid::GeoidDetail,
  store::ScoreStore,
  tract::{AreaComposition, Cbsa, Csa, GroupTract, Population, Rank, Shape},
  zipcode::Zipcode,
};
use nwi_store_sqlite::SqliteStore;
use serde_json::Value;
use tower::ServiceExt as _;

use crate::{ScoreResolver, api_router};

// ─── Fixtures ────────────────────────────────────────────────────────────────

/// Geocoder answering every address with a fixed outcome.
pub(crate) enum StubGeocoder {
  Match(String),
  NoMatch,
  Fail,
}

impl StubGeocoder {
  pub(crate) fn matching(block: &str) -> Self { Self::Match(block.to_owned()) }

  pub(crate) fn no_match() -> Self { Self::NoMatch }

  pub(crate) fn failing() -> Self { Self::Fail }
}

impl Geocoder for StubGeocoder {
  type Error = io::Error;

  async fn resolve_address(&self, _address: &str) -> Result<GeocodeResult, io::Error> {
    match self {
      Self::Match(block) => Ok(GeocodeResult {
        matches: vec![AddressMatch { block_geoid: block.clone() }],
      }),
      Self::NoMatch => Ok(GeocodeResult::default()),
      Self::Fail => Err(io::Error::other("connection reset")),
    }
  }
}

struct Metro {
  csa:       (u16, &'static str),
  cbsa:      (u32, &'static str),
  transit:   (f64, f64),
  ridership: u64,
}

const SF: Metro = Metro {
  csa:       (488, "San Jose-San Francisco-Oakland, CA"),
  cbsa:      (41860, "San Francisco-Oakland-Berkeley, CA"),
  transit:   (345_210.0, 16.8),
  ridership: 21_000,
};

const LA: Metro = Metro {
  csa:       (348, "Los Angeles-Long Beach, CA"),
  cbsa:      (31080, "Los Angeles-Long Beach-Anaheim, CA"),
  transit:   (250_000.0, 4.6),
  ridership: 38_000,
};

fn tract(tract_code: &str, nwi: f64, metro: Option<&Metro>) -> GroupTract {
  let detail = GeoidDetail::from_components("06", "001", tract_code, "1").unwrap();
  let geoid = detail.geoid;
  GroupTract {
    geoid10: geoid,
    geoid20: geoid,
    detail,
    csa: Csa {
      geoid,
      code: metro.map(|m| m.csa.0),
      name: metro.map(|m| m.csa.1.to_owned()).unwrap_or_default(),
    },
    cbsa: Cbsa {
      geoid,
      code: metro.map(|m| m.cbsa.0),
      name: metro.map(|m| m.cbsa.1.to_owned()).unwrap_or_default(),
      public_transit_usage: metro.map_or(0.0, |m| m.transit.0),
      public_transit_percentage: metro.map_or(0.0, |m| m.transit.1),
      bike_ridership: metro.map_or(0, |m| m.ridership),
    },
    area: AreaComposition { geoid, total: 120.5, water: 0.0, land: 120.5, unprotected: 119.0 },
    population: Population {
      geoid,
      total:         1_450,
      housing_units: 610.0,
      households:    598.0,
      workers:       702,
    },
    rank: Rank { nwi, ..Rank::unscored(geoid) },
    shape: Shape { geoid, length: 4_213.7, area: 487_655.2, geometry: String::new() },
  }
}

/// Four Alameda tracts: two in San Francisco's CBSA, one filed under Los
/// Angeles', one rural. Zip 94601 maps to both CBSAs.
pub(crate) async fn seeded_store() -> SqliteStore {
  let store = SqliteStore::open_in_memory().await.unwrap();
  store
    .insert_group_tracts(&[
      tract("400100", 14.2, Some(&SF)),
      tract("400200", 12.0, Some(&SF)),
      tract("207400", 15.1, Some(&LA)),
      tract("950100", 3.5, None),
    ])
    .await
    .unwrap();
  store
    .insert_zipcodes(&[
      Zipcode { zipcode: "94601".into(), cbsa: 41860 },
      Zipcode { zipcode: "94601".into(), cbsa: 31080 },
      Zipcode { zipcode: "90012".into(), cbsa: 31080 },
    ])
    .await
    .unwrap();
  store
}

async fn app(geocoder: StubGeocoder) -> Router {
  let resolver = ScoreResolver::new(Arc::new(seeded_store().await), Arc::new(geocoder));
  api_router(Arc::new(resolver))
}

async fn get(app: Router, uri: &str) -> (StatusCode, String) {
  let req = Request::builder().uri(uri).body(Body::empty()).unwrap();
  let resp = app.oneshot(req).await.unwrap();
  let status = resp.status();
  let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
  (status, String::from_utf8(bytes.to_vec()).unwrap())
}

async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
  let (status, body) = get(app, uri).await;
  (status, serde_json::from_str(&body).unwrap())
}

// ─── Listing ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn zip_listing_returns_tract_with_cbsa_name() {
  let app = app(StubGeocoder::no_match()).await;
  let (status, body) = get_json(app, "/scores?zipcode=94601").await;
  assert_eq!(status, StatusCode::OK);

  let first = &body[0];
  assert_eq!(first["geoid"], 6_001_400_100u64);
  assert_eq!(first["nwi"], 14.2);
  assert_eq!(first["cbsa_name"], "San Francisco-Oakland-Berkeley, CA");
  assert_eq!(body.as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn listing_without_params_uses_default_page() {
  let app = app(StubGeocoder::no_match()).await;
  let (status, body) = get_json(app, "/scores").await;
  assert_eq!(status, StatusCode::OK);
  let ids: Vec<u64> = body
    .as_array()
    .unwrap()
    .iter()
    .map(|e| e["id"].as_u64().unwrap())
    .collect();
  assert_eq!(ids, vec![0, 1, 2, 3]);
}

#[tokio::test]
async fn invalid_paging_values_fall_back_to_defaults() {
  let app = app(StubGeocoder::no_match()).await;
  let (status, body) = get_json(app, "/scores?limit=lots&offset=-1").await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body.as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn paging_values_are_applied() {
  let app = app(StubGeocoder::no_match()).await;
  let (_, body) = get_json(app, "/scores?limit=1&offset=2").await;
  let entries = body.as_array().unwrap();
  assert_eq!(entries.len(), 1);
  assert_eq!(entries[0]["id"], 2);
  assert_eq!(entries[0]["geoid"], 6_001_400_200u64);
}

#[tokio::test]
async fn xml_listing_wraps_each_score() {
  let app = app(StubGeocoder::no_match()).await;
  let req = Request::builder()
    .uri("/scores?zipcode=90012&format=xml")
    .body(Body::empty())
    .unwrap();
  let resp = app.oneshot(req).await.unwrap();
  assert_eq!(resp.status(), StatusCode::OK);
  assert_eq!(resp.headers()[header::CONTENT_TYPE], "application/xml");
  let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
  let xml = std::str::from_utf8(&bytes).unwrap();
  assert!(xml.starts_with("<scores><score>"), "{xml}");
  assert!(xml.contains("<geoid>6001207400</geoid>"), "{xml}");
}

#[tokio::test]
async fn malformed_zip_is_bad_request() {
  let app = app(StubGeocoder::no_match()).await;
  let (status, body) = get_json(app, "/scores?zipcode=oakland").await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert!(body["error"].as_str().unwrap().contains("oakland"));
}

// ─── Address ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn address_returns_score() {
  let app = app(StubGeocoder::matching("060014001001003")).await;
  let (status, body) = get_json(app, "/scores?address=1%20Main%20St%2C%20Oakland").await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["geoid"], 6_001_400_100u64);
  assert_eq!(body["nwi"], 14.2);
  assert_eq!(body["searched_address"], "1 Main St, Oakland");
  assert_eq!(body["regional_transit_usage"], 345_210.0);
}

#[tokio::test]
async fn address_as_xml() {
  let app = app(StubGeocoder::matching("060014001001003")).await;
  let (status, xml) = get(app, "/scores?address=Oakland&format=xml").await;
  assert_eq!(status, StatusCode::OK);
  assert!(xml.starts_with("<score>"), "{xml}");
  assert!(xml.contains("<searched_address>Oakland</searched_address>"), "{xml}");
}

#[tokio::test]
async fn unmatched_address_is_404() {
  let app = app(StubGeocoder::no_match()).await;
  let (status, body) = get_json(app, "/scores?address=nowhere").await;
  assert_eq!(status, StatusCode::NOT_FOUND);
  assert!(body["error"].is_string());
}

#[tokio::test]
async fn geocoder_failure_is_502() {
  let app = app(StubGeocoder::failing()).await;
  let (status, _) = get_json(app, "/scores?address=1%20Main%20St").await;
  assert_eq!(status, StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn unknown_format_is_rejected_before_lookup() {
  // A failing geocoder would answer 502 if the lookup ran first.
  let app = app(StubGeocoder::failing()).await;
  let (status, body) = get_json(app, "/scores?address=x&format=yaml").await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert!(body["error"].as_str().unwrap().contains("yaml"));
}

// ─── Tracts ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn tract_by_padded_or_bare_geoid() {
  for uri in ["/tracts/06001400100", "/tracts/6001400100"] {
    let app = app(StubGeocoder::no_match()).await;
    let (status, body) = get_json(app, uri).await;
    assert_eq!(status, StatusCode::OK, "{uri}");
    assert_eq!(body["geoid10"], 6_001_400_100u64);
    assert_eq!(body["rank"]["nwi"], 14.2);
    assert!(body["created_at"].is_string());
  }
}

#[tokio::test]
async fn tract_as_xml() {
  let app = app(StubGeocoder::no_match()).await;
  let req = Request::builder()
    .uri("/tracts/06001400100?format=xml")
    .body(Body::empty())
    .unwrap();
  let resp = app.oneshot(req).await.unwrap();
  assert_eq!(resp.status(), StatusCode::OK);
  assert_eq!(resp.headers()[header::CONTENT_TYPE], "application/xml");
  let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
  let xml = std::str::from_utf8(&bytes).unwrap();
  assert!(xml.starts_with("<tract>"), "{xml}");
  assert!(xml.contains("<geoid10>6001400100</geoid10>"), "{xml}");
  assert!(xml.contains("<nwi>14.2</nwi>"), "{xml}");
}

#[tokio::test]
async fn unknown_tract_is_404() {
  let app = app(StubGeocoder::no_match()).await;
  let (status, _) = get_json(app, "/tracts/36061000100").await;
  assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn malformed_tract_geoid_is_400() {
  let app = app(StubGeocoder::no_match()).await;
  let (status, _) = get_json(app, "/tracts/not-a-geoid").await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
}
