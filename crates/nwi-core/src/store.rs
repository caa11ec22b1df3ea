//! The `ScoreStore` trait.
//!
//! The trait is implemented by storage backends (e.g. `nwi-store-sqlite`).
//! The ingestion pipeline and the score resolver depend on this abstraction
//! and receive a handle to it explicitly; there is no process-wide store.

use std::future::Future;

use crate::{
  geoid::Geoid,
  score::Page,
  tract::{Cbsa, Csa, GroupTract, Rank, StoredTract},
  zipcode::Zipcode,
};

/// Abstraction over a walkability score store backend.
///
/// Tracts and zip mappings are only ever bulk-inserted. The single mutation
/// is the in-place CBSA update performed by the enrichment pass.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait ScoreStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Bulk writes ─────────────────────────────────────────────────────────

  /// Persist a batch of tracts together with all of their sub-entities.
  ///
  /// The batch is written atomically: either every tract lands or none do.
  fn insert_group_tracts<'a>(
    &'a self,
    batch: &'a [GroupTract],
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  /// Persist a batch of zip → CBSA mapping rows.
  fn insert_zipcodes<'a>(
    &'a self,
    batch: &'a [Zipcode],
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  // ── CBSA enrichment ───────────────────────────────────────────────────

  /// All CBSA rows (one per member tract) carrying `code`.
  fn cbsas_by_code(
    &self,
    code: u32,
  ) -> impl Future<Output = Result<Vec<Cbsa>, Self::Error>> + Send + '_;

  /// Overwrite the mutable fields of the CBSA row owned by `cbsa.geoid`.
  /// Returns `false` if no such row exists.
  fn update_cbsa(
    &self,
    cbsa: Cbsa,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  // ── Point reads ─────────────────────────────────────────────────────────

  fn rank(
    &self,
    geoid: Geoid,
  ) -> impl Future<Output = Result<Option<Rank>, Self::Error>> + Send + '_;

  fn cbsa(
    &self,
    geoid: Geoid,
  ) -> impl Future<Output = Result<Option<Cbsa>, Self::Error>> + Send + '_;

  fn csa(
    &self,
    geoid: Geoid,
  ) -> impl Future<Output = Result<Option<Csa>, Self::Error>> + Send + '_;

  /// Materialise the full composite tract. Returns `None` if absent.
  fn group_tract(
    &self,
    geoid: Geoid,
  ) -> impl Future<Output = Result<Option<StoredTract>, Self::Error>> + Send + '_;

  // ── Listings ────────────────────────────────────────────────────────────

  /// A page of rank rows in ascending geoid order.
  fn list_ranks(
    &self,
    page: Page,
  ) -> impl Future<Output = Result<Vec<Rank>, Self::Error>> + Send + '_;

  /// The CBSA codes `zipcode` maps to, in ingestion order. Duplicates are
  /// preserved.
  fn cbsa_codes_for_zipcode<'a>(
    &'a self,
    zipcode: &'a str,
  ) -> impl Future<Output = Result<Vec<u32>, Self::Error>> + Send + 'a;

  /// A page of rank rows for tracts whose CBSA carries `code`, in ascending
  /// geoid order.
  fn ranks_in_cbsa(
    &self,
    code: u32,
    page: Page,
  ) -> impl Future<Output = Result<Vec<Rank>, Self::Error>> + Send + '_;
}
