//! [`SqliteStore`] — the SQLite implementation of [`ScoreStore`].

use std::path::Path;

use chrono::Utc;
use nwi_core::{
  Geoid,
  score::Page,
  store::ScoreStore,
  tract::{Cbsa, Csa, GroupTract, Rank, StoredTract},
  zipcode::Zipcode,
};
use rusqlite::OptionalExtension as _;

use crate::{
  Result,
  encode::{
    AREA_COLUMNS, AREA_WIDTH, CBSA_COLUMNS, CBSA_WIDTH, CSA_COLUMNS, CSA_WIDTH,
    DETAIL_COLUMNS, DETAIL_WIDTH, POPULATION_COLUMNS, POPULATION_WIDTH, RANK_COLUMNS,
    RANK_WIDTH, SHAPE_COLUMNS, area_from_row, cbsa_from_row, csa_from_row, decode_dt,
    detail_from_row, encode_count, encode_dt, encode_geoid, encode_u64, geoid_at,
    population_from_row, rank_from_row, shape_from_row,
  },
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A walkability score store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Run a rank-returning query with the given parameters.
  async fn query_ranks(
    &self,
    sql: String,
    params: Vec<i64>,
  ) -> Result<Vec<Rank>> {
    let ranks = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params_from_iter(params.iter()), |row| {
            rank_from_row(row, 0)
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(ranks)
  }
}

/// Write one tract and its sub-entities inside an open transaction.
fn insert_tract(
  tx: &rusqlite::Transaction<'_>,
  t: &GroupTract,
  now: &str,
) -> rusqlite::Result<()> {
  let geoid = encode_geoid(t.geoid10);

  tx.prepare_cached(
    "INSERT INTO group_tracts (geoid10, geoid20, created_at, updated_at)
     VALUES (?1, ?2, ?3, ?3)",
  )?
  .execute(rusqlite::params![geoid, encode_geoid(t.geoid20), now])?;

  tx.prepare_cached(
    "INSERT INTO geoid_details (geoid, statefp, countyfp, tractce, blkgrpce)
     VALUES (?1, ?2, ?3, ?4, ?5)",
  )?
  .execute(rusqlite::params![
    geoid,
    t.detail.statefp,
    t.detail.countyfp,
    t.detail.tractce,
    t.detail.blkgrpce,
  ])?;

  tx.prepare_cached("INSERT INTO csas (geoid, csa, csa_name) VALUES (?1, ?2, ?3)")?
    .execute(rusqlite::params![geoid, t.csa.code, t.csa.name])?;

  tx.prepare_cached(
    "INSERT INTO cbsas (
       geoid, cbsa, cbsa_name, public_transit_usage, public_transit_percentage, bike_ridership
     ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
  )?
  .execute(rusqlite::params![
    geoid,
    t.cbsa.code,
    t.cbsa.name,
    t.cbsa.public_transit_usage,
    t.cbsa.public_transit_percentage,
    encode_u64(t.cbsa.bike_ridership),
  ])?;

  tx.prepare_cached(
    "INSERT INTO areas (geoid, ac_total, ac_water, ac_land, ac_unpr)
     VALUES (?1, ?2, ?3, ?4, ?5)",
  )?
  .execute(rusqlite::params![
    geoid,
    t.area.total,
    t.area.water,
    t.area.land,
    t.area.unprotected,
  ])?;

  tx.prepare_cached(
    "INSERT INTO populations (geoid, total_pop, count_hu, hh, workers)
     VALUES (?1, ?2, ?3, ?4, ?5)",
  )?
  .execute(rusqlite::params![
    geoid,
    t.population.total,
    t.population.housing_units,
    t.population.households,
    t.population.workers,
  ])?;

  let r = &t.rank;
  tx.prepare_cached(
    "INSERT INTO ranks (
       geoid, d2b_e8mixa, d2a_ephhm, d3b, d4a,
       d2a_ranked, d2b_ranked, d3b_ranked, d4a_ranked, nwi,
       bike_count_rank, bike_percentage_rank, bike_fatality_rank, bike_share_rank,
       transit_score, bike_score
     ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)",
  )?
  .execute(rusqlite::params![
    geoid,
    r.d2b_e8mixa,
    r.d2a_ephhm,
    r.d3b,
    r.d4a,
    f64::from(r.d2a_ranked),
    f64::from(r.d2b_ranked),
    f64::from(r.d3b_ranked),
    f64::from(r.d4a_ranked),
    r.nwi,
    r.bike_count_rank,
    r.bike_percentage_rank,
    r.bike_fatality_rank,
    r.bike_share_rank,
    r.transit_score,
    r.bike_score,
  ])?;

  tx.prepare_cached(
    "INSERT INTO shapes (geoid, shape_length, shape_area, geometry)
     VALUES (?1, ?2, ?3, ?4)",
  )?
  .execute(rusqlite::params![geoid, t.shape.length, t.shape.area, t.shape.geometry])?;

  Ok(())
}

// ─── ScoreStore impl ─────────────────────────────────────────────────────────

impl ScoreStore for SqliteStore {
  type Error = crate::Error;

  // ── Bulk writes ───────────────────────────────────────────────────────────

  async fn insert_group_tracts(&self, batch: &[GroupTract]) -> Result<()> {
    let tracts = batch.to_vec();
    let now    = encode_dt(Utc::now());

    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        for t in &tracts {
          insert_tract(&tx, t, &now)?;
        }
        tx.commit()?;
        Ok(())
      })
      .await?;

    tracing::debug!(rows = batch.len(), "inserted tract batch");
    Ok(())
  }

  async fn insert_zipcodes(&self, batch: &[Zipcode]) -> Result<()> {
    let rows = batch.to_vec();

    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        {
          let mut stmt =
            tx.prepare_cached("INSERT INTO zipcodes (zipcode, cbsa) VALUES (?1, ?2)")?;
          for z in &rows {
            stmt.execute(rusqlite::params![z.zipcode, z.cbsa])?;
          }
        }
        tx.commit()?;
        Ok(())
      })
      .await?;

    tracing::debug!(rows = batch.len(), "inserted zipcode batch");
    Ok(())
  }

  // ── CBSA enrichment ───────────────────────────────────────────────────────

  async fn cbsas_by_code(&self, code: u32) -> Result<Vec<Cbsa>> {
    let cbsas = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {CBSA_COLUMNS} FROM cbsas c WHERE c.cbsa = ?1 ORDER BY c.geoid"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![code], |row| cbsa_from_row(row, 0))?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(cbsas)
  }

  async fn update_cbsa(&self, cbsa: Cbsa) -> Result<bool> {
    let now = encode_dt(Utc::now());

    let changed = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let geoid = encode_geoid(cbsa.geoid);
        let changed = tx.execute(
          "UPDATE cbsas
           SET cbsa_name = ?2,
               public_transit_usage = ?3,
               public_transit_percentage = ?4,
               bike_ridership = ?5
           WHERE geoid = ?1",
          rusqlite::params![
            geoid,
            cbsa.name,
            cbsa.public_transit_usage,
            cbsa.public_transit_percentage,
            encode_u64(cbsa.bike_ridership),
          ],
        )?;
        if changed > 0 {
          tx.execute(
            "UPDATE group_tracts SET updated_at = ?2 WHERE geoid10 = ?1",
            rusqlite::params![geoid, now],
          )?;
        }
        tx.commit()?;
        Ok(changed > 0)
      })
      .await?;
    Ok(changed)
  }

  // ── Point reads ───────────────────────────────────────────────────────────

  async fn rank(&self, geoid: Geoid) -> Result<Option<Rank>> {
    let key = encode_geoid(geoid);
    let rank = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("SELECT {RANK_COLUMNS} FROM ranks r WHERE r.geoid = ?1"),
            rusqlite::params![key],
            |row| rank_from_row(row, 0),
          )
          .optional()?)
      })
      .await?;
    Ok(rank)
  }

  async fn cbsa(&self, geoid: Geoid) -> Result<Option<Cbsa>> {
    let key = encode_geoid(geoid);
    let cbsa = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("SELECT {CBSA_COLUMNS} FROM cbsas c WHERE c.geoid = ?1"),
            rusqlite::params![key],
            |row| cbsa_from_row(row, 0),
          )
          .optional()?)
      })
      .await?;
    Ok(cbsa)
  }

  async fn csa(&self, geoid: Geoid) -> Result<Option<Csa>> {
    let key = encode_geoid(geoid);
    let csa = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("SELECT {CSA_COLUMNS} FROM csas s WHERE s.geoid = ?1"),
            rusqlite::params![key],
            |row| csa_from_row(row, 0),
          )
          .optional()?)
      })
      .await?;
    Ok(csa)
  }

  async fn group_tract(&self, geoid: Geoid) -> Result<Option<StoredTract>> {
    let key = encode_geoid(geoid);

    let raw: Option<(GroupTract, String, String)> = self
      .conn
      .call(move |conn| {
        let sql = format!(
          "SELECT g.geoid10, g.geoid20, g.created_at, g.updated_at,
                  {DETAIL_COLUMNS}, {CSA_COLUMNS}, {CBSA_COLUMNS}, {AREA_COLUMNS},
                  {POPULATION_COLUMNS}, {RANK_COLUMNS}, {SHAPE_COLUMNS}
           FROM group_tracts g
           JOIN geoid_details d ON d.geoid = g.geoid10
           JOIN csas          s ON s.geoid = g.geoid10
           JOIN cbsas         c ON c.geoid = g.geoid10
           JOIN areas         a ON a.geoid = g.geoid10
           JOIN populations   p ON p.geoid = g.geoid10
           JOIN ranks         r ON r.geoid = g.geoid10
           JOIN shapes        h ON h.geoid = g.geoid10
           WHERE g.geoid10 = ?1"
        );
        Ok(conn
          .query_row(&sql, rusqlite::params![key], |row| {
            let detail_at     = 4;
            let csa_at        = detail_at + DETAIL_WIDTH;
            let cbsa_at       = csa_at + CSA_WIDTH;
            let area_at       = cbsa_at + CBSA_WIDTH;
            let population_at = area_at + AREA_WIDTH;
            let rank_at       = population_at + POPULATION_WIDTH;
            let shape_at      = rank_at + RANK_WIDTH;

            let tract = GroupTract {
              geoid10:    geoid_at(row, 0)?,
              geoid20:    geoid_at(row, 1)?,
              detail:     detail_from_row(row, detail_at)?,
              csa:        csa_from_row(row, csa_at)?,
              cbsa:       cbsa_from_row(row, cbsa_at)?,
              area:       area_from_row(row, area_at)?,
              population: population_from_row(row, population_at)?,
              rank:       rank_from_row(row, rank_at)?,
              shape:      shape_from_row(row, shape_at)?,
            };
            Ok((tract, row.get(2)?, row.get(3)?))
          })
          .optional()?)
      })
      .await?;

    raw
      .map(|(tract, created, updated)| {
        Ok(StoredTract {
          tract,
          created_at: decode_dt(&created)?,
          updated_at: decode_dt(&updated)?,
        })
      })
      .transpose()
  }

  // ── Listings ──────────────────────────────────────────────────────────────

  async fn list_ranks(&self, page: Page) -> Result<Vec<Rank>> {
    self
      .query_ranks(
        format!("SELECT {RANK_COLUMNS} FROM ranks r ORDER BY r.geoid LIMIT ?1 OFFSET ?2"),
        vec![encode_count(page.limit), encode_count(page.offset)],
      )
      .await
  }

  async fn cbsa_codes_for_zipcode(&self, zipcode: &str) -> Result<Vec<u32>> {
    let zip = zipcode.to_owned();
    let codes = self
      .conn
      .call(move |conn| {
        let mut stmt =
          conn.prepare("SELECT cbsa FROM zipcodes WHERE zipcode = ?1 ORDER BY id")?;
        let rows = stmt
          .query_map(rusqlite::params![zip], |row| row.get(0))?
          .collect::<rusqlite::Result<Vec<u32>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(codes)
  }

  async fn ranks_in_cbsa(&self, code: u32, page: Page) -> Result<Vec<Rank>> {
    self
      .query_ranks(
        format!(
          "SELECT {RANK_COLUMNS}
           FROM ranks r
           JOIN cbsas c ON c.geoid = r.geoid
           WHERE c.cbsa = ?1
           ORDER BY r.geoid
           LIMIT ?2 OFFSET ?3"
        ),
        vec![i64::from(code), encode_count(page.limit), encode_count(page.offset)],
      )
      .await
  }
}
