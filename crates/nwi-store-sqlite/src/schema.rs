//! SQL schema for the SQLite score store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS group_tracts (
    geoid10     INTEGER PRIMARY KEY,
    geoid20     INTEGER NOT NULL,
    created_at  TEXT NOT NULL,
    updated_at  TEXT NOT NULL
);

-- Every table below holds exactly one row per tract, keyed by its geoid.

CREATE TABLE IF NOT EXISTS geoid_details (
    geoid     INTEGER PRIMARY KEY
              REFERENCES group_tracts(geoid10) ON UPDATE CASCADE ON DELETE CASCADE,
    statefp   INTEGER NOT NULL,
    countyfp  INTEGER NOT NULL,
    tractce   INTEGER NOT NULL,
    blkgrpce  INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS csas (
    geoid     INTEGER PRIMARY KEY
              REFERENCES group_tracts(geoid10) ON UPDATE CASCADE ON DELETE CASCADE,
    csa       INTEGER,             -- NULL outside any CSA
    csa_name  TEXT NOT NULL DEFAULT ''
);

-- The transit and bike columns are rewritten by the enrichment pass.
CREATE TABLE IF NOT EXISTS cbsas (
    geoid                      INTEGER PRIMARY KEY
                               REFERENCES group_tracts(geoid10) ON UPDATE CASCADE ON DELETE CASCADE,
    cbsa                       INTEGER,    -- NULL outside any CBSA
    cbsa_name                  TEXT NOT NULL DEFAULT '',
    public_transit_usage       REAL NOT NULL DEFAULT 0,
    public_transit_percentage  REAL NOT NULL DEFAULT 0,
    bike_ridership             INTEGER NOT NULL DEFAULT 0
);

CREATE TABLE IF NOT EXISTS areas (
    geoid     INTEGER PRIMARY KEY
              REFERENCES group_tracts(geoid10) ON UPDATE CASCADE ON DELETE CASCADE,
    ac_total  REAL NOT NULL,
    ac_water  REAL NOT NULL,
    ac_land   REAL NOT NULL,
    ac_unpr   REAL NOT NULL
);

CREATE TABLE IF NOT EXISTS populations (
    geoid      INTEGER PRIMARY KEY
               REFERENCES group_tracts(geoid10) ON UPDATE CASCADE ON DELETE CASCADE,
    total_pop  INTEGER NOT NULL,
    count_hu   REAL NOT NULL,
    hh         REAL NOT NULL,
    workers    INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS ranks (
    geoid                 INTEGER PRIMARY KEY
                          REFERENCES group_tracts(geoid10) ON UPDATE CASCADE ON DELETE CASCADE,
    d2b_e8mixa            REAL NOT NULL,
    d2a_ephhm             REAL NOT NULL,
    d3b                   REAL NOT NULL,
    d4a                   REAL NOT NULL,
    d2a_ranked            REAL NOT NULL,
    d2b_ranked            REAL NOT NULL,
    d3b_ranked            REAL NOT NULL,
    d4a_ranked            REAL NOT NULL,
    nwi                   REAL NOT NULL,
    bike_count_rank       INTEGER NOT NULL DEFAULT 0,
    bike_percentage_rank  INTEGER NOT NULL DEFAULT 0,
    bike_fatality_rank    INTEGER NOT NULL DEFAULT 0,
    bike_share_rank       INTEGER NOT NULL DEFAULT 1,
    transit_score         INTEGER NOT NULL DEFAULT 0,
    bike_score            REAL NOT NULL DEFAULT 0
);

CREATE TABLE IF NOT EXISTS shapes (
    geoid         INTEGER PRIMARY KEY
                  REFERENCES group_tracts(geoid10) ON UPDATE CASCADE ON DELETE CASCADE,
    shape_length  REAL NOT NULL,
    shape_area    REAL NOT NULL,
    geometry      TEXT NOT NULL DEFAULT ''
);

-- No uniqueness: a zip split across metro areas has one row per CBSA.
CREATE TABLE IF NOT EXISTS zipcodes (
    id       INTEGER PRIMARY KEY AUTOINCREMENT,
    zipcode  TEXT NOT NULL,
    cbsa     INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS cbsas_code_idx       ON cbsas(cbsa);
CREATE INDEX IF NOT EXISTS zipcodes_zipcode_idx ON zipcodes(zipcode);

PRAGMA user_version = 1;
";
