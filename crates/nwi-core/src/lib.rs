//! Core types and trait definitions for the walkability index service.
//!
//! This crate is free of HTTP, CSV and database dependencies. The ingestion
//! pipeline, the storage backends and the API layer all depend on it.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod error;
pub mod geocode;
pub mod geoid;
pub mod paths;
pub mod score;
pub mod store;
pub mod tract;
pub mod zipcode;

pub use error::{Error, Result};
pub use geoid::Geoid;
