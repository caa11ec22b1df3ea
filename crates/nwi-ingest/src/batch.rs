//! Fixed-size batch loader.
//!
//! The store caps the number of rows a single bulk insert may carry, so
//! entities are written in consecutive slices of `batch_size`, the last slice
//! holding the remainder. A failed batch stops the load immediately; nothing
//! is retried and later batches are not attempted.

use std::num::NonZeroUsize;

use crate::{Error, Result};

pub const DEFAULT_BATCH_SIZE: NonZeroUsize = NonZeroUsize::new(500).unwrap();

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BatchSummary {
  pub batches: usize,
  pub rows:    usize,
}

/// Hand `items` to `insert` in slices of at most `batch_size`.
///
/// Issues exactly `ceil(items.len() / batch_size)` calls.
pub async fn load_in_batches<T, E, F>(
  items: &[T],
  batch_size: NonZeroUsize,
  mut insert: F,
) -> Result<BatchSummary>
where
  F: AsyncFnMut(&[T]) -> Result<(), E>,
  E: std::error::Error + Send + Sync + 'static,
{
  let mut summary = BatchSummary::default();

  for (batch, slice) in items.chunks(batch_size.get()).enumerate() {
    insert(slice)
      .await
      .map_err(|e| Error::Persistence { batch, source: Box::new(e) })?;
    summary.batches += 1;
    summary.rows += slice.len();
    tracing::debug!(batch, rows = slice.len(), "batch persisted");
  }

  Ok(summary)
}
