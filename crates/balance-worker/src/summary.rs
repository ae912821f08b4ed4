//! Spend aggregation over the store, producing a [`Summary`].

use balance_core::{store::ExpenseStore, summary::Summary};
use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SummaryError {
  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),

  #[error(transparent)]
  Core(#[from] balance_core::Error),
}

/// Compute the current balance, percent-of-limit and per-category totals.
pub async fn aggregate_spend<S: ExpenseStore>(
  store: &S,
  limit: Decimal,
) -> Result<Summary, SummaryError> {
  let balance = store
    .total_spend()
    .await
    .map_err(|e| SummaryError::Store(Box::new(e)))?;
  let categories = store
    .spend_by_category()
    .await
    .map_err(|e| SummaryError::Store(Box::new(e)))?;

  Ok(Summary::from_totals(balance, limit, categories)?)
}
