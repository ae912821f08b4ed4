//! The `ExpenseStore` trait and its outcome types.
//!
//! The trait is implemented by storage backends (e.g.
//! `balance-store-sqlite`). The workers depend on this abstraction, not on
//! any concrete backend. The store is the only resource mutated from more
//! than one task — the ingestion loop inserts, the enrichment worker
//! updates — so both writes are idempotent and keyed by record identity; a
//! uniqueness constraint on the id is the concurrency-safety boundary.

use std::{collections::BTreeMap, future::Future};

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::expense::Expense;

// ─── Outcomes ────────────────────────────────────────────────────────────────

/// Result of an insert attempt.
///
/// A duplicate key is a normal outcome, not an error: it means a prior
/// attempt (possibly before a crash-restart re-fetch) already persisted this
/// identity. The caller marks the message seen but must not re-enqueue it
/// for enrichment or re-signal activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
  Inserted,
  Duplicate,
}

/// Result of a conditional category update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
  Updated,
  NotFound,
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over durable expense storage.
///
/// All methods return `Send` futures so the trait can be used across tokio
/// tasks.
pub trait ExpenseStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Persist a new expense. The id is the primary key; inserting an id that
  /// already exists reports [`InsertOutcome::Duplicate`] and leaves the
  /// stored record untouched.
  fn insert(
    &self,
    expense: Expense,
  ) -> impl Future<Output = Result<InsertOutcome, Self::Error>> + Send + '_;

  /// Set the category and categorization timestamp for an existing record.
  /// Idempotent: re-applying the same update is harmless.
  fn set_category(
    &self,
    id: &str,
    category: &str,
    categorized_at: DateTime<Utc>,
  ) -> impl Future<Output = Result<UpdateOutcome, Self::Error>> + Send + '_;

  /// Fetch one record by id. Supports audit and manual replay.
  fn get(
    &self,
    id: &str,
  ) -> impl Future<Output = Result<Option<Expense>, Self::Error>> + Send + '_;

  /// Sum of all stored amounts, decimal-exact.
  fn total_spend(
    &self,
  ) -> impl Future<Output = Result<Decimal, Self::Error>> + Send + '_;

  /// Per-category sums. Records not yet categorized are grouped under
  /// `"Uncategorized"` so the totals always account for the full balance.
  fn spend_by_category(
    &self,
  ) -> impl Future<Output = Result<BTreeMap<String, Decimal>, Self::Error>>
  + Send
  + '_;
}
