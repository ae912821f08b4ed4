//! Expense — the persisted record produced by parsing one transaction
//! notification.
//!
//! Identity is the upstream message id: stable, unique, and the storage
//! primary key. Everything captured at parse time is immutable once stored;
//! only the enrichment pair (`category`, `categorized_at`) is ever written
//! again, and at most once under normal operation.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A single card transaction extracted from a notification e-mail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
  /// Upstream message id. Never regenerated locally.
  pub id:             String,
  /// When the transaction happened, per the message envelope.
  pub occurred_at:    DateTime<Utc>,
  /// Transaction amount. Decimal end-to-end; never a binary float.
  pub amount:         Decimal,
  /// Merchant name, if the subject carried one. `None` skips enrichment.
  pub merchant:       Option<String>,
  /// The raw subject line, kept for audit and manual replay.
  pub raw_subject:    String,
  /// When this record entered the pipeline.
  pub ingested_at:    DateTime<Utc>,
  /// Spend category, set once by the enrichment worker.
  pub category:       Option<String>,
  pub categorized_at: Option<DateTime<Utc>>,
}
