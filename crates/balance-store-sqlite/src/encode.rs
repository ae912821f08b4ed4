//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! All timestamps are stored as RFC 3339 strings; amounts as canonical
//! decimal strings (never floats — SQL numeric affinity would coerce them to
//! binary doubles and aggregate with drift).

use balance_core::expense::Expense;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Decimal ─────────────────────────────────────────────────────────────────

pub fn encode_amount(amount: Decimal) -> String { amount.to_string() }

pub fn decode_amount(s: &str) -> Result<Decimal> {
  s.parse().map_err(|_| Error::AmountParse(s.to_owned()))
}

// ─── Row mapping ─────────────────────────────────────────────────────────────

/// An `expenses` row as raw column values, before decoding.
pub struct RawExpense {
  pub expense_id:     String,
  pub occurred_at:    String,
  pub amount:         String,
  pub merchant:       Option<String>,
  pub raw_subject:    String,
  pub ingested_at:    String,
  pub category:       Option<String>,
  pub categorized_at: Option<String>,
}

impl RawExpense {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      expense_id:     row.get(0)?,
      occurred_at:    row.get(1)?,
      amount:         row.get(2)?,
      merchant:       row.get(3)?,
      raw_subject:    row.get(4)?,
      ingested_at:    row.get(5)?,
      category:       row.get(6)?,
      categorized_at: row.get(7)?,
    })
  }

  pub fn into_expense(self) -> Result<Expense> {
    Ok(Expense {
      id:             self.expense_id,
      occurred_at:    decode_dt(&self.occurred_at)?,
      amount:         decode_amount(&self.amount)?,
      merchant:       self.merchant,
      raw_subject:    self.raw_subject,
      ingested_at:    decode_dt(&self.ingested_at)?,
      category:       self.category,
      categorized_at: self
        .categorized_at
        .as_deref()
        .map(decode_dt)
        .transpose()?,
    })
  }
}
