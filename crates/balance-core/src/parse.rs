//! Subject-line parser for transaction notifications.
//!
//! The card issuer's notifications have a fixed-format subject:
//!
//! ```text
//! You made a $10.12 transaction with BIG DOG
//! ```
//!
//! The amount is the 4th whitespace token with the `$` stripped; the
//! merchant is everything after the literal `"transaction with"`, trimmed.
//! Parsing is pure and deterministic — no I/O, no clock reads.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::{Error, Result, expense::Expense, gateway::RawMessage};

/// Leading phrase of every transaction notification subject.
pub const TRANSACTION_PHRASE: &str = "You made a";

/// Literal marker preceding the merchant name.
pub const MERCHANT_MARKER: &str = "transaction with";

/// Extract an [`Expense`] from a raw message.
///
/// A non-numeric amount token is an [`Error::InvalidAmount`] — a recoverable
/// skip-this-message outcome, not a pipeline fault. A missing merchant
/// marker yields `merchant: None`, which is a valid record that simply
/// never gets enriched.
pub fn parse_message(
  message: &RawMessage,
  ingested_at: DateTime<Utc>,
) -> Result<Expense> {
  let amount = parse_amount(&message.subject)?;
  let merchant = parse_merchant(&message.subject);

  Ok(Expense {
    id: message.id.clone(),
    occurred_at: message.received_at,
    amount,
    merchant,
    raw_subject: message.subject.clone(),
    ingested_at,
    category: None,
    categorized_at: None,
  })
}

fn parse_amount(subject: &str) -> Result<Decimal> {
  let stripped = subject.replace('$', "");
  let token = stripped
    .split_whitespace()
    .nth(3)
    .ok_or_else(|| Error::MissingAmount(subject.to_owned()))?;

  token
    .parse::<Decimal>()
    .map_err(|_| Error::InvalidAmount { token: token.to_owned() })
}

fn parse_merchant(subject: &str) -> Option<String> {
  let (_, rest) = subject.split_once(MERCHANT_MARKER)?;
  let merchant = rest.trim();
  if merchant.is_empty() {
    None
  } else {
    Some(merchant.to_owned())
  }
}
