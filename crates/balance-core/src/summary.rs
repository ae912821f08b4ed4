//! Summary — the derived budget view sent after a quiet period.
//!
//! Computed on demand from the store, never persisted.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Label under which records without a category (and merchants the oracle
/// cannot place) are aggregated.
pub const UNCATEGORIZED: &str = "Uncategorized";

/// Current balance against the configured spend limit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
  /// Sum of all stored amounts.
  pub balance:          Decimal,
  /// `balance / limit * 100`, rounded to one decimal place.
  pub percent_of_limit: Decimal,
  /// Per-category totals. Sorted by category name for stable rendering.
  pub categories:       BTreeMap<String, Decimal>,
}

impl Summary {
  /// Build a summary from aggregated totals.
  ///
  /// Fails only on a non-positive limit, which config validation rejects at
  /// startup anyway.
  pub fn from_totals(
    balance: Decimal,
    limit: Decimal,
    categories: BTreeMap<String, Decimal>,
  ) -> Result<Self> {
    if limit <= Decimal::ZERO {
      return Err(Error::NonPositiveLimit(limit));
    }

    let percent_of_limit =
      (balance / limit * Decimal::ONE_HUNDRED).round_dp(1);

    Ok(Self { balance, percent_of_limit, categories })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
  }

  #[test]
  fn percent_of_limit_rounds_to_one_decimal() {
    let s =
      Summary::from_totals(dec("30.50"), dec("100"), BTreeMap::new()).unwrap();
    assert_eq!(s.balance, dec("30.50"));
    assert_eq!(s.percent_of_limit, dec("30.5"));
  }

  #[test]
  fn uneven_division_rounds() {
    let s =
      Summary::from_totals(dec("33.33"), dec("90"), BTreeMap::new()).unwrap();
    // 37.0333... rounds to 37.0
    assert_eq!(s.percent_of_limit, dec("37.0"));
  }

  #[test]
  fn zero_limit_is_rejected() {
    let err =
      Summary::from_totals(dec("10"), Decimal::ZERO, BTreeMap::new())
        .unwrap_err();
    assert!(matches!(err, Error::NonPositiveLimit(_)));
  }

  #[test]
  fn categories_pass_through() {
    let mut cats = BTreeMap::new();
    cats.insert("Groceries".to_owned(), dec("20.00"));
    cats.insert("Shopping".to_owned(), dec("10.50"));

    let s = Summary::from_totals(dec("30.50"), dec("100"), cats).unwrap();
    assert_eq!(s.categories.len(), 2);
    assert_eq!(s.categories["Groceries"], dec("20.00"));
  }
}
