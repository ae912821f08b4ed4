//! [`SqliteStore`] — the SQLite implementation of [`ExpenseStore`].

use std::{collections::BTreeMap, future::Future, path::Path};

use chrono::{DateTime, Utc};
use rusqlite::OptionalExtension as _;
use rust_decimal::Decimal;

use balance_core::{
  expense::Expense,
  store::{ExpenseStore, InsertOutcome, UpdateOutcome},
  summary::UNCATEGORIZED,
};

use crate::{
  Error, Result,
  encode::{RawExpense, decode_amount, encode_amount, encode_dt},
  schema::SCHEMA,
};

const EXPENSE_COLUMNS: &str = "expense_id, occurred_at, amount, merchant, \
                               raw_subject, ingested_at, category, \
                               categorized_at";

// ─── Store ───────────────────────────────────────────────────────────────────

/// An expense store backed by a single SQLite file.
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
}

// ─── ExpenseStore impl ───────────────────────────────────────────────────────

impl ExpenseStore for SqliteStore {
  type Error = Error;

  async fn insert(&self, expense: Expense) -> Result<InsertOutcome> {
    let occurred_at_str    = encode_dt(expense.occurred_at);
    let amount_str         = encode_amount(expense.amount);
    let ingested_at_str    = encode_dt(expense.ingested_at);
    let categorized_at_str = expense.categorized_at.map(encode_dt);

    let outcome = self
      .conn
      .call(move |conn| {
        let result = conn.execute(
          "INSERT INTO expenses (
             expense_id, occurred_at, amount, merchant,
             raw_subject, ingested_at, category, categorized_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
          rusqlite::params![
            expense.id,
            occurred_at_str,
            amount_str,
            expense.merchant,
            expense.raw_subject,
            ingested_at_str,
            expense.category,
            categorized_at_str,
          ],
        );

        match result {
          Ok(_) => Ok(InsertOutcome::Inserted),
          // The id already exists: report it, leave the stored row alone.
          Err(rusqlite::Error::SqliteFailure(e, _))
            if e.code == rusqlite::ErrorCode::ConstraintViolation =>
          {
            Ok(InsertOutcome::Duplicate)
          }
          Err(e) => Err(e.into()),
        }
      })
      .await?;

    Ok(outcome)
  }

  fn set_category(
    &self,
    id: &str,
    category: &str,
    categorized_at: DateTime<Utc>,
  ) -> impl Future<Output = Result<UpdateOutcome>> + Send + '_ {
    let id_str       = id.to_owned();
    let category_str = category.to_owned();
    let at_str       = encode_dt(categorized_at);

    async move {
      let rows = self
        .conn
        .call(move |conn| {
          let rows = conn.execute(
            "UPDATE expenses SET category = ?2, categorized_at = ?3
             WHERE expense_id = ?1",
            rusqlite::params![id_str, category_str, at_str],
          )?;
          Ok(rows)
        })
        .await?;

      Ok(if rows == 0 {
        UpdateOutcome::NotFound
      } else {
        UpdateOutcome::Updated
      })
    }
  }

  fn get(
    &self,
    id: &str,
  ) -> impl Future<Output = Result<Option<Expense>>> + Send + '_ {
    let id_str = id.to_owned();

    async move {
      let raw: Option<RawExpense> = self
        .conn
        .call(move |conn| {
          Ok(
            conn
              .query_row(
                &format!(
                  "SELECT {EXPENSE_COLUMNS} FROM expenses WHERE expense_id = ?1"
                ),
                rusqlite::params![id_str],
                RawExpense::from_row,
              )
              .optional()?,
          )
        })
        .await?;

      raw.map(RawExpense::into_expense).transpose()
    }
  }

  async fn total_spend(&self) -> Result<Decimal> {
    // Amounts are summed as decimals in Rust. SQL SUM over the TEXT column
    // would coerce to binary floats and drift.
    let amounts: Vec<String> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare("SELECT amount FROM expenses")?;
        let rows = stmt
          .query_map([], |row| row.get::<_, String>(0))?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    let mut total = Decimal::ZERO;
    for s in &amounts {
      total += decode_amount(s)?;
    }
    Ok(total)
  }

  async fn spend_by_category(&self) -> Result<BTreeMap<String, Decimal>> {
    let label = UNCATEGORIZED.to_owned();

    let rows: Vec<(String, String)> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT IFNULL(category, ?1), amount FROM expenses",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![label], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    let mut totals = BTreeMap::new();
    for (category, amount) in &rows {
      let entry = totals.entry(category.clone()).or_insert(Decimal::ZERO);
      *entry += decode_amount(amount)?;
    }
    Ok(totals)
  }
}
