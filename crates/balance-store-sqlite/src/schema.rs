//! SQL schema for the Balance SQLite store.
//!
//! Executed once at connection startup via `PRAGMA user_version`. Future
//! migrations will be gated on that version number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

-- The id is the upstream message id. The PRIMARY KEY constraint is the
-- concurrency-safety boundary: a second insert of the same identity is
-- rejected, never merged.
CREATE TABLE IF NOT EXISTS expenses (
    expense_id     TEXT PRIMARY KEY,
    occurred_at    TEXT NOT NULL,   -- ISO 8601 UTC
    amount         TEXT NOT NULL,   -- canonical decimal string
    merchant       TEXT,
    raw_subject    TEXT NOT NULL,
    ingested_at    TEXT NOT NULL,
    category       TEXT,            -- set once by enrichment
    categorized_at TEXT
);

CREATE INDEX IF NOT EXISTS expenses_category_idx ON expenses(category);
CREATE INDEX IF NOT EXISTS expenses_occurred_idx ON expenses(occurred_at);

PRAGMA user_version = 1;
";
