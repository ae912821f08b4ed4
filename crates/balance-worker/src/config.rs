//! Worker configuration, deserialised from `config.toml` with `BALANCE_*`
//! environment overrides.
//!
//! Validation runs once at startup and is the only fatal error class in the
//! process; nothing re-validates mid-run.

use std::{path::PathBuf, time::Duration};

use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("notify.recipients must not be empty")]
  NoRecipients,

  #[error("spend_limit must be positive, got {0}")]
  NonPositiveLimit(Decimal),

  /// A message could otherwise expire from dedup while still inside the
  /// search window and be processed twice.
  #[error(
    "dedup_ttl_secs ({ttl}) must be at least lookback_secs ({lookback})"
  )]
  DedupShorterThanLookback { ttl: u64, lookback: u64 },
}

#[derive(Debug, Clone, Deserialize)]
pub struct WorkerConfig {
  /// Path to the SQLite store file.
  pub store_path: PathBuf,

  pub mailbox: MailboxConfig,
  pub oracle:  OracleConfig,
  pub notify:  NotifyConfig,

  /// Budget the summary percentage is computed against.
  pub spend_limit: Decimal,

  #[serde(default = "default_poll_interval_secs")]
  pub poll_interval_secs: u64,

  /// How far back each mailbox search reaches.
  #[serde(default = "default_lookback_secs")]
  pub lookback_secs: u64,

  /// How long a processed message id stays in the dedup cache. Must cover
  /// the lookback window.
  #[serde(default = "default_dedup_ttl_secs")]
  pub dedup_ttl_secs: u64,

  /// Quiet period after the last ingested expense before a summary goes out.
  #[serde(default = "default_quiet_period_secs")]
  pub quiet_period_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MailboxConfig {
  pub base_url: String,
  pub token:    String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OracleConfig {
  pub base_url: String,
  pub api_key:  String,
  pub model:    String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NotifyConfig {
  pub base_url:   String,
  pub token:      String,
  pub from:       String,
  pub recipients: Vec<String>,
}

fn default_poll_interval_secs() -> u64 { 60 }
fn default_lookback_secs() -> u64 { 60 * 60 }
fn default_dedup_ttl_secs() -> u64 { 24 * 60 * 60 }
fn default_quiet_period_secs() -> u64 { 60 }

impl WorkerConfig {
  /// Startup-fatal checks. Everything else is tolerated and retried at
  /// runtime.
  pub fn validate(&self) -> Result<(), ConfigError> {
    if self.notify.recipients.is_empty() {
      return Err(ConfigError::NoRecipients);
    }
    if self.spend_limit <= Decimal::ZERO {
      return Err(ConfigError::NonPositiveLimit(self.spend_limit));
    }
    if self.dedup_ttl_secs < self.lookback_secs {
      return Err(ConfigError::DedupShorterThanLookback {
        ttl:      self.dedup_ttl_secs,
        lookback: self.lookback_secs,
      });
    }
    Ok(())
  }

  pub fn poll_interval(&self) -> Duration {
    Duration::from_secs(self.poll_interval_secs)
  }

  pub fn lookback(&self) -> Duration {
    Duration::from_secs(self.lookback_secs)
  }

  pub fn dedup_ttl(&self) -> Duration {
    Duration::from_secs(self.dedup_ttl_secs)
  }

  pub fn quiet_period(&self) -> Duration {
    Duration::from_secs(self.quiet_period_secs)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn base_config() -> WorkerConfig {
    WorkerConfig {
      store_path:         "/tmp/balance.db".into(),
      mailbox:            MailboxConfig {
        base_url: "http://mail.test".into(),
        token:    "t".into(),
      },
      oracle:             OracleConfig {
        base_url: "http://oracle.test".into(),
        api_key:  "k".into(),
        model:    "m".into(),
      },
      notify:             NotifyConfig {
        base_url:   "http://mail.test".into(),
        token:      "t".into(),
        from:       "balance@example.com".into(),
        recipients: vec!["me@example.com".into()],
      },
      spend_limit:        "100".parse().unwrap(),
      poll_interval_secs: 60,
      lookback_secs:      3600,
      dedup_ttl_secs:     86400,
      quiet_period_secs:  60,
    }
  }

  #[test]
  fn valid_config_passes() {
    base_config().validate().unwrap();
  }

  #[test]
  fn empty_recipients_is_fatal() {
    let mut cfg = base_config();
    cfg.notify.recipients.clear();
    assert!(matches!(cfg.validate(), Err(ConfigError::NoRecipients)));
  }

  #[test]
  fn non_positive_limit_is_fatal() {
    let mut cfg = base_config();
    cfg.spend_limit = Decimal::ZERO;
    assert!(matches!(
      cfg.validate(),
      Err(ConfigError::NonPositiveLimit(_))
    ));
  }

  #[test]
  fn dedup_ttl_must_cover_lookback() {
    let mut cfg = base_config();
    cfg.dedup_ttl_secs = 10;
    cfg.lookback_secs = 3600;
    assert!(matches!(
      cfg.validate(),
      Err(ConfigError::DedupShorterThanLookback { .. })
    ));
  }

  #[test]
  fn deserialises_from_toml_with_defaults() {
    let toml = r#"
      store_path = "balance.db"
      spend_limit = "250.00"

      [mailbox]
      base_url = "http://mail.test"
      token = "t"

      [oracle]
      base_url = "http://oracle.test"
      api_key = "k"
      model = "gpt-4.1-mini"

      [notify]
      base_url = "http://mail.test"
      token = "t"
      from = "balance@example.com"
      recipients = ["me@example.com"]
    "#;

    let cfg: WorkerConfig = config::Config::builder()
      .add_source(config::File::from_str(toml, config::FileFormat::Toml))
      .build()
      .unwrap()
      .try_deserialize()
      .unwrap();

    assert_eq!(cfg.poll_interval_secs, 60);
    assert_eq!(cfg.dedup_ttl_secs, 86400);
    assert_eq!(cfg.spend_limit, "250.00".parse().unwrap());
    cfg.validate().unwrap();
  }
}
