//! Collaborator traits — the seams between the pipeline and the outside
//! world.
//!
//! The mailbox, the classification oracle and the notification transport are
//! external services. The workers depend on these abstractions, not on any
//! concrete client; `balance-gateway` provides the HTTP implementations and
//! the test suites provide fakes.

use std::{future::Future, time::Duration};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A message as fetched from the mailbox. Read-only to the pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawMessage {
  /// Stable unique id assigned by the mail service.
  pub id:          String,
  pub received_at: DateTime<Utc>,
  pub subject:     String,
  pub body:        String,
}

/// Read access to the watched mailbox.
///
/// Both methods may be called repeatedly; `search_since` explicitly may
/// return ids it has returned before (re-delivery is the dedup layer's
/// problem, not the mailbox's). A failed call surfaces as one `Err` — never
/// as a silently truncated result — so the caller can tell "no candidates"
/// from "the fetch broke".
pub trait Mailbox: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Ids of candidate transaction notifications delivered within `window`
  /// of now.
  fn search_since(
    &self,
    window: Duration,
  ) -> impl Future<Output = Result<Vec<String>, Self::Error>> + Send + '_;

  /// Download one message. `None` if it disappeared since the search.
  fn fetch<'a>(
    &'a self,
    id: &'a str,
  ) -> impl Future<Output = Result<Option<RawMessage>, Self::Error>> + Send + 'a;
}

/// The classification oracle: merchant text in, category label out.
///
/// Labels come from a fixed closed set plus an `"Uncategorized"` fallback;
/// the implementation is responsible for clamping anything else.
pub trait Categorizer: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  fn classify<'a>(
    &'a self,
    merchant: &'a str,
  ) -> impl Future<Output = Result<String, Self::Error>> + Send + 'a;
}

/// Outbound notification transport (compose is the caller's job).
pub trait Notifier: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  fn send<'a>(
    &'a self,
    subject: &'a str,
    body: &'a str,
    recipients: &'a [String],
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;
}
