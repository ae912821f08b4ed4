//! Trailing-edge debounce of ingestion activity into summary notifications.
//!
//! `signal()` may be called concurrently and arbitrarily often; the debounce
//! task fires at most one aggregate-and-notify per quiet period, and only
//! once no signal has arrived for the whole quiet duration. A signal
//! arriving while an action is in flight sits in the channel and starts a
//! fresh quiet window afterwards, so a burst during delivery still yields
//! exactly one trailing summary reflecting the latest state.

use std::time::Duration;

use balance_core::{gateway::Notifier, store::ExpenseStore};
use balance_gateway::notify::compose_summary;
use rust_decimal::Decimal;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::summary::aggregate_spend;

/// Cheap cloneable handle for raising activity signals.
#[derive(Clone)]
pub struct ActivityHandle {
  tx: mpsc::UnboundedSender<()>,
}

impl ActivityHandle {
  /// Note that new activity happened. Never blocks; signals are coalesced
  /// by the debounce task, so frequency does not matter.
  pub fn signal(&self) {
    let _ = self.tx.send(());
  }
}

/// Create the signal channel for an [`ActivityDebouncer`].
pub fn activity_channel() -> (ActivityHandle, mpsc::UnboundedReceiver<()>) {
  let (tx, rx) = mpsc::unbounded_channel();
  (ActivityHandle { tx }, rx)
}

pub struct ActivityDebouncer<S, N> {
  signals:    mpsc::UnboundedReceiver<()>,
  quiet:      Duration,
  store:      S,
  notifier:   N,
  recipients: Vec<String>,
  limit:      Decimal,
}

impl<S, N> ActivityDebouncer<S, N>
where
  S: ExpenseStore,
  N: Notifier,
{
  pub fn new(
    signals: mpsc::UnboundedReceiver<()>,
    quiet: Duration,
    store: S,
    notifier: N,
    recipients: Vec<String>,
    limit: Decimal,
  ) -> Self {
    Self { signals, quiet, store, notifier, recipients, limit }
  }

  /// Run until cancelled. If the signal side closes while a burst is
  /// pending, the final summary still goes out before the task exits.
  pub async fn run(mut self, cancel: CancellationToken) {
    info!(quiet_secs = self.quiet.as_secs(), "activity debouncer started");
    loop {
      // Wait for the first signal of a burst.
      tokio::select! {
        _ = cancel.cancelled() => {
          info!("activity debouncer stopping");
          return;
        }
        sig = self.signals.recv() => {
          if sig.is_none() {
            info!("activity channel closed; debouncer stopping");
            return;
          }
        }
      }

      // Trailing edge: every further signal restarts the quiet timer.
      loop {
        tokio::select! {
          _ = cancel.cancelled() => {
            info!("activity debouncer stopping");
            return;
          }
          _ = tokio::time::sleep(self.quiet) => {
            self.aggregate_and_notify().await;
            break;
          }
          sig = self.signals.recv() => {
            if sig.is_none() {
              // Producer gone mid-burst; still owe one final summary.
              self.aggregate_and_notify().await;
              return;
            }
          }
        }
      }
    }
  }

  async fn aggregate_and_notify(&self) {
    let summary = match aggregate_spend(&self.store, self.limit).await {
      Ok(s) => s,
      Err(e) => {
        error!(error = %e, "could not aggregate spend for summary");
        return;
      }
    };

    let (subject, body) = compose_summary(&summary);
    match self.notifier.send(&subject, &body, &self.recipients).await {
      Ok(()) => {
        info!(
          balance = %summary.balance,
          percent = %summary.percent_of_limit,
          "sent summary notification"
        );
      }
      Err(e) => {
        error!(error = %e, "could not send summary notification");
      }
    }
  }
}
