//! The ingestion loop: mailbox → parse → persist → hand off.
//!
//! One poll cycle searches the mailbox for candidate notifications, then
//! walks each unseen candidate through fetch → parse → insert → enqueue →
//! activity signal → dedup mark. Candidates are isolated from each other: a
//! bad message is logged and skipped, never blocking the batch. An
//! infrastructure failure aborts the cycle and the whole thing retries on
//! the next interval — the loop itself never dies except on cancellation.

use std::time::Duration;

use balance_core::{
  expense::Expense,
  gateway::Mailbox,
  parse::parse_message,
  store::{ExpenseStore, InsertOutcome},
};
use chrono::Utc;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::{debounce::ActivityHandle, dedup::DedupCache};

/// Whether a candidate reached a terminal outcome this cycle.
///
/// `Retry` leaves the id unmarked so the next poll picks it up again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CandidateOutcome {
  Terminal,
  Retry,
}

pub struct IngressWorker<M, S> {
  mailbox:       M,
  store:         S,
  handoff:       mpsc::UnboundedSender<Expense>,
  activity:      ActivityHandle,
  dedup:         DedupCache,
  poll_interval: Duration,
  lookback:      Duration,
}

impl<M, S> IngressWorker<M, S>
where
  M: Mailbox,
  S: ExpenseStore,
{
  pub fn new(
    mailbox: M,
    store: S,
    handoff: mpsc::UnboundedSender<Expense>,
    activity: ActivityHandle,
    poll_interval: Duration,
    lookback: Duration,
    dedup_ttl: Duration,
  ) -> Self {
    Self {
      mailbox,
      store,
      handoff,
      activity,
      dedup: DedupCache::new(dedup_ttl),
      poll_interval,
      lookback,
    }
  }

  /// Poll forever until cancelled. Cancellation is observed at the sleep
  /// boundary, so the loop exits within one interval.
  pub async fn run(mut self, cancel: CancellationToken) {
    info!(
      interval_secs = self.poll_interval.as_secs(),
      "ingress worker started"
    );
    loop {
      if let Err(e) = self.poll_once().await {
        warn!(error = %e, "poll cycle failed; retrying next interval");
      }

      tokio::select! {
        _ = cancel.cancelled() => {
          info!("ingress worker stopping");
          return;
        }
        _ = tokio::time::sleep(self.poll_interval) => {}
      }
    }
  }

  /// One full poll cycle. `Err` means the mailbox search itself failed;
  /// per-candidate failures are handled (and logged) inside.
  pub(crate) async fn poll_once(&mut self) -> Result<(), M::Error> {
    let ids = self.mailbox.search_since(self.lookback).await?;
    debug!(candidates = ids.len(), "mailbox search complete");

    for id in ids {
      if self.dedup.seen(&id) {
        continue;
      }
      if self.process_candidate(&id).await == CandidateOutcome::Terminal {
        self.dedup.mark_seen(&id);
      }
    }

    Ok(())
  }

  async fn process_candidate(&self, id: &str) -> CandidateOutcome {
    let message = match self.mailbox.fetch(id).await {
      Ok(Some(m)) => m,
      Ok(None) => {
        // Vanished between search and fetch; the next search won't return
        // it if it is really gone.
        warn!(%id, "message not found on fetch");
        return CandidateOutcome::Retry;
      }
      Err(e) => {
        warn!(%id, error = %e, "fetch failed; will retry next poll");
        return CandidateOutcome::Retry;
      }
    };

    let expense = match parse_message(&message, Utc::now()) {
      Ok(e) => e,
      Err(e) => {
        warn!(
          %id,
          subject = %message.subject,
          error = %e,
          "unparseable notification; skipping permanently"
        );
        return CandidateOutcome::Terminal;
      }
    };

    match self.store.insert(expense.clone()).await {
      Ok(InsertOutcome::Inserted) => {
        // Insert precedes enqueue: enrichment must never see a record that
        // is not yet durable.
        if self.handoff.send(expense).is_err() {
          warn!(%id, "handoff channel closed; record stays uncategorized");
        }
        self.activity.signal();
        info!(%id, "ingested expense");
        CandidateOutcome::Terminal
      }
      Ok(InsertOutcome::Duplicate) => {
        // Already persisted by an earlier attempt. It was enqueued and
        // signalled back then; doing either again would double-process.
        info!(%id, "duplicate expense; already processed");
        CandidateOutcome::Terminal
      }
      Err(e) => {
        error!(%id, error = %e, "insert failed; will retry next poll");
        CandidateOutcome::Retry
      }
    }
  }
}
