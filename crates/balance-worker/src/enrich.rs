//! The enrichment worker: consume handed-off expenses, ask the oracle for a
//! category, write it back.
//!
//! Consumption is at-least-once — re-categorizing a record is harmless
//! because the update is keyed by id and idempotent. Oracle failures drop
//! the attempt (the record simply stays uncategorized); there is no in-loop
//! retry.

use balance_core::{
  expense::Expense,
  gateway::Categorizer,
  store::{ExpenseStore, UpdateOutcome},
};
use chrono::Utc;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

pub struct EnrichmentWorker<C, S> {
  handoff: mpsc::UnboundedReceiver<Expense>,
  oracle:  C,
  store:   S,
}

impl<C, S> EnrichmentWorker<C, S>
where
  C: Categorizer,
  S: ExpenseStore,
{
  pub fn new(
    handoff: mpsc::UnboundedReceiver<Expense>,
    oracle: C,
    store: S,
  ) -> Self {
    Self { handoff, oracle, store }
  }

  /// Consume until cancelled or the producer side closes.
  pub async fn run(mut self, cancel: CancellationToken) {
    info!("enrichment worker started");
    loop {
      tokio::select! {
        _ = cancel.cancelled() => {
          info!("enrichment worker stopping");
          return;
        }
        next = self.handoff.recv() => {
          match next {
            Some(expense) => self.enrich(expense).await,
            None => {
              info!("handoff channel closed; enrichment worker stopping");
              return;
            }
          }
        }
      }
    }
  }

  pub(crate) async fn enrich(&self, expense: Expense) {
    let Some(merchant) = expense.merchant.as_deref() else {
      debug!(id = %expense.id, "no merchant; nothing to enrich");
      return;
    };

    let category = match self.oracle.classify(merchant).await {
      Ok(c) => c,
      Err(e) => {
        warn!(
          id = %expense.id,
          %merchant,
          error = %e,
          "classification failed; leaving uncategorized"
        );
        return;
      }
    };

    info!(id = %expense.id, %merchant, %category, "categorized merchant");

    match self.store.set_category(&expense.id, &category, Utc::now()).await {
      Ok(UpdateOutcome::Updated) => {}
      Ok(UpdateOutcome::NotFound) => {
        warn!(id = %expense.id, "record not found for category update");
      }
      Err(e) => {
        warn!(id = %expense.id, error = %e, "category update failed");
      }
    }
  }
}
