//! The Balance worker host — three cooperating tasks over one store.
//!
//! * [`ingress::IngressWorker`] polls the mailbox, parses candidate
//!   notifications, persists new expenses and hands them to enrichment.
//! * [`enrich::EnrichmentWorker`] asks the classification oracle for a spend
//!   category and writes it back.
//! * [`debounce::ActivityDebouncer`] collapses ingestion bursts into one
//!   budget-summary notification per quiet period.
//!
//! Persistence ordering is the load-bearing invariant: within one record,
//! insert happens-before enqueue happens-before activity signal, so
//! enrichment only ever sees durable records and a summary never precedes
//! the data it reports.

pub mod config;
pub mod debounce;
pub mod dedup;
pub mod enrich;
pub mod ingress;
pub mod summary;
