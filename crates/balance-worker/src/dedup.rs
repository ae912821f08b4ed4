//! Time-expiring set of already-processed message ids.
//!
//! Owned exclusively by the ingestion loop, so no synchronisation. Entries
//! are only added after a message reaches a terminal outcome (stored,
//! confirmed duplicate, or unrecoverably unparseable) — a transient failure
//! leaves the id unmarked and the next poll retries it. The TTL must cover
//! the mailbox lookback window; config validation enforces that.

use std::{
  collections::HashMap,
  time::{Duration, Instant},
};

pub struct DedupCache {
  ttl:     Duration,
  entries: HashMap<String, Instant>,
}

impl DedupCache {
  pub fn new(ttl: Duration) -> Self {
    Self { ttl, entries: HashMap::new() }
  }

  /// Has `id` reached a terminal outcome within the TTL?
  pub fn seen(&self, id: &str) -> bool {
    match self.entries.get(id) {
      Some(expiry) => *expiry > Instant::now(),
      None => false,
    }
  }

  /// Record a terminal outcome for `id`. Re-marking refreshes the expiry.
  pub fn mark_seen(&mut self, id: &str) {
    self.sweep();
    self.entries.insert(id.to_owned(), Instant::now() + self.ttl);
  }

  /// Drop expired entries. Called lazily from `mark_seen`, so the map is
  /// bounded by the number of distinct ids per TTL window.
  fn sweep(&mut self) {
    let now = Instant::now();
    self.entries.retain(|_, expiry| *expiry > now);
  }

  #[cfg(test)]
  fn len(&self) -> usize {
    self.entries.len()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn unmarked_id_is_unseen() {
    let cache = DedupCache::new(Duration::from_secs(60));
    assert!(!cache.seen("msg-1"));
  }

  #[test]
  fn marked_id_is_seen_within_ttl() {
    let mut cache = DedupCache::new(Duration::from_secs(60));
    cache.mark_seen("msg-1");
    assert!(cache.seen("msg-1"));
    assert!(!cache.seen("msg-2"));
  }

  #[test]
  fn entry_expires_after_ttl() {
    let mut cache = DedupCache::new(Duration::from_millis(10));
    cache.mark_seen("msg-1");
    std::thread::sleep(Duration::from_millis(20));
    assert!(!cache.seen("msg-1"));
  }

  #[test]
  fn sweep_evicts_expired_entries() {
    let mut cache = DedupCache::new(Duration::from_millis(10));
    cache.mark_seen("msg-1");
    cache.mark_seen("msg-2");
    std::thread::sleep(Duration::from_millis(20));

    // Marking a new id sweeps the stale ones.
    cache.mark_seen("msg-3");
    assert_eq!(cache.len(), 1);
  }

  #[test]
  fn remark_refreshes_expiry() {
    let mut cache = DedupCache::new(Duration::from_millis(50));
    cache.mark_seen("msg-1");
    std::thread::sleep(Duration::from_millis(30));
    cache.mark_seen("msg-1");
    std::thread::sleep(Duration::from_millis(30));
    // 60ms after the first mark but only 30ms after the refresh.
    assert!(cache.seen("msg-1"));
  }
}
