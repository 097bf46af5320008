//! Personal-record celebration watcher
//!
//! Observes the session logger's trigger counter and decides when to fetch
//! pending celebratable records. Celebration is non-critical by contract:
//! nothing on this path may fail or block the logging workflow.

use std::collections::HashSet;

use crate::models::PersonalRecord;

/// Kept in app state so the last observed trigger survives screen
/// re-renders; a zero trigger must never re-fire a check.
pub struct CelebrationWatcher {
  last_trigger: u64,
  /// Stamp for in-flight fetches. A fetch started under an older generation
  /// discards its result (the logging screen was torn down meanwhile).
  generation: u64,
  /// Records already acknowledged, so each identity is celebrated at most
  /// once whatever the dismissal path.
  acked: HashSet<String>,
}

impl CelebrationWatcher {
  pub fn new() -> Self {
    Self {
      last_trigger: 0,
      generation: 0,
      acked: HashSet::new(),
    }
  }

  /// Arm exactly one fetch per observed change of the trigger counter.
  /// Zero never fires; an unchanged value never re-fires.
  pub fn should_poll(&mut self, trigger: u64) -> bool {
    if trigger == 0 || trigger == self.last_trigger {
      return false;
    }
    self.last_trigger = trigger;
    true
  }

  pub fn generation(&self) -> u64 {
    self.generation
  }

  /// Screen teardown: results of any in-flight fetch are stale.
  pub fn invalidate(&mut self) {
    self.generation += 1;
  }

  /// New logging screen instance. Acknowledged ids are kept: a record
  /// celebrated once stays celebrated.
  pub fn reset(&mut self) {
    self.last_trigger = 0;
    self.invalidate();
  }

  /// Drop records that were already shown and acknowledged.
  pub fn filter_fresh(&self, records: Vec<PersonalRecord>) -> Vec<PersonalRecord> {
    records
      .into_iter()
      .filter(|pr| !self.acked.contains(&pr.id))
      .collect()
  }

  /// Claim the single acknowledgment slot for a record. Returns false when
  /// the record was already acknowledged; the caller must then skip the
  /// call entirely.
  pub fn mark_acked(&mut self, pr_id: &str) -> bool {
    self.acked.insert(pr_id.to_string())
  }
}

impl Default for CelebrationWatcher {
  fn default() -> Self {
    Self::new()
  }
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
