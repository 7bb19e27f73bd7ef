//! Run-scoped counters shared by every work item.

use parking_lot::Mutex;
use serde::Serialize;
use std::collections::{BTreeMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use storylint_error::StorylintError;
use tracing::error;

/// Pipeline stage a work item belongs to.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    strum::Display,
    strum::EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Stage {
    /// Chapter parsing during planning
    Parse,
    /// Per-chapter audits
    Chapter,
    /// Adjacent-pair audits
    Adjacent,
    /// Arc-window audits
    Arc,
    /// Action plan
    Synthesis,
    /// Dashboard write
    Dashboard,
}

/// How one work item ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemStatus {
    /// A new artifact was written
    Generated,
    /// The artifact already existed
    Skipped,
    /// The item failed and was recorded
    Failed,
}

/// Per-stage item counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StageTally {
    /// Artifacts written
    pub generated: usize,
    /// Cache hits
    pub skipped: usize,
    /// Failures
    pub failed: usize,
}

/// Error tracking for one run.
///
/// Passed by reference into every concurrently running item. The error
/// counter is atomic; lists and tallies sit behind short-lived locks that
/// are never held across an await.
#[derive(Debug)]
pub struct RunState {
    errors: AtomicUsize,
    recent_errors: Mutex<VecDeque<String>>,
    recent_limit: usize,
    failed_items: Mutex<Vec<String>>,
    tallies: Mutex<BTreeMap<Stage, StageTally>>,
}

impl RunState {
    /// Empty state keeping at most `recent_limit` error messages.
    pub fn new(recent_limit: usize) -> Self {
        Self {
            errors: AtomicUsize::new(0),
            recent_errors: Mutex::new(VecDeque::with_capacity(recent_limit)),
            recent_limit,
            failed_items: Mutex::new(Vec::new()),
            tallies: Mutex::new(BTreeMap::new()),
        }
    }

    /// Count a generated or skipped item.
    pub fn record(&self, stage: Stage, status: ItemStatus) {
        let mut tallies = self.tallies.lock();
        let tally = tallies.entry(stage).or_default();
        match status {
            ItemStatus::Generated => tally.generated += 1,
            ItemStatus::Skipped => tally.skipped += 1,
            ItemStatus::Failed => tally.failed += 1,
        }
    }

    /// Record a failed item and keep its message among the recent errors.
    pub fn record_failure(&self, stage: Stage, identity: &str, err: &StorylintError) {
        let count = self.errors.fetch_add(1, Ordering::SeqCst) + 1;
        error!(stage = %stage, item = identity, error = %err, count, "Work item failed");

        self.failed_items.lock().push(identity.to_string());
        {
            let mut recent = self.recent_errors.lock();
            recent.push_back(format!("{}: {}", identity, err));
            while recent.len() > self.recent_limit {
                recent.pop_front();
            }
        }
        self.record(stage, ItemStatus::Failed);
    }

    /// Failures so far.
    pub fn error_count(&self) -> usize {
        self.errors.load(Ordering::SeqCst)
    }

    /// Newest error messages, oldest first.
    pub fn recent_errors(&self) -> Vec<String> {
        self.recent_errors.lock().iter().cloned().collect()
    }

    /// Identities of failed items, in failure order.
    pub fn failed_items(&self) -> Vec<String> {
        self.failed_items.lock().clone()
    }

    /// Tally for one stage; zero when the stage saw no items.
    pub fn tally(&self, stage: Stage) -> StageTally {
        self.tallies.lock().get(&stage).copied().unwrap_or_default()
    }

    /// Tallies per stage that saw any item.
    pub fn tallies(&self) -> BTreeMap<Stage, StageTally> {
        self.tallies.lock().clone()
    }
}
