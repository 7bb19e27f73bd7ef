//! Result of a completed run.

use crate::{Stage, StageTally};
use derive_getters::Getters;
use std::collections::BTreeMap;
use std::path::PathBuf;
use storylint_core::DashboardSummary;
use storylint_error::{PipelineError, PipelineErrorKind, StorylintResult};

/// What a run produced and which items failed.
///
/// A run with failures still returns an outcome; every artifact that
/// completed stays on disk and a later run without `force` redoes only the
/// missing items.
#[derive(Debug, Clone, Getters)]
pub struct RunOutcome {
    run_id: String,
    run_dir: PathBuf,
    dashboard: DashboardSummary,
    failed_items: Vec<String>,
    tallies: BTreeMap<Stage, StageTally>,
}

impl RunOutcome {
    pub(crate) fn new(
        run_id: String,
        run_dir: PathBuf,
        dashboard: DashboardSummary,
        failed_items: Vec<String>,
        tallies: BTreeMap<Stage, StageTally>,
    ) -> Self {
        Self {
            run_id,
            run_dir,
            dashboard,
            failed_items,
            tallies,
        }
    }

    /// Whether every item succeeded or was already cached.
    pub fn is_success(&self) -> bool {
        self.failed_items.is_empty()
    }

    /// Tally for one stage; zero when the stage saw no items.
    pub fn tally(&self, stage: Stage) -> StageTally {
        self.tallies.get(&stage).copied().unwrap_or_default()
    }

    /// Convert failures into an error naming every failed item.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineErrorKind::ItemsFailed`] if any item failed.
    pub fn into_result(self) -> StorylintResult<Self> {
        if self.is_success() {
            return Ok(self);
        }
        Err(PipelineError::new(PipelineErrorKind::ItemsFailed {
            count: self.failed_items.len(),
            items: self.failed_items,
        })
        .into())
    }
}
