//! Run dashboard aggregate.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Planned and completed work per stage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageCounts {
    /// Chapters in the plan
    pub chapters_total: usize,
    /// Chapter reports present on disk
    pub chapters_completed: usize,
    /// Adjacent pairs in the plan
    pub adjacent_total: usize,
    /// Adjacent reports present on disk
    pub adjacent_completed: usize,
    /// Arc windows in the plan
    pub arc_total: usize,
    /// Arc reports present on disk
    pub arc_completed: usize,
    /// Whether the action plan exists
    pub synthesis_completed: bool,
    /// Failed work items in the run
    pub errors: usize,
}

/// Issue tallies across every readable report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueTotals {
    pub total: usize,
    pub by_severity: BTreeMap<String, usize>,
    pub by_type: BTreeMap<String, usize>,
    pub by_chapter: BTreeMap<String, usize>,
}

/// One row of the top-chapters table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChapterIssueCount {
    pub chapter: String,
    pub issue_count: usize,
}

/// Aggregate view of a run, recomputed from the artifacts on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub run_id: String,
    pub generated_at: String,
    pub mode: String,
    pub window: usize,
    pub counts: StageCounts,
    pub issues: IssueTotals,
    /// Chapters with the most issues, descending, ties by slug
    pub top_chapters: Vec<ChapterIssueCount>,
    /// Most recent error strings, bounded
    pub errors: Vec<String>,
}
