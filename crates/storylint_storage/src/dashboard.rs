//! Dashboard aggregation over the artifacts present on disk.

use crate::{ArtifactKey, ArtifactStore, RunIndex};
use std::collections::BTreeMap;
use storylint_core::{
    ActionPlan, AdjacentReport, ArcReport, ChapterIssueCount, ChapterReport, DashboardConfig,
    DashboardSummary, Issue, IssueTotals, StageCounts,
};
use tracing::{debug, instrument};

/// Summarize a run from its index and whatever reports exist.
///
/// Only planned items count. Missing or unreadable reports are treated as
/// not completed, so a partial run yields `completed < total` rather than an
/// error. `recent_errors` is cut to the newest `recent_errors` entries the
/// config allows.
#[instrument(skip_all, fields(run_id = %store.run_id()))]
pub async fn compute_dashboard(
    store: &ArtifactStore,
    index: &RunIndex,
    config: &DashboardConfig,
    error_count: usize,
    recent_errors: &[String],
) -> DashboardSummary {
    let mut counts = StageCounts {
        chapters_total: index.chapters().len(),
        adjacent_total: index.adjacent().len(),
        arc_total: index.arcs().len(),
        errors: error_count,
        ..StageCounts::default()
    };
    let mut issues = IssueTotals::default();

    for slug in index.chapter_slugs() {
        let Some(report) = read_report::<ChapterReport>(store, &ArtifactKey::chapter(slug)).await
        else {
            continue;
        };
        counts.chapters_completed += 1;
        let found = report.issues.iter().chain(report.integrity_findings.iter());
        let tallied = tally(&mut issues, found);
        if tallied > 0 {
            *issues.by_chapter.entry(slug.to_string()).or_default() += tallied;
        }
    }

    for (left, right) in index.adjacent() {
        let key = ArtifactKey::adjacent(left.as_str(), right.as_str());
        if let Some(report) = read_report::<AdjacentReport>(store, &key).await {
            counts.adjacent_completed += 1;
            tally(&mut issues, report.findings.iter());
        }
    }

    for window in index.arcs() {
        if read_report::<ArcReport>(store, &ArtifactKey::arc(window.as_str()))
            .await
            .is_some()
        {
            counts.arc_completed += 1;
        }
    }

    counts.synthesis_completed = read_report::<ActionPlan>(store, &ArtifactKey::ActionPlan)
        .await
        .is_some();

    let top_chapters = top_chapters(&issues.by_chapter, *config.top_chapters());
    let skip = recent_errors.len().saturating_sub(*config.recent_errors());

    debug!(
        chapters = counts.chapters_completed,
        adjacent = counts.adjacent_completed,
        arcs = counts.arc_completed,
        issues = issues.total,
        "Computed dashboard"
    );

    DashboardSummary {
        run_id: store.run_id().to_string(),
        generated_at: chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
        mode: index.mode().clone(),
        window: *index.window(),
        counts,
        issues,
        top_chapters,
        errors: recent_errors[skip..].to_vec(),
    }
}

async fn read_report<T: serde::de::DeserializeOwned>(
    store: &ArtifactStore,
    key: &ArtifactKey,
) -> Option<T> {
    match store.read_json(key).await {
        Ok(report) => Some(report),
        Err(e) => {
            debug!(artifact = %key.identity(), error = %e, "Report not counted");
            None
        }
    }
}

fn tally<'a>(totals: &mut IssueTotals, issues: impl Iterator<Item = &'a Issue>) -> usize {
    let mut count = 0;
    for issue in issues {
        count += 1;
        *totals.by_severity.entry(issue.severity.to_string()).or_default() += 1;
        *totals.by_type.entry(issue.issue_type.to_string()).or_default() += 1;
    }
    totals.total += count;
    count
}

/// Highest counts first, ties by slug.
fn top_chapters(by_chapter: &BTreeMap<String, usize>, limit: usize) -> Vec<ChapterIssueCount> {
    let mut rows: Vec<ChapterIssueCount> = by_chapter
        .iter()
        .map(|(chapter, count)| ChapterIssueCount {
            chapter: chapter.clone(),
            issue_count: *count,
        })
        .collect();
    rows.sort_by(|a, b| {
        b.issue_count
            .cmp(&a.issue_count)
            .then_with(|| a.chapter.cmp(&b.chapter))
    });
    rows.truncate(limit);
    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn top_chapters_sorts_by_count_then_slug() {
        let by_chapter: BTreeMap<String, usize> = [("ch03", 2), ("ch01", 5), ("ch02", 2), ("ch04", 1)]
            .into_iter()
            .map(|(slug, count)| (slug.to_string(), count))
            .collect();

        let rows = top_chapters(&by_chapter, 3);

        let order: Vec<(&str, usize)> = rows
            .iter()
            .map(|row| (row.chapter.as_str(), row.issue_count))
            .collect();
        assert_eq!(order, vec![("ch01", 5), ("ch02", 2), ("ch03", 2)]);
    }
}
