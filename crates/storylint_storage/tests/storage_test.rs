// Artifact store and dashboard tests against a temporary runs directory.

use std::path::PathBuf;
use storylint_core::{
    Chapter, ChapterReport, DashboardConfig, Issue, IssueType, OverallQuality, Severity,
};
use storylint_error::{StorageErrorKind, StorylintErrorKind};
use storylint_storage::{
    ArtifactDir, ArtifactKey, ArtifactStore, RunIndex, compute_dashboard, latest_run_id,
};
use tempfile::TempDir;

fn chapter(slug: &str) -> Chapter {
    Chapter::new(
        slug.to_string(),
        format!("Chapter {}", slug),
        PathBuf::from(format!("/book/chapters/{}/content.md", slug)),
        Vec::new(),
    )
}

fn report(slug: &str, issues: Vec<Issue>) -> ChapterReport {
    ChapterReport {
        chapter_slug: slug.to_string(),
        overall_quality: OverallQuality::Good,
        strengths: vec![],
        risks: vec![],
        issues,
        questions: vec![],
        opportunities: vec![],
        integrity_findings: vec![],
        confidence: 0.7,
    }
}

fn issue(severity: Severity, issue_type: IssueType) -> Issue {
    Issue::new(issue_type, severity, "ch01:scn-01:p1", "Something is off.", "Fix it.")
}

fn five_chapter_index(run_id: &str) -> RunIndex {
    let chapters: Vec<Chapter> = ["ch01", "ch02", "ch03", "ch04", "ch05"]
        .iter()
        .map(|slug| chapter(slug))
        .collect();
    let adjacent = chapters
        .windows(2)
        .map(|pair| (pair[0].slug().clone(), pair[1].slug().clone()))
        .collect();
    RunIndex::new(run_id, "full", 5, &chapters, adjacent, vec!["ch01-ch05".to_string()])
}

#[tokio::test]
async fn partial_run_dashboard_counts_only_present_reports() {
    let runs = TempDir::new().unwrap();
    let store = ArtifactStore::open(runs.path(), "run-a").await.unwrap();
    let index = five_chapter_index("run-a");

    store
        .write_json(
            &ArtifactKey::chapter("ch01"),
            &report(
                "ch01",
                vec![
                    issue(Severity::Major, IssueType::Continuity),
                    issue(Severity::Minor, IssueType::Pacing),
                ],
            ),
        )
        .await
        .unwrap();
    store
        .write_json(
            &ArtifactKey::chapter("ch02"),
            &report("ch02", vec![issue(Severity::Major, IssueType::Logic)]),
        )
        .await
        .unwrap();
    store
        .write_json(&ArtifactKey::chapter("ch03"), &report("ch03", vec![]))
        .await
        .unwrap();
    // Unreadable artifacts are not counted.
    tokio::fs::write(store.json_path(&ArtifactKey::chapter("ch04")).unwrap(), b"{ truncated")
        .await
        .unwrap();

    let summary = compute_dashboard(
        &store,
        &index,
        &DashboardConfig::default(),
        1,
        &["adjacent:ch01_ch02: exhausted".to_string()],
    )
    .await;

    assert_eq!(summary.counts.chapters_total, 5);
    assert_eq!(summary.counts.chapters_completed, 3);
    assert!(summary.counts.chapters_completed < summary.counts.chapters_total);
    assert_eq!(summary.counts.adjacent_total, 4);
    assert_eq!(summary.counts.adjacent_completed, 0);
    assert_eq!(summary.counts.arc_total, 1);
    assert!(!summary.counts.synthesis_completed);
    assert_eq!(summary.counts.errors, 1);
    assert_eq!(summary.issues.total, 3);
    assert_eq!(summary.issues.by_severity.get("major"), Some(&2));
    assert_eq!(summary.issues.by_type.get("pacing"), Some(&1));
    assert_eq!(summary.top_chapters[0].chapter, "ch01");
    assert_eq!(summary.top_chapters[0].issue_count, 2);
    assert_eq!(summary.top_chapters.len(), 2);
    assert_eq!(summary.errors.len(), 1);
}

#[tokio::test]
async fn recent_errors_are_bounded() {
    let runs = TempDir::new().unwrap();
    let store = ArtifactStore::open(runs.path(), "run-b").await.unwrap();
    let index = five_chapter_index("run-b");
    let errors: Vec<String> = (0..10).map(|i| format!("chapter:ch{:02}: failed", i)).collect();

    let summary = compute_dashboard(&store, &index, &DashboardConfig::default(), 10, &errors).await;

    assert_eq!(summary.errors.len(), 6);
    assert_eq!(summary.errors.last().map(String::as_str), Some("chapter:ch09: failed"));
}

#[tokio::test]
async fn writes_are_atomic_and_repeatable() {
    let runs = TempDir::new().unwrap();
    let store = ArtifactStore::open(runs.path(), "run-c").await.unwrap();
    let key = ArtifactKey::chapter("ch01");

    store.write_json(&key, &report("ch01", vec![])).await.unwrap();
    let first = tokio::fs::read(store.json_path(&key).unwrap()).await.unwrap();
    store.write_json(&key, &report("ch01", vec![])).await.unwrap();
    let second = tokio::fs::read(store.json_path(&key).unwrap()).await.unwrap();
    assert_eq!(first, second);

    let mut leftovers = Vec::new();
    let mut entries = tokio::fs::read_dir(store.run_dir().join("chapter")).await.unwrap();
    while let Some(entry) = entries.next_entry().await.unwrap() {
        leftovers.push(entry.file_name().to_string_lossy().to_string());
    }
    assert_eq!(leftovers, vec!["ch01.report.json".to_string()]);

    let decoded: ChapterReport = store.read_json(&key).await.unwrap();
    assert_eq!(decoded, report("ch01", vec![]));
    assert_eq!(
        store.list_reports(ArtifactDir::Chapter).await.unwrap(),
        vec![store.json_path(&key).unwrap()]
    );
}

#[tokio::test]
async fn markdown_sits_beside_json() {
    let runs = TempDir::new().unwrap();
    let store = ArtifactStore::open(runs.path(), "run-d").await.unwrap();

    let path = store
        .write_markdown(&ArtifactKey::adjacent("ch01", "ch02"), "# Flow\n")
        .await
        .unwrap();

    assert_eq!(path, store.run_dir().join("adjacent/ch01_ch02.report.md"));
    assert!(store.write_markdown(&ArtifactKey::Index, "x").await.is_err());
    assert!(!store.exists(&ArtifactKey::adjacent("ch01", "ch02")).await);
}

#[tokio::test]
async fn missing_artifacts_and_runs_are_not_found() {
    let runs = TempDir::new().unwrap();
    let store = ArtifactStore::open(runs.path(), "run-e").await.unwrap();

    let err = store
        .read_json::<ChapterReport>(&ArtifactKey::chapter("ch09"))
        .await
        .unwrap_err();
    assert!(matches!(
        err.kind(),
        StorylintErrorKind::Storage(e) if matches!(e.kind, StorageErrorKind::NotFound(_))
    ));

    assert!(ArtifactStore::open_existing(runs.path(), "nope").await.is_err());
    assert!(ArtifactStore::open(runs.path(), "../escape").await.is_err());
}

#[tokio::test]
async fn latest_run_is_highest_identifier() {
    let runs = TempDir::new().unwrap();
    assert_eq!(latest_run_id(runs.path().join("absent")).await.unwrap(), None);

    for id in ["20250101-090000", "20250301-120000", "20250201-080000"] {
        ArtifactStore::open(runs.path(), id).await.unwrap();
    }

    assert_eq!(
        latest_run_id(runs.path()).await.unwrap().as_deref(),
        Some("20250301-120000")
    );
}
