// Tests for the strict report adapter: extraction, defaults, retry budget.

mod test_utils;

use serde_json::{Map, Value, json};
use std::time::Duration;
use storylint_core::{AuditReport, OverallQuality, ReportKind};
use storylint_error::{
    ExtractionErrorKind, GenerationErrorKind, StorylintErrorKind,
};
use storylint_interface::GenerationRequest;
use storylint_models::{MockGenerator, ReportGenerator};
use test_utils::{Reply, ScriptedGenerator};

const BACKOFF: Duration = Duration::from_millis(1);

fn request(kind: ReportKind) -> GenerationRequest {
    GenerationRequest::builder()
        .kind(kind)
        .prompt("audit")
        .build()
        .unwrap()
}

fn chapter_defaults(slug: &str) -> Map<String, Value> {
    let mut defaults = Map::new();
    defaults.insert("chapterSlug".to_string(), json!(slug));
    defaults.insert("integrityFindings".to_string(), json!([]));
    defaults
}

fn chapter_body(confidence: f64) -> String {
    json!({
        "overallQuality": "Needs Work",
        "strengths": [],
        "risks": ["Pacing sags mid-chapter"],
        "issues": [{
            "type": "continuity",
            "severity": "major",
            "location": "ch01:scn-01:p2",
            "explanation": "The lamp is lit twice.",
            "suggestedAction": "Drop the second lighting."
        }],
        "questions": [],
        "opportunities": [],
        "confidence": confidence
    })
    .to_string()
}

#[tokio::test]
async fn fenced_json_with_prose_is_accepted() {
    let text = format!("Here is the audit:\n```json\n{}\n```\nDone.", chapter_body(0.8));
    let adapter = ReportGenerator::new(ScriptedGenerator::always(text), 2, BACKOFF);

    let report = adapter
        .generate(&request(ReportKind::Chapter), &chapter_defaults("ch01"))
        .await
        .unwrap();

    let AuditReport::Chapter(chapter) = report else {
        panic!("expected a chapter report");
    };
    assert_eq!(chapter.chapter_slug, "ch01");
    assert_eq!(chapter.overall_quality, OverallQuality::NeedsWork);
    assert_eq!(chapter.issues.len(), 1);
    assert!(chapter.integrity_findings.is_empty());
    assert_eq!(adapter.generator().call_count(), 1);
}

#[tokio::test]
async fn provided_fields_win_over_defaults() {
    let mut body: Value = serde_json::from_str(&chapter_body(0.4)).unwrap();
    body["chapterSlug"] = json!("ch99");
    let adapter = ReportGenerator::new(ScriptedGenerator::always(body.to_string()), 0, BACKOFF);

    let report = adapter
        .generate(&request(ReportKind::Chapter), &chapter_defaults("ch01"))
        .await
        .unwrap();

    let AuditReport::Chapter(chapter) = report else {
        panic!("expected a chapter report");
    };
    assert_eq!(chapter.chapter_slug, "ch99");
}

#[tokio::test]
async fn text_without_json_fails_after_one_call() {
    let adapter = ReportGenerator::new(ScriptedGenerator::always("no json here"), 3, BACKOFF);

    let err = adapter
        .generate(&request(ReportKind::Chapter), &chapter_defaults("ch01"))
        .await
        .unwrap_err();

    match err.kind() {
        StorylintErrorKind::Extraction(e) => {
            assert!(matches!(e.kind(), ExtractionErrorKind::NoJsonFound(_)))
        }
        other => panic!("unexpected error: {}", other),
    }
    assert_eq!(adapter.generator().call_count(), 1);
}

#[tokio::test]
async fn transport_failure_then_success() {
    let generator = ScriptedGenerator::new(vec![
        Reply::Transport("connection reset".to_string()),
        Reply::Text(chapter_body(0.9)),
    ]);
    let adapter = ReportGenerator::new(generator, 2, BACKOFF);

    let report = adapter
        .generate(&request(ReportKind::Chapter), &chapter_defaults("ch02"))
        .await
        .unwrap();

    assert_eq!(report.confidence(), Some(0.9));
    assert_eq!(adapter.generator().call_count(), 2);
}

#[tokio::test]
async fn schema_failures_exhaust_the_retry_budget() {
    let adapter = ReportGenerator::new(
        ScriptedGenerator::always(r#"{"overallQuality": "Superb"}"#),
        2,
        BACKOFF,
    );

    let err = adapter
        .generate(&request(ReportKind::Chapter), &chapter_defaults("ch01"))
        .await
        .unwrap_err();

    match err.kind() {
        StorylintErrorKind::Generation(e) => match e.kind() {
            GenerationErrorKind::Exhausted { attempts, .. } => assert_eq!(*attempts, 3),
            other => panic!("unexpected generation error: {}", other),
        },
        other => panic!("unexpected error: {}", other),
    }
    assert_eq!(adapter.generator().call_count(), 3);
}

#[tokio::test]
async fn confidence_out_of_range_is_retried() {
    let generator = ScriptedGenerator::new(vec![
        Reply::Text(chapter_body(1.5)),
        Reply::Text(chapter_body(0.5)),
    ]);
    let adapter = ReportGenerator::new(generator, 1, BACKOFF);

    let report = adapter
        .generate(&request(ReportKind::Chapter), &chapter_defaults("ch01"))
        .await
        .unwrap();

    assert_eq!(report.confidence(), Some(0.5));
    assert_eq!(adapter.generator().call_count(), 2);
}

#[tokio::test]
async fn mock_backend_satisfies_every_schema() {
    let adapter = ReportGenerator::new(MockGenerator::new("mock-model"), 0, BACKOFF);

    let mut adjacent = Map::new();
    adjacent.insert("leftSlug".to_string(), json!("ch01"));
    adjacent.insert("rightSlug".to_string(), json!("ch02"));
    let mut arc = Map::new();
    arc.insert("windowSlug".to_string(), json!("ch01-ch05"));

    let cases = [
        (ReportKind::Chapter, chapter_defaults("ch01")),
        (ReportKind::Adjacent, adjacent),
        (ReportKind::Arc, arc),
        (ReportKind::Synthesis, Map::new()),
    ];
    for (kind, defaults) in cases {
        let report = adapter.generate(&request(kind), &defaults).await.unwrap();
        assert_eq!(report.kind(), kind);
    }
    assert_eq!(adapter.generator().call_count(), 4);
}
