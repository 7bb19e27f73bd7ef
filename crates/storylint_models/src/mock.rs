//! Offline generator returning canned, schema-valid reports.

use async_trait::async_trait;
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use storylint_core::ReportKind;
use storylint_error::StorylintResult;
use storylint_interface::{GenerationRequest, TextGenerator};
use tracing::debug;

/// Generator that never leaves the process.
///
/// Responses omit identity fields such as `chapterSlug`, which the pipeline
/// supplies through defaults, and wrap the object in a fenced block the way
/// hosted models often do.
#[derive(Debug, Default)]
pub struct MockGenerator {
    model: String,
    calls: AtomicUsize,
}

impl MockGenerator {
    /// Create a mock reporting `model` as its model name.
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of `generate` calls served.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn canned(kind: ReportKind) -> serde_json::Value {
        match kind {
            ReportKind::Chapter => json!({
                "overallQuality": "Good",
                "strengths": ["Scene goals are clear"],
                "risks": [],
                "issues": [],
                "questions": [],
                "opportunities": ["Tighten the closing paragraph"],
                "integrityFindings": [],
                "confidence": 0.5
            }),
            ReportKind::Adjacent => json!({
                "transitionRating": "Acceptable",
                "diagnosis": "The hand-off holds without a visible gap.",
                "findings": [],
                "missingBridges": [],
                "decisionsToConfirm": [],
                "confidence": 0.5
            }),
            ReportKind::Arc => json!({
                "momentum": "Steady",
                "emotionalTrajectory": "Rising",
                "structuralClarity": "Clear",
                "observations": [],
                "risks": [],
                "opportunities": [],
                "chaptersToRework": [],
                "confidence": 0.5
            }),
            ReportKind::Synthesis => json!({
                "mustFix": [],
                "shouldFix": [],
                "optional": [],
                "openQuestions": [],
                "quickWins": [],
                "dashboard": {}
            }),
        }
    }
}

#[async_trait]
impl TextGenerator for MockGenerator {
    async fn generate(&self, request: &GenerationRequest) -> StorylintResult<String> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        debug!(call, kind = %request.kind(), "Mock generation");
        Ok(format!(
            "```json\n{}\n```",
            Self::canned(*request.kind())
        ))
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
