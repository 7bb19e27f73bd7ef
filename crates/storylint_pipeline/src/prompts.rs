//! Stage prompts.

use serde_json::Value;
use storylint_core::ReportKind;
use storylint_error::{JsonError, PipelineError, PipelineErrorKind, StorylintResult};
use storylint_interface::GenerationRequest;
use storylint_models::AUDITOR_SYSTEM_PROMPT;

const ISSUE_SHAPE: &str = r#"{"type": "clarity|character|pacing|continuity|pov|emotion|logic|imagery|slug", "severity": "minor|moderate|major", "location": "<chapterSlug>:<sceneId>:p<N>", "explanation": string, "suggestedAction": string, "evidenceRefs": [string]}"#;

const CHAPTER_SHAPE: &str = r#"{"chapterSlug": string, "overallQuality": "Excellent|Good|Mixed|NeedsWork", "strengths": [string], "risks": [string], "issues": [Issue], "questions": [string], "opportunities": [string], "integrityFindings": [Issue], "confidence": number between 0 and 1}"#;

const ADJACENT_SHAPE: &str = r#"{"leftSlug": string, "rightSlug": string, "transitionRating": "Smooth|Acceptable|Rough|Broken", "diagnosis": string, "findings": [Issue], "missingBridges": [string], "decisionsToConfirm": [string], "confidence": number between 0 and 1}"#;

const ARC_SHAPE: &str = r#"{"windowSlug": string, "momentum": "Strong|Steady|Stalled", "emotionalTrajectory": "Rising|Flat|Erratic", "structuralClarity": "Clear|Uneven|Confused", "observations": [string], "risks": [string], "opportunities": [string], "chaptersToRework": [string], "confidence": number between 0 and 1}"#;

const SYNTHESIS_SHAPE: &str = r#"{"mustFix": [string], "shouldFix": [string], "optional": [string], "openQuestions": [string], "quickWins": [string], "dashboard": object}"#;

fn task(kind: ReportKind) -> &'static str {
    match kind {
        ReportKind::Chapter => {
            "Audit this chapter for clarity, character consistency, pacing, continuity, \
point of view, emotional beats and internal logic. Anchor every issue to a paragraph \
location taken from the payload. Use the canon snapshots as ground truth for characters \
and locations."
        }
        ReportKind::Adjacent => {
            "Assess the hand-off from the left chapter to the right chapter. Look for dropped \
threads, unexplained jumps in time or place, and decisions the reader needs confirmed."
        }
        ReportKind::Arc => {
            "Assess momentum, emotional trajectory and structural clarity across this window \
of consecutive chapters. Name the chapters that most need rework."
        }
        ReportKind::Synthesis => {
            "Merge these chapter audits into one prioritized action plan. Deduplicate, order \
by impact, and keep each item to one actionable sentence."
        }
    }
}

fn shape(kind: ReportKind) -> &'static str {
    match kind {
        ReportKind::Chapter => CHAPTER_SHAPE,
        ReportKind::Adjacent => ADJACENT_SHAPE,
        ReportKind::Arc => ARC_SHAPE,
        ReportKind::Synthesis => SYNTHESIS_SHAPE,
    }
}

/// Build the request for `kind` around a context payload.
///
/// # Errors
///
/// Returns a JSON error if the payload cannot be serialized.
pub(crate) fn request(kind: ReportKind, context: &Value) -> StorylintResult<GenerationRequest> {
    let context = serde_json::to_string_pretty(context)
        .map_err(|e| JsonError::new(format!("Failed to serialize {} context: {}", kind, e)))?;

    let mut prompt = String::new();
    prompt.push_str(task(kind));
    prompt.push_str("\n\nRespond with one JSON object of this shape and no other fields:\n");
    prompt.push_str(shape(kind));
    if matches!(kind, ReportKind::Chapter | ReportKind::Adjacent) {
        prompt.push_str("\n\nwhere Issue is:\n");
        prompt.push_str(ISSUE_SHAPE);
    }
    prompt.push_str("\n\nContext:\n");
    prompt.push_str(&context);

    GenerationRequest::builder()
        .kind(kind)
        .system(AUDITOR_SYSTEM_PROMPT)
        .prompt(prompt)
        .build()
        .map_err(|e| {
            PipelineError::new(PipelineErrorKind::Stage {
                stage: kind.to_string(),
                message: e.to_string(),
            })
            .into()
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn chapter_prompt_carries_shape_and_context() {
        let request = request(ReportKind::Chapter, &json!({"chapter": {"slug": "ch07"}})).unwrap();

        assert_eq!(*request.kind(), ReportKind::Chapter);
        assert!(request.prompt().contains("\"integrityFindings\""));
        assert!(request.prompt().contains("suggestedAction"));
        assert!(request.prompt().contains("\"slug\": \"ch07\""));
        assert_eq!(request.system(), AUDITOR_SYSTEM_PROMPT);
    }

    #[test]
    fn arc_prompt_has_no_issue_shape() {
        let request = request(ReportKind::Arc, &json!({})).unwrap();
        assert!(!request.prompt().contains("suggestedAction"));
        assert!(request.prompt().contains("chaptersToRework"));
    }
}
