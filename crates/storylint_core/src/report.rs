//! Report wire schemas and the closed sum type over them.

use crate::Issue;
use serde::{Deserialize, Serialize};
use storylint_error::{StorylintResult, ValidationError, ValidationErrorKind};

/// Overall rating of a single chapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
pub enum OverallQuality {
    /// Ready as is
    Excellent,
    /// Minor polish
    Good,
    /// Uneven
    Mixed,
    /// Substantial revision
    #[serde(alias = "Needs Work")]
    #[strum(serialize = "Needs Work")]
    NeedsWork,
}

/// How cleanly one chapter hands off to the next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
pub enum TransitionRating {
    /// Seamless
    Smooth,
    /// Works with small gaps
    Acceptable,
    /// Noticeable jolt
    Rough,
    /// Continuity break
    Broken,
}

/// Narrative momentum across a window of chapters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
pub enum Momentum {
    /// Driving forward
    Strong,
    /// Even
    Steady,
    /// Stuck
    Stalled,
}

/// Emotional shape across a window of chapters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
pub enum EmotionalTrajectory {
    /// Building
    Rising,
    /// Flat
    Flat,
    /// Erratic
    Erratic,
}

/// Structural readability across a window of chapters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
pub enum StructuralClarity {
    /// Clear
    Clear,
    /// Uneven
    Uneven,
    /// Confused
    Confused,
}

/// Per-chapter audit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ChapterReport {
    /// Chapter the report covers
    pub chapter_slug: String,
    /// Overall rating
    pub overall_quality: OverallQuality,
    /// What works
    pub strengths: Vec<String>,
    /// What could go wrong
    pub risks: Vec<String>,
    /// Findings from the generator
    pub issues: Vec<Issue>,
    /// Questions for the author
    pub questions: Vec<String>,
    /// Ways to strengthen the material
    pub opportunities: Vec<String>,
    /// Filesystem integrity findings
    pub integrity_findings: Vec<Issue>,
    /// Self-reported confidence in `[0, 1]`
    pub confidence: f64,
}

/// Audit of the seam between two consecutive chapters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct AdjacentReport {
    /// Earlier chapter
    pub left_slug: String,
    /// Later chapter
    pub right_slug: String,
    /// Quality of the hand-off
    pub transition_rating: TransitionRating,
    /// Summary of the transition
    pub diagnosis: String,
    /// Seam-level issues
    pub findings: Vec<Issue>,
    /// Events or context the reader is never given
    pub missing_bridges: Vec<String>,
    /// Author decisions the seam depends on
    pub decisions_to_confirm: Vec<String>,
    /// Self-reported confidence in `[0, 1]`
    pub confidence: f64,
}

/// Audit of a sliding window of chapters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ArcReport {
    /// `first-last` chapter slugs of the window
    pub window_slug: String,
    /// Narrative momentum
    pub momentum: Momentum,
    /// Emotional shape
    pub emotional_trajectory: EmotionalTrajectory,
    /// Structural readability
    pub structural_clarity: StructuralClarity,
    /// General observations
    pub observations: Vec<String>,
    /// What could go wrong
    pub risks: Vec<String>,
    /// Ways to strengthen the material
    pub opportunities: Vec<String>,
    /// Chapters that need revision
    pub chapters_to_rework: Vec<String>,
    /// Self-reported confidence in `[0, 1]`
    pub confidence: f64,
}

/// Prioritised revision plan synthesised from every chapter report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ActionPlan {
    /// Blocking problems
    pub must_fix: Vec<String>,
    /// Important but not blocking
    pub should_fix: Vec<String>,
    /// Nice to have
    pub optional: Vec<String>,
    /// Unresolved author questions
    pub open_questions: Vec<String>,
    /// Cheap improvements
    pub quick_wins: Vec<String>,
    /// Free-form summary figures
    pub dashboard: serde_json::Map<String, serde_json::Value>,
}

/// Which report a generator call is expected to produce.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ReportKind {
    /// [`ChapterReport`]
    Chapter,
    /// [`AdjacentReport`]
    Adjacent,
    /// [`ArcReport`]
    Arc,
    /// [`ActionPlan`]
    Synthesis,
}

/// Any report produced by the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, derive_more::From)]
#[serde(untagged)]
pub enum AuditReport {
    /// Chapter stage output
    Chapter(ChapterReport),
    /// Adjacent stage output
    Adjacent(AdjacentReport),
    /// Arc stage output
    Arc(ArcReport),
    /// Synthesis stage output
    ActionPlan(ActionPlan),
}

impl AuditReport {
    /// Strictly decode and validate a JSON object as the report `kind`.
    ///
    /// Unknown fields, missing required fields, values outside the closed
    /// enums and confidence outside `[0, 1]` are all rejected.
    pub fn decode(kind: ReportKind, value: serde_json::Value) -> StorylintResult<Self> {
        let report: AuditReport = match kind {
            ReportKind::Chapter => Self::Chapter(from_value(kind, value)?),
            ReportKind::Adjacent => Self::Adjacent(from_value(kind, value)?),
            ReportKind::Arc => Self::Arc(from_value(kind, value)?),
            ReportKind::Synthesis => Self::ActionPlan(from_value(kind, value)?),
        };
        report.validate()?;
        Ok(report)
    }

    /// The kind this report was produced for.
    pub fn kind(&self) -> ReportKind {
        match self {
            Self::Chapter(_) => ReportKind::Chapter,
            Self::Adjacent(_) => ReportKind::Adjacent,
            Self::Arc(_) => ReportKind::Arc,
            Self::ActionPlan(_) => ReportKind::Synthesis,
        }
    }

    /// Confidence of an audit report. Action plans carry none.
    pub fn confidence(&self) -> Option<f64> {
        match self {
            Self::Chapter(r) => Some(r.confidence),
            Self::Adjacent(r) => Some(r.confidence),
            Self::Arc(r) => Some(r.confidence),
            Self::ActionPlan(_) => None,
        }
    }

    /// Check value constraints the type system does not express.
    pub fn validate(&self) -> StorylintResult<()> {
        match self.confidence() {
            Some(confidence) if !(0.0..=1.0).contains(&confidence) => {
                Err(ValidationError::new(ValidationErrorKind::ConfidenceOutOfRange {
                    report: self.kind().to_string(),
                    value: confidence.to_string(),
                })
                .into())
            }
            _ => Ok(()),
        }
    }

    /// Every issue carried by the report, integrity findings included.
    pub fn issues(&self) -> Vec<&Issue> {
        match self {
            Self::Chapter(r) => r.issues.iter().chain(r.integrity_findings.iter()).collect(),
            Self::Adjacent(r) => r.findings.iter().collect(),
            Self::Arc(_) | Self::ActionPlan(_) => Vec::new(),
        }
    }
}

fn from_value<T: serde::de::DeserializeOwned>(
    kind: ReportKind,
    value: serde_json::Value,
) -> StorylintResult<T> {
    serde_json::from_value(value).map_err(|e| {
        ValidationError::new(ValidationErrorKind::Schema {
            report: kind.to_string(),
            message: e.to_string(),
        })
        .into()
    })
}
