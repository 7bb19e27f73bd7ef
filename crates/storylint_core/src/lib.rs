//! Core data types for Storylint.
//!
//! This crate holds the parsed chapter tree, the report wire schemas shared by
//! every pipeline stage, the dashboard aggregate, and the layered configuration.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod canon;
mod config;
mod dashboard;
mod issue;
mod report;
mod scene;

pub use canon::{CanonKind, CanonSnapshot};
pub use config::{
    ConcurrencyConfig, DashboardConfig, GenerationConfig, MarkerConfig, ModelConfig, Provider,
    PromptConfig, StorylintConfig, CONFIG_FILE_NAME, find_config,
};
pub use dashboard::{ChapterIssueCount, DashboardSummary, IssueTotals, StageCounts};
pub use issue::{Issue, IssueType, Severity};
pub use report::{
    ActionPlan, AdjacentReport, ArcReport, AuditReport, ChapterReport, EmotionalTrajectory,
    Momentum, OverallQuality, ReportKind, StructuralClarity, TransitionRating,
};
pub use scene::{Chapter, Paragraph, Scene, SceneMeta};
