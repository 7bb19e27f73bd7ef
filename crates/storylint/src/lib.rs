//! Storylint - narrative continuity audits
//!
//! Storylint reads a manuscript whose chapters carry scene markers, checks
//! entity and image references against the project tree, and asks a text
//! generator for structured audit reports at four scales: each chapter,
//! each adjacent chapter pair, sliding arc windows, and a final action plan.
//! Every report lands as JSON plus markdown under a per-run directory, and a
//! dashboard summarises whatever the run produced.
//!
//! # Quick Start
//!
//! ```no_run
//! use storylint::{Pipeline, RunMode, RunOptions, StorylintConfig};
//!
//! # async fn example() -> storylint::StorylintResult<()> {
//! let config = StorylintConfig::load(None)?;
//! let pipeline = Pipeline::from_config(config, None)?;
//! let options = RunOptions::builder()
//!     .mode(RunMode::ChaptersOnly)
//!     .build()
//!     .expect("valid options");
//! let outcome = pipeline.run(&options).await?;
//! println!("run {} in {}", outcome.run_id(), outcome.run_dir().display());
//! # Ok(())
//! # }
//! ```
//!
//! # Architecture
//!
//! - `storylint_error` - Error types
//! - `storylint_core` - Scenes, issues, reports, dashboard and configuration
//! - `storylint_interface` - The `TextGenerator` trait
//! - `storylint_parser` - Scene markup parsing and chapter planning
//! - `storylint_integrity` - Canon snapshots and reference checks
//! - `storylint_models` - Generator backends and the strict report adapter
//! - `storylint_storage` - Run directories, artifacts and dashboard aggregation
//! - `storylint_pipeline` - Stage orchestration
//!
//! This crate re-exports the public surface and hosts the `storylint` binary.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod doctor;
mod observability;

pub use doctor::DoctorReport;
pub use observability::{ObservabilityConfig, init_observability};

pub use storylint_core::*;
pub use storylint_error::*;
pub use storylint_integrity::{CanonLoader, IntegrityValidator, ProjectLayout};
pub use storylint_interface::{GenerationRequest, TextGenerator};
pub use storylint_models::{
    GeminiGenerator, MockGenerator, OpenAiGenerator, RateLimitedGenerator, ReportGenerator,
    RequestQuota, build_generator, request_quota,
};
pub use storylint_parser::{
    ChapterPlan, ChapterRef, discover_chapters, parse_chapter, parse_chapter_file,
};
pub use storylint_pipeline::{
    Pipeline, RunMode, RunOptions, RunOptionsBuilder, RunOutcome, Stage, StageGenerators,
    StageTally, refresh_dashboard,
};
pub use storylint_storage::{ArtifactKey, ArtifactStore, RunIndex, latest_run_id};
