//! Audit orchestration for Storylint.
//!
//! A run moves through fixed stages:
//!
//! ```text
//! Planning → ChapterAudits → AdjacentAudits → ArcAudits → Synthesis → Dashboard
//! ```
//!
//! Each audit stage fans out one unit of work per chapter, adjacent pair or
//! arc window, bounded by its own semaphore. Items whose report already
//! exists are skipped unless the run is forced. A failed item is recorded in
//! the [`RunState`] and never stops its siblings or later stages.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod context;
mod generators;
mod mode;
mod options;
mod outcome;
mod pipeline;
mod prompts;
mod render;
mod state;

pub use context::{canon_payload, chapter_payload, chapter_summary};
pub use generators::StageGenerators;
pub use mode::RunMode;
pub use options::{RunOptions, RunOptionsBuilder};
pub use outcome::RunOutcome;
pub use pipeline::{Pipeline, refresh_dashboard};
pub use render::{dashboard_markdown, report_markdown};
pub use state::{ItemStatus, RunState, Stage, StageTally};
