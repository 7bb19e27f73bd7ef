//! CLI command definitions.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use storylint::RunMode;

/// Storylint - narrative continuity audits for scene-marked manuscripts
#[derive(Parser, Debug)]
#[command(name = "storylint")]
#[command(about = "Narrative continuity audits for scene-marked manuscripts", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Path to storylint.toml (default: nearest one above the working directory)
    #[arg(long, global = true, env = "STORYLINT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Model used for every stage, overriding [models]
    #[arg(long, global = true)]
    pub model: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Audit a range of chapters
    Run {
        /// First chapter slug (inclusive)
        #[arg(long)]
        start: Option<String>,

        /// Last chapter slug (inclusive)
        #[arg(long)]
        end: Option<String>,

        /// Stages to run: full, chapters-only, adjacent-only, arc-only
        #[arg(long, default_value = "full")]
        mode: RunMode,

        /// Chapters per arc window
        #[arg(long, default_value_t = 5)]
        window: usize,

        /// Regenerate artifacts that already exist
        #[arg(long)]
        force: bool,

        /// Write into this run directory instead of a new timestamped one
        #[arg(long)]
        run_id: Option<String>,
    },

    /// Audit one chapter file
    Audit {
        /// Path to the chapter's content file
        #[arg(long)]
        chapter: PathBuf,

        /// Write into this run directory instead of a new timestamped one
        #[arg(long)]
        run_id: Option<String>,

        /// Regenerate artifacts that already exist
        #[arg(long)]
        force: bool,
    },

    /// Check the project layout and backend settings
    Doctor,

    /// Recompute the dashboard of an existing run
    Dashboard {
        /// Run to refresh (default: the most recent)
        #[arg(long)]
        run_id: Option<String>,
    },
}
