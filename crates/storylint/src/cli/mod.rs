//! Command-line interface module.
//!
//! This module provides the CLI structure and command handlers for the storylint binary.

mod commands;
mod dashboard;
mod doctor;
mod run;

pub use commands::{Cli, Commands};
pub use dashboard::refresh;
pub use doctor::doctor;
pub use run::{audit_chapter, run_audit};
