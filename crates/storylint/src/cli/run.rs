//! Audit run command handlers.

use std::path::Path;
use std::process::ExitCode;
use storylint::{
    Pipeline, PipelineError, PipelineErrorKind, RunMode, RunOptions, RunOutcome, Stage,
    StorylintConfig, StorylintResult,
};
use tracing::info;

/// Run the staged audit over a chapter range.
#[allow(clippy::too_many_arguments)]
pub async fn run_audit(
    config: Option<&Path>,
    model: Option<&str>,
    start: Option<String>,
    end: Option<String>,
    mode: RunMode,
    window: usize,
    force: bool,
    run_id: Option<String>,
) -> StorylintResult<ExitCode> {
    let pipeline = Pipeline::from_config(StorylintConfig::load(config)?, model)?;

    let mut builder = RunOptions::builder();
    builder.mode(mode).window(window).force(force);
    if let Some(start) = start {
        builder.start(start);
    }
    if let Some(end) = end {
        builder.end(end);
    }
    if let Some(run_id) = run_id {
        builder.run_id(run_id);
    }
    let options = builder.build().map_err(|e| {
        PipelineError::new(PipelineErrorKind::Stage {
            stage: "planning".to_string(),
            message: e.to_string(),
        })
    })?;

    info!(mode = %mode, window, force, "Starting audit run");
    let outcome = pipeline.run(&options).await?;
    Ok(report(&outcome))
}

/// Audit a single chapter file.
pub async fn audit_chapter(
    config: Option<&Path>,
    model: Option<&str>,
    chapter: &Path,
    run_id: Option<String>,
    force: bool,
) -> StorylintResult<ExitCode> {
    let pipeline = Pipeline::from_config(StorylintConfig::load(config)?, model)?;
    let outcome = pipeline.audit_chapter(chapter, run_id, force).await?;
    Ok(report(&outcome))
}

fn report(outcome: &RunOutcome) -> ExitCode {
    println!("Run {} -> {}", outcome.run_id(), outcome.run_dir().display());
    for stage in [Stage::Chapter, Stage::Adjacent, Stage::Arc, Stage::Synthesis] {
        let tally = outcome.tally(stage);
        if tally.generated + tally.skipped + tally.failed == 0 {
            continue;
        }
        println!(
            "  {:<10} generated {:>3}  cached {:>3}  failed {:>3}",
            stage.to_string(),
            tally.generated,
            tally.skipped,
            tally.failed
        );
    }
    println!("  issues     {}", outcome.dashboard().issues.total);

    if outcome.is_success() {
        return ExitCode::SUCCESS;
    }
    println!("{} item(s) failed:", outcome.failed_items().len());
    for item in outcome.failed_items() {
        println!("  - {}", item);
    }
    ExitCode::FAILURE
}
