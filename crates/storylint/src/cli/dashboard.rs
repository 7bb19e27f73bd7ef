//! Dashboard refresh command handler.

use std::path::Path;
use std::process::ExitCode;
use storylint::{
    ArtifactStore, StorageError, StorageErrorKind, StorylintConfig, StorylintResult,
    latest_run_id, refresh_dashboard,
};
use tracing::info;

/// Recompute the dashboard for `run_id`, or the newest run when omitted.
pub async fn refresh(config: Option<&Path>, run_id: Option<String>) -> StorylintResult<ExitCode> {
    let config = StorylintConfig::load(config)?;
    let run_id = match run_id {
        Some(id) => id,
        None => latest_run_id(config.runs_dir()).await?.ok_or_else(|| {
            StorageError::new(StorageErrorKind::NotFound(format!(
                "no runs under {}",
                config.runs_dir().display()
            )))
        })?,
    };

    let store = ArtifactStore::open_existing(config.runs_dir(), &run_id).await?;
    let summary = refresh_dashboard(&store, config.dashboard()).await?;
    info!(run_id = %run_id, "Dashboard refreshed");

    let counts = &summary.counts;
    println!("Run {} ({})", summary.run_id, summary.mode);
    println!(
        "  chapters {}/{}  adjacent {}/{}  arcs {}/{}  action plan {}",
        counts.chapters_completed,
        counts.chapters_total,
        counts.adjacent_completed,
        counts.adjacent_total,
        counts.arc_completed,
        counts.arc_total,
        if counts.synthesis_completed { "yes" } else { "no" },
    );
    println!("  issues {}  errors {}", summary.issues.total, counts.errors);
    Ok(ExitCode::SUCCESS)
}
