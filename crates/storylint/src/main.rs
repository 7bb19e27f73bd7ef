//! Storylint CLI binary.
//!
//! - Run staged audits over a manuscript
//! - Audit a single chapter file
//! - Check a project layout
//! - Recompute a run's dashboard

use clap::Parser;
use std::process::ExitCode;
use storylint::{ObservabilityConfig, init_observability};

mod cli;

#[tokio::main]
async fn main() -> ExitCode {
    use cli::{Cli, Commands, audit_chapter, doctor, refresh, run_audit};

    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let observability = ObservabilityConfig::new()
        .with_verbose(cli.verbose)
        .with_json_logs(cli.json_logs);
    if let Err(e) = init_observability(observability) {
        eprintln!("Failed to initialize logging: {}", e);
    }

    let config = cli.config.as_deref();
    let model = cli.model.as_deref();
    let result = match cli.command {
        Commands::Run {
            start,
            end,
            mode,
            window,
            force,
            run_id,
        } => run_audit(config, model, start, end, mode, window, force, run_id).await,
        Commands::Audit {
            chapter,
            run_id,
            force,
        } => audit_chapter(config, model, &chapter, run_id, force).await,
        Commands::Doctor => doctor(config),
        Commands::Dashboard { run_id } => refresh(config, run_id).await,
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = %e, "Command failed");
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
