//! Project check command handler.

use std::path::Path;
use std::process::ExitCode;
use storylint::{DoctorReport, StorylintConfig, StorylintResult};

/// Print what was found and what is missing.
pub fn doctor(config: Option<&Path>) -> StorylintResult<ExitCode> {
    let report = DoctorReport::inspect(&StorylintConfig::load(config)?);
    for message in report.messages() {
        println!("ok    {}", message);
    }
    for warning in report.warnings() {
        println!("warn  {}", warning);
    }
    Ok(if report.is_healthy() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
