//! Project health checks behind `storylint doctor`.

use derive_getters::Getters;
use std::path::Path;
use storylint_core::{Provider, StorylintConfig};
use storylint_models::{GEMINI_API_KEY_VAR, OPENAI_API_KEY_VAR};
use storylint_parser::discover_chapters;
use tracing::debug;

/// Findings from inspecting a project layout.
///
/// `messages` describe what was found; `warnings` list problems that would
/// make a run fail or produce empty results.
#[derive(Debug, Clone, Default, PartialEq, Eq, Getters)]
pub struct DoctorReport {
    messages: Vec<String>,
    warnings: Vec<String>,
}

impl DoctorReport {
    /// Inspect the directories and backend settings of `config`.
    pub fn inspect(config: &StorylintConfig) -> Self {
        let mut report = Self::default();

        match config.config_path() {
            Some(path) => report.note(format!("Config file: {}", path.display())),
            None => report.note("Config file: none found, using bundled defaults"),
        }
        report.check_dir("Project root", config.root());
        report.check_dir("Chapters directory", config.chapters_dir());
        report.check_dir("Characters directory", config.characters_dir());
        report.check_dir("Locations directory", config.locations_dir());
        if let Some(images) = config.images_dir() {
            report.check_dir("Images directory", images);
        }
        report.note(format!("Runs directory: {}", config.runs_dir().display()));

        match discover_chapters(config.chapters_dir(), config.chapter_filename()) {
            Ok(chapters) if chapters.is_empty() => report.warn(format!(
                "No '{}' files under {}",
                config.chapter_filename(),
                config.chapters_dir().display()
            )),
            Ok(chapters) => report.note(format!("Chapters found: {}", chapters.len())),
            Err(e) => report.warn(format!("Chapter discovery failed: {}", e)),
        }

        let provider = *config.generation().provider();
        report.note(format!("Provider: {}", provider));
        let key_var = match provider {
            Provider::Mock => None,
            Provider::Gemini => Some(GEMINI_API_KEY_VAR),
            Provider::Openai => Some(OPENAI_API_KEY_VAR),
        };
        if let Some(var) = key_var {
            let present = std::env::var(var).map(|v| !v.is_empty()).unwrap_or(false);
            if !present {
                report.warn(format!("{} is not set", var));
            }
        }

        debug!(warnings = report.warnings.len(), "Doctor finished");
        report
    }

    /// Whether no warnings were raised.
    pub fn is_healthy(&self) -> bool {
        self.warnings.is_empty()
    }

    fn check_dir(&mut self, label: &str, path: &Path) {
        if path.is_dir() {
            self.note(format!("{}: {}", label, path.display()));
        } else {
            self.warn(format!("{} missing: {}", label, path.display()));
        }
    }

    fn note(&mut self, message: impl Into<String>) {
        self.messages.push(message.into());
    }

    fn warn(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }
}
