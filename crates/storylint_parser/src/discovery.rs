//! Chapter file discovery.

use std::path::{Path, PathBuf};
use storylint_error::{ConfigError, StorylintResult};
use tracing::debug;
use walkdir::WalkDir;

/// Find every file named `filename` below `root`, skipping hidden directories.
///
/// Results are sorted by path; callers order chapters with
/// [`ChapterPlan`](crate::ChapterPlan).
///
/// # Errors
///
/// Returns a configuration error if `root` is missing or cannot be walked.
pub fn discover_chapters(root: &Path, filename: &str) -> StorylintResult<Vec<PathBuf>> {
    if !root.is_dir() {
        return Err(ConfigError::new(format!(
            "Chapters directory not found: {}",
            root.display()
        ))
        .into());
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !e.file_name().to_string_lossy().starts_with('.'))
    {
        let entry = entry.map_err(|e| ConfigError::new(format!("Walk error: {}", e)))?;
        if entry.file_type().is_file() && entry.file_name() == filename {
            files.push(entry.path().to_path_buf());
        }
    }

    debug!(root = %root.display(), count = files.len(), "Discovered chapters");
    Ok(files)
}
