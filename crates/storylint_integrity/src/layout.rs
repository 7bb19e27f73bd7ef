//! Project directories consulted by the integrity checks.

use derive_getters::Getters;
use std::path::PathBuf;
use storylint_core::StorylintConfig;

/// Where canonical documents and images live.
#[derive(Debug, Clone, PartialEq, Eq, Getters, derive_new::new)]
pub struct ProjectLayout {
    project_root: PathBuf,
    characters_dir: PathBuf,
    locations_dir: PathBuf,
    images_dir: Option<PathBuf>,
    imagery_filenames: Vec<String>,
    /// Character budget for canon snapshots.
    canon_snapshot_chars: usize,
}

impl From<&StorylintConfig> for ProjectLayout {
    fn from(config: &StorylintConfig) -> Self {
        Self::new(
            config.root().to_path_buf(),
            config.characters_dir().clone(),
            config.locations_dir().clone(),
            config.images_dir().clone(),
            config.imagery_filenames().clone(),
            *config.canon_snapshot_chars(),
        )
    }
}
