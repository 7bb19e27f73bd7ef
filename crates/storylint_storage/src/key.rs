//! Artifact addressing.

use std::path::PathBuf;
use storylint_error::{StorageError, StorageErrorKind, StorylintResult};

/// Subdirectory of a run holding one family of artifacts.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[strum(serialize_all = "lowercase")]
pub enum ArtifactDir {
    /// Per-chapter reports
    Chapter,
    /// Adjacent-pair reports
    Adjacent,
    /// Arc-window reports
    Arc,
    /// Action plan and dashboard
    Final,
}

/// One artifact within a run directory.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use storylint_storage::ArtifactKey;
///
/// let key = ArtifactKey::adjacent("ch01", "ch02");
/// assert_eq!(key.json_path().unwrap(), Path::new("adjacent/ch01_ch02.report.json"));
/// assert_eq!(key.identity(), "adjacent:ch01_ch02");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ArtifactKey {
    /// Resolved configuration snapshot
    Config,
    /// Chapter and scene index
    Index,
    /// Chapter audit for a slug
    Chapter(String),
    /// Adjacent-flow audit for an ordered pair
    Adjacent {
        /// Earlier chapter
        left: String,
        /// Later chapter
        right: String,
    },
    /// Arc audit for a `first-last` window slug
    Arc(String),
    /// Synthesized action plan
    ActionPlan,
    /// Dashboard summary
    Dashboard,
}

impl ArtifactKey {
    /// Chapter report key.
    pub fn chapter(slug: impl Into<String>) -> Self {
        Self::Chapter(slug.into())
    }

    /// Adjacent report key.
    pub fn adjacent(left: impl Into<String>, right: impl Into<String>) -> Self {
        Self::Adjacent {
            left: left.into(),
            right: right.into(),
        }
    }

    /// Arc report key.
    pub fn arc(window_slug: impl Into<String>) -> Self {
        Self::Arc(window_slug.into())
    }

    /// Work-item identity used in logs and failure lists.
    pub fn identity(&self) -> String {
        match self {
            Self::Config => "config".to_string(),
            Self::Index => "index".to_string(),
            Self::Chapter(slug) => format!("chapter:{}", slug),
            Self::Adjacent { left, right } => format!("adjacent:{}_{}", left, right),
            Self::Arc(window) => format!("arc:{}", window),
            Self::ActionPlan => "synthesis".to_string(),
            Self::Dashboard => "dashboard".to_string(),
        }
    }

    /// Path of the JSON artifact relative to the run directory.
    ///
    /// # Errors
    ///
    /// Returns [`StorageErrorKind::InvalidPath`] when a slug is empty or
    /// would escape its directory.
    pub fn json_path(&self) -> StorylintResult<PathBuf> {
        Ok(match self {
            Self::Config => PathBuf::from("config.json"),
            Self::Index => PathBuf::from("index.json"),
            Self::ActionPlan => PathBuf::from("final/action-plan.json"),
            Self::Dashboard => PathBuf::from("final/dashboard.json"),
            _ => self.report_path("json")?,
        })
    }

    /// Path of the rendered markdown relative to the run directory, for
    /// artifacts that have one.
    pub fn markdown_path(&self) -> StorylintResult<Option<PathBuf>> {
        Ok(match self {
            Self::Config | Self::Index => None,
            Self::ActionPlan => Some(PathBuf::from("final/action-plan.md")),
            Self::Dashboard => Some(PathBuf::from("final/dashboard.md")),
            _ => Some(self.report_path("md")?),
        })
    }

    fn report_path(&self, extension: &str) -> StorylintResult<PathBuf> {
        let (dir, stem) = match self {
            Self::Chapter(slug) => (ArtifactDir::Chapter, check_component(slug)?.to_string()),
            Self::Adjacent { left, right } => (
                ArtifactDir::Adjacent,
                format!("{}_{}", check_component(left)?, check_component(right)?),
            ),
            Self::Arc(window) => (ArtifactDir::Arc, check_component(window)?.to_string()),
            _ => {
                return Err(StorageError::new(StorageErrorKind::InvalidPath(self.identity())).into());
            }
        };
        Ok(PathBuf::from(dir.as_ref()).join(format!("{}.report.{}", stem, extension)))
    }
}

/// Reject names that are empty or could leave their directory.
pub(crate) fn check_component(name: &str) -> StorylintResult<&str> {
    let invalid = name.is_empty()
        || name == "."
        || name == ".."
        || name.contains('/')
        || name.contains('\\');
    if invalid {
        return Err(StorageError::new(StorageErrorKind::InvalidPath(name.to_string())).into());
    }
    Ok(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn layout_matches_run_tree() {
        assert_eq!(
            ArtifactKey::chapter("ch03").json_path().unwrap(),
            Path::new("chapter/ch03.report.json")
        );
        assert_eq!(
            ArtifactKey::arc("ch01-ch05").markdown_path().unwrap().unwrap(),
            Path::new("arc/ch01-ch05.report.md")
        );
        assert_eq!(
            ArtifactKey::ActionPlan.json_path().unwrap(),
            Path::new("final/action-plan.json")
        );
        assert!(ArtifactKey::Index.markdown_path().unwrap().is_none());
    }

    #[test]
    fn rejects_escaping_slugs() {
        assert!(ArtifactKey::chapter("../etc").json_path().is_err());
        assert!(ArtifactKey::chapter("").json_path().is_err());
        assert!(ArtifactKey::adjacent("ch01", "a/b").json_path().is_err());
    }
}
