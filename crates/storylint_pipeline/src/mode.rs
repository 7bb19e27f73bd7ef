//! Which audit stages a run includes.

use serde::{Deserialize, Serialize};

/// Stage selection for a run. Chapter audits and synthesis always run.
///
/// # Examples
///
/// ```
/// use storylint_pipeline::RunMode;
///
/// let mode: RunMode = "flow".parse().unwrap();
/// assert_eq!(mode, RunMode::AdjacentOnly);
/// assert!(mode.runs_adjacent());
/// assert!(!mode.runs_arc());
/// assert_eq!(mode.to_string(), "adjacent-only");
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum RunMode {
    /// Chapter, adjacent and arc audits
    #[default]
    #[strum(to_string = "full", serialize = "all")]
    Full,
    /// Chapter audits only
    #[strum(to_string = "chapters-only", serialize = "chapters")]
    ChaptersOnly,
    /// Chapter and adjacent-pair audits
    #[strum(to_string = "adjacent-only", serialize = "adjacent", serialize = "flow")]
    AdjacentOnly,
    /// Chapter and arc-window audits
    #[strum(to_string = "arc-only", serialize = "arc")]
    ArcOnly,
}

impl RunMode {
    /// Whether adjacent-pair audits run.
    pub fn runs_adjacent(self) -> bool {
        matches!(self, Self::Full | Self::AdjacentOnly)
    }

    /// Whether arc-window audits run.
    pub fn runs_arc(self) -> bool {
        matches!(self, Self::Full | Self::ArcOnly)
    }
}
