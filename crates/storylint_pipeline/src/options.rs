//! Run selection.

use crate::RunMode;
use derive_getters::Getters;

/// What a run covers and how it treats existing artifacts.
///
/// # Examples
///
/// ```
/// use storylint_pipeline::{RunMode, RunOptions};
///
/// let options = RunOptions::builder()
///     .start("ch03")
///     .end("ch09")
///     .mode(RunMode::ArcOnly)
///     .build()
///     .unwrap();
/// assert_eq!(*options.window(), 5);
/// assert!(!options.force());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Getters, derive_builder::Builder)]
#[builder(setter(into), default)]
pub struct RunOptions {
    /// First chapter slug, inclusive
    #[builder(setter(into, strip_option))]
    start: Option<String>,
    /// Last chapter slug, inclusive
    #[builder(setter(into, strip_option))]
    end: Option<String>,
    mode: RunMode,
    /// Arc window size
    window: usize,
    /// Regenerate artifacts that already exist
    force: bool,
    /// Reuse or name the run directory instead of a timestamp
    #[builder(setter(into, strip_option))]
    run_id: Option<String>,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            start: None,
            end: None,
            mode: RunMode::Full,
            window: 5,
            force: false,
            run_id: None,
        }
    }
}

impl RunOptions {
    /// Creates a new options builder.
    pub fn builder() -> RunOptionsBuilder {
        RunOptionsBuilder::default()
    }
}
