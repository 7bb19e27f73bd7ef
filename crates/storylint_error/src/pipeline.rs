//! Pipeline orchestration error types.

/// Run-level failures of the audit pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum PipelineErrorKind {
    /// The selection produced no chapters
    #[display("No chapters selected under {}", _0)]
    NoChaptersSelected(String),
    /// Some work items failed; completed artifacts remain on disk
    #[display("{} item(s) failed: {}", count, items.join(", "))]
    ItemsFailed {
        /// Number of failed items
        count: usize,
        /// Identities of failed items
        items: Vec<String>,
    },
    /// A stage worker could not be scheduled
    #[display("Stage {} could not run: {}", stage, message)]
    Stage {
        /// Stage name
        stage: String,
        /// Failure message
        message: String,
    },
}

/// Pipeline error with location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Pipeline Error: {} at line {} in {}", kind, line, file)]
pub struct PipelineError {
    /// The kind of error that occurred
    pub kind: PipelineErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl PipelineError {
    /// Create a new pipeline error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: PipelineErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Get the error kind.
    pub fn kind(&self) -> &PipelineErrorKind {
        &self.kind
    }
}
