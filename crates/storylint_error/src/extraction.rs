//! JSON extraction error types.

/// Failures locating a JSON object inside free-form generator output.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum ExtractionErrorKind {
    /// No `{ ... }` span exists in the response
    #[display("No JSON object found in response ({} chars)", _0)]
    NoJsonFound(usize),
    /// A candidate span was found but does not decode
    #[display("Invalid JSON object: {}", _0)]
    InvalidJson(String),
}

/// Extraction error with location tracking.
///
/// # Examples
///
/// ```
/// use storylint_error::{ExtractionError, ExtractionErrorKind};
///
/// let err = ExtractionError::new(ExtractionErrorKind::NoJsonFound(12));
/// assert!(format!("{}", err).contains("No JSON object"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Extraction Error: {} at line {} in {}", kind, line, file)]
pub struct ExtractionError {
    /// The kind of error that occurred
    pub kind: ExtractionErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl ExtractionError {
    /// Create a new extraction error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: ExtractionErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Get the error kind.
    pub fn kind(&self) -> &ExtractionErrorKind {
        &self.kind
    }
}
