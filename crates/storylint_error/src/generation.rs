//! Report generation error types.

/// Failures of the text generator or of the retry loop around it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum GenerationErrorKind {
    /// The generator call itself failed
    #[display("Generator call failed: {}", _0)]
    Transport(String),
    /// The generator returned a response that could not be interpreted
    #[display("Unexpected generator response: {}", _0)]
    Response(String),
    /// A required API key was not present in the environment
    #[display("Missing API key: {}", _0)]
    MissingApiKey(String),
    /// The provider refused the request outright
    #[display("Provider rejected request with status {}: {}", status, message)]
    Rejected {
        /// HTTP status code
        status: u16,
        /// Response body
        message: String,
    },
    /// The provider rejected the request as rate limited
    #[display("Rate limited: {}", _0)]
    RateLimited(String),
    /// All retry attempts failed
    #[display("Generation failed after {} attempts: {}", attempts, last)]
    Exhausted {
        /// Number of attempts made
        attempts: usize,
        /// Message of the last failure
        last: String,
    },
}

/// Generation error with location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Generation Error: {} at line {} in {}", kind, line, file)]
pub struct GenerationError {
    /// The kind of error that occurred
    pub kind: GenerationErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl GenerationError {
    /// Create a new generation error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: GenerationErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Get the error kind.
    pub fn kind(&self) -> &GenerationErrorKind {
        &self.kind
    }
}
