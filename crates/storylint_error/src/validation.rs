//! Report schema validation error types.

/// Ways a decoded report can violate its schema.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum ValidationErrorKind {
    /// The object does not match the report schema
    #[display("{} does not match schema: {}", report, message)]
    Schema {
        /// Report kind being validated
        report: String,
        /// Decoder message
        message: String,
    },
    /// The confidence value lies outside `[0, 1]`
    #[display("{} confidence {} is outside [0, 1]", report, value)]
    ConfidenceOutOfRange {
        /// Report kind being validated
        report: String,
        /// Offending value, formatted
        value: String,
    },
    /// Defaults could not be merged because the payload is not an object
    #[display("{} payload is not a JSON object", _0)]
    NotAnObject(String),
}

/// Validation error with location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Validation Error: {} at line {} in {}", kind, line, file)]
pub struct ValidationError {
    /// The kind of error that occurred
    pub kind: ValidationErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl ValidationError {
    /// Create a new validation error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: ValidationErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Get the error kind.
    pub fn kind(&self) -> &ValidationErrorKind {
        &self.kind
    }
}
