//! Top-level error wrapper types.

use crate::{
    ConfigError, ExtractionError, ExtractionErrorKind, GenerationError, HttpError, JsonError,
    ParseError, PipelineError, StorageError, ValidationError,
};

/// Every error condition a Storylint crate can report.
///
/// # Examples
///
/// ```
/// use storylint_error::{StorylintError, HttpError};
///
/// let err: StorylintError = HttpError::new("connection reset").into();
/// assert!(format!("{}", err).contains("HTTP Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum StorylintErrorKind {
    /// HTTP error
    #[from(HttpError)]
    Http(HttpError),
    /// JSON serialization/deserialization error
    #[from(JsonError)]
    Json(JsonError),
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// Scene markup parse error
    #[from(ParseError)]
    Parse(ParseError),
    /// Report generation error
    #[from(GenerationError)]
    Generation(GenerationError),
    /// JSON extraction error
    #[from(ExtractionError)]
    Extraction(ExtractionError),
    /// Report validation error
    #[from(ValidationError)]
    Validation(ValidationError),
    /// Artifact storage error
    #[from(StorageError)]
    Storage(StorageError),
    /// Pipeline error
    #[from(PipelineError)]
    Pipeline(PipelineError),
}

/// Storylint error with kind discrimination.
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Storylint Error: {}", _0)]
pub struct StorylintError(Box<StorylintErrorKind>);

impl StorylintError {
    /// Create a new error from a kind.
    pub fn new(kind: StorylintErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &StorylintErrorKind {
        &self.0
    }

    /// Whether a fresh attempt at the same request could succeed.
    ///
    /// A response with no JSON object at all is permanent; transport,
    /// decoding and schema failures are transient.
    pub fn is_retryable(&self) -> bool {
        match self.kind() {
            StorylintErrorKind::Http(_)
            | StorylintErrorKind::Json(_)
            | StorylintErrorKind::Validation(_) => true,
            StorylintErrorKind::Generation(e) => !matches!(
                e.kind(),
                crate::GenerationErrorKind::MissingApiKey(_)
                    | crate::GenerationErrorKind::Rejected { .. }
                    | crate::GenerationErrorKind::Exhausted { .. }
            ),
            StorylintErrorKind::Extraction(e) => {
                matches!(e.kind(), ExtractionErrorKind::InvalidJson(_))
            }
            StorylintErrorKind::Config(_)
            | StorylintErrorKind::Parse(_)
            | StorylintErrorKind::Storage(_)
            | StorylintErrorKind::Pipeline(_) => false,
        }
    }
}

// Generic From implementation for any type that converts to StorylintErrorKind
impl<T> From<T> for StorylintError
where
    T: Into<StorylintErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for Storylint operations.
pub type StorylintResult<T> = std::result::Result<T, StorylintError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{GenerationErrorKind, ValidationErrorKind};

    #[test]
    fn no_json_is_permanent() {
        let err: StorylintError =
            ExtractionError::new(ExtractionErrorKind::NoJsonFound(4)).into();
        assert!(!err.is_retryable());
    }

    #[test]
    fn schema_and_transport_failures_are_transient() {
        let schema: StorylintError = ValidationError::new(ValidationErrorKind::Schema {
            report: "chapter".to_string(),
            message: "missing field `issues`".to_string(),
        })
        .into();
        let transport: StorylintError =
            GenerationError::new(GenerationErrorKind::Transport("timeout".to_string())).into();
        assert!(schema.is_retryable());
        assert!(transport.is_retryable());
    }
}
