//! Scene markup parse error types.

/// Structural problems that make a chapter unparseable.
///
/// Every variant names the chapter and the 1-based line where the problem
/// was detected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum ParseErrorKind {
    /// A scene was opened but the input ended before its end marker
    #[display("{}: scene opened at line {} has no end marker", chapter, line)]
    MissingSceneEnd {
        /// Chapter slug
        chapter: String,
        /// Line of the offending start marker
        line: usize,
    },
    /// The attribute block of a start marker was never closed
    #[display("{}: attribute block opened at line {} is never closed", chapter, line)]
    UnterminatedAttributes {
        /// Chapter slug
        chapter: String,
        /// Line of the start marker
        line: usize,
    },
    /// A start marker carried no `id` attribute
    #[display("{}: scene at line {} has no id", chapter, line)]
    MissingSceneId {
        /// Chapter slug
        chapter: String,
        /// Line of the start marker
        line: usize,
    },
    /// Two scenes in the same chapter share an id
    #[display("{}: duplicate scene id '{}' at line {}", chapter, id, line)]
    DuplicateSceneId {
        /// Chapter slug
        chapter: String,
        /// Repeated scene id
        id: String,
        /// Line of the second occurrence
        line: usize,
    },
    /// An end marker names a different scene than the open one
    #[display(
        "{}: end marker at line {} closes '{}' but '{}' is open",
        chapter,
        line,
        found,
        expected
    )]
    MismatchedSceneEnd {
        /// Chapter slug
        chapter: String,
        /// Line of the end marker
        line: usize,
        /// Id of the open scene
        expected: String,
        /// Id carried by the end marker
        found: String,
    },
    /// A start marker appeared while a scene was still open
    #[display("{}: scene start at line {} while a scene is still open", chapter, line)]
    NestedSceneStart {
        /// Chapter slug
        chapter: String,
        /// Line of the nested start marker
        line: usize,
    },
    /// The chapter file could not be read
    #[display("Failed to read chapter {}: {}", path, message)]
    FileRead {
        /// Path that failed
        path: String,
        /// Underlying I/O message
        message: String,
    },
}

/// Parse error with location tracking.
///
/// # Examples
///
/// ```
/// use storylint_error::{ParseError, ParseErrorKind};
///
/// let err = ParseError::new(ParseErrorKind::MissingSceneId {
///     chapter: "ch02".to_string(),
///     line: 10,
/// });
/// assert!(format!("{}", err).contains("no id"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Parse Error: {} at line {} in {}", kind, line, file)]
pub struct ParseError {
    /// The kind of error that occurred
    pub kind: ParseErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl ParseError {
    /// Create a new parse error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: ParseErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Get the error kind.
    pub fn kind(&self) -> &ParseErrorKind {
        &self.kind
    }
}
