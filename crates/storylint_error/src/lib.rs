//! Error types for Storylint.
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - All constructors use `#[track_caller]` for automatic location capture
//!
//! # Examples
//!
//! ```
//! use storylint_error::{StorylintResult, ParseError, ParseErrorKind};
//!
//! fn parse() -> StorylintResult<()> {
//!     Err(ParseError::new(ParseErrorKind::MissingSceneEnd {
//!         chapter: "ch01".to_string(),
//!         line: 3,
//!     }))?
//! }
//!
//! assert!(parse().is_err());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod error;
mod extraction;
mod generation;
mod http;
mod json;
mod parse;
mod pipeline;
mod storage;
mod validation;

pub use config::ConfigError;
pub use error::{StorylintError, StorylintErrorKind, StorylintResult};
pub use extraction::{ExtractionError, ExtractionErrorKind};
pub use generation::{GenerationError, GenerationErrorKind};
pub use http::HttpError;
pub use json::JsonError;
pub use parse::{ParseError, ParseErrorKind};
pub use pipeline::{PipelineError, PipelineErrorKind};
pub use storage::{StorageError, StorageErrorKind};
pub use validation::{ValidationError, ValidationErrorKind};
