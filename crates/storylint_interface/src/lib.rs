//! Trait definitions for report-generation backends.
//!
//! The pipeline treats the generator as an opaque function from a prompt to
//! raw text that is expected to contain a JSON object. Backends live in
//! `storylint_models`; tests script their own implementations.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod request;
mod traits;

pub use request::{GenerationRequest, GenerationRequestBuilder};
pub use traits::TextGenerator;
