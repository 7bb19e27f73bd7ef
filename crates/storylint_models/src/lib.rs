//! Report generation for Storylint.
//!
//! [`ReportGenerator`] wraps any [`TextGenerator`](storylint_interface::TextGenerator)
//! with retry/backoff, JSON extraction, default filling and strict schema
//! validation. The backends implement the generator itself:
//!
//! - [`MockGenerator`]: canned, schema-valid reports; no network
//! - [`GeminiGenerator`]: Google Gemini `generateContent`
//! - [`OpenAiGenerator`]: OpenAI-compatible chat completions
//! - [`RateLimitedGenerator`]: requests-per-minute throttle around any backend

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod adapter;
mod extraction;
mod factory;
mod gemini;
mod mock;
mod openai;
mod response;
mod throttle;

pub use adapter::{ReportGenerator, backoff_delays};
pub use extraction::{extract_json, merge_defaults};
pub use factory::{build_generator, request_quota, throttled};
pub use gemini::{GEMINI_API_KEY_VAR, GeminiGenerator};
pub use mock::MockGenerator;
pub use openai::{OPENAI_API_KEY_VAR, OPENAI_BASE_URL_VAR, OpenAiGenerator};
pub use throttle::{RateLimitedGenerator, RequestQuota};

/// System instruction sent with every report request.
pub const AUDITOR_SYSTEM_PROMPT: &str = "You are a precise narrative quality auditor. \
Respond with a single JSON object that matches the requested schema exactly.";
