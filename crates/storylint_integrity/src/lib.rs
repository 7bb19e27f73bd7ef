//! Canonical entity lookup and filesystem integrity validation.
//!
//! Both components read the project tree directly and are re-run on every
//! pipeline invocation; nothing here is cached.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod canon;
mod layout;
mod text;
mod validator;

pub use canon::CanonLoader;
pub use layout::ProjectLayout;
pub use text::{strip_markdown, truncate_text};
pub use validator::{IntegrityValidator, collect_generated_images};
