//! Scene markup parsing and chapter planning.
//!
//! - [`parse_chapter`] turns chapter text into a [`Chapter`](storylint_core::Chapter)
//!   with line-accurate scene and paragraph anchors
//! - [`ChapterPlan`] orders chapters by sequence number and derives the
//!   adjacent pairs and sliding windows the pipeline audits
//! - [`discover_chapters`] finds chapter files under a directory tree

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod attributes;
mod discovery;
mod plan;
mod scene;

pub use attributes::parse_attributes;
pub use discovery::discover_chapters;
pub use plan::{ChapterPlan, ChapterRef, ChapterWindow, chapter_sort_key, windows};
pub use scene::{parse_chapter, parse_chapter_file};
