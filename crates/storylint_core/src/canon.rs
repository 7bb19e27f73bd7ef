//! Canonical entity snapshots.

use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Which canonical directory an entity lives in.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum CanonKind {
    /// A character profile directory.
    Character,
    /// A location directory.
    Location,
}

/// Markdown-stripped, truncated canonical description of one entity.
///
/// Snapshots are built fresh for every prompt and never persisted on their own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters, derive_new::new)]
#[serde(rename_all = "camelCase")]
pub struct CanonSnapshot {
    slug: String,
    kind: CanonKind,
    exists: bool,
    source_file: Option<PathBuf>,
    truncated_text: String,
}

impl CanonSnapshot {
    /// Snapshot for an entity whose directory or documents are absent.
    pub fn missing(slug: impl Into<String>, kind: CanonKind) -> Self {
        Self::new(slug.into(), kind, false, None, String::new())
    }
}
