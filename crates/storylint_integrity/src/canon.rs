//! Canonical entity snapshots.

use crate::{ProjectLayout, strip_markdown, truncate_text};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use storylint_core::{CanonKind, CanonSnapshot};
use tracing::{debug, warn};

const CHARACTER_PRIORITIES: &[&str] = &["profile.md", "overview.md", "background.md"];
const LOCATION_PRIORITIES: &[&str] = &["overview.md", "description.md", "inhabitants.md"];

/// Loads the first available canonical description for entity slugs.
#[derive(Debug, Clone)]
pub struct CanonLoader {
    layout: ProjectLayout,
}

impl CanonLoader {
    /// Create a loader over a project layout.
    pub fn new(layout: ProjectLayout) -> Self {
        Self { layout }
    }

    /// Snapshots for character slugs, keyed and ordered by slug.
    pub fn characters<'a>(
        &self,
        slugs: impl IntoIterator<Item = &'a String>,
    ) -> BTreeMap<String, CanonSnapshot> {
        self.snapshots(slugs, CanonKind::Character)
    }

    /// Snapshots for location slugs, keyed and ordered by slug.
    pub fn locations<'a>(
        &self,
        slugs: impl IntoIterator<Item = &'a String>,
    ) -> BTreeMap<String, CanonSnapshot> {
        self.snapshots(slugs, CanonKind::Location)
    }

    fn snapshots<'a>(
        &self,
        slugs: impl IntoIterator<Item = &'a String>,
        kind: CanonKind,
    ) -> BTreeMap<String, CanonSnapshot> {
        slugs
            .into_iter()
            .filter(|slug| !slug.is_empty())
            .map(|slug| (slug.clone(), self.snapshot(slug, kind)))
            .collect()
    }

    /// Snapshot of one entity.
    ///
    /// The entity exists when its directory does. Text comes from the first
    /// priority file present, else the alphabetically first `*.md`, and is
    /// markdown-stripped and truncated to the layout's budget.
    pub fn snapshot(&self, slug: &str, kind: CanonKind) -> CanonSnapshot {
        let (base, priorities) = match kind {
            CanonKind::Character => (self.layout.characters_dir(), CHARACTER_PRIORITIES),
            CanonKind::Location => (self.layout.locations_dir(), LOCATION_PRIORITIES),
        };
        let folder = base.join(slug);
        if !folder.is_dir() {
            debug!(slug, %kind, "No canonical directory");
            return CanonSnapshot::missing(slug, kind);
        }

        let Some(source) = pick_source(&folder, priorities) else {
            return CanonSnapshot::new(slug.to_string(), kind, true, None, String::new());
        };
        let text = match std::fs::read_to_string(&source) {
            Ok(raw) => truncate_text(&strip_markdown(&raw), *self.layout.canon_snapshot_chars()),
            Err(e) => {
                warn!(path = %source.display(), error = %e, "Failed to read canon file");
                String::new()
            }
        };
        CanonSnapshot::new(slug.to_string(), kind, true, Some(source), text)
    }
}

fn pick_source(folder: &Path, priorities: &[&str]) -> Option<PathBuf> {
    priorities
        .iter()
        .map(|name| folder.join(name))
        .find(|candidate| candidate.is_file())
        .or_else(|| markdown_files(folder).into_iter().next())
}

/// `*.md` files directly inside `folder`, sorted by name.
pub(crate) fn markdown_files(folder: &Path) -> Vec<PathBuf> {
    let Ok(entries) = std::fs::read_dir(folder) else {
        return Vec::new();
    };
    let mut files: Vec<PathBuf> = entries
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "md"))
        .collect();
    files.sort();
    files
}
