//! Parsed chapter tree: chapters, scenes, scene metadata and paragraphs.

use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// A run of consecutive non-blank lines inside a scene body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters, derive_new::new)]
#[serde(rename_all = "camelCase")]
pub struct Paragraph {
    /// 1-based position within the scene.
    index: usize,
    /// Lines joined with `\n`, surrounding whitespace trimmed.
    text: String,
    /// 1-based line of the first line.
    start_line: usize,
    /// 1-based line of the last line.
    end_line: usize,
}

impl Paragraph {
    /// Stable anchor `chapter:scene:pN` used as an issue location.
    pub fn anchor(&self, chapter_slug: &str, scene_id: &str) -> String {
        format!("{}:{}:p{}", chapter_slug, scene_id, self.index)
    }
}

/// Attributes declared on a scene start marker.
///
/// Recognised keys are coerced into typed fields; every key, recognised or
/// not, is also kept in `raw_attributes`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters, derive_new::new)]
#[serde(rename_all = "camelCase")]
pub struct SceneMeta {
    id: String,
    title: String,
    when: Option<String>,
    location: Option<String>,
    characters: Vec<String>,
    tags: Vec<String>,
    images: Vec<String>,
    raw_attributes: BTreeMap<String, serde_json::Value>,
    raw_attribute_text: String,
}

/// One tagged scene of a chapter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters, derive_new::new)]
#[serde(rename_all = "camelCase")]
pub struct Scene {
    meta: SceneMeta,
    body_text: String,
    paragraphs: Vec<Paragraph>,
    /// First body line: the line after the one closing the start marker.
    start_line: usize,
    /// Last body line, or the start line when the body is empty.
    end_line: usize,
    meta_start_line: usize,
    meta_end_line: usize,
}

impl Scene {
    /// The scene id.
    pub fn id(&self) -> &str {
        self.meta.id()
    }

    /// Scene-level anchor `chapter:scene`.
    pub fn anchor(&self, chapter_slug: &str) -> String {
        format!("{}:{}", chapter_slug, self.meta.id())
    }
}

/// A parsed chapter. Immutable once produced by the scene parser.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters, derive_new::new)]
#[serde(rename_all = "camelCase")]
pub struct Chapter {
    slug: String,
    title: String,
    path: PathBuf,
    scenes: Vec<Scene>,
}

impl Chapter {
    /// Look up a scene by id.
    pub fn scene(&self, id: &str) -> Option<&Scene> {
        self.scenes.iter().find(|s| s.id() == id)
    }

    /// Distinct character slugs across all scenes, in first-seen order.
    pub fn character_slugs(&self) -> Vec<String> {
        distinct(self.scenes.iter().flat_map(|s| s.meta.characters.iter()))
    }

    /// Distinct location slugs across all scenes, in first-seen order.
    pub fn location_slugs(&self) -> Vec<String> {
        distinct(self.scenes.iter().filter_map(|s| s.meta.location.as_ref()))
    }

    /// Directory holding the chapter file.
    pub fn dir(&self) -> PathBuf {
        self.path
            .parent()
            .map(PathBuf::from)
            .unwrap_or_default()
    }
}

fn distinct<'a>(items: impl Iterator<Item = &'a String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for item in items {
        if !item.is_empty() && !out.contains(item) {
            out.push(item.clone());
        }
    }
    out
}
