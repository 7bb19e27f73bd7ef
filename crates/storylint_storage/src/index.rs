//! `index.json`: what a run covers.

use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use storylint_core::Chapter;

/// One scene as listed in the index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
#[serde(rename_all = "camelCase")]
pub struct SceneIndex {
    scene_id: String,
    title: String,
    location: Option<String>,
    characters: Vec<String>,
    tags: Vec<String>,
    images: Vec<String>,
    /// First and last body line, 1-based
    line_range: (usize, usize),
    paragraphs: usize,
    /// `chapterSlug:sceneId`
    anchor: String,
}

/// One chapter as listed in the index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
#[serde(rename_all = "camelCase")]
pub struct ChapterIndex {
    slug: String,
    title: String,
    path: PathBuf,
    characters: Vec<String>,
    locations: Vec<String>,
    scenes: Vec<SceneIndex>,
}

impl From<&Chapter> for ChapterIndex {
    fn from(chapter: &Chapter) -> Self {
        let scenes = chapter
            .scenes()
            .iter()
            .map(|scene| {
                let meta = scene.meta();
                SceneIndex {
                    scene_id: meta.id().clone(),
                    title: meta.title().clone(),
                    location: meta.location().clone(),
                    characters: meta.characters().clone(),
                    tags: meta.tags().clone(),
                    images: meta.images().clone(),
                    line_range: (*scene.start_line(), *scene.end_line()),
                    paragraphs: scene.paragraphs().len(),
                    anchor: scene.anchor(chapter.slug()),
                }
            })
            .collect();
        Self {
            slug: chapter.slug().clone(),
            title: chapter.title().clone(),
            path: chapter.path().clone(),
            characters: chapter.character_slugs(),
            locations: chapter.location_slugs(),
            scenes,
        }
    }
}

/// Planned work for a run.
///
/// The dashboard measures completion against these totals, so a run can be
/// summarized again later from its directory alone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
#[serde(rename_all = "camelCase")]
pub struct RunIndex {
    run_id: String,
    generated_at: String,
    mode: String,
    window: usize,
    chapters: Vec<ChapterIndex>,
    /// Planned `(left, right)` pairs; empty when the mode skips the stage
    adjacent: Vec<(String, String)>,
    /// Planned `first-last` window slugs; empty when the mode skips the stage
    arcs: Vec<String>,
}

impl RunIndex {
    /// Index the parsed chapters and the stage plan of a run.
    pub fn new(
        run_id: impl Into<String>,
        mode: impl Into<String>,
        window: usize,
        chapters: &[Chapter],
        adjacent: Vec<(String, String)>,
        arcs: Vec<String>,
    ) -> Self {
        Self {
            run_id: run_id.into(),
            generated_at: chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
            mode: mode.into(),
            window,
            chapters: chapters.iter().map(ChapterIndex::from).collect(),
            adjacent,
            arcs,
        }
    }

    /// Chapter slugs in plan order.
    pub fn chapter_slugs(&self) -> Vec<&str> {
        self.chapters.iter().map(|c| c.slug.as_str()).collect()
    }
}
