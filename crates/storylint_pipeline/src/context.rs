//! Scoped context payloads sent with each prompt.

use serde_json::{Value, json};
use std::collections::BTreeSet;
use storylint_core::{Chapter, PromptConfig};
use storylint_integrity::{CanonLoader, truncate_text};

const SUMMARY_SNIPPET_CHARS: usize = 320;

/// Full chapter payload: scenes with metadata and anchored paragraphs.
///
/// At most `max_paragraphs` paragraphs per scene are included, each cut to
/// `max_scene_chars` characters.
pub fn chapter_payload(chapter: &Chapter, limits: &PromptConfig) -> Value {
    let scenes: Vec<Value> = chapter
        .scenes()
        .iter()
        .map(|scene| {
            let meta = scene.meta();
            let paragraphs: Vec<Value> = scene
                .paragraphs()
                .iter()
                .take(*limits.max_paragraphs())
                .map(|paragraph| {
                    json!({
                        "idx": paragraph.index(),
                        "location": paragraph.anchor(chapter.slug(), meta.id()),
                        "text": truncate_text(paragraph.text(), *limits.max_scene_chars()),
                    })
                })
                .collect();
            json!({
                "id": meta.id(),
                "title": meta.title(),
                "when": meta.when(),
                "location": meta.location(),
                "characters": meta.characters(),
                "tags": meta.tags(),
                "images": meta.images(),
                "paragraphs": paragraphs,
            })
        })
        .collect();

    json!({
        "slug": chapter.slug(),
        "title": chapter.title(),
        "path": chapter.path().display().to_string(),
        "scenes": scenes,
    })
}

/// Condensed chapter payload for arc windows: scene metadata plus a short
/// opening snippet instead of full text.
pub fn chapter_summary(chapter: &Chapter) -> Value {
    let scenes: Vec<Value> = chapter
        .scenes()
        .iter()
        .map(|scene| {
            let meta = scene.meta();
            let snippet = scene
                .paragraphs()
                .first()
                .map(|p| truncate_text(p.text(), SUMMARY_SNIPPET_CHARS))
                .unwrap_or_default();
            json!({
                "id": meta.id(),
                "title": meta.title(),
                "location": meta.location(),
                "characters": meta.characters(),
                "tags": meta.tags(),
                "snippet": snippet,
            })
        })
        .collect();

    json!({
        "slug": chapter.slug(),
        "title": chapter.title(),
        "scenes": scenes,
    })
}

/// Canon snapshots for every character and location referenced in scope,
/// keyed by slug.
pub fn canon_payload<'a>(canon: &CanonLoader, chapters: impl IntoIterator<Item = &'a Chapter>) -> Value {
    let mut characters = BTreeSet::new();
    let mut locations = BTreeSet::new();
    for chapter in chapters {
        characters.extend(chapter.character_slugs());
        locations.extend(chapter.location_slugs());
    }

    json!({
        "characters": canon.characters(&characters),
        "locations": canon.locations(&locations),
    })
}
