//! Line-oriented scene parser.

use crate::attributes::{coerce_list, parse_attributes, scalar_text};
use std::collections::HashSet;
use std::path::Path;
use storylint_core::{Chapter, MarkerConfig, Paragraph, Scene, SceneMeta};
use storylint_error::{ParseError, ParseErrorKind, StorylintResult};
use tracing::debug;

/// Parse chapter text into scenes and paragraphs.
///
/// Pure function of its inputs. `path` is recorded on the chapter but never
/// read. Line numbers are 1-based and refer to `text`.
///
/// # Errors
///
/// Returns a [`ParseError`] naming the chapter and line when a scene is never
/// closed, an attribute block never ends, a scene lacks an id or repeats one,
/// an end marker names a different scene, or a scene opens inside another.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use storylint_core::MarkerConfig;
/// use storylint_parser::parse_chapter;
///
/// let text = "# Arrival\n<!-- SCENE-START id:scn-01 -->\nThe ship docked.\n<!-- SCENE-END -->\n";
/// let chapter = parse_chapter("ch01", Path::new("ch01/content.md"), text, &MarkerConfig::default())?;
/// assert_eq!(chapter.title(), "Arrival");
/// assert_eq!(chapter.scenes()[0].id(), "scn-01");
/// # Ok::<(), storylint_error::StorylintError>(())
/// ```
#[tracing::instrument(skip_all, fields(chapter = slug))]
pub fn parse_chapter(
    slug: &str,
    path: &Path,
    text: &str,
    markers: &MarkerConfig,
) -> StorylintResult<Chapter> {
    let lines: Vec<&str> = text.lines().collect();
    let title = lines
        .iter()
        .find_map(|line| line.strip_prefix("# "))
        .map(|t| t.trim().to_string())
        .unwrap_or_default();

    let mut scenes = Vec::new();
    let mut seen_ids = HashSet::new();
    let mut i = 0;
    while i < lines.len() {
        if !lines[i].contains(markers.scene_start().as_str()) {
            i += 1;
            continue;
        }
        let (scene, next) = parse_scene(slug, &lines, i, markers)?;
        if !seen_ids.insert(scene.id().to_string()) {
            return Err(ParseError::new(ParseErrorKind::DuplicateSceneId {
                chapter: slug.to_string(),
                id: scene.id().to_string(),
                line: i + 1,
            })
            .into());
        }
        scenes.push(scene);
        i = next;
    }

    debug!(scenes = scenes.len(), "Parsed chapter");
    Ok(Chapter::new(
        slug.to_string(),
        title,
        path.to_path_buf(),
        scenes,
    ))
}

/// Read and parse a chapter file. The slug is the name of its directory.
///
/// # Errors
///
/// Returns a [`ParseError`] if the file cannot be read or does not parse.
pub fn parse_chapter_file(path: &Path, markers: &MarkerConfig) -> StorylintResult<Chapter> {
    let text = std::fs::read_to_string(path).map_err(|e| {
        ParseError::new(ParseErrorKind::FileRead {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    })?;
    let slug = chapter_slug(path);
    parse_chapter(&slug, path, &text, markers)
}

/// Slug of the chapter stored at `path`: its parent directory name.
pub(crate) fn chapter_slug(path: &Path) -> String {
    path.parent()
        .and_then(Path::file_name)
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Parse the scene whose start marker is on line index `start`.
///
/// Returns the scene and the index of the first line after its end marker.
fn parse_scene(
    slug: &str,
    lines: &[&str],
    start: usize,
    markers: &MarkerConfig,
) -> StorylintResult<(Scene, usize)> {
    let open = markers.scene_start().as_str();
    let closer = markers.closer().as_str();
    let meta_start_line = start + 1;

    let first = lines[start];
    let marker_at = first.find(open).unwrap_or(0);
    let after_marker = &first[marker_at + open.len()..];

    let mut block = String::new();
    let meta_end = match after_marker.find(closer) {
        Some(close) => {
            block.push_str(&after_marker[..close]);
            start
        }
        None => {
            block.push_str(after_marker);
            let mut j = start + 1;
            loop {
                let Some(&line) = lines.get(j) else {
                    return Err(ParseError::new(ParseErrorKind::UnterminatedAttributes {
                        chapter: slug.to_string(),
                        line: meta_start_line,
                    })
                    .into());
                };
                block.push('\n');
                match line.find(closer) {
                    Some(close) => {
                        block.push_str(&line[..close]);
                        break j;
                    }
                    None => block.push_str(line),
                }
                j += 1;
            }
        }
    };

    let raw_attribute_text = lines[start..=meta_end].join("\n");
    let meta = scene_meta(slug, meta_start_line, &block, raw_attribute_text)?;

    let mut body: Vec<(usize, &str)> = Vec::new();
    let mut j = meta_end + 1;
    loop {
        let Some(&line) = lines.get(j) else {
            return Err(ParseError::new(ParseErrorKind::MissingSceneEnd {
                chapter: slug.to_string(),
                line: meta_start_line,
            })
            .into());
        };
        if line.contains(markers.scene_end().as_str()) {
            check_end_marker(slug, j + 1, line, meta.id(), markers)?;
            break;
        }
        if line.contains(open) {
            return Err(ParseError::new(ParseErrorKind::NestedSceneStart {
                chapter: slug.to_string(),
                line: j + 1,
            })
            .into());
        }
        body.push((j + 1, line));
        j += 1;
    }

    let start_line = meta_end + 2;
    let end_line = body.last().map_or(start_line, |(n, _)| *n);
    let body_text = body
        .iter()
        .map(|(_, text)| *text)
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string();
    let paragraphs = split_paragraphs(&body);

    let scene = Scene::new(
        meta,
        body_text,
        paragraphs,
        start_line,
        end_line,
        meta_start_line,
        meta_end + 1,
    );
    Ok((scene, j + 1))
}

fn scene_meta(
    slug: &str,
    line: usize,
    block: &str,
    raw_attribute_text: String,
) -> StorylintResult<SceneMeta> {
    let attrs = parse_attributes(block);
    let text = |key: &str| attrs.get(key).and_then(scalar_text);

    let id = text("id").unwrap_or_default();
    if id.is_empty() {
        return Err(ParseError::new(ParseErrorKind::MissingSceneId {
            chapter: slug.to_string(),
            line,
        })
        .into());
    }

    Ok(SceneMeta::new(
        id,
        text("title").unwrap_or_default(),
        text("when"),
        text("location"),
        coerce_list(attrs.get("characters")),
        coerce_list(attrs.get("tags")),
        coerce_list(attrs.get("images")),
        attrs.clone(),
        raw_attribute_text,
    ))
}

/// An end marker may repeat the scene id; when it does, it must match.
fn check_end_marker(
    slug: &str,
    line_no: usize,
    line: &str,
    open_id: &str,
    markers: &MarkerConfig,
) -> StorylintResult<()> {
    let end = markers.scene_end().as_str();
    let after = line
        .find(end)
        .map_or("", |at| &line[at + end.len()..]);
    let inner = after
        .find(markers.closer().as_str())
        .map_or(after, |close| &after[..close]);
    match parse_attributes(inner).get("id").and_then(scalar_text) {
        Some(found) if found != open_id => Err(ParseError::new(
            ParseErrorKind::MismatchedSceneEnd {
                chapter: slug.to_string(),
                line: line_no,
                expected: open_id.to_string(),
                found,
            },
        )
        .into()),
        _ => Ok(()),
    }
}

/// Maximal runs of non-blank lines, numbered from 1.
fn split_paragraphs(body: &[(usize, &str)]) -> Vec<Paragraph> {
    let mut paragraphs = Vec::new();
    let mut run: Vec<(usize, &str)> = Vec::new();

    for &(line_no, text) in body {
        if text.trim().is_empty() {
            flush(&mut run, &mut paragraphs);
        } else {
            run.push((line_no, text));
        }
    }
    flush(&mut run, &mut paragraphs);
    paragraphs
}

fn flush(run: &mut Vec<(usize, &str)>, paragraphs: &mut Vec<Paragraph>) {
    if let (Some((first, _)), Some((last, _))) = (run.first(), run.last()) {
        let text = run
            .iter()
            .map(|(_, t)| *t)
            .collect::<Vec<_>>()
            .join("\n")
            .trim()
            .to_string();
        paragraphs.push(Paragraph::new(paragraphs.len() + 1, text, *first, *last));
    }
    run.clear();
}
