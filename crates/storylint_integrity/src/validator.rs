//! Entity slug and image reference checks.

use crate::ProjectLayout;
use crate::canon::markdown_files;
use serde_yaml::Value;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use storylint_core::{CanonKind, Chapter, Issue, IssueType, Severity};
use tracing::{debug, warn};

const GENERATED_IMAGES_KEY: &str = "generated_images";
const IMAGE_PATH_FIELDS: &[&str] = &["path", "file", "filename"];

/// Cross-checks a chapter's references against the project tree.
///
/// # Examples
///
/// ```no_run
/// use storylint_core::StorylintConfig;
/// use storylint_integrity::{IntegrityValidator, ProjectLayout};
/// use storylint_parser::parse_chapter_file;
///
/// let config = StorylintConfig::load(None)?;
/// let chapter = parse_chapter_file(&config.chapters_dir().join("ch01/content.md"), config.markers())?;
/// let findings = IntegrityValidator::new(ProjectLayout::from(&config)).validate(&chapter);
/// println!("{} integrity findings", findings.len());
/// # Ok::<(), storylint_error::StorylintError>(())
/// ```
#[derive(Debug, Clone)]
pub struct IntegrityValidator {
    layout: ProjectLayout,
}

impl IntegrityValidator {
    /// Create a validator over a project layout.
    pub fn new(layout: ProjectLayout) -> Self {
        Self { layout }
    }

    /// All slug and imagery findings for `chapter`.
    #[tracing::instrument(skip_all, fields(chapter = %chapter.slug()))]
    pub fn validate(&self, chapter: &Chapter) -> Vec<Issue> {
        let mut findings = self.validate_slugs(chapter);
        findings.extend(self.validate_imagery(chapter));
        debug!(count = findings.len(), "Integrity findings");
        findings
    }

    /// Character and location slugs without a canonical directory (major) or
    /// whose directory has no markdown document (moderate).
    ///
    /// Each distinct slug is reported once, at the first scene using it.
    pub fn validate_slugs(&self, chapter: &Chapter) -> Vec<Issue> {
        let mut seen: HashSet<(CanonKind, &str)> = HashSet::new();
        let mut findings = Vec::new();

        for scene in chapter.scenes() {
            let anchor = scene.anchor(chapter.slug());
            let characters = scene
                .meta()
                .characters()
                .iter()
                .map(|slug| (CanonKind::Character, slug.as_str()));
            let location = scene
                .meta()
                .location()
                .iter()
                .map(|slug| (CanonKind::Location, slug.as_str()));

            for (kind, slug) in characters.chain(location) {
                if slug.is_empty() || !seen.insert((kind, slug)) {
                    continue;
                }
                if let Some(issue) = self.check_slug(kind, slug, &anchor) {
                    findings.push(issue);
                }
            }
        }
        findings
    }

    fn check_slug(&self, kind: CanonKind, slug: &str, anchor: &str) -> Option<Issue> {
        let base = match kind {
            CanonKind::Character => self.layout.characters_dir(),
            CanonKind::Location => self.layout.locations_dir(),
        };
        let label = match kind {
            CanonKind::Character => "Character",
            CanonKind::Location => "Location",
        };
        let folder = base.join(slug);

        let (severity, explanation, action) = if !folder.is_dir() {
            (
                Severity::Major,
                format!("{} slug '{}' has no canonical directory.", label, slug),
                "Add canonical docs or correct the slug.",
            )
        } else if markdown_files(&folder).is_empty() {
            (
                Severity::Moderate,
                format!("{} slug '{}' has no markdown canonical docs.", label, slug),
                "Add at least one canonical markdown file.",
            )
        } else {
            return None;
        };

        Some(
            Issue::new(IssueType::Slug, severity, anchor, explanation, action)
                .with_evidence(vec![slug.to_string()]),
        )
    }

    /// Scene images that resolve to no file (moderate) and generated images
    /// listed in sibling imagery specs that are missing (minor).
    pub fn validate_imagery(&self, chapter: &Chapter) -> Vec<Issue> {
        let mut findings = Vec::new();

        for scene in chapter.scenes() {
            for image in scene.meta().images() {
                if image.is_empty() || self.resolve_image(chapter, image).is_some() {
                    continue;
                }
                findings.push(
                    Issue::new(
                        IssueType::Imagery,
                        Severity::Moderate,
                        scene.anchor(chapter.slug()),
                        format!("Image reference '{}' not found on disk.", image),
                        "Add the image file or update the scene metadata reference.",
                    )
                    .with_evidence(vec![image.clone()]),
                );
            }
        }

        let chapter_dir = chapter.dir();
        for name in self.layout.imagery_filenames() {
            let spec = chapter_dir.join(name);
            if !spec.is_file() {
                continue;
            }
            for generated in load_generated_images(&spec) {
                if self.layout.project_root().join(&generated).exists() {
                    continue;
                }
                findings.push(
                    Issue::new(
                        IssueType::Imagery,
                        Severity::Minor,
                        format!("{}:{}", chapter.slug(), name),
                        format!("Generated image path '{}' not found on disk.", generated),
                        "Regenerate or remove the missing generated image entry.",
                    )
                    .with_evidence(vec![generated]),
                );
            }
        }
        findings
    }

    /// Locate an image reference on disk.
    ///
    /// Absolute paths are taken as is and paths containing a separator are
    /// relative to the project root. Bare names are looked up beside the
    /// chapter, in its `images/` folder, and under the images directory.
    pub fn resolve_image(&self, chapter: &Chapter, image: &str) -> Option<PathBuf> {
        let path = Path::new(image);
        let candidates: Vec<PathBuf> = if path.is_absolute() {
            vec![path.to_path_buf()]
        } else if image.contains('/') || image.contains('\\') {
            vec![self.layout.project_root().join(path)]
        } else {
            let chapter_dir = chapter.dir();
            let mut candidates = vec![chapter_dir.join(image), chapter_dir.join("images").join(image)];
            if let Some(images_dir) = self.layout.images_dir() {
                let per_chapter = images_dir.join(chapter.slug());
                candidates.push(per_chapter.join(image));
                candidates.push(per_chapter.join("images").join(image));
            }
            candidates
        };
        candidates.into_iter().find(|candidate| candidate.exists())
    }
}

fn load_generated_images(path: &Path) -> Vec<String> {
    let parsed = std::fs::read_to_string(path)
        .map_err(|e| e.to_string())
        .and_then(|text| serde_yaml::from_str::<Value>(&text).map_err(|e| e.to_string()));
    match parsed {
        Ok(value) => collect_generated_images(&value),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Unreadable imagery spec, treating as empty");
            Vec::new()
        }
    }
}

/// Every image path listed under a `generated_images` key, at any depth.
///
/// Entries are plain strings or mappings carrying a `path`, `file` or
/// `filename` field.
///
/// # Examples
///
/// ```
/// use storylint_integrity::collect_generated_images;
///
/// let spec: serde_yaml::Value = serde_yaml::from_str(
///     "scenes:\n  - id: a\n    generated_images:\n      - img/a.png\n      - path: img/b.png\n",
/// ).unwrap();
/// assert_eq!(collect_generated_images(&spec), vec!["img/a.png", "img/b.png"]);
/// ```
pub fn collect_generated_images(node: &Value) -> Vec<String> {
    match node {
        Value::Mapping(map) => map
            .iter()
            .flat_map(|(key, value)| {
                if key.as_str() == Some(GENERATED_IMAGES_KEY) {
                    image_entries(value)
                } else {
                    collect_generated_images(value)
                }
            })
            .collect(),
        Value::Sequence(items) => items.iter().flat_map(collect_generated_images).collect(),
        Value::Tagged(tagged) => collect_generated_images(&tagged.value),
        _ => Vec::new(),
    }
}

fn image_entries(value: &Value) -> Vec<String> {
    let Value::Sequence(items) = value else {
        return Vec::new();
    };
    items
        .iter()
        .flat_map(|item| match item {
            Value::String(path) => vec![path.clone()],
            Value::Mapping(map) => IMAGE_PATH_FIELDS
                .iter()
                .filter_map(|field| map.get(*field).and_then(Value::as_str))
                .map(str::to_string)
                .collect(),
            _ => Vec::new(),
        })
        .collect()
}
