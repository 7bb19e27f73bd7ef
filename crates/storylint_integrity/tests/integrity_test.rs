use std::fs;
use std::path::PathBuf;
use storylint_core::{CanonKind, Issue, IssueType, MarkerConfig, Severity};
use storylint_integrity::{CanonLoader, IntegrityValidator, ProjectLayout};
use storylint_parser::parse_chapter_file;
use tempfile::TempDir;

struct Project {
    _dir: TempDir,
    root: PathBuf,
}

impl Project {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let root = dir.path().to_path_buf();
        Self { _dir: dir, root }
    }

    fn write(&self, relative: &str, contents: &str) {
        let path = self.root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    fn layout(&self) -> ProjectLayout {
        ProjectLayout::new(
            self.root.clone(),
            self.root.join("characters"),
            self.root.join("locations"),
            Some(self.root.join("art")),
            vec!["imagery.yaml".to_string()],
            40,
        )
    }
}

fn finding<'a>(findings: &'a [Issue], evidence: &str) -> &'a Issue {
    findings
        .iter()
        .find(|issue| issue.evidence_refs == vec![evidence.to_string()])
        .unwrap_or_else(|| panic!("no finding for {}", evidence))
}

const CHAPTER: &str = "\
# Landfall
<!-- SCENE-START id:scn-01 location:harbor characters:[\"mara\",\"tam\",\"ghost\"] images:[\"dock.png\",\"art-only.png\",\"missing.png\"] -->
Mara stepped onto the dock.
<!-- SCENE-END -->
<!-- SCENE-START id:scn-02 location:harbor characters:[\"ghost\"] images:[\"shared/map.png\"] -->
Again.
<!-- SCENE-END -->
";

fn setup() -> Project {
    let project = Project::new();
    project.write("chapters/ch01/content.md", CHAPTER);
    project.write("chapters/ch01/images/dock.png", "png");
    project.write("art/ch01/art-only.png", "png");
    project.write("shared/map.png", "png");
    project.write("characters/mara/profile.md", "# Mara\n\nA **stubborn** harbor pilot who never leaves port without her compass.");
    project.write("characters/tam/notes.txt", "not markdown");
    project.write(
        "chapters/ch01/imagery.yaml",
        "scenes:\n  scn-01:\n    generated_images:\n      - shared/map.png\n      - path: gen/missing.png\n",
    );
    project
}

#[test]
fn reports_slug_and_image_findings_with_severities() {
    let project = setup();
    let chapter = parse_chapter_file(
        &project.root.join("chapters/ch01/content.md"),
        &MarkerConfig::default(),
    )
    .unwrap();

    let findings = IntegrityValidator::new(project.layout()).validate(&chapter);

    let ghost = finding(&findings, "ghost");
    assert_eq!(ghost.issue_type, IssueType::Slug);
    assert_eq!(ghost.severity, Severity::Major);
    assert_eq!(ghost.location, "ch01:scn-01");

    assert_eq!(finding(&findings, "tam").severity, Severity::Moderate);
    assert_eq!(finding(&findings, "harbor").severity, Severity::Major);

    let missing = finding(&findings, "missing.png");
    assert_eq!(missing.issue_type, IssueType::Imagery);
    assert_eq!(missing.severity, Severity::Moderate);

    let generated = finding(&findings, "gen/missing.png");
    assert_eq!(generated.severity, Severity::Minor);
    assert_eq!(generated.location, "ch01:imagery.yaml");

    // ghost, tam, harbor (once each), missing.png, gen/missing.png
    assert_eq!(findings.len(), 5);
}

#[test]
fn unreadable_imagery_spec_is_treated_as_empty() {
    let project = setup();
    project.write("chapters/ch01/imagery.yaml", "generated_images: [unclosed");
    let chapter = parse_chapter_file(
        &project.root.join("chapters/ch01/content.md"),
        &MarkerConfig::default(),
    )
    .unwrap();
    let findings = IntegrityValidator::new(project.layout()).validate_imagery(&chapter);
    assert_eq!(findings.len(), 1);
}

#[test]
fn canon_snapshots_prefer_priority_files_and_truncate() {
    let project = setup();
    project.write("characters/mara/background.md", "Secondary.");
    project.write("locations/harbor/zz.md", "Z");
    project.write("locations/harbor/aa.md", "# Harbor\nSalt and tar.");
    let loader = CanonLoader::new(project.layout());

    let mara = loader.snapshot("mara", CanonKind::Character);
    assert!(*mara.exists());
    assert_eq!(
        mara.source_file().as_deref(),
        Some(project.root.join("characters/mara/profile.md").as_path())
    );
    assert_eq!(mara.truncated_text().chars().count(), 40);
    assert!(mara.truncated_text().starts_with("Mara A stubborn harbor pilot"));
    assert!(mara.truncated_text().ends_with("..."));

    let harbor = loader.snapshot("harbor", CanonKind::Location);
    assert_eq!(harbor.truncated_text(), "Harbor Salt and tar.");

    let tam = loader.snapshot("tam", CanonKind::Character);
    assert!(*tam.exists());
    assert!(tam.source_file().is_none());

    let ghost = loader.snapshot("ghost", CanonKind::Character);
    assert!(!*ghost.exists());
    assert_eq!(ghost.truncated_text(), "");
}

#[test]
fn canon_map_is_keyed_by_slug() {
    let project = setup();
    let slugs = vec!["tam".to_string(), "mara".to_string(), String::new()];
    let snapshots = CanonLoader::new(project.layout()).characters(&slugs);
    let keys: Vec<&String> = snapshots.keys().collect();
    assert_eq!(keys, vec!["mara", "tam"]);
}
