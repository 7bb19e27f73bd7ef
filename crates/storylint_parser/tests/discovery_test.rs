use std::fs;
use storylint_core::MarkerConfig;
use storylint_parser::{ChapterPlan, discover_chapters, parse_chapter_file};
use tempfile::TempDir;

fn write_chapter(root: &std::path::Path, slug: &str, body: &str) {
    let dir = root.join(slug);
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("content.md"), body).unwrap();
}

#[test]
fn discovers_and_orders_chapters() {
    let dir = TempDir::new().unwrap();
    for slug in ["ch10", "ch2", "ch1"] {
        write_chapter(dir.path(), slug, "# Title\n");
    }
    write_chapter(&dir.path().join(".drafts"), "ch0", "# Hidden\n");
    fs::write(dir.path().join("ch1").join("notes.md"), "ignored").unwrap();

    let paths = discover_chapters(dir.path(), "content.md").unwrap();
    assert_eq!(paths.len(), 3);

    let plan = ChapterPlan::from_paths(&paths);
    assert_eq!(plan.slugs(), vec!["ch1", "ch2", "ch10"]);
}

#[test]
fn missing_root_is_an_error() {
    let dir = TempDir::new().unwrap();
    assert!(discover_chapters(&dir.path().join("nope"), "content.md").is_err());
}

#[test]
fn chapter_file_slug_is_directory_name() {
    let dir = TempDir::new().unwrap();
    write_chapter(
        dir.path(),
        "ch04-the-storm",
        "# The Storm\n<!-- SCENE-START id:scn-04-01 images:storm.png -->\nRain.\n<!-- SCENE-END -->\n",
    );
    let chapter = parse_chapter_file(
        &dir.path().join("ch04-the-storm").join("content.md"),
        &MarkerConfig::default(),
    )
    .unwrap();
    assert_eq!(chapter.slug(), "ch04-the-storm");
    assert_eq!(chapter.scenes()[0].meta().images(), &vec!["storm.png".to_string()]);
}
