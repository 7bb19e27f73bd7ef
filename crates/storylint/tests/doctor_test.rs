use storylint::{DoctorReport, StorylintConfig};
use tempfile::TempDir;

#[test]
fn healthy_project_counts_chapters() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    for sub in ["chapters/ch01", "chapters/ch02", "characters", "locations"] {
        std::fs::create_dir_all(root.join(sub)).unwrap();
    }
    std::fs::write(root.join("chapters/ch01/content.md"), "# One\n").unwrap();
    std::fs::write(root.join("chapters/ch02/content.md"), "# Two\n").unwrap();

    let config = StorylintConfig::from_toml("", root).unwrap();
    let report = DoctorReport::inspect(&config);

    assert!(report.is_healthy(), "warnings: {:?}", report.warnings());
    assert!(report.messages().iter().any(|m| m == "Chapters found: 2"));
    assert!(report.messages().iter().any(|m| m == "Provider: mock"));
}

#[test]
fn missing_directories_are_warnings() {
    let dir = TempDir::new().unwrap();
    let toml = "images_dir = \"art\"\n";
    let config = StorylintConfig::from_toml(toml, dir.path()).unwrap();
    let report = DoctorReport::inspect(&config);

    assert!(!report.is_healthy());
    let warnings = report.warnings().join("\n");
    assert!(warnings.contains("Chapters directory missing"));
    assert!(warnings.contains("Characters directory missing"));
    assert!(warnings.contains("Images directory missing"));
    assert!(warnings.contains("Chapter discovery failed"));
}
