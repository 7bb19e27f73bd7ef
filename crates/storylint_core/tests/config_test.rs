use std::fs;
use storylint_core::{Provider, StorylintConfig};
use tempfile::TempDir;

#[test]
fn explicit_file_resolves_against_its_directory() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("storylint.toml");
    fs::write(
        &path,
        r#"
chapters_dir = "book/chapters"
runs_dir = "out"

[generation]
provider = "openai"
retries = 4
"#,
    )
    .unwrap();

    let config = StorylintConfig::load(Some(&path)).unwrap();

    let root = std::path::absolute(dir.path()).unwrap();
    assert_eq!(config.chapters_dir(), &root.join("book/chapters"));
    assert_eq!(config.runs_dir(), &root.join("out"));
    assert_eq!(config.characters_dir(), &root.join("characters"));
    assert_eq!(*config.generation().provider(), Provider::Openai);
    assert_eq!(*config.generation().retries(), 4);
    assert_eq!(*config.generation().backoff_unit_ms(), 1000);
}

#[test]
fn missing_explicit_file_is_an_error() {
    let dir = TempDir::new().unwrap();
    let result = StorylintConfig::load(Some(&dir.path().join("absent.toml")));
    assert!(result.is_err());
}

#[test]
fn unknown_section_keys_are_rejected() {
    let dir = TempDir::new().unwrap();
    let result = StorylintConfig::from_toml("[prompt]\nmax_scenes = 3\n", dir.path());
    assert!(result.is_err());
}
