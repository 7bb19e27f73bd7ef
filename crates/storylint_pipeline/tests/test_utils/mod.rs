//! Fixture manuscript and counting generators for pipeline tests.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use storylint_core::{ReportKind, StorylintConfig};
use storylint_error::StorylintResult;
use storylint_interface::{GenerationRequest, TextGenerator};
use storylint_models::MockGenerator;
use storylint_pipeline::{Pipeline, StageGenerators};
use tempfile::TempDir;

/// Mock backend that answers `"no json here"` to chapter audits of one slug.
#[derive(Debug)]
pub struct CountingGenerator {
    inner: MockGenerator,
    fail_chapter: Option<String>,
    calls: AtomicUsize,
}

impl CountingGenerator {
    pub fn new() -> Self {
        Self {
            inner: MockGenerator::new("counting"),
            fail_chapter: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing_chapter(slug: &str) -> Self {
        Self {
            fail_chapter: Some(slug.to_string()),
            ..Self::new()
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TextGenerator for CountingGenerator {
    async fn generate(&self, request: &GenerationRequest) -> StorylintResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(slug) = &self.fail_chapter {
            let marker = format!("\"slug\": \"{}\"", slug);
            if *request.kind() == ReportKind::Chapter && request.prompt().contains(&marker) {
                return Ok("no json here".to_string());
            }
        }
        self.inner.generate(request).await
    }

    fn provider_name(&self) -> &'static str {
        "counting"
    }

    fn model_name(&self) -> &str {
        "counting-model"
    }
}

/// Mock backend that records the peak number of concurrent calls of one
/// report kind. Each call holds its slot for `hold`.
#[derive(Debug)]
pub struct GaugedGenerator {
    inner: MockGenerator,
    kind: ReportKind,
    hold: Duration,
    in_flight: AtomicUsize,
    peak: AtomicUsize,
}

impl GaugedGenerator {
    pub fn new(kind: ReportKind, hold: Duration) -> Self {
        Self {
            inner: MockGenerator::new("gauged"),
            kind,
            hold,
            in_flight: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
        }
    }

    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TextGenerator for GaugedGenerator {
    async fn generate(&self, request: &GenerationRequest) -> StorylintResult<String> {
        if *request.kind() != self.kind {
            return self.inner.generate(request).await;
        }
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        tokio::time::sleep(self.hold).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        self.inner.generate(request).await
    }

    fn provider_name(&self) -> &'static str {
        "gauged"
    }

    fn model_name(&self) -> &str {
        "gauged-model"
    }
}

/// Temporary manuscript with numbered chapters and a small canon.
pub struct Project {
    pub dir: TempDir,
}

impl Project {
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        std::fs::create_dir_all(root.join("chapters")).unwrap();
        std::fs::create_dir_all(root.join("characters/mara")).unwrap();
        std::fs::write(root.join("characters/mara/profile.md"), "# Mara\n\nA harbor pilot.\n").unwrap();
        std::fs::create_dir_all(root.join("locations/harbor")).unwrap();
        std::fs::write(root.join("locations/harbor/overview.md"), "# Harbor\n\nFog and rope.\n").unwrap();
        Self { dir }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Write a well-formed chapter whose only scene features `characters`.
    pub fn chapter(&self, slug: &str, characters: &[&str]) -> PathBuf {
        let list = characters
            .iter()
            .map(|c| format!("\"{}\"", c))
            .collect::<Vec<_>>()
            .join(",");
        let text = format!(
            "# Chapter {slug}\n\n\
<!-- SCENE-START id:scn-{slug}-01 title:\"Arrival\" location:\"harbor\" characters:[{list}] -->\n\
The ferry docks in fog.\n\
\n\
Mara counts the lines twice.\n\
<!-- SCENE-END id:scn-{slug}-01 -->\n"
        );
        self.write_chapter(slug, &text)
    }

    pub fn write_chapter(&self, slug: &str, text: &str) -> PathBuf {
        let dir = self.root().join("chapters").join(slug);
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("content.md");
        std::fs::write(&path, text).unwrap();
        path
    }

    /// Fast-failing generation settings with `extra` TOML appended.
    pub fn config_with(&self, extra: &str) -> StorylintConfig {
        let toml = format!("[generation]\nretries = 0\nbackoff_unit_ms = 1\n{}", extra);
        StorylintConfig::from_toml(&toml, self.root()).unwrap()
    }

    pub fn pipeline(&self, generator: Arc<CountingGenerator>) -> Pipeline {
        self.pipeline_with(generator, "")
    }

    pub fn pipeline_with(&self, generator: Arc<dyn TextGenerator>, extra: &str) -> Pipeline {
        let config = self.config_with(extra);
        let generators = StageGenerators::uniform(generator, config.generation());
        Pipeline::new(config, generators)
    }

    pub fn run_dir(&self, run_id: &str) -> PathBuf {
        self.root().join("runs").join(run_id)
    }
}
