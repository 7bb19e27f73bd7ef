//! Layered configuration.
//!
//! Sources, lowest precedence first:
//! - Bundled defaults (include_str! from storylint.toml)
//! - The project file: an explicit path, or the first `storylint.toml`
//!   found walking up from the working directory
//! - `STORYLINT_*` environment variables, `__` separating nested keys
//!   (`STORYLINT_GENERATION__RETRIES=4`)

use config::{Config, Environment, File, FileFormat};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use storylint_error::{ConfigError, StorylintResult};
use tracing::debug;

/// File name searched for when no explicit config path is given.
pub const CONFIG_FILE_NAME: &str = "storylint.toml";

const DEFAULT_CONFIG: &str = include_str!("../../../storylint.toml");

/// Scene markup tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
#[serde(deny_unknown_fields)]
pub struct MarkerConfig {
    scene_start: String,
    scene_end: String,
    closer: String,
}

impl Default for MarkerConfig {
    fn default() -> Self {
        Self {
            scene_start: "<!-- SCENE-START".to_string(),
            scene_end: "<!-- SCENE-END".to_string(),
            closer: "-->".to_string(),
        }
    }
}

/// Limits on how much chapter text reaches a prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters, derive_setters::Setters)]
#[serde(deny_unknown_fields)]
#[setters(prefix = "with_")]
pub struct PromptConfig {
    /// Characters kept per paragraph.
    max_scene_chars: usize,
    /// Paragraphs kept per scene.
    max_paragraphs: usize,
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self {
            max_scene_chars: 4000,
            max_paragraphs: 60,
        }
    }
}

/// Maximum in-flight generator calls per stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters, derive_setters::Setters)]
#[serde(deny_unknown_fields)]
#[setters(prefix = "with_")]
pub struct ConcurrencyConfig {
    chapter_audit: usize,
    adjacent: usize,
    arc: usize,
}

impl Default for ConcurrencyConfig {
    fn default() -> Self {
        Self {
            chapter_audit: 6,
            adjacent: 6,
            arc: 3,
        }
    }
}

/// Report generation backend.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Provider {
    /// Canned, schema-valid responses. No network.
    #[default]
    Mock,
    /// Google Gemini `generateContent`
    Gemini,
    /// OpenAI-compatible chat completions
    Openai,
}

/// Retry, timeout and throttling settings for generator calls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters, derive_setters::Setters)]
#[serde(deny_unknown_fields)]
#[setters(prefix = "with_")]
pub struct GenerationConfig {
    provider: Provider,
    /// Retries after the first attempt.
    retries: usize,
    /// Delay before the first retry; doubles on each further retry.
    backoff_unit_ms: u64,
    timeout_secs: u64,
    temperature: f32,
    /// Client-side throttle. Zero disables it.
    requests_per_minute: u32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            provider: Provider::Mock,
            retries: 2,
            backoff_unit_ms: 1000,
            timeout_secs: 120,
            temperature: 0.2,
            requests_per_minute: 0,
        }
    }
}

/// Model identifier per stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
#[serde(deny_unknown_fields)]
pub struct ModelConfig {
    chapter_audit: String,
    adjacent_flow: String,
    arc_window: String,
    synthesis: String,
}

impl ModelConfig {
    /// Use one model for every stage.
    pub fn uniform(model: impl Into<String>) -> Self {
        let model = model.into();
        Self {
            chapter_audit: model.clone(),
            adjacent_flow: model.clone(),
            arc_window: model.clone(),
            synthesis: model,
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            chapter_audit: "gemini-2.5-flash".to_string(),
            adjacent_flow: "gemini-2.5-flash".to_string(),
            arc_window: "gemini-2.5-pro".to_string(),
            synthesis: "gemini-2.5-pro".to_string(),
        }
    }
}

/// Dashboard bounds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
#[serde(deny_unknown_fields)]
pub struct DashboardConfig {
    top_chapters: usize,
    recent_errors: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            top_chapters: 5,
            recent_errors: 6,
        }
    }
}

/// Resolved Storylint configuration.
///
/// After [`StorylintConfig::load`] every directory is absolute.
///
/// # Examples
///
/// ```no_run
/// use storylint_core::StorylintConfig;
///
/// let config = StorylintConfig::load(None)?;
/// println!("chapters under {}", config.chapters_dir().display());
/// # Ok::<(), storylint_error::StorylintError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters, derive_setters::Setters)]
#[setters(prefix = "with_")]
pub struct StorylintConfig {
    #[serde(default)]
    project_root: Option<PathBuf>,
    chapters_dir: PathBuf,
    characters_dir: PathBuf,
    locations_dir: PathBuf,
    #[serde(default)]
    images_dir: Option<PathBuf>,
    runs_dir: PathBuf,
    chapter_filename: String,
    imagery_filenames: Vec<String>,
    canon_snapshot_chars: usize,
    #[serde(default)]
    markers: MarkerConfig,
    #[serde(default)]
    prompt: PromptConfig,
    #[serde(default)]
    concurrency: ConcurrencyConfig,
    #[serde(default)]
    generation: GenerationConfig,
    #[serde(default)]
    models: ModelConfig,
    #[serde(default)]
    dashboard: DashboardConfig,
    /// File the project settings came from, if any.
    #[serde(skip)]
    config_path: Option<PathBuf>,
}

impl StorylintConfig {
    /// Load configuration.
    ///
    /// With `explicit`, that file must exist. Otherwise the nearest
    /// `storylint.toml` above the working directory is used when present,
    /// and bundled defaults alone when not.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if a source cannot be read or the merged
    /// values do not deserialize.
    pub fn load(explicit: Option<&Path>) -> StorylintResult<Self> {
        let cwd = std::env::current_dir()
            .map_err(|e| ConfigError::new(format!("Cannot read working directory: {}", e)))?;
        let path = match explicit {
            Some(path) => Some(path.to_path_buf()),
            None => find_config(&cwd),
        };
        debug!(config = ?path, "Loading configuration");

        let mut builder =
            Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml));
        if let Some(path) = &path {
            builder = builder.add_source(File::from(path.as_path()).required(true));
        }
        builder = builder.add_source(
            Environment::with_prefix("STORYLINT")
                .separator("__")
                .try_parsing(true),
        );

        let config: Self = builder
            .build()
            .map_err(|e| ConfigError::new(format!("Failed to build configuration: {}", e)))?
            .try_deserialize()
            .map_err(|e| ConfigError::new(format!("Failed to parse configuration: {}", e)))?;

        let config_path = match path {
            Some(p) => Some(absolute(&p)?),
            None => None,
        };
        config.with_config_path(config_path).resolve_paths(&cwd)
    }

    /// Parse a TOML document layered over the bundled defaults.
    ///
    /// Relative paths resolve against `project_root`, else `base`.
    pub fn from_toml(toml: &str, base: &Path) -> StorylintResult<Self> {
        let config: Self = Config::builder()
            .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()
            .map_err(|e| ConfigError::new(format!("Failed to build configuration: {}", e)))?
            .try_deserialize()
            .map_err(|e| ConfigError::new(format!("Failed to parse configuration: {}", e)))?;
        config.resolve_paths(base)
    }

    fn resolve_paths(mut self, cwd: &Path) -> StorylintResult<Self> {
        let fallback = self
            .config_path
            .as_ref()
            .and_then(|p| p.parent().map(Path::to_path_buf))
            .unwrap_or_else(|| cwd.to_path_buf());
        let root = match &self.project_root {
            Some(root) => absolute(&resolve(root, &fallback))?,
            None => absolute(&fallback)?,
        };

        self.chapters_dir = resolve(&self.chapters_dir, &root);
        self.characters_dir = resolve(&self.characters_dir, &root);
        self.locations_dir = resolve(&self.locations_dir, &root);
        self.images_dir = self.images_dir.as_ref().map(|p| resolve(p, &root));
        self.runs_dir = resolve(&self.runs_dir, &root);
        self.project_root = Some(root);
        Ok(self)
    }

    /// Absolute project root.
    pub fn root(&self) -> &Path {
        self.project_root.as_deref().unwrap_or(Path::new("."))
    }
}

fn resolve(path: &Path, base: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

fn absolute(path: &Path) -> StorylintResult<PathBuf> {
    std::path::absolute(path).map_err(|e| {
        ConfigError::new(format!("Cannot resolve {}: {}", path.display(), e)).into()
    })
}

/// Walk up from `start` looking for `storylint.toml`.
pub fn find_config(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .find(|candidate| candidate.is_file())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_defaults_parse() {
        let config = StorylintConfig::from_toml("", Path::new("/srv/novel")).unwrap();
        assert_eq!(config.chapter_filename(), "content.md");
        assert_eq!(*config.concurrency().arc(), 3);
        assert_eq!(*config.generation().retries(), 2);
        assert_eq!(config.markers().scene_start(), "<!-- SCENE-START");
        assert_eq!(config.chapters_dir(), Path::new("/srv/novel/chapters"));
    }

    #[test]
    fn project_root_overrides_base() {
        let toml = r#"
project_root = "/data/book"
chapters_dir = "story/chapters"
images_dir = "/assets/img"
"#;
        let config = StorylintConfig::from_toml(toml, Path::new("/elsewhere")).unwrap();
        assert_eq!(config.root(), Path::new("/data/book"));
        assert_eq!(config.chapters_dir(), Path::new("/data/book/story/chapters"));
        assert_eq!(config.images_dir().as_deref(), Some(Path::new("/assets/img")));
    }

    #[test]
    fn uniform_models() {
        let models = ModelConfig::uniform("local-7b");
        assert_eq!(models.arc_window(), "local-7b");
        assert_eq!(models.synthesis(), "local-7b");
    }
}
