//! One report generator per stage.

use std::sync::Arc;
use storylint_core::{GenerationConfig, StorylintConfig};
use storylint_error::StorylintResult;
use storylint_interface::TextGenerator;
use storylint_models::{ReportGenerator, build_generator, request_quota};

type SharedGenerator = ReportGenerator<Arc<dyn TextGenerator>>;

/// Report generators for the chapter, adjacent, arc and synthesis stages.
#[derive(Clone)]
pub struct StageGenerators {
    pub(crate) chapter: SharedGenerator,
    pub(crate) adjacent: SharedGenerator,
    pub(crate) arc: SharedGenerator,
    pub(crate) synthesis: SharedGenerator,
}

impl StageGenerators {
    /// Separate backends per stage, sharing one retry policy.
    pub fn new(
        chapter: Arc<dyn TextGenerator>,
        adjacent: Arc<dyn TextGenerator>,
        arc: Arc<dyn TextGenerator>,
        synthesis: Arc<dyn TextGenerator>,
        retry: &GenerationConfig,
    ) -> Self {
        Self {
            chapter: ReportGenerator::from_config(chapter, retry),
            adjacent: ReportGenerator::from_config(adjacent, retry),
            arc: ReportGenerator::from_config(arc, retry),
            synthesis: ReportGenerator::from_config(synthesis, retry),
        }
    }

    /// One backend for every stage.
    pub fn uniform(generator: Arc<dyn TextGenerator>, retry: &GenerationConfig) -> Self {
        Self::new(
            generator.clone(),
            generator.clone(),
            generator.clone(),
            generator,
            retry,
        )
    }

    /// Build the configured backend for each stage's model. `model_override`
    /// replaces every stage's model. All stages draw from one
    /// requests-per-minute quota.
    ///
    /// # Errors
    ///
    /// Returns an error if a backend cannot be constructed, for example when
    /// its API key is missing.
    pub fn from_config(config: &StorylintConfig, model_override: Option<&str>) -> StorylintResult<Self> {
        let models = config.models();
        let generation = config.generation();
        let quota = request_quota(generation);
        let build = |configured: &str| {
            build_generator(generation, model_override.unwrap_or(configured), quota.as_ref())
        };

        Ok(Self::new(
            build(models.chapter_audit())?,
            build(models.adjacent_flow())?,
            build(models.arc_window())?,
            build(models.synthesis())?,
            generation,
        ))
    }
}

impl std::fmt::Debug for StageGenerators {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let describe = |g: &SharedGenerator| {
            format!("{}/{}", g.generator().provider_name(), g.generator().model_name())
        };
        f.debug_struct("StageGenerators")
            .field("chapter", &describe(&self.chapter))
            .field("adjacent", &describe(&self.adjacent))
            .field("arc", &describe(&self.arc))
            .field("synthesis", &describe(&self.synthesis))
            .finish()
    }
}
