//! The run driver.

use crate::context::{canon_payload, chapter_payload, chapter_summary};
use crate::render::{dashboard_markdown, report_markdown};
use crate::state::{ItemStatus, RunState, Stage};
use crate::{RunMode, RunOptions, RunOutcome, StageGenerators, prompts};
use futures::future::join_all;
use serde_json::{Map, Value, json};
use std::future::Future;
use std::path::Path;
use storylint_core::{
    AuditReport, Chapter, DashboardConfig, DashboardSummary, ReportKind, StorylintConfig,
};
use storylint_error::{PipelineError, PipelineErrorKind, StorylintError, StorylintResult};
use storylint_integrity::{CanonLoader, IntegrityValidator, ProjectLayout};
use storylint_models::ReportGenerator;
use storylint_parser::{ChapterPlan, ChapterRef, discover_chapters, parse_chapter_file, windows};
use storylint_storage::{
    ArtifactDir, ArtifactKey, ArtifactStore, RunIndex, compute_dashboard, new_run_id,
};
use storylint_interface::TextGenerator;
use tokio::sync::Semaphore;
use tracing::{debug, info, instrument, warn};

/// Drives chapter, adjacent, arc and synthesis audits over a manuscript.
///
/// # Examples
///
/// ```no_run
/// use storylint_core::StorylintConfig;
/// use storylint_pipeline::{Pipeline, RunOptions};
///
/// # async fn example() -> storylint_error::StorylintResult<()> {
/// let config = StorylintConfig::load(None)?;
/// let pipeline = Pipeline::from_config(config, None)?;
/// let outcome = pipeline.run(&RunOptions::default()).await?;
/// println!("{} failed items", outcome.failed_items().len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Pipeline {
    config: StorylintConfig,
    generators: StageGenerators,
    canon: CanonLoader,
    validator: IntegrityValidator,
}

impl Pipeline {
    /// Pipeline over `config` using the given stage generators.
    pub fn new(config: StorylintConfig, generators: StageGenerators) -> Self {
        let layout = ProjectLayout::from(&config);
        Self {
            canon: CanonLoader::new(layout.clone()),
            validator: IntegrityValidator::new(layout),
            config,
            generators,
        }
    }

    /// Pipeline with the configured backends; `model_override` applies to
    /// every stage.
    ///
    /// # Errors
    ///
    /// Returns an error if a backend cannot be constructed.
    pub fn from_config(config: StorylintConfig, model_override: Option<&str>) -> StorylintResult<Self> {
        let generators = StageGenerators::from_config(&config, model_override)?;
        Ok(Self::new(config, generators))
    }

    /// The resolved configuration.
    pub fn config(&self) -> &StorylintConfig {
        &self.config
    }

    /// Discover, order and slice chapters under the chapters directory.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the chapters directory is missing.
    pub fn plan(&self, start: Option<&str>, end: Option<&str>) -> StorylintResult<ChapterPlan> {
        let files = discover_chapters(self.config.chapters_dir(), self.config.chapter_filename())?;
        Ok(ChapterPlan::from_paths(files).slice(start, end))
    }

    /// Run every stage the options select.
    ///
    /// Item failures do not make this return `Err`; they are listed in the
    /// outcome. Use [`RunOutcome::into_result`] to treat them as an error.
    ///
    /// # Errors
    ///
    /// Returns an error if no chapters are selected or the run directory,
    /// config snapshot or index cannot be written.
    #[instrument(skip_all, fields(mode = %options.mode(), window = options.window(), force = options.force()))]
    pub async fn run(&self, options: &RunOptions) -> StorylintResult<RunOutcome> {
        let plan = self.plan(options.start().as_deref(), options.end().as_deref())?;
        self.execute(plan, options).await
    }

    /// Audit a single chapter file: chapter stage, synthesis and dashboard.
    ///
    /// # Errors
    ///
    /// As for [`Pipeline::run`].
    #[instrument(skip(self, path), fields(path = %path.display()))]
    pub async fn audit_chapter(
        &self,
        path: &Path,
        run_id: Option<String>,
        force: bool,
    ) -> StorylintResult<RunOutcome> {
        let plan = ChapterPlan::new(vec![ChapterRef::from_path(path)]);
        let mut builder = RunOptions::builder();
        builder.mode(RunMode::ChaptersOnly).force(force);
        if let Some(run_id) = run_id {
            builder.run_id(run_id);
        }
        let options = builder.build().map_err(|e| {
            PipelineError::new(PipelineErrorKind::Stage {
                stage: "planning".to_string(),
                message: e.to_string(),
            })
        })?;
        self.execute(plan, &options).await
    }

    async fn execute(&self, plan: ChapterPlan, options: &RunOptions) -> StorylintResult<RunOutcome> {
        if plan.is_empty() {
            return Err(PipelineError::new(PipelineErrorKind::NoChaptersSelected(
                self.config.chapters_dir().display().to_string(),
            ))
            .into());
        }

        let run_id = options.run_id().clone().unwrap_or_else(new_run_id);
        let store = ArtifactStore::open(self.config.runs_dir(), &run_id).await?;
        let state = RunState::new(*self.config.dashboard().recent_errors());
        let mode = *options.mode();
        let force = *options.force();
        info!(run_id = %run_id, chapters = plan.len(), "Storylint run started");

        let chapters = self.parse_plan(&plan, &state);
        let scoped: Vec<&Chapter> = chapters.iter().collect();
        let pairs: Vec<(&Chapter, &Chapter)> = if mode.runs_adjacent() {
            scoped.windows(2).map(|pair| (pair[0], pair[1])).collect()
        } else {
            Vec::new()
        };
        let arcs: Vec<Vec<&Chapter>> = if mode.runs_arc() {
            windows(&scoped, *options.window())
        } else {
            Vec::new()
        };

        let index = RunIndex::new(
            &run_id,
            mode.to_string(),
            *options.window(),
            &chapters,
            pairs
                .iter()
                .map(|(l, r)| (l.slug().clone(), r.slug().clone()))
                .collect(),
            arcs.iter().map(|w| window_slug(w)).collect(),
        );
        store.write_json(&ArtifactKey::Config, &self.config).await?;
        store.write_json(&ArtifactKey::Index, &index).await?;

        let chapter_limit = stage_limit(*self.config.concurrency().chapter_audit());
        join_all(chapters.iter().map(|chapter| {
            self.run_item(
                &store,
                &state,
                Stage::Chapter,
                ArtifactKey::chapter(chapter.slug().as_str()),
                force,
                &chapter_limit,
                || self.audit_one_chapter(chapter),
            )
        }))
        .await;

        if !pairs.is_empty() {
            let adjacent_limit = stage_limit(*self.config.concurrency().adjacent());
            join_all(pairs.iter().map(|(left, right)| {
                self.run_item(
                    &store,
                    &state,
                    Stage::Adjacent,
                    ArtifactKey::adjacent(left.slug().as_str(), right.slug().as_str()),
                    force,
                    &adjacent_limit,
                    || self.audit_adjacent(left, right),
                )
            }))
            .await;
        }

        if !arcs.is_empty() {
            let arc_limit = stage_limit(*self.config.concurrency().arc());
            join_all(arcs.iter().map(|window| {
                self.run_item(
                    &store,
                    &state,
                    Stage::Arc,
                    ArtifactKey::arc(window_slug(window)),
                    force,
                    &arc_limit,
                    || self.audit_arc(window),
                )
            }))
            .await;
        }

        // A new chapter report invalidates the cached action plan.
        let chapters_changed = state.tally(Stage::Chapter).generated > 0;
        let synthesis_limit = stage_limit(1);
        self.run_item(
            &store,
            &state,
            Stage::Synthesis,
            ArtifactKey::ActionPlan,
            force || chapters_changed,
            &synthesis_limit,
            || self.synthesize(&store),
        )
        .await;

        let dashboard = write_dashboard(
            &store,
            &index,
            self.config.dashboard(),
            state.error_count(),
            &state.recent_errors(),
        )
        .await
            .unwrap_or_else(|e| {
                state.record_failure(Stage::Dashboard, "dashboard", &e);
                DashboardSummary {
                    run_id: run_id.clone(),
                    generated_at: String::new(),
                    mode: mode.to_string(),
                    window: *options.window(),
                    counts: Default::default(),
                    issues: Default::default(),
                    top_chapters: Vec::new(),
                    errors: state.recent_errors(),
                }
            });

        let failed = state.failed_items();
        if failed.is_empty() {
            info!(run_id = %run_id, "Storylint run completed");
        } else {
            warn!(run_id = %run_id, errors = failed.len(), "Storylint run completed with errors");
        }
        Ok(RunOutcome::new(
            run_id,
            store.run_dir().to_path_buf(),
            dashboard,
            failed,
            state.tallies(),
        ))
    }

    /// Parse every planned chapter, recording failures as `parse:<slug>`.
    fn parse_plan(&self, plan: &ChapterPlan, state: &RunState) -> Vec<Chapter> {
        plan.chapters()
            .iter()
            .filter_map(|chapter| match parse_chapter_file(chapter.path(), self.config.markers()) {
                Ok(parsed) => Some(parsed),
                Err(e) => {
                    state.record_failure(Stage::Parse, &format!("parse:{}", chapter.slug()), &e);
                    None
                }
            })
            .collect()
    }

    /// One work item: permit, cache check, generate, persist, record.
    #[allow(clippy::too_many_arguments)]
    async fn run_item<F, Fut>(
        &self,
        store: &ArtifactStore,
        state: &RunState,
        stage: Stage,
        key: ArtifactKey,
        force: bool,
        limit: &Semaphore,
        work: F,
    ) where
        F: FnOnce() -> Fut,
        Fut: Future<Output = StorylintResult<AuditReport>>,
    {
        let identity = key.identity();
        let _permit = match limit.acquire().await {
            Ok(permit) => permit,
            Err(e) => {
                let err: StorylintError = PipelineError::new(PipelineErrorKind::Stage {
                    stage: stage.to_string(),
                    message: e.to_string(),
                })
                .into();
                state.record_failure(stage, &identity, &err);
                return;
            }
        };

        if !force && store.exists(&key).await {
            debug!(item = %identity, "Artifact exists, skipping");
            state.record(stage, ItemStatus::Skipped);
            return;
        }

        let result = match work().await {
            Ok(report) => persist(store, &key, &report).await,
            Err(e) => Err(e),
        };
        match result {
            Ok(()) => {
                info!(stage = %stage, item = %identity, "Artifact written");
                state.record(stage, ItemStatus::Generated);
            }
            Err(e) => state.record_failure(stage, &identity, &e),
        }
    }

    #[instrument(skip_all, fields(chapter = %chapter.slug()))]
    async fn audit_one_chapter(&self, chapter: &Chapter) -> StorylintResult<AuditReport> {
        let findings = self.validator.validate(chapter);
        let context = json!({
            "chapter": chapter_payload(chapter, self.config.prompt()),
            "canon": canon_payload(&self.canon, [chapter]),
        });
        let defaults = defaults([
            ("chapterSlug", json!(chapter.slug())),
            ("integrityFindings", json!([])),
        ]);

        let report = generate(&self.generators.chapter, ReportKind::Chapter, &context, &defaults).await?;
        Ok(match report {
            AuditReport::Chapter(mut report) => {
                report.chapter_slug = chapter.slug().clone();
                report.integrity_findings = findings;
                AuditReport::Chapter(report)
            }
            other => other,
        })
    }

    #[instrument(skip_all, fields(left = %left.slug(), right = %right.slug()))]
    async fn audit_adjacent(&self, left: &Chapter, right: &Chapter) -> StorylintResult<AuditReport> {
        let context = json!({
            "left": chapter_payload(left, self.config.prompt()),
            "right": chapter_payload(right, self.config.prompt()),
            "canon": canon_payload(&self.canon, [left, right]),
        });
        let defaults = defaults([
            ("leftSlug", json!(left.slug())),
            ("rightSlug", json!(right.slug())),
        ]);
        generate(&self.generators.adjacent, ReportKind::Adjacent, &context, &defaults).await
    }

    #[instrument(skip_all, fields(window = %window_slug(window)))]
    async fn audit_arc(&self, window: &[&Chapter]) -> StorylintResult<AuditReport> {
        let context = json!({
            "window": window.iter().map(|chapter| chapter_summary(chapter)).collect::<Vec<_>>(),
            "canon": canon_payload(&self.canon, window.iter().copied()),
        });
        let defaults = defaults([("windowSlug", json!(window_slug(window)))]);
        generate(&self.generators.arc, ReportKind::Arc, &context, &defaults).await
    }

    /// Action plan over every chapter report on disk, including reports
    /// from earlier runs into the same directory.
    #[instrument(skip_all, fields(run_id = %store.run_id()))]
    async fn synthesize(&self, store: &ArtifactStore) -> StorylintResult<AuditReport> {
        let mut reports = Vec::new();
        for path in store.list_reports(ArtifactDir::Chapter).await? {
            let Some(slug) = path
                .file_name()
                .and_then(|n| n.to_str())
                .and_then(|n| n.strip_suffix(".report.json"))
            else {
                continue;
            };
            match store.read_json::<Value>(&ArtifactKey::chapter(slug)).await {
                Ok(report) => reports.push(report),
                Err(e) => warn!(chapter = slug, error = %e, "Skipping unreadable chapter report"),
            }
        }
        debug!(reports = reports.len(), "Synthesizing action plan");

        let context = json!({ "reports": reports });
        generate(&self.generators.synthesis, ReportKind::Synthesis, &context, &Map::new()).await
    }
}

/// Recompute and rewrite the dashboard of an existing run.
///
/// Error counts and messages are carried over from the run's previous
/// dashboard when one exists.
///
/// # Errors
///
/// Returns an error if the run's index cannot be read or the dashboard
/// cannot be written.
#[instrument(skip_all, fields(run_id = %store.run_id()))]
pub async fn refresh_dashboard(
    store: &ArtifactStore,
    config: &DashboardConfig,
) -> StorylintResult<DashboardSummary> {
    let index: RunIndex = store.read_json(&ArtifactKey::Index).await?;
    let (error_count, errors) = match store.read_json::<DashboardSummary>(&ArtifactKey::Dashboard).await {
        Ok(previous) => (previous.counts.errors, previous.errors),
        Err(e) => {
            debug!(error = %e, "No previous dashboard");
            (0, Vec::new())
        }
    };
    write_dashboard(store, &index, config, error_count, &errors).await
}

async fn write_dashboard(
    store: &ArtifactStore,
    index: &RunIndex,
    config: &DashboardConfig,
    error_count: usize,
    errors: &[String],
) -> StorylintResult<DashboardSummary> {
    let summary = compute_dashboard(store, index, config, error_count, errors).await;
    store.write_json(&ArtifactKey::Dashboard, &summary).await?;
    store
        .write_markdown(&ArtifactKey::Dashboard, &dashboard_markdown(&summary))
        .await?;
    Ok(summary)
}

async fn generate<G: TextGenerator>(
    generator: &ReportGenerator<G>,
    kind: ReportKind,
    context: &Value,
    defaults: &Map<String, Value>,
) -> StorylintResult<AuditReport> {
    let request = prompts::request(kind, context)?;
    generator.generate(&request, defaults).await
}

/// Markdown first: the JSON artifact doubles as the cache marker.
async fn persist(store: &ArtifactStore, key: &ArtifactKey, report: &AuditReport) -> StorylintResult<()> {
    store.write_markdown(key, &report_markdown(report)).await?;
    store.write_json(key, report).await?;
    Ok(())
}

/// Semaphore admitting at least one item.
fn stage_limit(permits: usize) -> Semaphore {
    Semaphore::new(permits.max(1))
}

fn defaults<const N: usize>(entries: [(&str, Value); N]) -> Map<String, Value> {
    entries
        .into_iter()
        .map(|(key, value)| (key.to_string(), value))
        .collect()
}

fn window_slug(window: &[&Chapter]) -> String {
    match (window.first(), window.last()) {
        (Some(first), Some(last)) => format!("{}-{}", first.slug(), last.slug()),
        _ => String::new(),
    }
}
