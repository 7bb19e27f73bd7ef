//! Strict report adapter around a text generator.

use crate::{extract_json, merge_defaults};
use serde_json::{Map, Value};
use std::time::Duration;
use storylint_core::{AuditReport, GenerationConfig};
use storylint_error::{GenerationError, GenerationErrorKind, StorylintError, StorylintResult};
use storylint_interface::{GenerationRequest, TextGenerator};
use tokio_retry2::{Retry, RetryError};
use tracing::{debug, instrument, warn};

/// Delays between attempts: `unit`, `2·unit`, `4·unit`, … for `retries` retries.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use storylint_models::backoff_delays;
///
/// let delays: Vec<_> = backoff_delays(Duration::from_secs(1), 3).collect();
/// assert_eq!(delays, vec![Duration::from_secs(1), Duration::from_secs(2), Duration::from_secs(4)]);
/// ```
pub fn backoff_delays(unit: Duration, retries: usize) -> impl Iterator<Item = Duration> {
    std::iter::successors(Some(unit), |delay| delay.checked_mul(2)).take(retries)
}

/// Turns raw generator text into a validated [`AuditReport`].
///
/// Each attempt calls the generator, extracts the JSON object, fills
/// defaults and decodes strictly. Transport, decoding and schema failures
/// consume a retry; a response with no JSON object at all fails at once.
/// Stateless apart from configuration, so one instance serves concurrent
/// callers.
#[derive(Debug, Clone)]
pub struct ReportGenerator<G> {
    generator: G,
    retries: usize,
    backoff_unit: Duration,
}

impl<G: TextGenerator> ReportGenerator<G> {
    /// Wrap `generator` with a retry budget and backoff unit.
    pub fn new(generator: G, retries: usize, backoff_unit: Duration) -> Self {
        Self {
            generator,
            retries,
            backoff_unit,
        }
    }

    /// Wrap `generator` using the retry settings of a generation config.
    pub fn from_config(generator: G, config: &GenerationConfig) -> Self {
        Self::new(
            generator,
            *config.retries(),
            Duration::from_millis(*config.backoff_unit_ms()),
        )
    }

    /// The wrapped generator.
    pub fn generator(&self) -> &G {
        &self.generator
    }

    /// Generate and validate one report.
    ///
    /// `defaults` supplies fields the generator leaves out; fields it does
    /// provide are kept.
    ///
    /// # Errors
    ///
    /// The permanent error unchanged when one occurs, otherwise
    /// [`GenerationErrorKind::Exhausted`] carrying the last failure once
    /// every retry is spent.
    #[instrument(
        skip_all,
        fields(
            kind = %request.kind(),
            provider = self.generator.provider_name(),
            model = self.generator.model_name(),
        )
    )]
    pub async fn generate(
        &self,
        request: &GenerationRequest,
        defaults: &Map<String, Value>,
    ) -> StorylintResult<AuditReport> {
        let mut attempts = 0usize;
        let result = Retry::spawn(backoff_delays(self.backoff_unit, self.retries), || {
            attempts += 1;
            let attempt = attempts;
            async move {
                match self.attempt(request, defaults).await {
                    Ok(report) => {
                        debug!(attempt, "Report validated");
                        Ok(report)
                    }
                    Err(e) if e.is_retryable() => {
                        warn!(attempt, error = %e, "Transient report failure, will retry");
                        Err(RetryError::Transient {
                            err: e,
                            retry_after: None,
                        })
                    }
                    Err(e) => {
                        warn!(attempt, error = %e, "Permanent report failure, failing immediately");
                        Err(RetryError::Permanent(e))
                    }
                }
            }
        })
        .await;

        result.map_err(|e: StorylintError| {
            if e.is_retryable() {
                GenerationError::new(GenerationErrorKind::Exhausted {
                    attempts,
                    last: e.to_string(),
                })
                .into()
            } else {
                e
            }
        })
    }

    async fn attempt(
        &self,
        request: &GenerationRequest,
        defaults: &Map<String, Value>,
    ) -> StorylintResult<AuditReport> {
        let text = self.generator.generate(request).await?;
        let kind = *request.kind();
        let value = merge_defaults(&kind.to_string(), extract_json(&text)?, defaults)?;
        AuditReport::decode(kind, value)
    }
}
