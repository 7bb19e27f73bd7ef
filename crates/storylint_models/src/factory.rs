//! Backend selection from configuration.

use crate::{GeminiGenerator, MockGenerator, OpenAiGenerator, RateLimitedGenerator, RequestQuota};
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;
use storylint_core::{GenerationConfig, Provider};
use storylint_error::StorylintResult;
use storylint_interface::TextGenerator;
use tracing::info;

/// The quota configured by `requests_per_minute`, or `None` when it is zero
/// or the provider is the offline mock.
pub fn request_quota(config: &GenerationConfig) -> Option<RequestQuota> {
    match config.provider() {
        Provider::Mock => None,
        Provider::Gemini | Provider::Openai => {
            NonZeroU32::new(*config.requests_per_minute()).map(RequestQuota::per_minute)
        }
    }
}

/// Build the configured backend for `model`, throttled by `quota` when one
/// is given.
///
/// Pass clones of one quota to every call that should share a budget.
///
/// # Errors
///
/// Returns an error if a hosted provider's API key is missing or its HTTP
/// client cannot be built.
pub fn build_generator(
    config: &GenerationConfig,
    model: &str,
    quota: Option<&RequestQuota>,
) -> StorylintResult<Arc<dyn TextGenerator>> {
    let timeout = Duration::from_secs(*config.timeout_secs());
    let temperature = *config.temperature();
    info!(
        provider = %config.provider(),
        model,
        rpm = ?quota.map(RequestQuota::requests_per_minute),
        "Building generator"
    );

    Ok(match config.provider() {
        Provider::Mock => Arc::new(MockGenerator::new(model)),
        Provider::Gemini => throttled(GeminiGenerator::from_env(model, temperature, timeout)?, quota),
        Provider::Openai => throttled(OpenAiGenerator::from_env(model, temperature, timeout)?, quota),
    })
}

/// Wrap `generator` in a [`RateLimitedGenerator`] when `quota` is set.
pub fn throttled<G>(generator: G, quota: Option<&RequestQuota>) -> Arc<dyn TextGenerator>
where
    G: TextGenerator + 'static,
{
    match quota {
        Some(quota) => Arc::new(RateLimitedGenerator::new(generator, quota.clone())),
        None => Arc::new(generator),
    }
}
