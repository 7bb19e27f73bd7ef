//! Client-side request throttling.

use async_trait::async_trait;
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use std::num::NonZeroU32;
use std::sync::Arc;
use storylint_error::StorylintResult;
use storylint_interface::{GenerationRequest, TextGenerator};
use tracing::trace;

type DirectRateLimiter = RateLimiter<NotKeyed, InMemoryState, DefaultClock>;

/// A requests-per-minute budget. Clones draw from the same budget.
#[derive(Clone)]
pub struct RequestQuota {
    limiter: Arc<DirectRateLimiter>,
    per_minute: NonZeroU32,
}

impl RequestQuota {
    /// Admit `requests` per minute, bursting up to the full minute's worth.
    pub fn per_minute(requests: NonZeroU32) -> Self {
        Self {
            limiter: Arc::new(RateLimiter::direct(Quota::per_minute(requests))),
            per_minute: requests,
        }
    }

    /// Configured requests per minute.
    pub fn requests_per_minute(&self) -> NonZeroU32 {
        self.per_minute
    }

    async fn until_ready(&self) {
        self.limiter.until_ready().await;
    }
}

impl std::fmt::Debug for RequestQuota {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestQuota")
            .field("per_minute", &self.per_minute)
            .finish_non_exhaustive()
    }
}

/// Holds each call until its [`RequestQuota`] admits it.
///
/// Wrappers built from clones of one quota share it, so every stage talking
/// to the same provider account stays within one budget.
#[derive(Debug, Clone)]
pub struct RateLimitedGenerator<G> {
    inner: G,
    quota: RequestQuota,
}

impl<G> RateLimitedGenerator<G> {
    /// Throttle `inner` against `quota`.
    pub fn new(inner: G, quota: RequestQuota) -> Self {
        Self { inner, quota }
    }

    /// The quota this wrapper draws from.
    pub fn quota(&self) -> &RequestQuota {
        &self.quota
    }
}

#[async_trait]
impl<G: TextGenerator> TextGenerator for RateLimitedGenerator<G> {
    async fn generate(&self, request: &GenerationRequest) -> StorylintResult<String> {
        self.quota.until_ready().await;
        trace!("Rate limiter admitted request");
        self.inner.generate(request).await
    }

    fn provider_name(&self) -> &'static str {
        self.inner.provider_name()
    }

    fn model_name(&self) -> &str {
        self.inner.model_name()
    }
}
