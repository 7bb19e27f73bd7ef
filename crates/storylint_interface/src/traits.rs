//! Generator trait.

use crate::GenerationRequest;
use async_trait::async_trait;
use std::sync::Arc;
use storylint_error::StorylintResult;

/// Core trait every report-generation backend implements.
///
/// Implementations must be safe to call concurrently; the pipeline shares a
/// single instance across all in-flight work items of a stage.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Produce raw text for the request. The text should contain one JSON
    /// object, possibly wrapped in prose or a code fence.
    async fn generate(&self, request: &GenerationRequest) -> StorylintResult<String>;

    /// Provider name (e.g., "gemini", "openai", "mock").
    fn provider_name(&self) -> &'static str;

    /// Model identifier.
    fn model_name(&self) -> &str;
}

#[async_trait]
impl<T: TextGenerator + ?Sized> TextGenerator for Arc<T> {
    async fn generate(&self, request: &GenerationRequest) -> StorylintResult<String> {
        (**self).generate(request).await
    }

    fn provider_name(&self) -> &'static str {
        (**self).provider_name()
    }

    fn model_name(&self) -> &str {
        (**self).model_name()
    }
}
