//! Generator request type.

use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use storylint_core::ReportKind;

/// One prompt sent to a text generator.
///
/// # Examples
///
/// ```
/// use storylint_core::ReportKind;
/// use storylint_interface::GenerationRequest;
///
/// let request = GenerationRequest::builder()
///     .kind(ReportKind::Chapter)
///     .system("You are a precise narrative quality auditor.")
///     .prompt("Audit chapter ch01")
///     .build()
///     .unwrap();
/// assert_eq!(*request.kind(), ReportKind::Chapter);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters, derive_builder::Builder)]
#[builder(setter(into))]
pub struct GenerationRequest {
    /// Report the response must describe.
    kind: ReportKind,
    /// System instruction.
    #[builder(default)]
    system: String,
    /// User prompt, including the context payload.
    prompt: String,
}

impl GenerationRequest {
    /// Creates a new request builder.
    pub fn builder() -> GenerationRequestBuilder {
        GenerationRequestBuilder::default()
    }
}
