//! JSON object extraction from free-form generator output.

use serde_json::{Map, Value};
use storylint_error::{
    ExtractionError, ExtractionErrorKind, StorylintResult, ValidationError, ValidationErrorKind,
};
use tracing::error;

/// Pull the JSON object out of a generator response.
///
/// A response that is itself `{...}` after trimming is used verbatim.
/// Otherwise the span from the first `{` to the last `}` is decoded, which
/// also covers fenced ```` ```json ```` blocks and surrounding prose.
///
/// # Errors
///
/// [`ExtractionErrorKind::NoJsonFound`] when no brace pair exists, and
/// [`ExtractionErrorKind::InvalidJson`] when the span does not decode.
///
/// # Examples
///
/// ```
/// use storylint_models::extract_json;
///
/// let value = extract_json("Sure, here:\n```json\n{\"a\":1}\n```")?;
/// assert_eq!(value["a"], 1);
/// assert!(extract_json("no json here").is_err());
/// # Ok::<(), storylint_error::StorylintError>(())
/// ```
pub fn extract_json(response: &str) -> StorylintResult<Value> {
    let trimmed = response.trim();
    let candidate = if trimmed.starts_with('{') && trimmed.ends_with('}') {
        trimmed
    } else {
        match (trimmed.find('{'), trimmed.rfind('}')) {
            (Some(start), Some(end)) if start < end => &trimmed[start..=end],
            _ => {
                error!(response_length = response.len(), "No JSON object in response");
                return Err(
                    ExtractionError::new(ExtractionErrorKind::NoJsonFound(response.len())).into(),
                );
            }
        }
    };

    serde_json::from_str(candidate).map_err(|e| {
        error!(error = %e, candidate_length = candidate.len(), "Failed to decode JSON object");
        ExtractionError::new(ExtractionErrorKind::InvalidJson(e.to_string())).into()
    })
}

/// Fill fields absent from `value` with `defaults`. Present fields win.
///
/// # Errors
///
/// Returns a validation error if `value` is not a JSON object.
pub fn merge_defaults(
    report: &str,
    value: Value,
    defaults: &Map<String, Value>,
) -> StorylintResult<Value> {
    let Value::Object(mut object) = value else {
        return Err(ValidationError::new(ValidationErrorKind::NotAnObject(report.to_string())).into());
    };
    for (key, default) in defaults {
        object.entry(key.clone()).or_insert_with(|| default.clone());
    }
    Ok(Value::Object(object))
}
