//! HTTP response handling shared by the hosted backends.

use reqwest::{Client, Response, StatusCode};
use std::time::Duration;
use storylint_error::{GenerationError, GenerationErrorKind, HttpError, StorylintError, StorylintResult};
use tracing::error;

/// HTTP client with a per-request timeout.
pub(crate) fn http_client(timeout: Duration) -> StorylintResult<Client> {
    Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| HttpError::new(format!("Failed to build HTTP client: {}", e)).into())
}

/// Read a non-success response into an error.
pub(crate) async fn status_error(provider: &str, response: Response) -> StorylintError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    error!(provider, status = %status, body = %body, "Provider returned error");
    classify_status(provider, status, body)
}

/// Rate limits and server errors are transient; other statuses are refusals.
pub(crate) fn classify_status(provider: &str, status: StatusCode, body: String) -> StorylintError {
    let kind = if status == StatusCode::TOO_MANY_REQUESTS {
        GenerationErrorKind::RateLimited(format!("{} {}", provider, status))
    } else if status.is_server_error() {
        GenerationErrorKind::Transport(format!("{} returned {}: {}", provider, status, body))
    } else {
        GenerationErrorKind::Rejected {
            status: status.as_u16(),
            message: body,
        }
    };
    GenerationError::new(kind).into()
}

/// Transport failure, including timeouts.
pub(crate) fn send_error(provider: &str, e: reqwest::Error) -> StorylintError {
    error!(provider, error = ?e, "Request failed");
    GenerationError::new(GenerationErrorKind::Transport(format!(
        "{} request failed: {}",
        provider, e
    )))
    .into()
}

/// API key from the environment.
pub(crate) fn api_key(var: &str) -> StorylintResult<String> {
    std::env::var(var)
        .ok()
        .filter(|key| !key.trim().is_empty())
        .ok_or_else(|| GenerationError::new(GenerationErrorKind::MissingApiKey(var.to_string())).into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use storylint_error::StorylintErrorKind;

    fn generation_kind(err: &StorylintError) -> &GenerationErrorKind {
        match err.kind() {
            StorylintErrorKind::Generation(e) => e.kind(),
            other => panic!("expected a generation error, got {}", other),
        }
    }

    #[test]
    fn too_many_requests_is_retryable() {
        let err = classify_status("gemini", StatusCode::TOO_MANY_REQUESTS, "slow down".into());
        assert!(matches!(generation_kind(&err), GenerationErrorKind::RateLimited(_)));
        assert!(err.is_retryable());
    }

    #[test]
    fn server_errors_are_retryable_transport_failures() {
        for status in [
            StatusCode::INTERNAL_SERVER_ERROR,
            StatusCode::BAD_GATEWAY,
            StatusCode::SERVICE_UNAVAILABLE,
        ] {
            let err = classify_status("openai", status, "overloaded".into());
            match generation_kind(&err) {
                GenerationErrorKind::Transport(message) => assert!(message.contains("overloaded")),
                other => panic!("unexpected kind for {}: {}", status, other),
            }
            assert!(err.is_retryable(), "{} should be retried", status);
        }
    }

    #[test]
    fn client_errors_are_permanent_rejections() {
        for status in [
            StatusCode::BAD_REQUEST,
            StatusCode::UNAUTHORIZED,
            StatusCode::FORBIDDEN,
            StatusCode::NOT_FOUND,
        ] {
            let err = classify_status("gemini", status, "bad key".into());
            match generation_kind(&err) {
                GenerationErrorKind::Rejected { status: code, message } => {
                    assert_eq!(*code, status.as_u16());
                    assert_eq!(message, "bad key");
                }
                other => panic!("unexpected kind for {}: {}", status, other),
            }
            assert!(!err.is_retryable(), "{} should not be retried", status);
        }
    }
}
