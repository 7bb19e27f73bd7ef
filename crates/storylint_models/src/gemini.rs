//! Google Gemini `generateContent` backend.

use crate::response::{api_key, http_client, send_error, status_error};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use storylint_error::{GenerationError, GenerationErrorKind, StorylintResult};
use storylint_interface::{GenerationRequest, TextGenerator};
use tracing::{debug, instrument};

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Environment variable holding the Gemini API key.
pub const GEMINI_API_KEY_VAR: &str = "GEMINI_API_KEY";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<GeminiContent<'a>>,
    contents: Vec<GeminiContent<'a>>,
    generation_config: GeminiGenerationConfig,
}

#[derive(Debug, Serialize)]
struct GeminiContent<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'static str>,
    parts: Vec<GeminiPart<'a>>,
}

#[derive(Debug, Serialize)]
struct GeminiPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiGenerationConfig {
    temperature: f32,
    response_mime_type: &'static str,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiCandidateContent>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidateContent {
    #[serde(default)]
    parts: Vec<GeminiCandidatePart>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidatePart {
    #[serde(default)]
    text: String,
}

/// Gemini REST client.
#[derive(Debug, Clone)]
pub struct GeminiGenerator {
    client: Client,
    api_key: String,
    model: String,
    temperature: f32,
}

impl GeminiGenerator {
    /// Creates a client with an explicit API key.
    ///
    /// # Errors
    ///
    /// Returns an HTTP error if the client cannot be built.
    pub fn new(
        api_key: impl Into<String>,
        model: impl Into<String>,
        temperature: f32,
        timeout: Duration,
    ) -> StorylintResult<Self> {
        Ok(Self {
            client: http_client(timeout)?,
            api_key: api_key.into(),
            model: model.into(),
            temperature,
        })
    }

    /// Creates a client reading the key from `GEMINI_API_KEY`.
    ///
    /// # Errors
    ///
    /// Returns a generation error if the variable is unset or empty.
    pub fn from_env(model: impl Into<String>, temperature: f32, timeout: Duration) -> StorylintResult<Self> {
        Self::new(api_key(GEMINI_API_KEY_VAR)?, model, temperature, timeout)
    }
}

fn request_body(request: &GenerationRequest, temperature: f32) -> GeminiRequest<'_> {
    GeminiRequest {
        system_instruction: (!request.system().is_empty()).then(|| GeminiContent {
            role: None,
            parts: vec![GeminiPart {
                text: request.system(),
            }],
        }),
        contents: vec![GeminiContent {
            role: Some("user"),
            parts: vec![GeminiPart {
                text: request.prompt(),
            }],
        }],
        generation_config: GeminiGenerationConfig {
            temperature,
            response_mime_type: "application/json",
        },
    }
}

/// Concatenated parts of the first candidate.
fn response_text(response: GeminiResponse) -> StorylintResult<String> {
    let text: String = response
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content)
        .map(|content| content.parts.into_iter().map(|p| p.text).collect())
        .unwrap_or_default();
    if text.is_empty() {
        return Err(GenerationError::new(GenerationErrorKind::Response(
            "Gemini returned no candidate text".to_string(),
        ))
        .into());
    }
    Ok(text)
}

#[async_trait]
impl TextGenerator for GeminiGenerator {
    #[instrument(skip_all, fields(model = %self.model, kind = %request.kind()))]
    async fn generate(&self, request: &GenerationRequest) -> StorylintResult<String> {
        let body = request_body(request, self.temperature);

        let url = format!("{}/{}:generateContent", GEMINI_API_BASE, self.model);
        debug!(prompt_chars = request.prompt().len(), "Sending request to Gemini");
        let response = self
            .client
            .post(url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| send_error("gemini", e))?;

        if !response.status().is_success() {
            return Err(status_error("gemini", response).await);
        }

        let parsed: GeminiResponse = response.json().await.map_err(|e| {
            GenerationError::new(GenerationErrorKind::Response(format!(
                "Failed to parse Gemini response: {}",
                e
            )))
        })?;

        let text = response_text(parsed)?;
        debug!(response_chars = text.len(), "Received Gemini response");
        Ok(text)
    }

    fn provider_name(&self) -> &'static str {
        "gemini"
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use storylint_core::ReportKind;

    fn request(system: &str) -> GenerationRequest {
        GenerationRequest::builder()
            .kind(ReportKind::Chapter)
            .system(system)
            .prompt("Audit ch01.")
            .build()
            .unwrap()
    }

    #[test]
    fn body_carries_system_prompt_and_json_mime_type() {
        let request = request("Be strict.");
        let body = serde_json::to_value(request_body(&request, 0.2)).unwrap();

        assert_eq!(body["systemInstruction"], json!({"parts": [{"text": "Be strict."}]}));
        assert_eq!(body["contents"], json!([{"role": "user", "parts": [{"text": "Audit ch01."}]}]));
        assert_eq!(body["generationConfig"]["responseMimeType"], "application/json");
        assert!((body["generationConfig"]["temperature"].as_f64().unwrap() - 0.2).abs() < 1e-6);
    }

    #[test]
    fn empty_system_prompt_is_omitted() {
        let request = request("");
        let body = serde_json::to_value(request_body(&request, 0.0)).unwrap();
        assert!(body.get("systemInstruction").is_none());
    }

    #[test]
    fn first_candidate_parts_are_joined() {
        let response: GeminiResponse = serde_json::from_value(json!({
            "candidates": [
                {"content": {"role": "model", "parts": [{"text": "{\"a\":"}, {"text": " 1}"}]}},
                {"content": {"parts": [{"text": "ignored"}]}}
            ],
            "usageMetadata": {"totalTokenCount": 12}
        }))
        .unwrap();
        assert_eq!(response_text(response).unwrap(), "{\"a\": 1}");
    }

    #[test]
    fn missing_candidates_are_a_response_error() {
        for fixture in [
            json!({}),
            json!({"candidates": []}),
            json!({"candidates": [{"finishReason": "SAFETY"}]}),
        ] {
            let response: GeminiResponse = serde_json::from_value(fixture).unwrap();
            let err = response_text(response).unwrap_err();
            assert!(err.is_retryable());
            assert!(err.to_string().contains("no candidate text"));
        }
    }
}
