//! OpenAI-compatible chat completions backend.

use crate::response::{api_key, http_client, send_error, status_error};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use storylint_error::{GenerationError, GenerationErrorKind, StorylintResult};
use storylint_interface::{GenerationRequest, TextGenerator};
use tracing::{debug, instrument};

const OPENAI_API_BASE: &str = "https://api.openai.com/v1";

/// Environment variable holding the OpenAI API key.
pub const OPENAI_API_KEY_VAR: &str = "OPENAI_API_KEY";

/// Environment variable overriding the API base URL for compatible servers.
pub const OPENAI_BASE_URL_VAR: &str = "OPENAI_BASE_URL";

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Chat completions client.
#[derive(Debug, Clone)]
pub struct OpenAiGenerator {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
    temperature: f32,
}

impl OpenAiGenerator {
    /// Creates a client against `base_url` (for example `https://api.openai.com/v1`).
    ///
    /// # Errors
    ///
    /// Returns an HTTP error if the client cannot be built.
    pub fn new(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        model: impl Into<String>,
        temperature: f32,
        timeout: Duration,
    ) -> StorylintResult<Self> {
        Ok(Self {
            client: http_client(timeout)?,
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
            temperature,
        })
    }

    /// Creates a client from `OPENAI_API_KEY` and optional `OPENAI_BASE_URL`.
    ///
    /// # Errors
    ///
    /// Returns a generation error if the key is unset or empty.
    pub fn from_env(model: impl Into<String>, temperature: f32, timeout: Duration) -> StorylintResult<Self> {
        let base_url =
            std::env::var(OPENAI_BASE_URL_VAR).unwrap_or_else(|_| OPENAI_API_BASE.to_string());
        Self::new(api_key(OPENAI_API_KEY_VAR)?, base_url, model, temperature, timeout)
    }
}

fn chat_body<'a>(request: &'a GenerationRequest, model: &'a str, temperature: f32) -> ChatRequest<'a> {
    let mut messages = Vec::with_capacity(2);
    if !request.system().is_empty() {
        messages.push(ChatMessage {
            role: "system",
            content: request.system(),
        });
    }
    messages.push(ChatMessage {
        role: "user",
        content: request.prompt(),
    });
    ChatRequest {
        model,
        messages,
        temperature,
    }
}

/// Content of the first choice.
fn completion_text(response: ChatResponse) -> StorylintResult<String> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .filter(|content| !content.is_empty())
        .ok_or_else(|| {
            GenerationError::new(GenerationErrorKind::Response(
                "Chat completion returned no content".to_string(),
            ))
            .into()
        })
}

#[async_trait]
impl TextGenerator for OpenAiGenerator {
    #[instrument(skip_all, fields(model = %self.model, kind = %request.kind()))]
    async fn generate(&self, request: &GenerationRequest) -> StorylintResult<String> {
        let body = chat_body(request, &self.model, self.temperature);

        debug!(prompt_chars = request.prompt().len(), "Sending chat completion request");
        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| send_error("openai", e))?;

        if !response.status().is_success() {
            return Err(status_error("openai", response).await);
        }

        let parsed: ChatResponse = response.json().await.map_err(|e| {
            GenerationError::new(GenerationErrorKind::Response(format!(
                "Failed to parse chat completion: {}",
                e
            )))
        })?;

        completion_text(parsed)
    }

    fn provider_name(&self) -> &'static str {
        "openai"
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
            .kind(ReportKind::Adjacent)
            .system(system)
            .prompt("Compare ch01 and ch02.")
            .build()
            .unwrap()
    }

    #[test]
    fn body_lists_system_then_user() {
        let request = request("Be strict.");
        let body = serde_json::to_value(chat_body(&request, "gpt-4o-mini", 0.5)).unwrap();
        assert_eq!(
            body,
            json!({
                "model": "gpt-4o-mini",
                "messages": [
                    {"role": "system", "content": "Be strict."},
                    {"role": "user", "content": "Compare ch01 and ch02."}
                ],
                "temperature": 0.5
            })
        );
    }

    #[test]
    fn empty_system_prompt_sends_only_user() {
        let request = request("");
        let body = serde_json::to_value(chat_body(&request, "local", 0.0)).unwrap();
        let messages = body["messages"].as_array().unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0]["role"], "user");
    }

    #[test]
    fn first_choice_content_is_returned() {
        let response: ChatResponse = serde_json::from_value(json!({
            "id": "chatcmpl-1",
            "choices": [
                {"index": 0, "message": {"role": "assistant", "content": "{\"ok\": true}"}},
                {"index": 1, "message": {"role": "assistant", "content": "second"}}
            ]
        }))
        .unwrap();
        assert_eq!(completion_text(response).unwrap(), "{\"ok\": true}");
    }

    #[test]
    fn empty_or_null_content_is_a_response_error() {
        for fixture in [
            json!({"choices": []}),
            json!({"choices": [{"message": {"role": "assistant", "content": null}}]}),
            json!({"choices": [{"message": {"content": ""}}]}),
        ] {
            let response: ChatResponse = serde_json::from_value(fixture).unwrap();
            let err = completion_text(response).unwrap_err();
            assert!(err.to_string().contains("no content"));
        }
    }
}
