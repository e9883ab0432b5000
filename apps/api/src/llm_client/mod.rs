//! LLM Client: the single point of entry for all structured-generation calls in Folio.
//!
//! ARCHITECTURAL RULE: No other module may call the Groq API directly.
//! All LLM interactions MUST go through `StructuredGenerator`.
//!
//! Models are hardcoded per use (classification vs. resume generation) to prevent drift.
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

pub mod prompts;

pub const DEFAULT_GROQ_API_URL: &str = "https://api.groq.com/openai/v1/chat/completions";
/// Model used for extraction and mutation.
pub const GENERATION_MODEL: &str = "llama-3.3-70b-versatile";
/// Small, fast model used by the sufficiency gate.
pub const CLASSIFIER_MODEL: &str = "llama-3.1-8b-instant";

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Rate limited after {attempts} attempts")]
    RateLimited { attempts: u32 },

    #[error("LLM returned empty content")]
    EmptyContent,

    #[error("GROQ_API_KEY is not configured")]
    MissingApiKey,
}

/// One structured-generation call. The model is always asked for JSON-only output.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub model: &'static str,
    pub system: &'static str,
    pub prompt: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

/// Seam between the engines and the model provider.
///
/// Returns the raw text of the first choice, or `None` when the model produced nothing.
/// Carried in `AppState` as `Arc<dyn StructuredGenerator>`.
#[async_trait]
pub trait StructuredGenerator: Send + Sync {
    async fn generate_structured(
        &self,
        request: &GenerationRequest,
    ) -> Result<Option<String>, LlmError>;
}

/// Calls the generator and parses the text response as JSON.
/// The prompt must instruct the model to return valid JSON.
pub async fn generate_json(
    llm: &dyn StructuredGenerator,
    request: &GenerationRequest,
) -> Result<Value, LlmError> {
    let text = llm
        .generate_structured(request)
        .await?
        .filter(|t| !t.trim().is_empty())
        .ok_or(LlmError::EmptyContent)?;

    // Strip markdown code fences if the model wraps JSON in them
    let text = strip_json_fences(&text);

    serde_json::from_str(text).map_err(LlmError::Parse)
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
    response_format: ResponseFormat,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: &'static str,
}

#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    pub choices: Vec<Choice>,
    pub usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    pub message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
pub struct ChoiceMessage {
    pub content: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
}

impl ChatResponse {
    /// Extracts the text content of the first choice.
    pub fn text(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|c| c.message.content.as_deref())
    }
}

#[derive(Debug, Deserialize)]
struct ApiError {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// The production `StructuredGenerator`: Groq's OpenAI-compatible chat completions API
/// in JSON mode, with retry on 429 and 5xx.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_url: String,
    api_key: Option<String>,
    max_attempts: u32,
}

impl LlmClient {
    pub fn new(client: Client, api_url: &str, api_key: Option<String>, max_attempts: u32) -> Self {
        Self {
            client,
            api_url: api_url.to_string(),
            api_key,
            max_attempts: max_attempts.max(1),
        }
    }

    /// Makes a raw call to the chat completions API, returning the full response object.
    /// Retries on 429 (rate limit) and 5xx errors with exponential backoff. Transport
    /// failures (connect errors, timeouts) are returned at once.
    pub async fn call(&self, request: &GenerationRequest) -> Result<ChatResponse, LlmError> {
        let api_key = self.api_key.as_deref().ok_or(LlmError::MissingApiKey)?;

        let request_body = ChatRequest {
            model: request.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: request.system,
                },
                ChatMessage {
                    role: "user",
                    content: &request.prompt,
                },
            ],
            temperature: request.temperature,
            max_tokens: request.max_tokens,
            response_format: ResponseFormat {
                format_type: "json_object",
            },
        };

        // Status and body of the last retryable response
        let mut last_failure: Option<(u16, String)> = None;

        for attempt in 0..self.max_attempts {
            if attempt > 0 {
                // Exponential backoff: 1s, 2s, 4s
                let delay = std::time::Duration::from_millis(1000 * (1 << (attempt - 1).min(4)));
                warn!(
                    "LLM call attempt {} failed, retrying after {}ms...",
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let response = self
                .client
                .post(&self.api_url)
                .bearer_auth(api_key)
                .json(&request_body)
                .send()
                .await?;

            let status = response.status();

            if status.as_u16() == 429 || status.is_server_error() {
                let body = response.text().await.unwrap_or_default();
                warn!("LLM API returned {}: {}", status, body);
                last_failure = Some((status.as_u16(), body));
                continue;
            }

            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                let message = serde_json::from_str::<ApiError>(&body)
                    .map(|e| e.error.message)
                    .unwrap_or(body);
                return Err(LlmError::Api {
                    status: status.as_u16(),
                    message,
                });
            }

            let chat_response: ChatResponse = response.json().await?;

            if let Some(usage) = &chat_response.usage {
                debug!(
                    "LLM call succeeded: model={}, prompt_tokens={}, completion_tokens={}",
                    request.model, usage.prompt_tokens, usage.completion_tokens
                );
            }

            return Ok(chat_response);
        }

        match last_failure {
            Some((status, message)) if status != 429 => Err(LlmError::Api { status, message }),
            _ => Err(LlmError::RateLimited {
                attempts: self.max_attempts,
            }),
        }
    }
}

#[async_trait]
impl StructuredGenerator for LlmClient {
    async fn generate_structured(
        &self,
        request: &GenerationRequest,
    ) -> Result<Option<String>, LlmError> {
        let response = self.call(request).await?;
        Ok(response.text().map(String::from))
    }
}

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
pub fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    if let Some(stripped) = text.strip_prefix("```json") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else if let Some(stripped) = text.strip_prefix("```") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use axum::{http::StatusCode, routing::post, Json, Router};
    use serde_json::json;

    use super::*;
    use crate::test_support::{spawn_server, MockGenerator, MockReply};

    /// A completions endpoint that always answers `status`, counting hits.
    fn failing_endpoint(status: StatusCode) -> (Router, Arc<AtomicUsize>) {
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();
        let router = Router::new().route(
            "/v1/chat/completions",
            post(move || {
                let counter = counter.clone();
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    (status, "upstream unhappy")
                }
            }),
        );
        (router, hits)
    }

    fn client_for(base: &str, max_attempts: u32) -> LlmClient {
        LlmClient::new(
            Client::new(),
            &format!("{base}/v1/chat/completions"),
            Some("test-key".to_string()),
            max_attempts,
        )
    }

    fn request() -> GenerationRequest {
        GenerationRequest {
            model: GENERATION_MODEL,
            system: prompts::JSON_ONLY_SYSTEM,
            prompt: "Return {}".to_string(),
            temperature: 0.3,
            max_tokens: 16,
        }
    }

    #[test]
    fn test_strip_json_fences_with_json_tag() {
        let input = "```json\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_without_tag() {
        let input = "```\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_no_fences() {
        let input = "{\"key\": \"value\"}";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_chat_response_text_reads_first_choice() {
        let json = r#"{
            "choices": [{"message": {"role": "assistant", "content": "{\"valid\": true}"}}],
            "usage": {"prompt_tokens": 10, "completion_tokens": 4, "total_tokens": 14}
        }"#;
        let response: ChatResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.text(), Some("{\"valid\": true}"));
    }

    #[test]
    fn test_chat_response_without_choices_has_no_text() {
        let response: ChatResponse = serde_json::from_str(r#"{"choices": []}"#).unwrap();
        assert!(response.text().is_none());
    }

    #[test]
    fn test_chat_request_asks_for_json_mode() {
        let body = ChatRequest {
            model: GENERATION_MODEL,
            messages: vec![],
            temperature: 0.3,
            max_tokens: 2048,
            response_format: ResponseFormat {
                format_type: "json_object",
            },
        };
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["response_format"]["type"], "json_object");
        assert_eq!(value["max_tokens"], 2048);
    }

    #[tokio::test]
    async fn test_client_without_key_fails_before_any_request() {
        let client = LlmClient::new(Client::new(), DEFAULT_GROQ_API_URL, None, 3);
        let result = client.generate_structured(&request()).await;
        assert!(matches!(result, Err(LlmError::MissingApiKey)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_transport_failure_is_not_retried() {
        // Accepts connections and hangs up before answering.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let accepted = Arc::new(AtomicUsize::new(0));
        let counter = accepted.clone();
        tokio::spawn(async move {
            while let Ok((socket, _)) = listener.accept().await {
                counter.fetch_add(1, Ordering::SeqCst);
                drop(socket);
            }
        });

        let client = client_for(&format!("http://{addr}"), 3);
        let result = client.call(&request()).await;

        assert!(matches!(result, Err(LlmError::Http(_))));
        assert_eq!(accepted.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_server_errors_are_retried_then_reported() {
        let (router, hits) = failing_endpoint(StatusCode::SERVICE_UNAVAILABLE);
        let base = spawn_server(router).await;

        let result = client_for(&base, 3).call(&request()).await;

        assert!(matches!(result, Err(LlmError::Api { status: 503, .. })));
        assert_eq!(hits.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_persistent_429_is_rate_limited() {
        let (router, hits) = failing_endpoint(StatusCode::TOO_MANY_REQUESTS);
        let base = spawn_server(router).await;

        let result = client_for(&base, 3).call(&request()).await;

        assert!(matches!(result, Err(LlmError::RateLimited { attempts: 3 })));
        assert_eq!(hits.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_client_errors_are_not_retried() {
        let (router, hits) = failing_endpoint(StatusCode::UNAUTHORIZED);
        let base = spawn_server(router).await;

        let result = client_for(&base, 3).call(&request()).await;

        assert!(matches!(result, Err(LlmError::Api { status: 401, .. })));
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_successful_call_returns_first_choice_text() {
        let router = Router::new().route(
            "/v1/chat/completions",
            post(|| async {
                Json(json!({
                    "choices": [{"message": {"role": "assistant", "content": "{\"valid\": true}"}}],
                    "usage": {"prompt_tokens": 12, "completion_tokens": 5}
                }))
            }),
        );
        let base = spawn_server(router).await;

        let text = client_for(&base, 3)
            .generate_structured(&request())
            .await
            .unwrap();

        assert_eq!(text.as_deref(), Some("{\"valid\": true}"));
    }

    #[tokio::test]
    async fn test_generate_json_parses_fenced_output() {
        let llm = MockGenerator::new(vec![MockReply::text("```json\n{\"a\": 1}\n```")]);
        let value = generate_json(&llm, &request()).await.unwrap();
        assert_eq!(value["a"], 1);
    }

    #[tokio::test]
    async fn test_generate_json_empty_output_is_error() {
        let llm = MockGenerator::new(vec![MockReply::Empty]);
        let result = generate_json(&llm, &request()).await;
        assert!(matches!(result, Err(LlmError::EmptyContent)));

        let llm = MockGenerator::new(vec![MockReply::text("   ")]);
        let result = generate_json(&llm, &request()).await;
        assert!(matches!(result, Err(LlmError::EmptyContent)));
    }

    #[tokio::test]
    async fn test_generate_json_malformed_output_is_parse_error() {
        let llm = MockGenerator::new(vec![MockReply::text("{not json")]);
        let result = generate_json(&llm, &request()).await;
        assert!(matches!(result, Err(LlmError::Parse(_))));
    }
}
