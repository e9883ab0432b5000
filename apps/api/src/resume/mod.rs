// Resume engines: sufficiency gate, extraction, mutation, and the pipeline that
// chains them with content extraction and rendering.

pub mod extraction;
pub mod handlers;
pub mod mutation;
pub mod normalize;
pub mod pipeline;
pub mod prompts;
pub mod sufficiency;

use serde_json::Value;
use tracing::warn;

use crate::errors::AppError;
use crate::llm_client::LlmError;
use crate::models::resume::Resume;

/// Returns at most `max` characters of `s`, cut on a char boundary.
pub(crate) fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// Turns a model's parsed output into a `Resume`. Anything but a JSON object is rejected;
/// objects always normalize, however sparse.
pub(crate) fn resume_from_output(value: &Value) -> Result<Resume, String> {
    if !value.is_object() {
        return Err(format!(
            "expected a JSON object, model returned {}",
            json_kind(value)
        ));
    }
    Ok(normalize::normalize(value))
}

/// Maps an LLM failure onto the engine's error kind. A missing key is a deployment
/// problem, not a model failure.
pub(crate) fn engine_error(err: LlmError, wrap: fn(String) -> AppError) -> AppError {
    match &err {
        LlmError::MissingApiKey => {
            AppError::Configuration("Groq API key is not configured".to_string())
        }
        LlmError::EmptyContent => wrap("No response from AI model".to_string()),
        LlmError::Parse(e) => wrap(format!("model returned malformed JSON ({e})")),
        // The provider's own text stays in the logs.
        LlmError::RateLimited { .. } => {
            warn!("LLM call failed: {err}");
            wrap("AI service is rate limiting requests, try again shortly".to_string())
        }
        LlmError::Http(_) | LlmError::Api { .. } => {
            warn!("LLM call failed: {err}");
            wrap("AI service request failed".to_string())
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_truncate_chars_respects_multibyte_boundaries() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("日本語", 5), "日本語");
        assert_eq!(truncate_chars("", 3), "");
    }

    #[test]
    fn test_resume_from_output_rejects_non_objects() {
        let err = resume_from_output(&json!(["Ada"])).unwrap_err();
        assert!(err.contains("an array"));
        assert!(resume_from_output(&json!("Ada")).is_err());
    }

    #[test]
    fn test_resume_from_output_normalizes_objects() {
        let resume = resume_from_output(&json!({"name": "Ada", "skills": "Rust"})).unwrap();
        assert_eq!(resume.name.as_deref(), Some("Ada"));
        assert!(resume.skills.is_empty());
    }

    #[test]
    fn test_missing_key_is_configuration_error() {
        let err = engine_error(LlmError::MissingApiKey, AppError::Extraction);
        assert!(matches!(err, AppError::Configuration(_)));

        let err = engine_error(LlmError::EmptyContent, AppError::Mutation);
        assert!(matches!(err, AppError::Mutation(_)));
    }

    #[test]
    fn test_provider_error_text_is_not_exposed() {
        let err = engine_error(
            LlmError::Api {
                status: 401,
                message: "Invalid API Key sk-live-123".to_string(),
            },
            AppError::Extraction,
        );
        assert!(matches!(err, AppError::Extraction(_)));
        let body = err.body().to_string();
        assert!(!body.contains("Invalid API Key"));
        assert!(body.contains("AI service request failed"));

        let err = engine_error(LlmError::RateLimited { attempts: 3 }, AppError::Mutation);
        assert!(err.body()["error"]["message"]
            .as_str()
            .unwrap()
            .contains("rate limiting"));
    }
}
