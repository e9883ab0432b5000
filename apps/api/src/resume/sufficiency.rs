//! Sufficiency gate: a cheap classifier call that decides whether scraped content can
//! support a resume at all, before the expensive extraction call is made.
//!
//! The gate fails open. Any error (transport, empty output, malformed JSON) is logged
//! and treated as a pass.

use serde_json::Value;
use tracing::{debug, warn};

use crate::llm_client::prompts::JSON_ONLY_SYSTEM;
use crate::llm_client::{
    generate_json, GenerationRequest, LlmError, StructuredGenerator, CLASSIFIER_MODEL,
};
use crate::resume::prompts::{fill, SUFFICIENCY_PROMPT_TEMPLATE};
use crate::resume::truncate_chars;

/// Characters of scraped content shown to the classifier.
pub const MAX_GATE_CHARS: usize = 4000;

#[derive(Debug, Clone, PartialEq)]
pub struct Sufficiency {
    pub valid: bool,
    pub reason: Option<String>,
}

impl Sufficiency {
    fn pass() -> Self {
        Self {
            valid: true,
            reason: None,
        }
    }

    /// `valid` is true only for a literal JSON `true`; strings like "true" do not count.
    fn from_object(value: &Value) -> Self {
        let valid = value.get("valid").and_then(Value::as_bool) == Some(true);
        let reason = value
            .get("reason")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .map(String::from);
        Self { valid, reason }
    }
}

pub async fn assess_sufficiency(llm: &dyn StructuredGenerator, raw_text: &str) -> Sufficiency {
    match classify(llm, raw_text).await {
        Ok(verdict) => {
            debug!("Sufficiency verdict: valid={}", verdict.valid);
            verdict
        }
        Err(e) => {
            warn!("Sufficiency check failed, continuing as sufficient: {e}");
            Sufficiency::pass()
        }
    }
}

async fn classify(llm: &dyn StructuredGenerator, raw_text: &str) -> Result<Sufficiency, String> {
    let request = GenerationRequest {
        model: CLASSIFIER_MODEL,
        system: JSON_ONLY_SYSTEM,
        prompt: fill(
            SUFFICIENCY_PROMPT_TEMPLATE,
            &[("content", truncate_chars(raw_text, MAX_GATE_CHARS))],
        ),
        temperature: 0.1,
        max_tokens: 200,
    };

    let value = generate_json(llm, &request)
        .await
        .map_err(|e: LlmError| e.to_string())?;

    if !value.is_object() {
        return Err("classifier did not return a JSON object".to_string());
    }
    Ok(Sufficiency::from_object(&value))
}
