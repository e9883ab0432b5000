//! The two resume pipelines: generate (URL → resume → PDF) and modify
//! (resume + instruction → resume → PDF).
//!
//! Both validate input and check credentials before any collaborator is called,
//! and both end in the same rendering step.

use serde::Deserialize;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::models::resume::Resume;
use crate::resume::extraction::extract_resume;
use crate::resume::mutation::mutate_resume;
use crate::resume::sufficiency::assess_sufficiency;
use crate::scrape::{parse_portfolio_url, ExtractMode, SourceError};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Data models
// ────────────────────────────────────────────────────────────────────────────

/// Request body for resume generation. Fields are optional so that a missing URL is
/// reported as a validation error rather than a body rejection.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GenerateResumeRequest {
    pub url: Option<String>,
    /// "scrape" (default) or "crawl".
    pub mode: Option<String>,
}

/// Request body for resume modification. The caller sends back the resume it holds;
/// nothing is kept between turns on the server.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModifyResumeRequest {
    pub resume_data: Option<Resume>,
    #[serde(alias = "instruction")]
    pub modification: Option<String>,
}

/// A finished resume and its rendered document.
#[derive(Debug, Clone)]
pub struct ResumeOutput {
    pub document: Vec<u8>,
    pub resume: Resume,
}

// ────────────────────────────────────────────────────────────────────────────
// Pipelines
// ────────────────────────────────────────────────────────────────────────────

/// Runs the generation pipeline.
///
/// Steps:
/// 1. validate URL and mode
/// 2. check credentials
/// 3. extract content → raw text (blocked / inaccessible / empty are terminal)
/// 4. sufficiency gate (fails open)
/// 5. extraction engine → Resume
/// 6. render → PDF
pub async fn generate_resume(
    state: &AppState,
    request: GenerateResumeRequest,
) -> Result<ResumeOutput, AppError> {
    // Step 1: Validate input
    let raw_url = request
        .url
        .as_deref()
        .map(str::trim)
        .filter(|u| !u.is_empty())
        .ok_or_else(|| AppError::Validation("URL is required".to_string()))?;
    let url = parse_portfolio_url(raw_url).map_err(AppError::Validation)?;
    let mode = match request.mode.as_deref().map(str::trim).filter(|m| !m.is_empty()) {
        Some(raw) => raw.parse::<ExtractMode>().map_err(AppError::Validation)?,
        None => ExtractMode::default(),
    };

    // Step 2: Credentials
    require_key(&state.config.firecrawl_api_key, "Firecrawl API key is not configured")?;
    require_key(&state.config.groq_api_key, "Groq API key is not configured")?;

    // Step 3: Content extraction
    info!("Extracting content from {url} (mode: {mode:?})");
    let raw_text = match state.extractor.extract_content(&url, mode).await {
        Ok(text) if !text.trim().is_empty() => text,
        Ok(_) | Err(SourceError::Empty) => return Err(AppError::NoContent),
        Err(SourceError::Blocked(msg)) => {
            warn!("Source refused access for {url}");
            return Err(AppError::SourceBlocked(msg));
        }
        Err(SourceError::Inaccessible(msg)) => return Err(AppError::SourceInaccessible(msg)),
    };
    info!("Extracted {} characters", raw_text.chars().count());

    // Step 4: Sufficiency gate
    let verdict = assess_sufficiency(state.llm.as_ref(), &raw_text).await;
    if !verdict.valid {
        info!(
            "Content rejected as insufficient: {}",
            verdict.reason.as_deref().unwrap_or("no reason given")
        );
        return Err(AppError::InsufficientContent(verdict.reason));
    }

    // Step 5: Extraction
    let resume = extract_resume(state.llm.as_ref(), &raw_text).await?;

    // Step 6: Render
    let document = render_document(state, &resume).await?;
    info!("Generated resume PDF ({} bytes)", document.len());

    Ok(ResumeOutput { document, resume })
}

/// Runs the modification pipeline: validate → credentials → mutation engine → render.
pub async fn modify_resume(
    state: &AppState,
    request: ModifyResumeRequest,
) -> Result<ResumeOutput, AppError> {
    let resume = request
        .resume_data
        .ok_or_else(|| AppError::Validation("Resume data is required".to_string()))?;
    let instruction = request
        .modification
        .as_deref()
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .ok_or_else(|| AppError::Validation("Modification request is required".to_string()))?;

    require_key(&state.config.groq_api_key, "Groq API key is not configured")?;

    info!("Applying modification to resume");
    let updated = mutate_resume(state.llm.as_ref(), &resume, instruction).await?;

    let document = render_document(state, &updated).await?;
    info!("Regenerated resume PDF ({} bytes)", document.len());

    Ok(ResumeOutput {
        document,
        resume: updated,
    })
}

/// Renders a caller-supplied resume as-is.
pub async fn render_resume(state: &AppState, resume: Option<Resume>) -> Result<Vec<u8>, AppError> {
    let resume =
        resume.ok_or_else(|| AppError::Validation("Resume data is required".to_string()))?;
    render_document(state, &resume).await
}

async fn render_document(state: &AppState, resume: &Resume) -> Result<Vec<u8>, AppError> {
    state
        .renderer
        .render(resume)
        .await
        .map_err(|e| AppError::Render(e.to_string()))
}

fn require_key(key: &Option<String>, message: &str) -> Result<(), AppError> {
    match key {
        Some(_) => Ok(()),
        None => Err(AppError::Configuration(message.to_string())),
    }
}
