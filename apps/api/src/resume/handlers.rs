//! Axum route handlers for the Resume API.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use base64::{engine::general_purpose::STANDARD, Engine};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{info_span, Instrument};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::resume::Resume;
use crate::resume::pipeline::{
    generate_resume, modify_resume, render_resume, GenerateResumeRequest, ModifyResumeRequest,
    ResumeOutput,
};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderRequest {
    pub resume_data: Option<Resume>,
}

/// The PDF travels base64-encoded next to the structured resume, which the caller
/// keeps and sends back with its next modification.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeResponse {
    pub pdf: String,
    pub resume_data: Resume,
}

impl From<ResumeOutput> for ResumeResponse {
    fn from(output: ResumeOutput) -> Self {
        Self {
            pdf: STANDARD.encode(&output.document),
            resume_data: output.resume,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/resumes/generate
///
/// Scrapes a portfolio URL, extracts a structured resume, and renders it.
pub async fn handle_generate(
    State(state): State<AppState>,
    payload: Result<Json<GenerateResumeRequest>, JsonRejection>,
) -> Result<Json<ResumeResponse>, AppError> {
    let Json(request) = payload.map_err(invalid_body)?;

    let span = info_span!("generate_resume", request_id = %Uuid::new_v4());
    let output = generate_resume(&state, request).instrument(span).await?;

    Ok(Json(output.into()))
}

/// POST /api/v1/resumes/modify
///
/// Applies a natural-language modification to the supplied resume and re-renders it.
pub async fn handle_modify(
    State(state): State<AppState>,
    payload: Result<Json<ModifyResumeRequest>, JsonRejection>,
) -> Result<Json<ResumeResponse>, AppError> {
    let Json(request) = payload.map_err(invalid_body)?;

    let span = info_span!("modify_resume", request_id = %Uuid::new_v4());
    let output = modify_resume(&state, request).instrument(span).await?;

    Ok(Json(output.into()))
}

/// POST /api/v1/resumes/render
///
/// Renders the supplied resume without any model call and returns the PDF itself.
pub async fn handle_render(
    State(state): State<AppState>,
    payload: Result<Json<RenderRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(request) = payload.map_err(invalid_body)?;

    let span = info_span!("render_resume", request_id = %Uuid::new_v4());
    let document = render_resume(&state, request.resume_data)
        .instrument(span)
        .await?;

    let disposition = format!(
        "attachment; filename=\"resume-{}.pdf\"",
        Utc::now().timestamp_millis()
    );
    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        document,
    )
        .into_response())
}

fn invalid_body(rejection: JsonRejection) -> AppError {
    AppError::Validation(format!("Invalid request body: {}", rejection.body_text()))
}
