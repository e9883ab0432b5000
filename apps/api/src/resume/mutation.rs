//! Mutation engine: applies a natural-language instruction to an existing resume.
//!
//! The whole resume goes to the model and the whole resume comes back; the result
//! is normalized exactly like extraction output. Nothing is merged server-side, so
//! the caller's copy is the only source of truth between turns.

use anyhow::Context;
use tracing::info;

use crate::errors::AppError;
use crate::llm_client::prompts::{ABSENCE_INSTRUCTION, RESUME_SCHEMA};
use crate::llm_client::{generate_json, GenerationRequest, StructuredGenerator, GENERATION_MODEL};
use crate::models::resume::Resume;
use crate::resume::prompts::{fill, MUTATION_PROMPT_TEMPLATE, MUTATION_SYSTEM};
use crate::resume::{engine_error, resume_from_output};

pub async fn mutate_resume(
    llm: &dyn StructuredGenerator,
    resume: &Resume,
    instruction: &str,
) -> Result<Resume, AppError> {
    let resume_json =
        serde_json::to_string_pretty(resume).context("Failed to serialize resume for mutation")?;

    let request = GenerationRequest {
        model: GENERATION_MODEL,
        system: MUTATION_SYSTEM,
        prompt: fill(
            MUTATION_PROMPT_TEMPLATE,
            &[
                ("resume_json", resume_json.as_str()),
                ("instruction", instruction.trim()),
                ("schema", RESUME_SCHEMA),
                ("absence_instruction", ABSENCE_INSTRUCTION),
            ],
        ),
        temperature: 0.3,
        max_tokens: 2048,
    };

    let value = generate_json(llm, &request)
        .await
        .map_err(|e| engine_error(e, AppError::Mutation))?;
    let updated = resume_from_output(&value).map_err(AppError::Mutation)?;

    info!(
        "Applied modification ({} chars): {} experience, {} skills, {} projects",
        instruction.chars().count(),
        updated.experience.len(),
        updated.skills.len(),
        updated.projects.len()
    );

    Ok(updated)
}
