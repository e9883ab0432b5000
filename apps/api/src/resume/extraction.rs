//! Extraction engine: scraped portfolio text → normalized `Resume`.

use tracing::info;

use crate::errors::AppError;
use crate::llm_client::prompts::{ABSENCE_INSTRUCTION, RESUME_SCHEMA};
use crate::llm_client::{generate_json, GenerationRequest, StructuredGenerator, GENERATION_MODEL};
use crate::models::resume::Resume;
use crate::resume::prompts::{fill, EXTRACTION_PROMPT_TEMPLATE, EXTRACTION_SYSTEM};
use crate::resume::{engine_error, resume_from_output, truncate_chars};

/// Characters of scraped content sent to the extraction model.
pub const MAX_EXTRACTION_CHARS: usize = 8000;

pub async fn extract_resume(
    llm: &dyn StructuredGenerator,
    raw_text: &str,
) -> Result<Resume, AppError> {
    let request = GenerationRequest {
        model: GENERATION_MODEL,
        system: EXTRACTION_SYSTEM,
        prompt: fill(
            EXTRACTION_PROMPT_TEMPLATE,
            &[
                ("schema", RESUME_SCHEMA),
                ("absence_instruction", ABSENCE_INSTRUCTION),
                ("content", truncate_chars(raw_text, MAX_EXTRACTION_CHARS)),
            ],
        ),
        temperature: 0.3,
        max_tokens: 2048,
    };

    let value = generate_json(llm, &request)
        .await
        .map_err(|e| engine_error(e, AppError::Extraction))?;
    let resume = resume_from_output(&value).map_err(AppError::Extraction)?;

    info!(
        "Extracted resume: {} experience, {} education, {} skills, {} projects",
        resume.experience.len(),
        resume.education.len(),
        resume.skills.len(),
        resume.projects.len()
    );

    Ok(resume)
}
