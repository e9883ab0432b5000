// Shared prompt constants.
// Each service that needs LLM calls defines its own prompts.rs alongside it.
// This file contains cross-cutting prompt fragments.

/// System prompt that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You are a precise, structured assistant. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// The resume output contract shared by extraction and mutation prompts.
pub const RESUME_SCHEMA: &str = r#"{
  "name": "string or null",
  "email": "string or null",
  "phone": "string or null",
  "website": "string or null",
  "location": "string or null",
  "summary": "string or null",
  "experience": [{"title": "string", "company": "string", "location": "string or null", "startDate": "string or null", "endDate": "string or null", "description": "string or null", "responsibilities": ["string"]}],
  "education": [{"degree": "string", "institution": "string", "location": "string or null", "year": "string or null", "description": "string or null"}],
  "skills": ["string"],
  "projects": [{"name": "string", "description": "string or null", "technologies": ["string"], "url": "string or null"}]
}"#;

/// Instruction appended to every resume-producing prompt.
pub const ABSENCE_INSTRUCTION: &str = "\
    Use null for any scalar you cannot find — never an empty string or a placeholder like \"N/A\". \
    Always include all four arrays (experience, education, skills, projects), using [] when empty. \
    Do NOT invent employers, dates, degrees, or contact details that are not in the input.";
