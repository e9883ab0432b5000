// Resume LLM prompt templates.
// All prompts for the resume module are defined here. Fill them with `fill`, never
// with chained `str::replace`: scraped text and user instructions may themselves
// contain `{placeholder}`-looking text.

/// Sufficiency prompt. Sent with the shared JSON-only system prompt. Replace `{content}` with the truncated scraped text.
pub const SUFFICIENCY_PROMPT_TEMPLATE: &str = r#"Analyze the following scraped website content and determine if it contains enough information to create a basic resume.

A basic resume needs at least:
- A name or personal identifier
- Some professional information: projects, work experience, skills, education, or an about/bio section

Return ONLY a JSON object in this exact format:
{
  "valid": true or false,
  "reason": "brief explanation if invalid, empty string if valid"
}

SCRAPED CONTENT:
{content}"#;

/// System prompt for extraction.
pub const EXTRACTION_SYSTEM: &str = "\
You are a precise resume parser. \
Extract structured resume data from portfolio website content. \
You MUST respond with valid JSON only — no markdown fences, no explanations. \
Only extract facts stated in the content.";

/// Extraction prompt.
/// Replace: {schema}, {absence_instruction}, {content}
pub const EXTRACTION_PROMPT_TEMPLATE: &str = r#"Extract structured resume information from the following portfolio website content.

FIELDS:
- name: full name of the person
- email, phone: contact details if present
- website: personal website or portfolio URL
- location: city, country, or region
- summary: a professional summary of 2-4 sentences combining the bio and focus areas
- experience: work history — job title, company, location, dates, a brief description, and
  responsibilities as short bullet strings when the content lists them
- education: degree, institution, location, year, description
- skills: technical skills, programming languages, tools, and frameworks mentioned
- projects: project name, what it does, technologies used (e.g. React, Rust, Python), and its
  GitHub or demo URL if available

List experience most recent first when dates make that clear; otherwise keep the order of the content.

{absence_instruction}

Return ONLY valid JSON in this exact format:
{schema}

PORTFOLIO CONTENT:
{content}"#;

/// System prompt for mutation.
pub const MUTATION_SYSTEM: &str = "\
You are a careful resume editor. \
You apply exactly the change the user asks for to a structured resume and return the whole resume. \
You MUST respond with valid JSON only — no markdown fences, no explanations.";

/// Mutation prompt.
/// Replace: {resume_json}, {instruction}, {schema}, {absence_instruction}
pub const MUTATION_PROMPT_TEMPLATE: &str = r#"Modify the following resume data based on the user's request.

CURRENT RESUME (JSON):
{resume_json}

USER'S MODIFICATION REQUEST:
"{instruction}"

RULES:
1. Apply ONLY the requested change.
2. Every field the request does not mention must come back with the same meaning — same entries,
   same order, same wording.
3. Return the COMPLETE resume, not just the changed part.
4. When adding to a list (a skill, a project, a bullet), append unless the request says where.

{absence_instruction}

Return ONLY valid JSON in this exact format:
{schema}"#;

/// Fills `{key}` placeholders in a single left-to-right pass.
///
/// Substituted values are never rescanned. Braces that do not name a known key are
/// copied through untouched (the schema examples are full of them).
pub fn fill(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let tail = &rest[start + 1..];
        let matched = vars
            .iter()
            .find(|(key, _)| tail.starts_with(key) && tail[key.len()..].starts_with('}'));

        match matched {
            Some((key, value)) => {
                out.push_str(value);
                rest = &tail[key.len() + 1..];
            }
            None => {
                out.push('{');
                rest = tail;
            }
        }
    }

    out.push_str(rest);
    out
}
