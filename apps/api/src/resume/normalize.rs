//! Normalization: the pure pass that turns untrusted model output into a `Resume`.
//!
//! Both the extraction and the mutation engines run their generated JSON through
//! `normalize`. Whatever the model returned, the result satisfies the record's
//! invariants:
//! - every collection is a sequence (missing or non-array → empty)
//! - every optional scalar is a meaningful value or `None` (null, "", 0, false → `None`)
//! - entries that cannot be rendered (no required field at all) are dropped
//!
//! `normalize` is idempotent: `normalize(to_value(normalize(v))) == normalize(v)`.

use serde_json::{Map, Value};

use crate::models::resume::{Education, Experience, Project, Resume};

/// Normalizes a generated JSON value into a `Resume`.
///
/// Callers check that the value is an object first; anything else yields a
/// resume with every field absent.
pub fn normalize(raw: &Value) -> Resume {
    let empty = Map::new();
    let obj = raw.as_object().unwrap_or(&empty);

    Resume {
        name: text_field(obj, "name"),
        email: text_field(obj, "email"),
        phone: text_field(obj, "phone"),
        website: text_field(obj, "website"),
        location: text_field(obj, "location"),
        summary: text_field(obj, "summary"),
        experience: entries(obj, "experience", normalize_experience),
        education: entries(obj, "education", normalize_education),
        skills: string_list(obj.get("skills")).unwrap_or_default(),
        projects: entries(obj, "projects", normalize_project),
    }
}

fn normalize_experience(obj: &Map<String, Value>) -> Option<Experience> {
    let title = text_field(obj, "title");
    let company = text_field(obj, "company");
    if title.is_none() && company.is_none() {
        return None;
    }

    Some(Experience {
        title: title.unwrap_or_default(),
        company: company.unwrap_or_default(),
        location: text_field(obj, "location"),
        start_date: text_field(obj, "startDate"),
        end_date: text_field(obj, "endDate"),
        description: text_field(obj, "description"),
        responsibilities: string_list(obj.get("responsibilities")),
    })
}

fn normalize_education(obj: &Map<String, Value>) -> Option<Education> {
    let degree = text_field(obj, "degree");
    let institution = text_field(obj, "institution");
    if degree.is_none() && institution.is_none() {
        return None;
    }

    Some(Education {
        degree: degree.unwrap_or_default(),
        institution: institution.unwrap_or_default(),
        location: text_field(obj, "location"),
        year: text_field(obj, "year"),
        description: text_field(obj, "description"),
    })
}

fn normalize_project(obj: &Map<String, Value>) -> Option<Project> {
    Some(Project {
        name: text_field(obj, "name")?,
        description: text_field(obj, "description"),
        technologies: string_list(obj.get("technologies")),
        url: text_field(obj, "url"),
    })
}

/// Maps every object element of `obj[key]` through `f`, dropping the rest.
fn entries<T>(
    obj: &Map<String, Value>,
    key: &str,
    f: impl Fn(&Map<String, Value>) -> Option<T>,
) -> Vec<T> {
    obj.get(key)
        .and_then(Value::as_array)
        .map(|arr| arr.iter().filter_map(Value::as_object).filter_map(f).collect())
        .unwrap_or_default()
}

fn text_field(obj: &Map<String, Value>, key: &str) -> Option<String> {
    obj.get(key).and_then(as_text)
}

/// Reads a scalar as text. Falsy values and containers are absent; non-zero
/// numbers keep their textual form (models like to emit `"year": 2019`).
fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) if n.as_f64() != Some(0.0) => Some(n.to_string()),
        _ => None,
    }
}

/// Keeps the non-blank string elements of an array. Non-arrays are absent.
fn string_list(value: Option<&Value>) -> Option<Vec<String>> {
    let arr = value?.as_array()?;
    Some(
        arr.iter()
            .filter_map(Value::as_str)
            .filter(|s| !s.trim().is_empty())
            .map(String::from)
            .collect(),
    )
}
