use serde::{Deserialize, Serialize};

/// The structured resume record. Replaced wholesale on every turn, never patched.
///
/// Collections always deserialize to a sequence (missing → empty) so downstream
/// consumers can iterate without checking.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Resume {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub location: Option<String>,
    pub summary: Option<String>,
    #[serde(default)]
    pub experience: Vec<Experience>,
    #[serde(default)]
    pub education: Vec<Education>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub projects: Vec<Project>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Experience {
    pub title: String,
    pub company: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Bullet lines, rendered separately from `description`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub responsibilities: Option<Vec<String>>,
}

impl Experience {
    /// `start - end`, or whichever side is present.
    pub fn date_range(&self) -> Option<String> {
        match (self.start_date.as_deref(), self.end_date.as_deref()) {
            (Some(start), Some(end)) => Some(format!("{start} - {end}")),
            (Some(start), None) => Some(start.to_string()),
            (None, Some(end)) => Some(end.to_string()),
            (None, None) => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Education {
    pub degree: String,
    pub institution: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub technologies: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_collections_deserialize_as_empty() {
        let resume: Resume = serde_json::from_str(r#"{"name": "Ada"}"#).unwrap();
        assert_eq!(resume.name.as_deref(), Some("Ada"));
        assert!(resume.experience.is_empty());
        assert!(resume.education.is_empty());
        assert!(resume.skills.is_empty());
        assert!(resume.projects.is_empty());
    }

    #[test]
    fn test_experience_uses_camel_case_dates() {
        let json = r#"{"title": "Engineer", "company": "Acme", "startDate": "2020", "endDate": "2023"}"#;
        let exp: Experience = serde_json::from_str(json).unwrap();
        assert_eq!(exp.start_date.as_deref(), Some("2020"));
        assert_eq!(exp.end_date.as_deref(), Some("2023"));

        let out = serde_json::to_value(&exp).unwrap();
        assert_eq!(out["startDate"], "2020");
        assert!(out.get("location").is_none());
    }

    #[test]
    fn test_top_level_absent_scalars_serialize_as_null() {
        let out = serde_json::to_value(Resume::default()).unwrap();
        assert!(out["email"].is_null());
        assert_eq!(out["skills"], serde_json::json!([]));
    }

    #[test]
    fn test_experience_without_title_fails_deserialization() {
        let result: Result<Experience, _> = serde_json::from_str(r#"{"company": "Acme"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_date_range_variants() {
        let mut exp = Experience {
            title: "Engineer".to_string(),
            company: "Acme".to_string(),
            ..Default::default()
        };
        assert_eq!(exp.date_range(), None);

        exp.end_date = Some("Present".to_string());
        assert_eq!(exp.date_range().as_deref(), Some("Present"));

        exp.start_date = Some("2021".to_string());
        assert_eq!(exp.date_range().as_deref(), Some("2021 - Present"));
    }
}
