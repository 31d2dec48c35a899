// src/pipeline/schema.rs
//! Per-feature shape checking for parsed completion output. Required-key
//! violations reject the whole object; missing optional keys are filled
//! with empty defaults.

use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy)]
pub enum Kind {
    Str,
    StrArray,
    /// Array of strings that must contain at least one element.
    NonEmptyStrArray,
    Number,
    Object,
    OneOf(&'static [&'static str]),
}

#[derive(Debug, Clone, Copy)]
pub struct Field {
    pub name: &'static str,
    pub kind: Kind,
    pub required: bool,
}

const fn required(name: &'static str, kind: Kind) -> Field {
    Field {
        name,
        kind,
        required: true,
    }
}

const fn optional(name: &'static str, kind: Kind) -> Field {
    Field {
        name,
        kind,
        required: false,
    }
}

pub const EXPERIENCE_LEVELS: &[&str] =
    &["entry-level", "mid-level", "senior-level", "executive"];

pub const JOB_ANALYSIS: &[Field] = &[
    required("requiredSkills", Kind::NonEmptyStrArray),
    required("experienceLevel", Kind::OneOf(EXPERIENCE_LEVELS)),
    required("industry", Kind::Str),
    required("recommendations", Kind::StrArray),
];

pub const ENHANCEMENT: &[Field] = &[
    required("personalInfo", Kind::Object),
    required("jobTitle", Kind::Str),
    required("experience", Kind::StrArray),
    required("skills", Kind::StrArray),
    optional("education", Kind::Str),
    optional("certifications", Kind::StrArray),
];

pub const GENERATION: &[Field] = &[
    required("summary", Kind::Str),
    required("enhancedExperience", Kind::StrArray),
    required("optimizedSkills", Kind::StrArray),
    required("atsScore", Kind::Number),
    required("improvementSuggestions", Kind::StrArray),
];

pub const SCORING: &[Field] = &[
    required("atsScore", Kind::Number),
    required("strengths", Kind::StrArray),
    required("improvements", Kind::StrArray),
    optional("keywordMatches", Kind::StrArray),
];

pub const SUMMARY: &[Field] = &[required("summary", Kind::Str)];

pub const SKILLS: &[Field] = &[required("skills", Kind::NonEmptyStrArray)];

pub const PARSING: &[Field] = &[
    required("personalInfo", Kind::Object),
    optional("summary", Kind::Str),
    required("skills", Kind::StrArray),
    required("experience", Kind::StrArray),
    optional("education", Kind::Str),
];

fn matches_kind(value: &Value, kind: Kind) -> bool {
    match kind {
        Kind::Str => value.is_string(),
        Kind::StrArray => value
            .as_array()
            .is_some_and(|items| items.iter().all(Value::is_string)),
        Kind::NonEmptyStrArray => value
            .as_array()
            .is_some_and(|items| !items.is_empty() && items.iter().all(Value::is_string)),
        Kind::Number => value.is_number(),
        Kind::Object => value.is_object(),
        Kind::OneOf(allowed) => value
            .as_str()
            .is_some_and(|s| allowed.contains(&s)),
    }
}

fn default_for(kind: Kind) -> Value {
    match kind {
        Kind::Str | Kind::OneOf(_) => Value::String(String::new()),
        Kind::StrArray | Kind::NonEmptyStrArray => Value::Array(Vec::new()),
        Kind::Number => Value::from(0),
        Kind::Object => Value::Object(Map::new()),
    }
}

/// Check `value` against `fields`. Returns a description of the first
/// violation, or fills in defaults for absent optional keys and succeeds.
pub fn validate(value: &mut Value, fields: &[Field]) -> Result<(), String> {
    let object = value
        .as_object_mut()
        .ok_or_else(|| "expected a JSON object".to_string())?;

    for field in fields {
        match object.get(field.name) {
            Some(found) => {
                if !matches_kind(found, field.kind) {
                    return Err(format!(
                        "field '{}' has the wrong type or is empty",
                        field.name
                    ));
                }
            }
            None if field.required => {
                return Err(format!("required field '{}' is missing", field.name));
            }
            None => {
                object.insert(field.name.to_string(), default_for(field.kind));
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_valid_job_analysis_passes() {
        let mut value = json!({
            "requiredSkills": ["Rust"],
            "experienceLevel": "senior-level",
            "industry": "Technology",
            "recommendations": ["Mention Tokio"]
        });
        assert!(validate(&mut value, JOB_ANALYSIS).is_ok());
    }

    #[test]
    fn test_missing_required_field_rejected() {
        let mut value = json!({
            "requiredSkills": ["Rust"],
            "industry": "Technology",
            "recommendations": []
        });
        let err = validate(&mut value, JOB_ANALYSIS).unwrap_err();
        assert!(err.contains("experienceLevel"));
    }

    #[test]
    fn test_wrong_type_rejected() {
        let mut value = json!({
            "requiredSkills": "Rust",
            "experienceLevel": "senior-level",
            "industry": "Technology",
            "recommendations": []
        });
        assert!(validate(&mut value, JOB_ANALYSIS).is_err());
    }

    #[test]
    fn test_empty_required_skills_rejected() {
        let mut value = json!({
            "requiredSkills": [],
            "experienceLevel": "mid-level",
            "industry": "Technology",
            "recommendations": []
        });
        assert!(validate(&mut value, JOB_ANALYSIS).is_err());
    }

    #[test]
    fn test_unknown_enum_value_rejected() {
        let mut value = json!({
            "requiredSkills": ["Rust"],
            "experienceLevel": "principal",
            "industry": "Technology",
            "recommendations": []
        });
        assert!(validate(&mut value, JOB_ANALYSIS).is_err());
    }

    #[test]
    fn test_optional_fields_filled_with_defaults() {
        let mut value = json!({
            "personalInfo": {"name": "Jane"},
            "jobTitle": "Engineer",
            "experience": ["Built services"],
            "skills": ["Rust"]
        });
        validate(&mut value, ENHANCEMENT).unwrap();
        assert_eq!(value["education"], json!(""));
        assert_eq!(value["certifications"], json!([]));
    }

    #[test]
    fn test_non_object_rejected() {
        let mut value = json!(["not", "an", "object"]);
        assert!(validate(&mut value, SUMMARY).is_err());
    }
}
