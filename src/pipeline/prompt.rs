// src/pipeline/prompt.rs
//! Prompt assembly. One pure builder per feature; each system instruction
//! pins the exact JSON shape the model must return, and user input is
//! truncated to a per-feature character budget.

use crate::pipeline::GenerationInput;

pub const JOB_DESCRIPTION_BUDGET: usize = 2000;
pub const RESUME_TEXT_BUDGET: usize = 3000;
pub const GENERATION_BUDGET: usize = 4000;

pub const NOT_SPECIFIED: &str = "Not specified";

/// System/user message pair sent to the completion API.
#[derive(Debug, Clone)]
pub struct Prompt {
    pub system: String,
    pub user: String,
}

fn truncate(text: &str, budget: usize) -> String {
    text.chars().take(budget).collect()
}

fn or_not_specified(value: Option<&str>) -> &str {
    match value {
        Some(v) if !v.trim().is_empty() => v,
        _ => NOT_SPECIFIED,
    }
}

fn list_or_not_specified(values: &[String]) -> String {
    if values.is_empty() {
        NOT_SPECIFIED.to_string()
    } else {
        values.join(", ")
    }
}

pub fn job_analysis(job_description: &str) -> Prompt {
    Prompt {
        system: concat!(
            "You are an expert recruiter. Analyze the job description and ",
            "respond with JSON only, exactly this shape: ",
            r#"{"requiredSkills": ["skill"], "#,
            r#""experienceLevel": "entry-level|mid-level|senior-level|executive", "#,
            r#""industry": "name", "recommendations": ["advice"]}"#
        )
        .to_string(),
        user: format!(
            "Job description:\n{}",
            truncate(job_description, JOB_DESCRIPTION_BUDGET)
        ),
    }
}

pub fn enhancement(
    resume_text: &str,
    job_description: Option<&str>,
    job_title: Option<&str>,
) -> Prompt {
    Prompt {
        system: concat!(
            "You are an expert resume writer. Rewrite the resume so it targets ",
            "the given job. Respond with JSON only, exactly this shape: ",
            r#"{"personalInfo": {"name": "", "email": "", "phone": "", "location": ""}, "#,
            r#""jobTitle": "", "experience": ["bullet"], "skills": ["skill"], "#,
            r#""education": "", "certifications": ["name"]}"#
        )
        .to_string(),
        user: format!(
            "Resume:\n{}\n\nTarget job title: {}\n\nTarget job description:\n{}",
            truncate(resume_text, RESUME_TEXT_BUDGET),
            or_not_specified(job_title),
            truncate(or_not_specified(job_description), JOB_DESCRIPTION_BUDGET),
        ),
    }
}

pub fn generation(input: &GenerationInput) -> Prompt {
    let personal_info = serde_json::to_string(&input.personal_info)
        .unwrap_or_else(|_| NOT_SPECIFIED.to_string());
    let experience = serde_json::to_string(&input.experience)
        .unwrap_or_else(|_| NOT_SPECIFIED.to_string());

    Prompt {
        system: concat!(
            "You are an expert resume writer and ATS consultant. Generate ",
            "optimized resume content. Respond with JSON only, exactly this shape: ",
            r#"{"summary": "", "enhancedExperience": ["bullet"], "#,
            r#""optimizedSkills": ["skill"], "atsScore": 0, "#,
            r#""improvementSuggestions": ["advice"]}"#
        )
        .to_string(),
        user: format!(
            "Candidate: {}\nJob title: {}\nExperience: {}\nSkills: {}\n\
             Industry focus: {}\n\nTarget job description:\n{}",
            truncate(&personal_info, GENERATION_BUDGET),
            input.job_title,
            truncate(&experience, GENERATION_BUDGET),
            list_or_not_specified(&input.skills),
            or_not_specified(input.industry_focus.as_deref()),
            truncate(
                or_not_specified(input.target_job_description.as_deref()),
                JOB_DESCRIPTION_BUDGET
            ),
        ),
    }
}

pub fn summary(job_title: &str, experience: Option<&str>, skills: &[String]) -> Prompt {
    Prompt {
        system: concat!(
            "You are an expert resume writer. Write a 2-3 sentence professional ",
            "summary. Respond with JSON only, exactly this shape: ",
            r#"{"summary": ""}"#
        )
        .to_string(),
        user: format!(
            "Job title: {}\nExperience: {}\nSkills: {}",
            job_title,
            truncate(or_not_specified(experience), RESUME_TEXT_BUDGET),
            list_or_not_specified(skills),
        ),
    }
}

pub fn skills(job_title: &str, experience: Option<&str>) -> Prompt {
    Prompt {
        system: concat!(
            "You are an expert recruiter. Suggest the most relevant resume ",
            "skills for the role. Respond with JSON only, exactly this shape: ",
            r#"{"skills": ["skill"]}"#
        )
        .to_string(),
        user: format!(
            "Job title: {}\nExperience: {}",
            job_title,
            truncate(or_not_specified(experience), RESUME_TEXT_BUDGET),
        ),
    }
}

pub fn scoring(resume_text: &str, job_description: Option<&str>) -> Prompt {
    Prompt {
        system: concat!(
            "You are an ATS scoring engine. Score the resume from 0 to 100 ",
            "against the job description. Respond with JSON only, exactly this shape: ",
            r#"{"atsScore": 0, "strengths": ["point"], "improvements": ["point"], "#,
            r#""keywordMatches": ["keyword"]}"#
        )
        .to_string(),
        user: format!(
            "Resume:\n{}\n\nJob description:\n{}",
            truncate(resume_text, RESUME_TEXT_BUDGET),
            truncate(or_not_specified(job_description), JOB_DESCRIPTION_BUDGET),
        ),
    }
}

pub fn parsing(resume_text: &str) -> Prompt {
    Prompt {
        system: concat!(
            "You are a resume parser. Extract structured data from the resume ",
            "text. Respond with JSON only, exactly this shape: ",
            r#"{"personalInfo": {"name": "", "email": "", "phone": "", "location": ""}, "#,
            r#""summary": "", "skills": ["skill"], "experience": ["entry"], "education": ""}"#
        )
        .to_string(),
        user: format!(
            "Resume text:\n{}",
            truncate(resume_text, GENERATION_BUDGET)
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_respects_budget() {
        let long = "x".repeat(5000);
        let prompt = job_analysis(&long);
        let body = prompt.user.strip_prefix("Job description:\n").unwrap();
        assert_eq!(body.chars().count(), JOB_DESCRIPTION_BUDGET);
    }

    #[test]
    fn test_short_input_kept_whole() {
        let prompt = job_analysis("Rust engineer wanted");
        assert!(prompt.user.contains("Rust engineer wanted"));
    }

    #[test]
    fn test_absent_optional_fields_render_placeholder() {
        let prompt = enhancement("resume body", None, None);
        assert!(prompt.user.contains(NOT_SPECIFIED));

        let blank = enhancement("resume body", Some("   "), Some(""));
        assert!(blank.user.contains(NOT_SPECIFIED));
    }

    #[test]
    fn test_system_message_pins_json_shape() {
        let prompt = job_analysis("any");
        assert!(prompt.system.contains("requiredSkills"));
        assert!(prompt.system.contains("experienceLevel"));
    }
}
