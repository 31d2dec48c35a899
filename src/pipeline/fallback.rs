// src/pipeline/fallback.rs
//! Deterministic fallback results derived from the original user input.
//! These run when the completion output cannot be parsed or validated, so
//! every function here must return a fully valid shape.

use crate::pipeline::{
    heuristics, ContactInfo, EnhancedResume, GeneratedContent, GenerationInput, JobAnalysis,
    ParsedResume, ResumeScore,
};
use crate::pipeline::prompt::NOT_SPECIFIED;

const FALLBACK_ATS_SCORE: f64 = 65.0;
const MAX_EXPERIENCE_BULLETS: usize = 5;

fn generic_recommendations() -> Vec<String> {
    vec![
        "Tailor your resume to the skills listed in the posting".to_string(),
        "Quantify achievements with concrete numbers".to_string(),
        "Mirror the job description's key terms for ATS matching".to_string(),
    ]
}

fn generic_improvements() -> Vec<String> {
    vec![
        "Add measurable results to each experience entry".to_string(),
        "Include keywords from the target job description".to_string(),
        "Keep formatting simple so ATS systems can parse it".to_string(),
    ]
}

fn contact_info(text: &str) -> ContactInfo {
    ContactInfo {
        name: heuristics::sniff_name(text).unwrap_or_default(),
        email: heuristics::sniff_email(text).unwrap_or_default(),
        phone: heuristics::sniff_phone(text).unwrap_or_default(),
        location: String::new(),
    }
}

fn experience_bullets(resume_text: &str) -> Vec<String> {
    resume_text
        .lines()
        .map(str::trim)
        .filter(|line| line.len() > 30)
        .take(MAX_EXPERIENCE_BULLETS)
        .map(|line| {
            line.trim_start_matches(['-', '*', '•'])
                .trim()
                .to_string()
        })
        .collect()
}

pub fn job_analysis(job_description: &str) -> JobAnalysis {
    JobAnalysis {
        required_skills: heuristics::skills(job_description),
        experience_level: heuristics::experience_level(job_description).to_string(),
        industry: heuristics::industry(job_description).to_string(),
        recommendations: generic_recommendations(),
    }
}

pub fn enhancement(resume_text: &str, job_title: Option<&str>) -> EnhancedResume {
    EnhancedResume {
        personal_info: contact_info(resume_text),
        job_title: job_title
            .filter(|t| !t.trim().is_empty())
            .unwrap_or(NOT_SPECIFIED)
            .to_string(),
        experience: experience_bullets(resume_text),
        skills: heuristics::skills(resume_text),
        education: String::new(),
        certifications: Vec::new(),
    }
}

pub fn generation(input: &GenerationInput) -> GeneratedContent {
    let context = format!(
        "{} {} {}",
        input.job_title,
        input.skills.join(" "),
        input.target_job_description.as_deref().unwrap_or_default()
    );
    let skills = if input.skills.is_empty() {
        heuristics::skills(&context)
    } else {
        input.skills.clone()
    };

    let experience: Vec<String> = input
        .experience
        .iter()
        .map(|entry| match entry.as_str() {
            Some(text) => text.to_string(),
            None => entry.to_string(),
        })
        .collect();

    GeneratedContent {
        summary: format!(
            "{} professional with a background in {}.",
            input.job_title,
            skills.join(", ")
        ),
        enhanced_experience: experience,
        optimized_skills: skills,
        ats_score: FALLBACK_ATS_SCORE,
        improvement_suggestions: generic_improvements(),
    }
}

pub fn summary(job_title: &str, skills: &[String]) -> String {
    let skills = if skills.is_empty() {
        heuristics::skills(job_title)
    } else {
        skills.to_vec()
    };
    format!(
        "Motivated {} with hands-on experience in {}. \
         Known for delivering reliable results and collaborating across teams.",
        job_title,
        skills.join(", ")
    )
}

pub fn skills(job_title: &str, experience: Option<&str>) -> Vec<String> {
    let combined = format!("{} {}", job_title, experience.unwrap_or_default());
    heuristics::skills(&combined)
}

pub fn scoring(resume_text: &str, job_description: Option<&str>) -> ResumeScore {
    let resume_skills = heuristics::skills(resume_text);
    let keyword_matches: Vec<String> = match job_description {
        Some(jd) => {
            let jd_lower = jd.to_lowercase();
            resume_skills
                .iter()
                .filter(|skill| jd_lower.contains(&skill.to_lowercase()))
                .cloned()
                .collect()
        }
        None => Vec::new(),
    };

    let score = (40 + 8 * keyword_matches.len()).min(90) as f64;

    ResumeScore {
        ats_score: score,
        strengths: resume_skills
            .iter()
            .map(|skill| format!("Demonstrated experience with {}", skill))
            .take(3)
            .collect(),
        improvements: generic_improvements(),
        keyword_matches,
    }
}

pub fn parsing(resume_text: &str) -> ParsedResume {
    let first_paragraph = resume_text
        .split("\n\n")
        .map(str::trim)
        .find(|p| !p.is_empty())
        .unwrap_or_default();

    ParsedResume {
        personal_info: contact_info(resume_text),
        summary: first_paragraph.chars().take(300).collect(),
        skills: heuristics::skills(resume_text),
        experience: experience_bullets(resume_text),
        education: String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_analysis_scenario() {
        let analysis =
            job_analysis("Senior software engineer needed, 5+ years, technology company");
        assert_eq!(analysis.experience_level, "senior-level");
        assert_eq!(analysis.industry, "Technology");
        assert!(analysis.required_skills.contains(&"Technology".to_string()));
        assert!(!analysis.recommendations.is_empty());
    }

    #[test]
    fn test_job_analysis_always_well_shaped() {
        let analysis = job_analysis("");
        assert!(!analysis.required_skills.is_empty());
        assert_eq!(analysis.experience_level, "entry-level");
        assert_eq!(analysis.industry, "Education");
    }

    #[test]
    fn test_enhancement_extracts_contact_info() {
        let resume = "Jane Doe\njane@example.com\n\n\
                      Led migration of billing services to Kubernetes and AWS";
        let enhanced = enhancement(resume, Some("Platform Engineer"));
        assert_eq!(enhanced.personal_info.name, "Jane Doe");
        assert_eq!(enhanced.personal_info.email, "jane@example.com");
        assert_eq!(enhanced.job_title, "Platform Engineer");
        assert!(!enhanced.experience.is_empty());
    }

    #[test]
    fn test_scoring_counts_keyword_matches() {
        let resume = "Python and SQL developer with AWS experience";
        let score = scoring(resume, Some("Looking for Python and AWS skills"));
        assert!(score.keyword_matches.contains(&"Python".to_string()));
        assert!(score.ats_score >= 40.0 && score.ats_score <= 90.0);
    }

    #[test]
    fn test_parsing_is_deterministic() {
        let resume = "John Smith\njohn@work.io\n\nSummary paragraph here.";
        assert_eq!(parsing(resume), parsing(resume));
    }
}
