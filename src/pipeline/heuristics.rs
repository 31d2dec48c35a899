// src/pipeline/heuristics.rs
//! Keyword and regex heuristics backing the fallback path. Rule order is
//! part of the contract: senior markers are checked before mid markers,
//! industries in the fixed order technology, marketing, healthcare.

use regex::Regex;
use std::sync::OnceLock;

pub const ENTRY_LEVEL: &str = "entry-level";
pub const MID_LEVEL: &str = "mid-level";
pub const SENIOR_LEVEL: &str = "senior-level";

const SENIOR_MARKERS: &[&str] = &["senior", "lead", "manager"];
const MID_MARKERS: &[&str] = &["mid", "experienced", "3-5", "5+"];

const TECHNOLOGY_MARKERS: &[&str] = &[
    "software",
    "developer",
    "engineer",
    "technology",
    "programming",
    "technical",
    "data",
    "cloud",
];
const MARKETING_MARKERS: &[&str] = &[
    "marketing",
    "brand",
    "advertising",
    "seo",
    "campaign",
    "social media",
];
const HEALTHCARE_MARKERS: &[&str] = &[
    "health",
    "medical",
    "clinical",
    "nurse",
    "patient",
    "pharma",
];

/// Vocabulary intersected against input text for skill extraction.
const SKILL_VOCABULARY: &[&str] = &[
    "javascript",
    "typescript",
    "python",
    "java",
    "react",
    "node",
    "sql",
    "aws",
    "docker",
    "kubernetes",
    "technology",
    "analytics",
    "excel",
    "design",
    "marketing",
    "sales",
    "communication",
    "leadership",
    "project management",
    "teamwork",
];

const GENERIC_SKILLS: &[&str] = &[
    "Communication",
    "Problem Solving",
    "Teamwork",
    "Time Management",
    "Adaptability",
];

const MAX_EXTRACTED_SKILLS: usize = 5;

fn contains_any(haystack: &str, markers: &[&str]) -> bool {
    markers.iter().any(|marker| haystack.contains(marker))
}

/// Classify seniority from free text. Senior markers win over mid markers.
pub fn experience_level(text: &str) -> &'static str {
    let lower = text.to_lowercase();
    if contains_any(&lower, SENIOR_MARKERS) {
        SENIOR_LEVEL
    } else if contains_any(&lower, MID_MARKERS) {
        MID_LEVEL
    } else {
        ENTRY_LEVEL
    }
}

/// Classify industry from free text, defaulting to "Education" when no
/// marker matches (kept from the original rule table).
pub fn industry(text: &str) -> &'static str {
    let lower = text.to_lowercase();
    if contains_any(&lower, TECHNOLOGY_MARKERS) {
        "Technology"
    } else if contains_any(&lower, MARKETING_MARKERS) {
        "Marketing"
    } else if contains_any(&lower, HEALTHCARE_MARKERS) {
        "Healthcare"
    } else {
        "Education"
    }
}

/// Intersect the skill vocabulary against the input text. Returns the first
/// five title-cased matches, or the generic skill list when nothing matches.
pub fn skills(text: &str) -> Vec<String> {
    let lower = text.to_lowercase();
    let matched: Vec<String> = SKILL_VOCABULARY
        .iter()
        .filter(|skill| lower.contains(*skill))
        .take(MAX_EXTRACTED_SKILLS)
        .map(|skill| title_case(skill))
        .collect();

    if matched.is_empty() {
        GENERIC_SKILLS.iter().map(|s| s.to_string()).collect()
    } else {
        matched
    }
}

fn title_case(text: &str) -> String {
    text.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn email_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}").expect("email regex")
    })
}

fn phone_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\+?\d[\d\s().-]{7,}\d").expect("phone regex")
    })
}

/// First email address found in the text.
pub fn sniff_email(text: &str) -> Option<String> {
    email_regex().find(text).map(|m| m.as_str().to_string())
}

/// First phone-number-looking span found in the text.
pub fn sniff_phone(text: &str) -> Option<String> {
    phone_regex().find(text).map(|m| m.as_str().trim().to_string())
}

/// Guess a person's name from the first short line that carries no digits
/// or email markers.
pub fn sniff_name(text: &str) -> Option<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .take(3)
        .find(|line| {
            line.len() <= 60
                && !line.contains('@')
                && !line.chars().any(|c| c.is_ascii_digit())
                && line.split_whitespace().count() <= 5
        })
        .map(|line| line.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_experience_level_order() {
        // Senior markers win even when mid markers are also present.
        assert_eq!(experience_level("Senior engineer, 5+ years"), SENIOR_LEVEL);
        assert_eq!(experience_level("experienced developer"), MID_LEVEL);
        assert_eq!(experience_level("3-5 years required"), MID_LEVEL);
        assert_eq!(experience_level("junior position"), ENTRY_LEVEL);
        assert_eq!(experience_level("Team LEAD wanted"), SENIOR_LEVEL);
    }

    #[test]
    fn test_industry_classification() {
        assert_eq!(industry("software engineer at a startup"), "Technology");
        assert_eq!(industry("brand and SEO specialist"), "Marketing");
        assert_eq!(industry("registered nurse, patient care"), "Healthcare");
        assert_eq!(industry("curriculum planning role"), "Education");
    }

    #[test]
    fn test_skills_extraction() {
        let found = skills("We use Python, React and AWS with strong communication");
        assert!(found.contains(&"Python".to_string()));
        assert!(found.contains(&"React".to_string()));
        assert!(found.len() <= 5);

        let generic = skills("nothing relevant here");
        assert_eq!(generic.len(), 5);
        assert!(generic.contains(&"Communication".to_string()));
    }

    #[test]
    fn test_contact_sniffing() {
        let text = "Jane Doe\njane.doe@example.com\n+1 (555) 123-4567";
        assert_eq!(sniff_name(text).as_deref(), Some("Jane Doe"));
        assert_eq!(sniff_email(text).as_deref(), Some("jane.doe@example.com"));
        assert_eq!(sniff_phone(text).as_deref(), Some("+1 (555) 123-4567"));
        assert!(sniff_email("no contact info").is_none());
    }
}
