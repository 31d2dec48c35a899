// src/pipeline/mod.rs
//! Normalization pipeline shared by every AI-backed feature: build prompt,
//! call the completion service, sanitize, parse, validate, and fall back to
//! deterministic heuristics when the model output cannot be salvaged.
//!
//! Transport failures (auth, rate limit, timeout, network) propagate to the
//! caller. A missing credential or an unusable completion body never does:
//! those resolve through the fallback path so every invocation returns a
//! well-shaped result.

pub mod fallback;
pub mod heuristics;
pub mod prompt;
pub mod sanitize;
pub mod schema;

use crate::completion::{CompletionClient, CompletionError, CompletionParams};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Which path produced the result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Model,
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobAnalysis {
    pub required_skills: Vec<String>,
    pub experience_level: String,
    pub industry: String,
    pub recommendations: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactInfo {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub location: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnhancedResume {
    pub personal_info: ContactInfo,
    pub job_title: String,
    pub experience: Vec<String>,
    pub skills: Vec<String>,
    pub education: String,
    pub certifications: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedContent {
    pub summary: String,
    pub enhanced_experience: Vec<String>,
    pub optimized_skills: Vec<String>,
    pub ats_score: f64,
    pub improvement_suggestions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeScore {
    pub ats_score: f64,
    pub strengths: Vec<String>,
    pub improvements: Vec<String>,
    #[serde(default)]
    pub keyword_matches: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedResume {
    pub personal_info: ContactInfo,
    #[serde(default)]
    pub summary: String,
    pub skills: Vec<String>,
    pub experience: Vec<String>,
    #[serde(default)]
    pub education: String,
}

/// Input for full resume generation, taken verbatim from the request body.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationInput {
    #[serde(default)]
    pub personal_info: serde_json::Value,
    #[serde(default)]
    pub experience: Vec<serde_json::Value>,
    #[serde(default)]
    pub skills: Vec<String>,
    pub job_title: String,
    #[serde(default)]
    pub target_job_description: Option<String>,
    #[serde(default)]
    pub industry_focus: Option<String>,
}

#[derive(Deserialize)]
struct SummaryPayload {
    summary: String,
}

#[derive(Deserialize)]
struct SkillsPayload {
    skills: Vec<String>,
}

/// Sanitize, parse, and validate completion text into `T`. `None` means
/// the text was unusable and the caller should fall back.
fn normalize<T: DeserializeOwned>(raw: &str, fields: &[schema::Field]) -> Option<T> {
    let text = sanitize::sanitize(raw);
    let mut value = match sanitize::parse_object(&text) {
        Some(value) => value,
        None => {
            warn!("Completion text did not contain a JSON object");
            return None;
        }
    };

    if let Err(issue) = schema::validate(&mut value, fields) {
        warn!("Completion output failed validation: {}", issue);
        return None;
    }

    match serde_json::from_value(value) {
        Ok(result) => Some(result),
        Err(e) => {
            warn!("Validated completion output failed deserialization: {}", e);
            None
        }
    }
}

pub struct Pipeline {
    client: CompletionClient,
}

impl Pipeline {
    pub fn new(client: CompletionClient) -> Self {
        Self { client }
    }

    pub fn is_configured(&self) -> bool {
        self.client.is_configured()
    }

    /// Run one completion and normalize its output. `Ok(None)` means the
    /// caller should synthesize a fallback; `Err` carries transport
    /// failures the fallback does not cover.
    async fn run<T: DeserializeOwned>(
        &self,
        prompt: prompt::Prompt,
        params: CompletionParams,
        fields: &[schema::Field],
    ) -> Result<Option<T>, CompletionError> {
        let raw = match self.client.complete(&prompt, params).await {
            Ok(raw) => raw,
            Err(CompletionError::NotConfigured) => {
                warn!("Completion service not configured, using fallback");
                return Ok(None);
            }
            Err(CompletionError::Malformed) => {
                warn!("Completion response malformed, using fallback");
                return Ok(None);
            }
            Err(e) => return Err(e),
        };

        Ok(normalize(&raw, fields))
    }

    pub async fn analyze_job(
        &self,
        job_description: &str,
    ) -> Result<(JobAnalysis, Source), CompletionError> {
        let params = CompletionParams::new(600, 0.5, 30);
        match self
            .run(prompt::job_analysis(job_description), params, schema::JOB_ANALYSIS)
            .await?
        {
            Some(analysis) => Ok((analysis, Source::Model)),
            None => Ok((fallback::job_analysis(job_description), Source::Fallback)),
        }
    }

    pub async fn enhance_resume(
        &self,
        resume_text: &str,
        job_description: Option<&str>,
        job_title: Option<&str>,
    ) -> Result<(EnhancedResume, Source), CompletionError> {
        let params = CompletionParams::new(2000, 0.7, 60);
        match self
            .run(
                prompt::enhancement(resume_text, job_description, job_title),
                params,
                schema::ENHANCEMENT,
            )
            .await?
        {
            Some(enhanced) => Ok((enhanced, Source::Model)),
            None => Ok((fallback::enhancement(resume_text, job_title), Source::Fallback)),
        }
    }

    pub async fn generate_resume(
        &self,
        input: &GenerationInput,
    ) -> Result<(GeneratedContent, Source), CompletionError> {
        let params = CompletionParams::new(2500, 0.7, 90);
        match self
            .run(prompt::generation(input), params, schema::GENERATION)
            .await?
        {
            Some(content) => Ok((content, Source::Model)),
            None => Ok((fallback::generation(input), Source::Fallback)),
        }
    }

    pub async fn generate_summary(
        &self,
        job_title: &str,
        experience: Option<&str>,
        skills: &[String],
    ) -> Result<(String, Source), CompletionError> {
        let params = CompletionParams::new(300, 0.7, 30);
        match self
            .run::<SummaryPayload>(
                prompt::summary(job_title, experience, skills),
                params,
                schema::SUMMARY,
            )
            .await?
        {
            Some(payload) => Ok((payload.summary, Source::Model)),
            None => Ok((fallback::summary(job_title, skills), Source::Fallback)),
        }
    }

    pub async fn generate_skills(
        &self,
        job_title: &str,
        experience: Option<&str>,
    ) -> Result<(Vec<String>, Source), CompletionError> {
        let params = CompletionParams::new(250, 0.6, 30);
        match self
            .run::<SkillsPayload>(prompt::skills(job_title, experience), params, schema::SKILLS)
            .await?
        {
            Some(payload) => Ok((payload.skills, Source::Model)),
            None => Ok((fallback::skills(job_title, experience), Source::Fallback)),
        }
    }

    pub async fn score_resume(
        &self,
        resume_text: &str,
        job_description: Option<&str>,
    ) -> Result<(ResumeScore, Source), CompletionError> {
        let params = CompletionParams::new(800, 0.3, 45);
        match self
            .run(
                prompt::scoring(resume_text, job_description),
                params,
                schema::SCORING,
            )
            .await?
        {
            Some(score) => Ok((score, Source::Model)),
            None => Ok((
                fallback::scoring(resume_text, job_description),
                Source::Fallback,
            )),
        }
    }

    pub async fn parse_resume(
        &self,
        resume_text: &str,
    ) -> Result<(ParsedResume, Source), CompletionError> {
        let params = CompletionParams::new(2000, 0.2, 120);
        match self
            .run(prompt::parsing(resume_text), params, schema::PARSING)
            .await?
        {
            Some(parsed) => Ok((parsed, Source::Model)),
            None => Ok((fallback::parsing(resume_text), Source::Fallback)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::completion::CompletionClient;

    fn unconfigured_pipeline() -> Pipeline {
        let client =
            CompletionClient::new(None, "https://example.invalid".to_string()).unwrap();
        Pipeline::new(client)
    }

    #[test]
    fn test_normalize_round_trips_valid_output() {
        let raw = r#"{
            "requiredSkills": ["Rust", "Tokio"],
            "experienceLevel": "mid-level",
            "industry": "Technology",
            "recommendations": ["Highlight async experience"]
        }"#;
        let analysis: JobAnalysis = normalize(raw, schema::JOB_ANALYSIS).unwrap();
        let direct: JobAnalysis = serde_json::from_str(raw).unwrap();
        assert_eq!(analysis, direct);
    }

    #[test]
    fn test_normalize_accepts_fenced_output() {
        let raw = "```json\n{\"summary\": \"Seasoned engineer.\"}\n```";
        let payload: SummaryPayload = normalize(raw, schema::SUMMARY).unwrap();
        assert_eq!(payload.summary, "Seasoned engineer.");
    }

    #[test]
    fn test_normalize_rejects_unusable_output() {
        assert!(normalize::<JobAnalysis>("I could not analyze that.", schema::JOB_ANALYSIS)
            .is_none());
        assert!(normalize::<JobAnalysis>(
            r#"{"requiredSkills": [], "experienceLevel": "mid-level",
                "industry": "Technology", "recommendations": []}"#,
            schema::JOB_ANALYSIS
        )
        .is_none());
    }

    #[tokio::test]
    async fn test_service_unavailable_yields_fallback() {
        let pipeline = unconfigured_pipeline();
        let input = "Senior software engineer needed, 5+ years, technology company";

        let (analysis, source) = pipeline.analyze_job(input).await.unwrap();
        assert_eq!(source, Source::Fallback);
        assert_eq!(analysis, fallback::job_analysis(input));
        assert_eq!(analysis.experience_level, "senior-level");
        assert_eq!(analysis.industry, "Technology");
    }

    #[tokio::test]
    async fn test_all_features_fall_back_without_credential() {
        let pipeline = unconfigured_pipeline();

        let (_, source) = pipeline
            .enhance_resume("Some resume text", None, None)
            .await
            .unwrap();
        assert_eq!(source, Source::Fallback);

        let (summary, source) = pipeline
            .generate_summary("Data Analyst", None, &[])
            .await
            .unwrap();
        assert_eq!(source, Source::Fallback);
        assert!(summary.contains("Data Analyst"));

        let (skills, source) = pipeline.generate_skills("Marketer", None).await.unwrap();
        assert_eq!(source, Source::Fallback);
        assert!(!skills.is_empty());

        let (parsed, source) = pipeline
            .parse_resume("Jane Doe\njane@example.com")
            .await
            .unwrap();
        assert_eq!(source, Source::Fallback);
        assert_eq!(parsed.personal_info.email, "jane@example.com");
    }
}
