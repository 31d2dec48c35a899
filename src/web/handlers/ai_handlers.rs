// src/web/handlers/ai_handlers.rs - AI-backed content endpoints

use crate::pipeline::{GenerationInput, Pipeline, Source};
use crate::web::types::*;

use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::State;
use tracing::{error, info};

fn log_source(feature: &str, source: Source) {
    match source {
        Source::Model => info!("{} served from model output", feature),
        Source::Fallback => info!("{} served from fallback heuristics", feature),
    }
}

pub async fn analyze_job_handler(
    request: Json<AnalyzeJobRequest>,
    pipeline: &State<Pipeline>,
) -> Result<Json<AnalysisResponse>, ApiError> {
    let job_description = request.job_description.trim();
    if job_description.is_empty() {
        return Err(api_error(Status::BadRequest, "Job description is required"));
    }

    match pipeline.analyze_job(job_description).await {
        Ok((analysis, source)) => {
            log_source("Job analysis", source);
            Ok(Json(AnalysisResponse {
                success: true,
                analysis,
            }))
        }
        Err(e) => {
            error!("Job analysis failed: {}", e);
            Err(completion_error(&e))
        }
    }
}

pub async fn enhance_resume_handler(
    request: Json<EnhanceResumeRequest>,
    pipeline: &State<Pipeline>,
) -> Result<Json<EnhanceResponse>, ApiError> {
    let resume_text = request.resume_text.trim();
    if resume_text.is_empty() {
        return Err(api_error(Status::BadRequest, "Resume text is required"));
    }

    match pipeline
        .enhance_resume(
            resume_text,
            request.job_description.as_deref(),
            request.job_title.as_deref(),
        )
        .await
    {
        Ok((enhanced_data, source)) => {
            log_source("Resume enhancement", source);
            Ok(Json(EnhanceResponse {
                success: true,
                enhanced_data,
            }))
        }
        Err(e) => {
            error!("Resume enhancement failed: {}", e);
            Err(completion_error(&e))
        }
    }
}

pub async fn generate_resume_handler(
    request: Json<GenerationInput>,
    pipeline: &State<Pipeline>,
) -> Result<Json<GenerateResponse>, ApiError> {
    if request.job_title.trim().is_empty() {
        return Err(api_error(Status::BadRequest, "Job title is required"));
    }

    match pipeline.generate_resume(&request).await {
        Ok((content, source)) => {
            log_source("Resume generation", source);
            Ok(Json(GenerateResponse {
                success: true,
                content,
            }))
        }
        Err(e) => {
            error!("Resume generation failed: {}", e);
            Err(completion_error(&e))
        }
    }
}

pub async fn generate_summary_handler(
    request: Json<GenerateSummaryRequest>,
    pipeline: &State<Pipeline>,
) -> Result<Json<SummaryResponse>, ApiError> {
    let job_title = request.job_title.trim();
    if job_title.is_empty() {
        return Err(api_error(Status::BadRequest, "Job title is required"));
    }

    let skills = request.skills.clone().unwrap_or_default();
    match pipeline
        .generate_summary(job_title, request.experience.as_deref(), &skills)
        .await
    {
        Ok((summary, source)) => {
            log_source("Summary generation", source);
            Ok(Json(SummaryResponse {
                success: true,
                summary,
            }))
        }
        Err(e) => {
            error!("Summary generation failed: {}", e);
            Err(completion_error(&e))
        }
    }
}

pub async fn generate_skills_handler(
    request: Json<GenerateSkillsRequest>,
    pipeline: &State<Pipeline>,
) -> Result<Json<SkillsResponse>, ApiError> {
    let job_title = request.job_title.trim();
    if job_title.is_empty() {
        return Err(api_error(Status::BadRequest, "Job title is required"));
    }

    match pipeline
        .generate_skills(job_title, request.experience.as_deref())
        .await
    {
        Ok((skills, source)) => {
            log_source("Skill suggestion", source);
            Ok(Json(SkillsResponse {
                success: true,
                skills,
            }))
        }
        Err(e) => {
            error!("Skill suggestion failed: {}", e);
            Err(completion_error(&e))
        }
    }
}

pub async fn score_resume_handler(
    request: Json<ScoreResumeRequest>,
    pipeline: &State<Pipeline>,
) -> Result<Json<ScoreResponse>, ApiError> {
    let resume_text = request.resume_text.trim();
    if resume_text.is_empty() {
        return Err(api_error(Status::BadRequest, "Resume text is required"));
    }

    match pipeline
        .score_resume(resume_text, request.job_description.as_deref())
        .await
    {
        Ok((score, source)) => {
            log_source("Resume scoring", source);
            Ok(Json(ScoreResponse {
                success: true,
                score,
            }))
        }
        Err(e) => {
            error!("Resume scoring failed: {}", e);
            Err(completion_error(&e))
        }
    }
}

pub async fn parse_resume_handler(
    request: Json<ParseResumeRequest>,
    pipeline: &State<Pipeline>,
) -> Result<Json<ParseResponse>, ApiError> {
    let resume_text = request.resume_text.trim();
    if resume_text.is_empty() {
        return Err(api_error(Status::BadRequest, "Resume text is required"));
    }

    match pipeline.parse_resume(resume_text).await {
        Ok((parsed, source)) => {
            log_source("Resume parsing", source);
            Ok(Json(ParseResponse {
                success: true,
                parsed,
            }))
        }
        Err(e) => {
            error!("Resume parsing failed: {}", e);
            Err(completion_error(&e))
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

    #[tokio::test]
    async fn test_blank_job_description_rejected() {
        let pipeline = unconfigured_pipeline();
        let state = rocket::State::from(&pipeline);

        let err = analyze_job_handler(
            Json(AnalyzeJobRequest {
                job_description: "   ".to_string(),
            }),
            state,
        )
        .await
        .err()
        .unwrap();

        assert_eq!(err.0, Status::BadRequest);
        assert!(!err.1.success);
        assert_eq!(err.1.error, "Job description is required");
    }

    #[tokio::test]
    async fn test_analyze_job_answers_with_fallback_when_unavailable() {
        let pipeline = unconfigured_pipeline();
        let state = rocket::State::from(&pipeline);

        let response = analyze_job_handler(
            Json(AnalyzeJobRequest {
                job_description: "Senior software engineer needed, 5+ years, technology company"
                    .to_string(),
            }),
            state,
        )
        .await
        .unwrap();

        assert!(response.success);
        assert_eq!(response.analysis.experience_level, "senior-level");
        assert_eq!(response.analysis.industry, "Technology");
    }

    #[tokio::test]
    async fn test_blank_resume_text_rejected() {
        let pipeline = unconfigured_pipeline();
        let state = rocket::State::from(&pipeline);

        let err = enhance_resume_handler(
            Json(EnhanceResumeRequest {
                resume_text: String::new(),
                job_description: None,
                job_title: None,
            }),
            state,
        )
        .await
        .err()
        .unwrap();

        assert_eq!(err.0, Status::BadRequest);
        assert_eq!(err.1.error, "Resume text is required");
    }
}
