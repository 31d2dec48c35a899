// src/web/types.rs - request/response bodies and the error envelope

use crate::completion::CompletionError;
use crate::payments::{Order, PaymentError};
use crate::pipeline::{EnhancedResume, GeneratedContent, JobAnalysis, ParsedResume, ResumeScore};
use crate::storage::StoredResume;
use rocket::http::Status;
use rocket::response::status::Custom;
use rocket::serde::json::Json;
use rocket::serde::{Deserialize, Serialize};

// Requests

#[derive(Deserialize)]
#[serde(crate = "rocket::serde", rename_all = "camelCase")]
pub struct AnalyzeJobRequest {
    pub job_description: String,
}

#[derive(Deserialize)]
#[serde(crate = "rocket::serde", rename_all = "camelCase")]
pub struct EnhanceResumeRequest {
    pub resume_text: String,
    #[serde(default)]
    pub job_description: Option<String>,
    #[serde(default)]
    pub job_title: Option<String>,
}

#[derive(Deserialize)]
#[serde(crate = "rocket::serde", rename_all = "camelCase")]
pub struct GenerateSummaryRequest {
    pub job_title: String,
    #[serde(default)]
    pub experience: Option<String>,
    #[serde(default)]
    pub skills: Option<Vec<String>>,
}

#[derive(Deserialize)]
#[serde(crate = "rocket::serde", rename_all = "camelCase")]
pub struct GenerateSkillsRequest {
    pub job_title: String,
    #[serde(default)]
    pub experience: Option<String>,
}

#[derive(Deserialize)]
#[serde(crate = "rocket::serde", rename_all = "camelCase")]
pub struct ScoreResumeRequest {
    pub resume_text: String,
    #[serde(default)]
    pub job_description: Option<String>,
}

#[derive(Deserialize)]
#[serde(crate = "rocket::serde", rename_all = "camelCase")]
pub struct ParseResumeRequest {
    pub resume_text: String,
}

#[derive(Deserialize)]
#[serde(crate = "rocket::serde", rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub amount: i64,
    #[serde(default)]
    pub currency: Option<String>,
}

#[derive(Deserialize)]
#[serde(crate = "rocket::serde", rename_all = "camelCase")]
pub struct VerifyPaymentRequest {
    pub order_id: String,
    pub payment_id: String,
    pub signature: String,
}

#[derive(Deserialize)]
#[serde(crate = "rocket::serde", rename_all = "camelCase")]
pub struct SaveResumeRequest {
    pub title: String,
    pub data: serde_json::Value,
}

// Responses

#[derive(Serialize)]
#[serde(crate = "rocket::serde", rename_all = "camelCase")]
pub struct AnalysisResponse {
    pub success: bool,
    pub analysis: JobAnalysis,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde", rename_all = "camelCase")]
pub struct EnhanceResponse {
    pub success: bool,
    pub enhanced_data: EnhancedResume,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde", rename_all = "camelCase")]
pub struct GenerateResponse {
    pub success: bool,
    pub content: GeneratedContent,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde", rename_all = "camelCase")]
pub struct SummaryResponse {
    pub success: bool,
    pub summary: String,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde", rename_all = "camelCase")]
pub struct SkillsResponse {
    pub success: bool,
    pub skills: Vec<String>,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde", rename_all = "camelCase")]
pub struct ScoreResponse {
    pub success: bool,
    pub score: ResumeScore,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde", rename_all = "camelCase")]
pub struct ParseResponse {
    pub success: bool,
    pub parsed: ParsedResume,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde", rename_all = "camelCase")]
pub struct OrderResponse {
    pub success: bool,
    pub order: Order,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde", rename_all = "camelCase")]
pub struct VerifyResponse {
    pub success: bool,
    pub verified: bool,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde", rename_all = "camelCase")]
pub struct ResumeResponse {
    pub success: bool,
    pub resume: StoredResume,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde", rename_all = "camelCase")]
pub struct ResumeListResponse {
    pub success: bool,
    pub resumes: Vec<StoredResume>,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde", rename_all = "camelCase")]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde", rename_all = "camelCase")]
pub struct StatusResponse {
    pub status: String,
    pub has_deepseek_key: bool,
    pub has_razorpay_keys: bool,
}

// Error envelope

#[derive(Debug, Serialize)]
#[serde(crate = "rocket::serde")]
pub struct ErrorBody {
    pub success: bool,
    pub error: String,
}

pub type ApiError = Custom<Json<ErrorBody>>;

pub fn api_error(status: Status, message: impl Into<String>) -> ApiError {
    Custom(
        status,
        Json(ErrorBody {
            success: false,
            error: message.into(),
        }),
    )
}

/// Map transport-class completion failures to HTTP statuses. Credential
/// and shape failures never reach here; the pipeline resolves those
/// through the fallback path.
pub fn completion_error(e: &CompletionError) -> ApiError {
    let status = match e {
        CompletionError::Auth => Status::Unauthorized,
        CompletionError::RateLimited => Status::TooManyRequests,
        CompletionError::Timeout => Status::RequestTimeout,
        CompletionError::Network(_) => Status::ServiceUnavailable,
        CompletionError::Status(_) => Status::BadGateway,
        CompletionError::NotConfigured | CompletionError::Malformed => {
            Status::InternalServerError
        }
    };
    api_error(status, e.to_string())
}

pub fn payment_error(e: &PaymentError) -> ApiError {
    let status = match e {
        PaymentError::NotConfigured => Status::BadRequest,
        PaymentError::Network(_) => Status::ServiceUnavailable,
        PaymentError::Gateway { .. } => Status::BadGateway,
    };
    api_error(status, e.to_string())
}
