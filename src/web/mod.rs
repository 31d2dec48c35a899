// src/web/mod.rs - routes, CORS, catchers, server assembly

pub mod handlers;
pub mod types;

pub use types::*;

use crate::completion::CompletionClient;
use crate::environment::{EnvironmentConfig, Secrets};
use crate::payments::PaymentGateway;
use crate::pipeline::{GenerationInput, Pipeline};
use crate::storage::{ResumeStore, SqliteStore};
use anyhow::Result;
use rocket::fairing::{Fairing, Info, Kind};
use rocket::http::{Header, Status};
use rocket::serde::json::Json;
use rocket::{catchers, get, options, post, routes, Request, Response, State};
use tracing::info;

// CORS Fairing
pub struct Cors;

#[rocket::async_trait]
impl Fairing for Cors {
    fn info(&self) -> Info {
        Info {
            name: "Add CORS headers to responses",
            kind: Kind::Response,
        }
    }

    async fn on_response<'r>(&self, _request: &'r Request<'_>, response: &mut Response<'r>) {
        response.set_header(Header::new("Access-Control-Allow-Origin", "*"));
        response.set_header(Header::new(
            "Access-Control-Allow-Methods",
            "POST, GET, DELETE, OPTIONS",
        ));
        response.set_header(Header::new("Access-Control-Allow-Headers", "*"));
    }
}

// AI content routes

#[post("/analyze-job", data = "<request>")]
pub async fn analyze_job(
    request: Json<AnalyzeJobRequest>,
    pipeline: &State<Pipeline>,
) -> Result<Json<AnalysisResponse>, ApiError> {
    handlers::analyze_job_handler(request, pipeline).await
}

#[post("/enhance-resume", data = "<request>")]
pub async fn enhance_resume(
    request: Json<EnhanceResumeRequest>,
    pipeline: &State<Pipeline>,
) -> Result<Json<EnhanceResponse>, ApiError> {
    handlers::enhance_resume_handler(request, pipeline).await
}

#[post("/generate-resume", data = "<request>")]
pub async fn generate_resume(
    request: Json<GenerationInput>,
    pipeline: &State<Pipeline>,
) -> Result<Json<GenerateResponse>, ApiError> {
    handlers::generate_resume_handler(request, pipeline).await
}

#[post("/generate-summary", data = "<request>")]
pub async fn generate_summary(
    request: Json<GenerateSummaryRequest>,
    pipeline: &State<Pipeline>,
) -> Result<Json<SummaryResponse>, ApiError> {
    handlers::generate_summary_handler(request, pipeline).await
}

#[post("/generate-skills", data = "<request>")]
pub async fn generate_skills(
    request: Json<GenerateSkillsRequest>,
    pipeline: &State<Pipeline>,
) -> Result<Json<SkillsResponse>, ApiError> {
    handlers::generate_skills_handler(request, pipeline).await
}

#[post("/score-resume", data = "<request>")]
pub async fn score_resume(
    request: Json<ScoreResumeRequest>,
    pipeline: &State<Pipeline>,
) -> Result<Json<ScoreResponse>, ApiError> {
    handlers::score_resume_handler(request, pipeline).await
}

#[post("/parse-resume", data = "<request>")]
pub async fn parse_resume(
    request: Json<ParseResumeRequest>,
    pipeline: &State<Pipeline>,
) -> Result<Json<ParseResponse>, ApiError> {
    handlers::parse_resume_handler(request, pipeline).await
}

// Payment routes

#[post("/create-order", data = "<request>")]
pub async fn create_order(
    request: Json<CreateOrderRequest>,
    gateway: &State<PaymentGateway>,
    store: &State<Box<dyn ResumeStore>>,
) -> Result<Json<OrderResponse>, ApiError> {
    handlers::create_order_handler(request, gateway, store).await
}

#[post("/verify-payment", data = "<request>")]
pub async fn verify_payment(
    request: Json<VerifyPaymentRequest>,
    gateway: &State<PaymentGateway>,
    store: &State<Box<dyn ResumeStore>>,
) -> Result<Json<VerifyResponse>, ApiError> {
    handlers::verify_payment_handler(request, gateway, store).await
}

// Resume draft routes

#[post("/resumes", data = "<request>")]
pub async fn save_resume(
    request: Json<SaveResumeRequest>,
    store: &State<Box<dyn ResumeStore>>,
) -> Result<Json<ResumeResponse>, ApiError> {
    handlers::save_resume_handler(request, store).await
}

#[get("/resumes")]
pub async fn list_resumes(
    store: &State<Box<dyn ResumeStore>>,
) -> Result<Json<ResumeListResponse>, ApiError> {
    handlers::list_resumes_handler(store).await
}

#[get("/resumes/<id>")]
pub async fn get_resume(
    id: &str,
    store: &State<Box<dyn ResumeStore>>,
) -> Result<Json<ResumeResponse>, ApiError> {
    handlers::get_resume_handler(id, store).await
}

#[rocket::delete("/resumes/<id>")]
pub async fn delete_resume(
    id: &str,
    store: &State<Box<dyn ResumeStore>>,
) -> Result<Json<MessageResponse>, ApiError> {
    handlers::delete_resume_handler(id, store).await
}

// System routes

#[get("/status")]
pub async fn status(secrets: &State<Secrets>) -> Json<StatusResponse> {
    handlers::status_handler(secrets).await
}

#[get("/health")]
pub async fn health() -> Json<MessageResponse> {
    handlers::health_handler().await
}

#[options("/<_..>")]
pub async fn options() -> Status {
    Status::Ok
}

// Error catchers

#[rocket::catch(400)]
pub fn bad_request() -> Json<ErrorBody> {
    Json(ErrorBody {
        success: false,
        error: "Invalid request format".to_string(),
    })
}

#[rocket::catch(404)]
pub fn not_found() -> Json<ErrorBody> {
    Json(ErrorBody {
        success: false,
        error: "Not found".to_string(),
    })
}

#[rocket::catch(422)]
pub fn unprocessable() -> Json<ErrorBody> {
    Json(ErrorBody {
        success: false,
        error: "Request body is missing required fields".to_string(),
    })
}

#[rocket::catch(500)]
pub fn internal_error() -> Json<ErrorBody> {
    Json(ErrorBody {
        success: false,
        error: "Internal server error".to_string(),
    })
}

// Main server start function
pub async fn start_web_server(
    config: EnvironmentConfig,
    secrets: Secrets,
    port: u16,
) -> Result<()> {
    let store = SqliteStore::connect(&config.database_path).await?;
    store.migrate().await?;

    let client = CompletionClient::new(
        secrets.deepseek_api_key.clone(),
        config.deepseek_base_url.clone(),
    )?;
    let pipeline = Pipeline::new(client);

    let gateway = PaymentGateway::new(
        secrets.razorpay_key_id.clone(),
        secrets.razorpay_key_secret.clone(),
        config.razorpay_base_url.clone(),
    )?;

    info!("Starting resume builder API server on port {}", port);
    info!("Completion service configured: {}", pipeline.is_configured());
    info!("Payment gateway configured: {}", gateway.is_configured());

    let figment = rocket::Config::figment()
        .merge(("port", port))
        .merge(("address", "0.0.0.0"));

    rocket::custom(figment)
        .attach(Cors)
        .manage(pipeline)
        .manage(gateway)
        .manage(secrets)
        .manage(Box::new(store) as Box<dyn ResumeStore>)
        .register(
            "/api",
            catchers![bad_request, not_found, unprocessable, internal_error],
        )
        .mount(
            "/api",
            routes![
                analyze_job,
                enhance_resume,
                generate_resume,
                generate_summary,
                generate_skills,
                score_resume,
                parse_resume,
                create_order,
                verify_payment,
                save_resume,
                list_resumes,
                get_resume,
                delete_resume,
                status,
                health,
                options,
            ],
        )
        .launch()
        .await
        .map_err(|e| anyhow::anyhow!("Server error: {}", e))?;

    Ok(())
}
