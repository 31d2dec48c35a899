// src/web/handlers/system_handlers.rs

use crate::environment::Secrets;
use crate::web::types::{MessageResponse, StatusResponse};

use rocket::serde::json::Json;
use rocket::State;
use tracing::info;

pub async fn status_handler(secrets: &State<Secrets>) -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "ok".to_string(),
        has_deepseek_key: secrets.has_deepseek_key(),
        has_razorpay_keys: secrets.has_razorpay_keys(),
    })
}

pub async fn health_handler() -> Json<MessageResponse> {
    info!("Health check");
    Json(MessageResponse {
        success: true,
        message: "OK".to_string(),
    })
}
