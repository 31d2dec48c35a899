// src/web/handlers/resume_handlers.rs - resume draft CRUD

use crate::storage::ResumeStore;
use crate::web::types::*;

use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::State;
use tracing::{error, info};

pub async fn save_resume_handler(
    request: Json<SaveResumeRequest>,
    store: &State<Box<dyn ResumeStore>>,
) -> Result<Json<ResumeResponse>, ApiError> {
    let title = request.title.trim();
    if title.is_empty() {
        return Err(api_error(Status::BadRequest, "Resume title is required"));
    }

    match store.save_resume(title, request.data.clone()).await {
        Ok(resume) => {
            info!("Saved resume {} ({})", resume.id, resume.title);
            Ok(Json(ResumeResponse {
                success: true,
                resume,
            }))
        }
        Err(e) => {
            error!("Failed to save resume: {}", e);
            Err(api_error(
                Status::InternalServerError,
                "Failed to save resume",
            ))
        }
    }
}

pub async fn list_resumes_handler(
    store: &State<Box<dyn ResumeStore>>,
) -> Result<Json<ResumeListResponse>, ApiError> {
    match store.list_resumes().await {
        Ok(resumes) => Ok(Json(ResumeListResponse {
            success: true,
            resumes,
        })),
        Err(e) => {
            error!("Failed to list resumes: {}", e);
            Err(api_error(
                Status::InternalServerError,
                "Failed to list resumes",
            ))
        }
    }
}

pub async fn get_resume_handler(
    id: &str,
    store: &State<Box<dyn ResumeStore>>,
) -> Result<Json<ResumeResponse>, ApiError> {
    match store.get_resume(id).await {
        Ok(Some(resume)) => Ok(Json(ResumeResponse {
            success: true,
            resume,
        })),
        Ok(None) => Err(api_error(Status::NotFound, "Resume not found")),
        Err(e) => {
            error!("Failed to load resume {}: {}", id, e);
            Err(api_error(
                Status::InternalServerError,
                "Failed to load resume",
            ))
        }
    }
}

pub async fn delete_resume_handler(
    id: &str,
    store: &State<Box<dyn ResumeStore>>,
) -> Result<Json<MessageResponse>, ApiError> {
    match store.delete_resume(id).await {
        Ok(true) => {
            info!("Deleted resume {}", id);
            Ok(Json(MessageResponse {
                success: true,
                message: "Resume deleted".to_string(),
            }))
        }
        Ok(false) => Err(api_error(Status::NotFound, "Resume not found")),
        Err(e) => {
            error!("Failed to delete resume {}: {}", id, e);
            Err(api_error(
                Status::InternalServerError,
                "Failed to delete resume",
            ))
        }
    }
}
