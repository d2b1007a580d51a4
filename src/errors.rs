// src/errors.rs
use actix_web::{HttpResponse, ResponseError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum QrStudioError {
    #[error("LLM service error: {0}")]
    LLM(String),

    #[error("Image processing error: {0}")]
    ImageProcessing(String),

    #[error("Render error: {0}")]
    Render(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid provider: {0}")]
    InvalidProvider(String),
}

impl ResponseError for QrStudioError {
    fn error_response(&self) -> HttpResponse {
        match self {
            QrStudioError::LLM(_) => HttpResponse::ServiceUnavailable().json(serde_json::json!({
                "error": "AI service error",
                "message": self.to_string()
            })),
            QrStudioError::ImageProcessing(_) => {
                HttpResponse::BadRequest().json(serde_json::json!({
                    "error": "Image processing error",
                    "message": self.to_string()
                }))
            }
            QrStudioError::Render(_) => {
                HttpResponse::UnprocessableEntity().json(serde_json::json!({
                    "error": "Render error",
                    "message": self.to_string()
                }))
            }
            QrStudioError::Validation(_) => HttpResponse::BadRequest().json(serde_json::json!({
                "error": "Validation error",
                "message": self.to_string()
            })),
            QrStudioError::Configuration(_) => {
                HttpResponse::InternalServerError().json(serde_json::json!({
                    "error": "Configuration error",
                    "message": self.to_string()
                }))
            }
            QrStudioError::NotFound(_) => HttpResponse::NotFound().json(serde_json::json!({
                "error": "Not found",
                "message": self.to_string()
            })),
            QrStudioError::InvalidProvider(_) => {
                HttpResponse::BadRequest().json(serde_json::json!({
                    "error": "Invalid provider",
                    "message": self.to_string()
                }))
            }
        }
    }
}
