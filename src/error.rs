use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;
use tower_sessions::session::Error as SessionError;
use validator::ValidationErrors;

use crate::controller::ControllerError;
use crate::store::StoreError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Workshop not found: {0}")]
    WorkshopNotFound(String),
    #[error("Invalid review: {0}")]
    ValidationError(String),
    #[error("Malformed request body: {0}")]
    InvalidBody(#[from] JsonRejection),
    #[error("Reviews are unavailable")]
    StoreError(#[from] StoreError),
    #[error("Could not save the review")]
    SaveFailed,
    #[error("Session error: {0}")]
    SessionError(String),
    #[error("Template error: {0}")]
    TemplateError(#[from] tera::Error),
}

impl From<SessionError> for AppError {
    fn from(err: SessionError) -> Self {
        AppError::SessionError(err.to_string())
    }
}

impl From<ValidationErrors> for AppError {
    fn from(err: ValidationErrors) -> Self {
        AppError::ValidationError(err.to_string())
    }
}

impl From<ControllerError> for AppError {
    fn from(err: ControllerError) -> Self {
        AppError::ValidationError(err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::WorkshopNotFound(_) => StatusCode::NOT_FOUND,
            AppError::ValidationError(_) | AppError::InvalidBody(_) => StatusCode::BAD_REQUEST,
            AppError::StoreError(_) => StatusCode::BAD_GATEWAY,
            AppError::SaveFailed => StatusCode::SERVICE_UNAVAILABLE,
            AppError::SessionError(_) | AppError::TemplateError(_) => {
                log::error!("{}", self);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = json!({
            "error": self.to_string(),
            "status": status.as_u16()
        });

        (status, axum::Json(body)).into_response()
    }
}
