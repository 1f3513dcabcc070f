use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::extraction::ExtractionError;

/// Minimum length of pasted text, counted after trimming.
pub const MIN_PASTED_CHARS: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("pasted text is shorter than 50 characters")]
    TooShort,
}

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    #[error("Analysis failed: {0}")]
    AnalysisFailure(String),

    #[error("An analysis is already in flight")]
    AnalysisInFlight,

    #[error("A humanize pass is already running for analysis {0}")]
    HumanizeInProgress(uuid::Uuid),

    #[error("No active analysis")]
    NoActiveAnalysis,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Validation(ValidationError::TooShort) => (
                StatusCode::BAD_REQUEST,
                "TEXT_TOO_SHORT",
                format!("Please enter at least {MIN_PASTED_CHARS} characters for accurate analysis."),
            ),
            AppError::Extraction(e) => {
                tracing::warn!("Extraction error: {e}");
                let (status, code) = match e {
                    ExtractionError::UnsupportedType { .. } => {
                        (StatusCode::UNSUPPORTED_MEDIA_TYPE, "UNSUPPORTED_TYPE")
                    }
                    ExtractionError::PdfUnreadable(_) => {
                        (StatusCode::UNPROCESSABLE_ENTITY, "PDF_UNREADABLE")
                    }
                    ExtractionError::DocxUnreadable(_) => {
                        (StatusCode::UNPROCESSABLE_ENTITY, "DOCX_UNREADABLE")
                    }
                };
                (status, code, e.user_message().to_string())
            }
            AppError::AnalysisFailure(msg) => {
                tracing::error!("Analysis failure: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "ANALYSIS_FAILED",
                    "Analysis failed. Please try again.".to_string(),
                )
            }
            AppError::AnalysisInFlight => (
                StatusCode::CONFLICT,
                "ANALYSIS_IN_FLIGHT",
                "An analysis is already running. Please wait for it to finish.".to_string(),
            ),
            AppError::HumanizeInProgress(_) => (
                StatusCode::CONFLICT,
                "HUMANIZE_IN_PROGRESS",
                "This analysis is already being humanized.".to_string(),
            ),
            AppError::NoActiveAnalysis => (
                StatusCode::NOT_FOUND,
                "NO_ACTIVE_ANALYSIS",
                "There is no active analysis.".to_string(),
            ),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
