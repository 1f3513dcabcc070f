//! Axum route handlers for the analysis session and history.

use axum::{
    extract::{Multipart, Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::extraction::{DocumentKind, UploadedFile};
use crate::models::analysis::{AnalysisHistoryItem, AnalysisResult};
use crate::session::controller::{SessionSnapshot, SubmissionInput, TextView};
use crate::state::AppState;

const UPLOAD_FIELD: &str = "file";

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct PasteRequest {
    pub text: String,
    pub file_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DownloadQuery {
    #[serde(default)]
    pub view: TextView,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistorySelection {
    pub item: AnalysisHistoryItem,
    /// History keeps only a summary; the full report is gone.
    pub full_report_available: bool,
    pub message: &'static str,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/analysis/text
pub async fn handle_submit_text(
    State(state): State<AppState>,
    Json(req): Json<PasteRequest>,
) -> Result<Json<AnalysisResult>, AppError> {
    let result = state
        .controller
        .submit(SubmissionInput::PastedText {
            text: req.text,
            file_name: req.file_name,
        })
        .await?;
    Ok(Json(result))
}

/// POST /api/v1/analysis/upload
///
/// Expects a multipart field named `file`. Its declared type is checked
/// before the payload is read.
pub async fn handle_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<AnalysisResult>, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Malformed multipart body: {e}")))?
    {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        let file_name = field.file_name().unwrap_or_default().to_string();
        let declared_type = field.content_type().unwrap_or_default().to_string();
        DocumentKind::detect(&declared_type, &file_name)?;

        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(format!("Failed to read upload: {e}")))?;

        let result = state
            .controller
            .submit(SubmissionInput::File(UploadedFile {
                file_name,
                declared_type,
                data,
            }))
            .await?;
        return Ok(Json(result));
    }

    Err(AppError::BadRequest(format!(
        "Missing multipart field '{UPLOAD_FIELD}'"
    )))
}

/// GET /api/v1/analysis/current
pub async fn handle_current(State(state): State<AppState>) -> Json<SessionSnapshot> {
    Json(state.controller.snapshot().await)
}

/// DELETE /api/v1/analysis/current
pub async fn handle_reset(State(state): State<AppState>) -> StatusCode {
    state.controller.reset().await;
    StatusCode::NO_CONTENT
}

/// POST /api/v1/analysis/current/humanize
pub async fn handle_humanize(
    State(state): State<AppState>,
) -> Result<Json<AnalysisResult>, AppError> {
    Ok(Json(state.controller.humanize().await?))
}

/// GET /api/v1/analysis/current/download?view=original|humanized
pub async fn handle_download(
    State(state): State<AppState>,
    Query(query): Query<DownloadQuery>,
) -> Result<impl IntoResponse, AppError> {
    let download = state.controller.download(query.view).await?;
    Ok((
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", download.file_name),
            ),
        ],
        download.content,
    ))
}

/// GET /api/v1/history
pub async fn handle_history(State(state): State<AppState>) -> Json<Vec<AnalysisHistoryItem>> {
    Json(state.controller.history().await)
}

/// GET /api/v1/history/:id
pub async fn handle_select_history(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<HistorySelection>, AppError> {
    let item = state.controller.select_history(id).await?;
    Ok(Json(HistorySelection {
        item,
        full_report_available: false,
        message: "History keeps a summary only; re-submit the resume to see the full report.",
    }))
}

/// DELETE /api/v1/history/:id
pub async fn handle_delete_history(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> StatusCode {
    state.controller.delete_history(id).await;
    StatusCode::NO_CONTENT
}
