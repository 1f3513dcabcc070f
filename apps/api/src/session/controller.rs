//! Analysis request lifecycle.
//!
//! State machine: `Idle -> Submitting -> Ready(result)`.
//! - Only one submission may be in flight; a second one is rejected.
//! - Only one humanize pass may be outstanding per result.
//! - Any submission failure leaves the controller `Idle` and records nothing.
//!
//! Extraction, analysis and humanize run in spawned tasks so the session lock
//! is never held across them, and a panic inside one surfaces as
//! `AnalysisFailure` instead of wedging the in-flight flag.

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{info, warn};
use uuid::Uuid;

use crate::analysis::engine::apply_humanized;
use crate::analysis::Analyzer;
use crate::errors::{AppError, ValidationError, MIN_PASTED_CHARS};
use crate::extraction::{self, DocumentKind, UploadedFile};
use crate::models::analysis::{AnalysisHistoryItem, AnalysisResult, Verdict};
use crate::session::store::SessionStore;

/// Label attached to pasted text.
pub const MANUAL_ENTRY_LABEL: &str = "Manual Entry";

/// Raw input handed over by the presentation layer.
#[derive(Debug, Clone)]
pub enum SubmissionInput {
    PastedText {
        text: String,
        file_name: Option<String>,
    },
    File(UploadedFile),
}

impl SubmissionInput {
    /// Checks run before any asynchronous work starts.
    ///
    /// Pasted text is measured after trimming; files must carry an accepted
    /// type (or the `.docx` suffix).
    pub fn validate(&self) -> Result<(), AppError> {
        match self {
            SubmissionInput::PastedText { text, .. } => {
                if text.trim().chars().count() < MIN_PASTED_CHARS {
                    return Err(ValidationError::TooShort.into());
                }
            }
            SubmissionInput::File(file) => {
                DocumentKind::detect(&file.declared_type, &file.file_name)?;
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Idle,
    Submitting,
    Ready,
}

/// Which text a download carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextView {
    #[default]
    Original,
    Humanized,
}

impl TextView {
    fn as_str(&self) -> &'static str {
        match self {
            TextView::Original => "original",
            TextView::Humanized => "humanized",
        }
    }
}

/// Plain-text download artifact.
#[derive(Debug, Clone, PartialEq)]
pub struct Download {
    pub file_name: String,
    pub content: String,
}

/// What the presentation layer renders from.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub phase: Phase,
    pub is_analyzing: bool,
    pub is_humanizing: bool,
    pub current: Option<AnalysisResult>,
    pub humanized_view_available: bool,
    pub verdict: Option<Verdict>,
    pub headline: Option<&'static str>,
}

struct Session {
    submitting: bool,
    /// Id of the result with a humanize pass outstanding.
    humanizing: Option<Uuid>,
    store: SessionStore,
}

impl Session {
    fn phase(&self) -> Phase {
        if self.submitting {
            Phase::Submitting
        } else if self.store.current().is_some() {
            Phase::Ready
        } else {
            Phase::Idle
        }
    }
}

pub struct AnalysisController {
    analyzer: Arc<dyn Analyzer>,
    session: Arc<Mutex<Session>>,
}

impl AnalysisController {
    pub fn new(analyzer: Arc<dyn Analyzer>, store: SessionStore) -> Self {
        Self {
            analyzer,
            session: Arc::new(Mutex::new(Session {
                submitting: false,
                humanizing: None,
                store,
            })),
        }
    }

    /// Runs extraction and analysis for `input`, then records the result.
    pub async fn submit(&self, input: SubmissionInput) -> Result<AnalysisResult, AppError> {
        input.validate()?;

        {
            let mut session = self.session.lock().await;
            if session.submitting {
                return Err(AppError::AnalysisInFlight);
            }
            session.submitting = true;
        }

        let analyzer = Arc::clone(&self.analyzer);
        let session = Arc::clone(&self.session);
        // Finishing runs in its own task so a dropped request still clears the flag.
        tokio::spawn(async move {
            let outcome = tokio::spawn(run_pipeline(analyzer, input))
                .await
                .map_err(|e| AppError::AnalysisFailure(format!("analysis task failed: {e}")))
                .and_then(|result| result);
            finish_submit(&session, outcome).await
        })
        .await
        .map_err(|e| AppError::AnalysisFailure(format!("analysis task failed: {e}")))?
    }

    /// Rewrites the current result's original text and lowers its AI score.
    pub async fn humanize(&self) -> Result<AnalysisResult, AppError> {
        let (id, original_text) = {
            let mut session = self.session.lock().await;
            if session.submitting {
                return Err(AppError::AnalysisInFlight);
            }
            let current = session.store.current().ok_or(AppError::NoActiveAnalysis)?;
            let id = current.id;
            if session.humanizing == Some(id) {
                return Err(AppError::HumanizeInProgress(id));
            }
            let original_text = current.original_text.clone();
            session.humanizing = Some(id);
            (id, original_text)
        };

        let analyzer = Arc::clone(&self.analyzer);
        let session = Arc::clone(&self.session);
        tokio::spawn(async move {
            let outcome = tokio::spawn(async move { analyzer.humanize(&original_text).await })
                .await
                .map_err(|e| AppError::AnalysisFailure(format!("humanize task failed: {e}")))
                .and_then(|text| text);
            finish_humanize(&session, id, outcome).await
        })
        .await
        .map_err(|e| AppError::AnalysisFailure(format!("humanize task failed: {e}")))?
    }

    /// Returns to the upload view. The history entry stays.
    pub async fn reset(&self) {
        self.session.lock().await.store.clear_current();
    }

    pub async fn snapshot(&self) -> SessionSnapshot {
        let session = self.session.lock().await;
        let current = session.store.current().cloned();
        let verdict = current.as_ref().map(AnalysisResult::verdict);
        SessionSnapshot {
            phase: session.phase(),
            is_analyzing: session.submitting,
            // A rewrite still running for a discarded result does not count.
            is_humanizing: matches!(
                (session.humanizing, &current),
                (Some(id), Some(result)) if id == result.id
            ),
            humanized_view_available: current
                .as_ref()
                .is_some_and(AnalysisResult::has_humanized_view),
            current,
            verdict,
            headline: verdict.map(|v| v.headline()),
        }
    }

    /// Builds the download for `view`. The humanized view falls back to the
    /// original text when no rewrite exists yet.
    pub async fn download(&self, view: TextView) -> Result<Download, AppError> {
        let session = self.session.lock().await;
        let current = session.store.current().ok_or(AppError::NoActiveAnalysis)?;
        let content = match (view, &current.humanized_text) {
            (TextView::Humanized, Some(text)) => text.clone(),
            _ => current.original_text.clone(),
        };
        Ok(Download {
            file_name: format!(
                "resume_{}_{}.txt",
                view.as_str(),
                Utc::now().timestamp_millis()
            ),
            content,
        })
    }

    pub async fn history(&self) -> Vec<AnalysisHistoryItem> {
        self.session.lock().await.store.history().to_vec()
    }

    /// Looks up a history summary. The full report cannot be restored from it.
    pub async fn select_history(&self, id: Uuid) -> Result<AnalysisHistoryItem, AppError> {
        self.session
            .lock()
            .await
            .store
            .history_item(id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("History item {id} not found")))
    }

    /// Deletes a history item; unknown ids are ignored.
    pub async fn delete_history(&self, id: Uuid) {
        self.session.lock().await.store.delete_history_item(id).await;
    }
}

async fn finish_submit(
    session: &Mutex<Session>,
    outcome: Result<AnalysisResult, AppError>,
) -> Result<AnalysisResult, AppError> {
    let mut session = session.lock().await;
    session.submitting = false;
    match outcome {
        Ok(result) => {
            info!(
                "Recorded analysis {} ({}% AI)",
                result.id, result.ai_probability
            );
            session.store.record_result(result.clone()).await;
            Ok(result)
        }
        Err(e) => {
            warn!("Submission failed: {e}");
            session.store.clear_current();
            Err(e)
        }
    }
}

async fn finish_humanize(
    session: &Mutex<Session>,
    id: Uuid,
    outcome: Result<String, AppError>,
) -> Result<AnalysisResult, AppError> {
    let mut session = session.lock().await;
    if session.humanizing == Some(id) {
        session.humanizing = None;
    }
    let humanized_text = outcome?;

    let mut result = match session.store.current() {
        Some(current) if current.id == id => current.clone(),
        _ => {
            warn!("Analysis {id} was replaced while humanizing; dropping rewrite");
            return Err(AppError::NoActiveAnalysis);
        }
    };
    apply_humanized(&mut result, humanized_text);
    session.store.update_current(result.clone()).await;
    info!(
        "Humanized analysis {id}: ai={} human={}",
        result.ai_probability, result.human_probability
    );
    Ok(result)
}

async fn run_pipeline(
    analyzer: Arc<dyn Analyzer>,
    input: SubmissionInput,
) -> Result<AnalysisResult, AppError> {
    let (text, label) = match input {
        SubmissionInput::PastedText { text, file_name } => (
            text,
            file_name.unwrap_or_else(|| MANUAL_ENTRY_LABEL.to_string()),
        ),
        SubmissionInput::File(file) => {
            let text = extraction::extract(&file).await?;
            (text, file.file_name)
        }
    };
    analyzer.analyze(&text, Some(&label)).await
}
