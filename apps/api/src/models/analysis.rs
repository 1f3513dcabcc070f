use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Label used for a history item whose result carries no file name.
pub const UNTITLED_LABEL: &str = "Untitled";
/// Number of characters of the source text kept in a history preview.
pub const PREVIEW_CHARS: usize = 100;
const PREVIEW_ELLIPSIS: &str = "...";

/// One completed analysis. Field names are camelCase on the wire so the
/// presentation layer and the persisted history share one vocabulary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub id: Uuid,
    pub file_name: Option<String>,
    pub original_text: String,
    pub ai_probability: u32,
    pub human_probability: u32,
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
    pub suggestions: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub humanized_text: Option<String>,
}

impl AnalysisResult {
    /// The humanized view is only available once a humanize pass has succeeded.
    pub fn has_humanized_view(&self) -> bool {
        self.humanized_text.is_some()
    }

    pub fn verdict(&self) -> Verdict {
        if self.ai_probability > 50 {
            Verdict::HighAiContent
        } else {
            Verdict::AppearsHuman
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    HighAiContent,
    AppearsHuman,
}

impl Verdict {
    pub fn headline(&self) -> &'static str {
        match self {
            Verdict::HighAiContent => "High AI Content Detected",
            Verdict::AppearsHuman => "Content Appears Human",
        }
    }
}

/// Lossy, persisted summary of a past analysis.
///
/// Deliberately carries no source text, humanized text, or suggestions: a
/// history item cannot be turned back into a full `AnalysisResult`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisHistoryItem {
    pub id: Uuid,
    pub file_name: String,
    /// ISO-8601 instant, millisecond precision, UTC.
    pub date: String,
    pub ai_score: u32,
    pub preview: String,
}

impl AnalysisHistoryItem {
    pub fn from_result(result: &AnalysisResult) -> Self {
        Self {
            id: result.id,
            file_name: result
                .file_name
                .clone()
                .filter(|name| !name.is_empty())
                .unwrap_or_else(|| UNTITLED_LABEL.to_string()),
            date: iso_date(result.timestamp),
            ai_score: result.ai_probability,
            preview: preview_of(&result.original_text),
        }
    }
}

/// First `PREVIEW_CHARS` characters followed by an ellipsis, always.
pub fn preview_of(text: &str) -> String {
    let mut preview: String = text.chars().take(PREVIEW_CHARS).collect();
    preview.push_str(PREVIEW_ELLIPSIS);
    preview
}

fn iso_date(timestamp_ms: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(timestamp_ms)
        .unwrap_or_default()
        .to_rfc3339_opts(SecondsFormat::Millis, true)
}
