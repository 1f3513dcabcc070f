//! Session state: the current analysis plus the persisted, lossy history.
//!
//! Every history mutation rewrites the full list under `HISTORY_KEY`. A write
//! failure is logged and the in-memory state stays authoritative.

use std::sync::Arc;

use tracing::{error, info, warn};
use uuid::Uuid;

use crate::models::analysis::{AnalysisHistoryItem, AnalysisResult};
use crate::session::storage::{Storage, StorageError};

/// Storage key holding the JSON array of history items, most recent first.
pub const HISTORY_KEY: &str = "resume_guard_history";

pub struct SessionStore {
    storage: Arc<dyn Storage>,
    history_limit: Option<usize>,
    current: Option<AnalysisResult>,
    history: Vec<AnalysisHistoryItem>,
}

impl SessionStore {
    /// Reads persisted history. Missing, unreadable, or malformed content
    /// yields an empty history; this never fails.
    pub async fn load(storage: Arc<dyn Storage>, history_limit: Option<usize>) -> Self {
        let mut history = match storage.read(HISTORY_KEY).await {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<AnalysisHistoryItem>>(&raw) {
                Ok(items) => items,
                Err(e) => {
                    warn!("Persisted history is corrupt, starting empty: {e}");
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!("Could not read persisted history, starting empty: {e}");
                Vec::new()
            }
        };
        if let Some(limit) = history_limit {
            history.truncate(limit);
        }
        info!("Loaded {} history items", history.len());

        Self {
            storage,
            history_limit,
            current: None,
            history,
        }
    }

    pub fn current(&self) -> Option<&AnalysisResult> {
        self.current.as_ref()
    }

    pub fn history(&self) -> &[AnalysisHistoryItem] {
        &self.history
    }

    pub fn history_item(&self, id: Uuid) -> Option<&AnalysisHistoryItem> {
        self.history.iter().find(|item| item.id == id)
    }

    /// Writes the full history list, replacing whatever was stored.
    pub async fn save(&self) -> Result<(), StorageError> {
        let json = serde_json::to_string(&self.history)?;
        self.storage.write(HISTORY_KEY, &json).await
    }

    /// Makes `result` current and prepends its summary to the history.
    pub async fn record_result(&mut self, result: AnalysisResult) {
        self.history.insert(0, AnalysisHistoryItem::from_result(&result));
        if let Some(limit) = self.history_limit {
            self.history.truncate(limit);
        }
        self.current = Some(result);
        self.persist().await;
    }

    /// Replaces the current result and mirrors its score onto the matching
    /// history item, keeping the item's position.
    pub async fn update_current(&mut self, result: AnalysisResult) {
        let changed = match self.history.iter_mut().find(|item| item.id == result.id) {
            Some(item) => {
                item.ai_score = result.ai_probability;
                true
            }
            None => false,
        };
        self.current = Some(result);
        if changed {
            self.persist().await;
        }
    }

    /// Removes the history item with `id`. Returns whether anything was removed.
    pub async fn delete_history_item(&mut self, id: Uuid) -> bool {
        let before = self.history.len();
        self.history.retain(|item| item.id != id);
        let removed = self.history.len() != before;
        if removed {
            self.persist().await;
        }
        removed
    }

    /// Drops the current result; its history entry stays.
    pub fn clear_current(&mut self) {
        self.current = None;
    }

    async fn persist(&self) {
        if let Err(e) = self.save().await {
            error!("Failed to persist history: {e}");
        }
    }
}
