use std::sync::Arc;

use crate::session::AnalysisController;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Single session controller; serializes submit and humanize calls.
    pub controller: Arc<AnalysisController>,
}
