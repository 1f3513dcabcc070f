//! Mock AI-content analysis.
//!
//! There is no model behind this: the score is a deterministic function of
//! text length and the humanizer is a transition-phrase injector. The
//! `Analyzer` trait is the seam where a real backend would plug in.

pub mod engine;
pub mod phrases;

use async_trait::async_trait;

use crate::errors::AppError;
use crate::models::analysis::AnalysisResult;

pub use engine::MockAnalyzer;

/// Analysis backend. Carried in the controller as `Arc<dyn Analyzer>`.
#[async_trait]
pub trait Analyzer: Send + Sync {
    /// Scores `text` and stamps a fresh `AnalysisResult`.
    async fn analyze(&self, text: &str, file_name: Option<&str>)
        -> Result<AnalysisResult, AppError>;

    /// Produces a rewritten version of `text`.
    async fn humanize(&self, text: &str) -> Result<String, AppError>;
}
