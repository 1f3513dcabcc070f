//! The mock scoring and humanizing algorithms.
//!
//! Scoring (by character count `len`, `r = len % 100`):
//! - `len > 500`: ai = min(95, 40 + r / 2)
//! - otherwise:   ai = min(90, 20 + r)
//! - human = 100 - ai
//!
//! Randomness only affects which suggestions are shown and which transition
//! phrases the humanizer picks; it comes from an injected, seedable `StdRng`.

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::debug;
use uuid::Uuid;

use crate::analysis::phrases::{
    HUMANIZED_SUFFIX, SENTENCE_DELIMITER, SUGGESTIONS_PER_ANALYSIS, SUGGESTION_POOL, TRANSITIONS,
};
use crate::analysis::Analyzer;
use crate::errors::AppError;
use crate::models::analysis::AnalysisResult;

/// Label given to analyses submitted without a file name.
pub const DEFAULT_FILE_LABEL: &str = "Raw Text";

const LONG_TEXT_THRESHOLD: usize = 500;
const HUMANIZE_DELTA: u32 = 60;
const HUMANIZED_AI_FLOOR: u32 = 5;
const HUMANIZED_HUMAN_CEILING: u32 = 95;

/// Returns `(ai_probability, human_probability)` for `text`.
pub fn score(text: &str) -> (u32, u32) {
    let len = text.chars().count();
    let pseudo_random = (len % 100) as u32;
    // Integer halving floors, matching floor(40 + r / 2).
    let ai = if len > LONG_TEXT_THRESHOLD {
        (40 + pseudo_random / 2).min(95)
    } else {
        (20 + pseudo_random).min(90)
    };
    (ai, 100 - ai)
}

/// Shuffles the suggestion pool and keeps the first three, in shuffle order.
pub fn select_suggestions<R: Rng + ?Sized>(rng: &mut R) -> Vec<String> {
    let mut pool = SUGGESTION_POOL.to_vec();
    pool.shuffle(rng);
    pool.into_iter()
        .take(SUGGESTIONS_PER_ANALYSIS)
        .map(String::from)
        .collect()
}

/// Builds a complete result for `text` stamped with the current instant.
pub fn analyze_with<R: Rng + ?Sized>(
    text: &str,
    file_name: Option<&str>,
    rng: &mut R,
) -> AnalysisResult {
    let (ai_probability, human_probability) = score(text);
    AnalysisResult {
        id: Uuid::new_v4(),
        file_name: Some(file_name.unwrap_or(DEFAULT_FILE_LABEL).to_string()),
        original_text: text.to_string(),
        ai_probability,
        human_probability,
        timestamp: Utc::now().timestamp_millis(),
        suggestions: select_suggestions(rng),
        humanized_text: None,
    }
}

/// Injects a transition before every third sentence (indices 3, 6, 9, ...)
/// and appends the fixed suffix.
pub fn humanize_with<R: Rng + ?Sized>(text: &str, rng: &mut R) -> String {
    let rewritten = text
        .split(SENTENCE_DELIMITER)
        .enumerate()
        .map(|(i, sentence)| {
            if i % 3 == 0 && i != 0 {
                let transition = TRANSITIONS.choose(rng).copied().unwrap_or(TRANSITIONS[0]);
                format!("{transition} {}", lowercase_first(sentence))
            } else {
                sentence.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(SENTENCE_DELIMITER);

    rewritten + HUMANIZED_SUFFIX
}

fn lowercase_first(sentence: &str) -> String {
    let mut chars = sentence.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_lowercase().collect::<String>() + chars.as_str(),
    }
}

/// Applies a successful humanize pass to `result`.
///
/// Both probabilities move by a fixed delta and are clamped independently,
/// so the pair no longer necessarily sums to 100.
pub fn apply_humanized(result: &mut AnalysisResult, humanized_text: String) {
    result.humanized_text = Some(humanized_text);
    result.ai_probability = result
        .ai_probability
        .saturating_sub(HUMANIZE_DELTA)
        .max(HUMANIZED_AI_FLOOR);
    result.human_probability =
        (result.human_probability + HUMANIZE_DELTA).min(HUMANIZED_HUMAN_CEILING);
}

/// Default `Analyzer`: the mock algorithms plus simulated backend latency.
pub struct MockAnalyzer {
    rng: Mutex<StdRng>,
    analysis_delay: Duration,
    humanize_delay: Duration,
}

impl MockAnalyzer {
    pub fn new(seed: Option<u64>, analysis_delay: Duration, humanize_delay: Duration) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            rng: Mutex::new(rng),
            analysis_delay,
            humanize_delay,
        }
    }

    /// Zero-latency analyzer with a fixed seed.
    #[cfg(test)]
    pub fn instant(seed: u64) -> Self {
        Self::new(Some(seed), Duration::ZERO, Duration::ZERO)
    }

    fn with_rng<T>(&self, f: impl FnOnce(&mut StdRng) -> T) -> T {
        let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        f(&mut rng)
    }
}

#[async_trait]
impl Analyzer for MockAnalyzer {
    async fn analyze(
        &self,
        text: &str,
        file_name: Option<&str>,
    ) -> Result<AnalysisResult, AppError> {
        tokio::time::sleep(self.analysis_delay).await;
        let result = self.with_rng(|rng| analyze_with(text, file_name, rng));
        debug!(
            "Scored {} chars: ai={} human={}",
            result.original_text.chars().count(),
            result.ai_probability,
            result.human_probability
        );
        Ok(result)
    }

    async fn humanize(&self, text: &str) -> Result<String, AppError> {
        tokio::time::sleep(self.humanize_delay).await;
        Ok(self.with_rng(|rng| humanize_with(text, rng)))
    }
}
