use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Every variable has a default; malformed values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// Directory holding the persisted history file.
    pub data_dir: PathBuf,
    /// When false, history lives in memory only and is lost on restart.
    pub persist_history: bool,
    /// Simulated backend latency for analysis.
    pub analysis_delay: Duration,
    /// Simulated backend latency for humanize.
    pub humanize_delay: Duration,
    /// Cap on stored history items. `None` keeps everything.
    pub history_limit: Option<usize>,
    /// Seed for suggestion and transition selection. `None` uses OS entropy.
    pub rng_seed: Option<u64>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            port: env_or("PORT", "8080")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: env_or("RUST_LOG", "info"),
            data_dir: PathBuf::from(env_or("DATA_DIR", "./data")),
            persist_history: env_or("PERSIST_HISTORY", "true")
                .parse::<bool>()
                .context("PERSIST_HISTORY must be 'true' or 'false'")?,
            analysis_delay: Duration::from_millis(
                env_or("ANALYSIS_DELAY_MS", "1500")
                    .parse()
                    .context("ANALYSIS_DELAY_MS must be a number of milliseconds")?,
            ),
            humanize_delay: Duration::from_millis(
                env_or("HUMANIZE_DELAY_MS", "2000")
                    .parse()
                    .context("HUMANIZE_DELAY_MS must be a number of milliseconds")?,
            ),
            history_limit: optional_env("HISTORY_LIMIT")
                .map(|v| v.parse::<usize>())
                .transpose()
                .context("HISTORY_LIMIT must be a positive integer")?,
            rng_seed: optional_env("RNG_SEED")
                .map(|v| v.parse::<u64>())
                .transpose()
                .context("RNG_SEED must be an unsigned integer")?,
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
