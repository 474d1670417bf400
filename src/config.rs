//! Environment-backed configuration with defaults.

use std::time::Duration;

use crate::error::{Result, RoastError};

/// Model invoked when `ROAST_MODEL_ID` is unset.
pub const DEFAULT_MODEL_ID: &str = "meta-llama/Llama-3.1-8B";

/// Inference backend used when `HF_PROVIDER` is unset.
pub const DEFAULT_PROVIDER: &str = "featherless-ai";

/// Request deadline applied when `ROAST_TIMEOUT_SECS` is unset.
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// One-shot configuration, read from the process environment at startup.
///
/// Values are trimmed; an empty value counts as unset. Resolution happens
/// exactly once; nothing re-reads the environment afterwards.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Credential for the inference provider (`HF_TOKEN`). Required.
    pub api_key: String,
    /// Model identifier to invoke (`ROAST_MODEL_ID`).
    pub model_id: String,
    /// Routing identifier for the inference backend (`HF_PROVIDER`),
    /// normalized to trimmed lowercase.
    pub provider: String,
    /// Endpoint override (`HF_BASE_URL`). Canonical hosts when unset.
    pub base_url: Option<String>,
    /// Deadline for the single request (`ROAST_TIMEOUT_SECS`).
    pub timeout: Duration,
}

impl Settings {
    /// Load settings from environment variables (and `.env`, if present).
    ///
    /// Fails with [`RoastError::Configuration`] when `HF_TOKEN` is missing
    /// or empty; no network call has been made at that point.
    pub fn from_env() -> Result<Self> {
        let _ = dotenvy::dotenv(); // load .env if present, ignore error

        let api_key = env_value("HF_TOKEN").ok_or_else(|| {
            RoastError::configuration("required credential missing: set HF_TOKEN")
        })?;

        let model_id =
            env_value("ROAST_MODEL_ID").unwrap_or_else(|| DEFAULT_MODEL_ID.to_string());
        let provider = env_value("HF_PROVIDER")
            .map(|p| normalize_provider(&p))
            .unwrap_or_else(|| DEFAULT_PROVIDER.to_string());

        let base_url = env_value("HF_BASE_URL");
        let timeout = env_value("ROAST_TIMEOUT_SECS")
            .and_then(|s| s.parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(DEFAULT_TIMEOUT_SECS));

        Ok(Self {
            api_key,
            model_id,
            provider,
            base_url,
            timeout,
        })
    }
}

/// Lowercase and trim a provider id, the form the router expects.
pub fn normalize_provider(provider: &str) -> String {
    provider.trim().to_ascii_lowercase()
}

/// Read an environment variable with trimming; empty counts as unset.
fn env_value(key: &str) -> Option<String> {
    let raw = std::env::var(key).ok()?;
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
