//! Server configuration loaded from environment variables

use std::path::PathBuf;

use chrono::Duration;
use revise_core::{DeckPolicy, EngineSettings};

use crate::error::{ApiError, Result};
use crate::services::sessions::DEFAULT_SESSION_TTL_SECS;

/// Server configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// JSON question bank loaded once at startup
    pub bank_path: PathBuf,
    pub engine: EngineSettings,
    /// Idle time after which a session is dropped
    pub session_ttl: Duration,
}

impl Config {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through `lookup`, which maps a variable name to its value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = match lookup("PORT") {
            Some(raw) => raw
                .parse()
                .map_err(|_| ApiError::Config(format!("PORT is not a valid port: {raw}")))?,
            None => 3000,
        };
        let bank_path = lookup("QUIZ_BANK_PATH")
            .map(PathBuf::from)
            .ok_or_else(|| ApiError::Config("QUIZ_BANK_PATH must be set".to_string()))?;

        let mut engine = EngineSettings::default();
        if let Some(raw) = lookup("QUIZ_KEYWORD_THRESHOLD") {
            engine.keyword_threshold = raw
                .parse::<f64>()
                .ok()
                .filter(|t| (0.0..=1.0).contains(t))
                .ok_or_else(|| {
                    ApiError::Config(format!(
                        "QUIZ_KEYWORD_THRESHOLD must be between 0 and 1: {raw}"
                    ))
                })?;
        }
        if let Some(raw) = lookup("QUIZ_TRANSITION_MS") {
            engine.transition_ms = raw.parse().map_err(|_| {
                ApiError::Config(format!("QUIZ_TRANSITION_MS is not a number: {raw}"))
            })?;
        }
        if let Some(raw) = lookup("QUIZ_DECK_FALLBACK") {
            engine.deck_policy = match raw.trim().to_lowercase().as_str() {
                "1" | "true" | "yes" => DeckPolicy::FallbackToPool,
                "0" | "false" | "no" => DeckPolicy::Strict,
                _ => {
                    return Err(ApiError::Config(format!(
                        "QUIZ_DECK_FALLBACK must be true or false: {raw}"
                    )))
                }
            };
        }
        let session_ttl = match lookup("QUIZ_SESSION_TTL_SECS") {
            Some(raw) => raw
                .parse::<u32>()
                .ok()
                .filter(|secs| *secs > 0)
                .map(|secs| Duration::seconds(i64::from(secs)))
                .ok_or_else(|| {
                    ApiError::Config(format!(
                        "QUIZ_SESSION_TTL_SECS must be a positive number: {raw}"
                    ))
                })?,
            None => Duration::seconds(DEFAULT_SESSION_TTL_SECS),
        };

        Ok(Self {
            host,
            port,
            bank_path,
            engine,
            session_ttl,
        })
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
