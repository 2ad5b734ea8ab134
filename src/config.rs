//! Runtime configuration read from the environment (and `.env`)

use serde::Serialize;
use std::env;

/// ---------------------------------------------------------------------------
/// Configuration Constants
/// ---------------------------------------------------------------------------

const DEFAULT_DATABASE_URL: &str = "sqlite://hypertrophy-coach.db?mode=rwc";
const DEFAULT_LOG_FILTER: &str = "info";
const DEFAULT_HISTORY_WINDOW_DAYS: u32 = 28;
const DEFAULT_MAX_CONNECTIONS: u32 = 5;
const MAX_HISTORY_WINDOW_DAYS: u32 = 365;

/// ---------------------------------------------------------------------------
/// Error Handling
/// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error, Serialize, PartialEq, Eq)]
#[serde(tag = "type", content = "message")]
pub enum ConfigError {
  #[error("Invalid value for {key}: {value}")]
  Invalid { key: String, value: String },
}

/// ---------------------------------------------------------------------------
/// Engine Configuration
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
  pub database_url: String,
  /// `tracing_subscriber::EnvFilter` directive
  pub log_filter: String,
  /// How far back exercise history is read for weight estimation
  pub history_window_days: u32,
  pub max_connections: u32,
}

impl Default for EngineConfig {
  fn default() -> Self {
    Self {
      database_url: DEFAULT_DATABASE_URL.to_string(),
      log_filter: DEFAULT_LOG_FILTER.to_string(),
      history_window_days: DEFAULT_HISTORY_WINDOW_DAYS,
      max_connections: DEFAULT_MAX_CONNECTIONS,
    }
  }
}

fn parse_bounded(key: &str, default: u32, min: u32, max: u32) -> Result<u32, ConfigError> {
  match env::var(key) {
    Err(_) => Ok(default),
    Ok(raw) => raw
      .trim()
      .parse::<u32>()
      .ok()
      .filter(|v| (min..=max).contains(v))
      .ok_or(ConfigError::Invalid {
        key: key.to_string(),
        value: raw,
      }),
  }
}

impl EngineConfig {
  /// Reads `COACH_*` variables, loading `.env` first if present
  pub fn from_env() -> Result<Self, ConfigError> {
    dotenvy::dotenv().ok();

    Ok(Self {
      database_url: env::var("COACH_DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string()),
      log_filter: env::var("COACH_LOG").unwrap_or_else(|_| DEFAULT_LOG_FILTER.to_string()),
      history_window_days: parse_bounded(
        "COACH_HISTORY_WINDOW_DAYS",
        DEFAULT_HISTORY_WINDOW_DAYS,
        1,
        MAX_HISTORY_WINDOW_DAYS,
      )?,
      max_connections: parse_bounded("COACH_MAX_CONNECTIONS", DEFAULT_MAX_CONNECTIONS, 1, u32::MAX)?,
    })
  }
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
