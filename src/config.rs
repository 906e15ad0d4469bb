//! Environment-driven configuration
//!
//! Values come from the process environment, optionally seeded from a `.env`
//! file by `dotenvy` in `AppConfig::load`.

use std::env;

use crate::error::TrackerError;

const DEFAULT_DATABASE_URL: &str = "sqlite://training-planner.db?mode=rwc";
const DEFAULT_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";
const DEFAULT_GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com";
const DEFAULT_TEMPERATURE: f32 = 0.2;
const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Clone)]
pub struct AppConfig {
  pub database_url: String,
  pub max_connections: u32,
  pub gemini: GeminiConfig,
  pub log_level: String,
}

#[derive(Debug, Clone)]
pub struct GeminiConfig {
  /// Absent until the user configures a key; the client refuses to start without it
  pub api_key: Option<String>,
  pub model: String,
  pub api_base: String,
  pub temperature: f32,
}

impl Default for GeminiConfig {
  fn default() -> Self {
    Self {
      api_key: None,
      model: DEFAULT_GEMINI_MODEL.to_string(),
      api_base: DEFAULT_GEMINI_API_BASE.to_string(),
      temperature: DEFAULT_TEMPERATURE,
    }
  }
}

impl AppConfig {
  /// Load `.env` (if present) and read the environment
  pub fn load() -> Result<Self, TrackerError> {
    dotenvy::dotenv().ok();
    Self::from_env()
  }

  pub fn from_env() -> Result<Self, TrackerError> {
    Ok(Self {
      database_url: env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string()),
      max_connections: parse_var("DATABASE_MAX_CONNECTIONS", DEFAULT_MAX_CONNECTIONS)?,
      gemini: GeminiConfig {
        api_key: env::var("GEMINI_API_KEY").ok().filter(|k| !k.trim().is_empty()),
        model: env::var("GEMINI_MODEL").unwrap_or_else(|_| DEFAULT_GEMINI_MODEL.to_string()),
        api_base: env::var("GEMINI_API_BASE")
          .unwrap_or_else(|_| DEFAULT_GEMINI_API_BASE.to_string()),
        temperature: parse_var("GEMINI_TEMPERATURE", DEFAULT_TEMPERATURE)?,
      },
      log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| DEFAULT_LOG_LEVEL.to_string()),
    })
  }

  /// Configuration for tests and embedded use: in-memory database, no API key
  pub fn in_memory() -> Self {
    Self {
      database_url: "sqlite::memory:".to_string(),
      max_connections: 1,
      gemini: GeminiConfig::default(),
      log_level: DEFAULT_LOG_LEVEL.to_string(),
    }
  }
}

fn parse_var<T: std::str::FromStr>(name: &str, default: T) -> Result<T, TrackerError> {
  match env::var(name) {
    Ok(raw) => raw
      .trim()
      .parse()
      .map_err(|_| TrackerError::Validation(format!("{} has an invalid value: {}", name, raw))),
    Err(_) => Ok(default),
  }
}
