//! Training planner core
//!
//! Normalizes generated strength plans, derives the weekly schedule, tracks
//! weekly progress from session logs and runs the 12-week cardio program.

pub mod cardio;
pub mod commands;
pub mod config;
pub mod db;
pub mod error;
pub mod llm;
pub mod logs;
pub mod models;
pub mod plan;
pub mod profile;
pub mod progress;
pub mod schedule;

#[cfg(test)]
pub mod test_utils;

pub use config::AppConfig;
pub use db::AppState;
pub use error::TrackerError;

use tracing_subscriber::EnvFilter;

/// Install the global `fmt` subscriber
///
/// Level comes from `RUST_LOG` when set, else from the configured
/// `LOG_LEVEL`. Calling this twice keeps the first subscriber.
pub fn init_tracing(config: &AppConfig) {
  let filter = EnvFilter::try_from_default_env()
    .or_else(|_| EnvFilter::try_new(&config.log_level))
    .unwrap_or_else(|_| EnvFilter::new("info"));

  let _ = tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_target(false)
    .try_init();
}

/// Load configuration, start logging and open the database
pub async fn bootstrap() -> Result<AppState, TrackerError> {
  let config = AppConfig::load()?;
  init_tracing(&config);
  AppState::initialize(config).await
}

#[cfg(test)]
mod tests {
  use super::*;
  use serial_test::serial;

  #[test]
  #[serial]
  fn test_init_tracing_twice_is_harmless() {
    let config = AppConfig::in_memory();
    init_tracing(&config);
    init_tracing(&config);
  }

  #[test]
  #[serial]
  fn test_bad_log_level_falls_back() {
    temp_env::with_vars(
      [("RUST_LOG", None::<&str>), ("LOG_LEVEL", Some("not a level ==="))],
      || {
        let config = AppConfig::from_env().unwrap();
        init_tracing(&config);
      },
    );
  }
}
