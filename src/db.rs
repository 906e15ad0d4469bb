use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use tracing::info;

use crate::config::AppConfig;
use crate::error::TrackerError;

pub type DbPool = SqlitePool;

/// Application state holding the database connection pool and configuration
pub struct AppState {
  pub db: DbPool,
  pub config: AppConfig,
}

impl AppState {
  /// Connect and run migrations
  pub async fn initialize(config: AppConfig) -> Result<Self, TrackerError> {
    let db = initialize_db(&config).await?;
    Ok(Self { db, config })
  }
}

/// Initialize the database connection pool and run migrations
pub async fn initialize_db(config: &AppConfig) -> Result<DbPool, TrackerError> {
  info!(url = %config.database_url, "Initializing database");

  let options = SqliteConnectOptions::from_str(&config.database_url)
    .map_err(|e| TrackerError::Persistence(format!("Invalid database URL: {}", e)))?
    .create_if_missing(true)
    .foreign_keys(true);

  let pool = SqlitePoolOptions::new()
    .max_connections(config.max_connections.max(1))
    .connect_with(options)
    .await?;

  sqlx::migrate!("./migrations").run(&pool).await?;

  info!("Database initialized successfully");

  Ok(pool)
}
