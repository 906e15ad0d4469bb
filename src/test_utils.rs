//! Test utilities and helpers for unit testing
//!
//! This module provides common test infrastructure including:
//! - Database setup/teardown
//! - Seed helpers for profiles, cardio progress and logs
//! - Mock data factories and a canned plan generator

use std::cell::Cell;

use chrono::{DateTime, Duration, Utc};
use sqlx::SqlitePool;

use crate::config::AppConfig;
use crate::db::AppState;
use crate::error::TrackerError;
use crate::llm::PlanGenerator;
use crate::models::{GenerationProfile, LooseValue, ProfileInput};
use crate::plan::{RawExercise, RawPlan, RawWorkout};

/// ---------------------------------------------------------------------------
/// Database Test Utilities
/// ---------------------------------------------------------------------------

/// Create an in-memory SQLite database for testing
/// Runs all migrations and returns a ready-to-use pool
///
/// Uses max_connections(1) to prevent multiple pool connections from creating
/// isolated in-memory databases, which would cause intermittent test failures
pub async fn setup_test_db() -> SqlitePool {
  let pool = sqlx::sqlite::SqlitePoolOptions::new()
    .max_connections(1)
    .connect("sqlite::memory:")
    .await
    .expect("Failed to create in-memory database");

  sqlx::migrate!("./migrations")
    .run(&pool)
    .await
    .expect("Failed to run migrations");

  pool
}

/// Close a test database pool
pub async fn teardown_test_db(pool: SqlitePool) {
  pool.close().await;
}

/// App state over a fresh in-memory database
pub async fn setup_test_state() -> AppState {
  AppState {
    db: setup_test_db().await,
    config: AppConfig::in_memory(),
  }
}

/// Force the stored cardio week for a user
pub async fn seed_cardio_week(pool: &SqlitePool, user_id: &str, week: u8) {
  sqlx::query(
    r#"
    INSERT INTO cardio_progress (user_id, current_week, updated_at)
    VALUES (?1, ?2, ?3)
    ON CONFLICT(user_id) DO UPDATE SET
      current_week = excluded.current_week,
      updated_at = excluded.updated_at
    "#,
  )
  .bind(user_id)
  .bind(i64::from(week))
  .bind(Utc::now())
  .execute(pool)
  .await
  .expect("Failed to seed cardio week");
}

/// Insert a bare workout log row, returning its id
pub async fn seed_workout_log(
  pool: &SqlitePool,
  user_id: &str,
  workout_type: &str,
  completed_at: DateTime<Utc>,
) -> i64 {
  sqlx::query(
    "INSERT INTO workout_logs (user_id, workout_type, completed_at, notes) VALUES (?1, ?2, ?3, '')",
  )
  .bind(user_id)
  .bind(workout_type)
  .bind(completed_at)
  .execute(pool)
  .await
  .expect("Failed to seed workout log")
  .last_insert_rowid()
}

/// ---------------------------------------------------------------------------
/// Mock Data Factories
/// ---------------------------------------------------------------------------

/// Raw generator output with one workout per code, two exercises each
pub fn mock_raw_plan(codes: &[&str]) -> RawPlan {
  RawPlan {
    workouts: codes
      .iter()
      .map(|code| RawWorkout {
        workout_type: code.to_string(),
        name: format!("Grupo {}", code),
        exercises: vec![
          RawExercise {
            name: format!("Exercício {}1", code),
            sets: LooseValue::from(3u32),
            reps: LooseValue::from("10-12"),
            rest: LooseValue::from("60s"),
          },
          RawExercise {
            name: format!("Exercício {}2", code),
            sets: LooseValue::from("4"),
            reps: LooseValue::from(8u32),
            rest: LooseValue::from("90s"),
          },
        ],
      })
      .collect(),
    cardio_recommendation: Some("Caminhada de 30 minutos".to_string()),
  }
}

pub fn mock_profile_input() -> ProfileInput {
  ProfileInput {
    weight: Some(80.0),
    height: Some(1.75),
    age: Some(25),
    gender: Some("Masculino".to_string()),
    goal: Some("Hipertrofia".to_string()),
    experience_level: Some("Iniciante".to_string()),
    training_days_per_week: Some(3),
  }
}

pub fn mock_generation_profile() -> GenerationProfile {
  GenerationProfile {
    weight: 80.0,
    height: 1.75,
    age: 25,
    gender: "Masculino".to_string(),
    goal: "Hipertrofia".to_string(),
    experience_level: "Iniciante".to_string(),
    training_days_per_week: 3,
  }
}

/// Generator returning a fixed outcome and counting calls
pub struct StubGenerator {
  outcome: Result<RawPlan, TrackerError>,
  calls: Cell<usize>,
}

impl StubGenerator {
  pub fn returning(plan: RawPlan) -> Self {
    Self {
      outcome: Ok(plan),
      calls: Cell::new(0),
    }
  }

  pub fn failing(err: TrackerError) -> Self {
    Self {
      outcome: Err(err),
      calls: Cell::new(0),
    }
  }

  pub fn calls(&self) -> usize {
    self.calls.get()
  }
}

impl PlanGenerator for StubGenerator {
  async fn generate(&self, _profile: &GenerationProfile) -> Result<RawPlan, TrackerError> {
    self.calls.set(self.calls.get() + 1);
    self.outcome.clone()
  }
}

/// ---------------------------------------------------------------------------
/// Time Helpers
/// ---------------------------------------------------------------------------

/// Create a DateTime N days ago from now
pub fn datetime_days_ago(days: i64) -> DateTime<Utc> {
  Utc::now() - Duration::days(days)
}

/// ---------------------------------------------------------------------------
/// Tests for Test Utilities
/// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use super::*;

  #[tokio::test]
  async fn test_setup_db_creates_schema() {
    let pool = setup_test_db().await;

    let tables: Vec<(String,)> = sqlx::query_as(
      "SELECT name FROM sqlite_master WHERE type='table' AND name IN ('profiles', 'cardio_progress', 'workout_logs', 'exercise_logs')"
    )
    .fetch_all(&pool)
    .await
    .expect("Failed to query tables");

    assert_eq!(tables.len(), 4, "Expected 4 tables, got {}", tables.len());

    teardown_test_db(pool).await;
  }

  #[tokio::test]
  async fn test_stub_generator_counts_calls() {
    let stub = StubGenerator::returning(mock_raw_plan(&["A"]));
    let profile = mock_generation_profile();

    stub.generate(&profile).await.unwrap();
    stub.generate(&profile).await.unwrap();
    assert_eq!(stub.calls(), 2);
  }

  #[test]
  fn test_mock_input_validates() {
    assert_eq!(mock_profile_input().validate().unwrap(), mock_generation_profile());
  }
}
