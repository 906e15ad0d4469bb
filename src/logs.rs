//! Append-only session logs
//!
//! `workout_logs` gets one row per finished session (strength or cardio),
//! `exercise_logs` one child row per completed exercise. Rows are never
//! updated or deleted.

use chrono::{DateTime, Utc};
use sqlx::{Executor, Sqlite, SqlitePool};
use tracing::debug;

use crate::error::TrackerError;
use crate::models::{ExerciseLog, NewExerciseLog, NewWorkoutLog, WorkoutLog, CARDIO_LOG_TYPE};

/// Which logs to count
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFilter {
  All,
  Cardio,
  Strength,
}

pub async fn insert_workout_log<'e, E>(executor: E, log: &NewWorkoutLog) -> Result<WorkoutLog, TrackerError>
where
  E: Executor<'e, Database = Sqlite>,
{
  let row = sqlx::query_as::<_, WorkoutLog>(
    r#"
    INSERT INTO workout_logs (user_id, workout_type, completed_at, duration_minutes, notes)
    VALUES (?1, ?2, ?3, ?4, ?5)
    RETURNING id, user_id, workout_type, completed_at, duration_minutes, notes
    "#,
  )
  .bind(&log.user_id)
  .bind(&log.workout_type)
  .bind(log.completed_at)
  .bind(log.duration_minutes)
  .bind(&log.notes)
  .fetch_one(executor)
  .await
  .map_err(|e| TrackerError::Persistence(format!("Failed to insert workout log: {}", e)))?;

  debug!(log_id = row.id, workout_type = %row.workout_type, "Workout log inserted");
  Ok(row)
}

pub async fn insert_exercise_log<'e, E>(
  executor: E,
  workout_log_id: i64,
  entry: &NewExerciseLog,
) -> Result<ExerciseLog, TrackerError>
where
  E: Executor<'e, Database = Sqlite>,
{
  sqlx::query_as::<_, ExerciseLog>(
    r#"
    INSERT INTO exercise_logs (workout_log_id, exercise_name, sets_completed, reps, weight_kg, completed)
    VALUES (?1, ?2, ?3, ?4, ?5, 1)
    RETURNING id, workout_log_id, exercise_name, sets_completed, reps, weight_kg, completed
    "#,
  )
  .bind(workout_log_id)
  .bind(&entry.exercise_name)
  .bind(entry.sets_completed)
  .bind(&entry.reps)
  .bind(entry.weight_kg)
  .fetch_one(executor)
  .await
  .map_err(|e| TrackerError::Persistence(format!("Failed to insert exercise log: {}", e)))
}

/// Logs with `start <= completed_at < end`, oldest first
pub async fn load_logs_between(
  pool: &SqlitePool,
  user_id: &str,
  start: DateTime<Utc>,
  end: DateTime<Utc>,
) -> Result<Vec<WorkoutLog>, TrackerError> {
  sqlx::query_as::<_, WorkoutLog>(
    r#"
    SELECT id, user_id, workout_type, completed_at, duration_minutes, notes
    FROM workout_logs
    WHERE user_id = ?1 AND completed_at >= ?2 AND completed_at < ?3
    ORDER BY completed_at
    "#,
  )
  .bind(user_id)
  .bind(start)
  .bind(end)
  .fetch_all(pool)
  .await
  .map_err(|e| TrackerError::Persistence(format!("Failed to load workout logs: {}", e)))
}

pub async fn load_exercise_logs(
  pool: &SqlitePool,
  workout_log_id: i64,
) -> Result<Vec<ExerciseLog>, TrackerError> {
  sqlx::query_as::<_, ExerciseLog>(
    r#"
    SELECT id, workout_log_id, exercise_name, sets_completed, reps, weight_kg, completed
    FROM exercise_logs
    WHERE workout_log_id = ?1
    ORDER BY id
    "#,
  )
  .bind(workout_log_id)
  .fetch_all(pool)
  .await
  .map_err(|e| TrackerError::Persistence(format!("Failed to load exercise logs: {}", e)))
}

pub async fn count_logs(pool: &SqlitePool, user_id: &str, filter: LogFilter) -> Result<i64, TrackerError> {
  let sql = match filter {
    LogFilter::All => "SELECT COUNT(*) FROM workout_logs WHERE user_id = ?1",
    LogFilter::Cardio => "SELECT COUNT(*) FROM workout_logs WHERE user_id = ?1 AND workout_type = ?2",
    LogFilter::Strength => "SELECT COUNT(*) FROM workout_logs WHERE user_id = ?1 AND workout_type != ?2",
  };

  let mut query = sqlx::query_scalar::<_, i64>(sql).bind(user_id);
  if filter != LogFilter::All {
    query = query.bind(CARDIO_LOG_TYPE);
  }

  query
    .fetch_one(pool)
    .await
    .map_err(|e| TrackerError::Persistence(format!("Failed to count workout logs: {}", e)))
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::test_utils::{datetime_days_ago, setup_test_db, teardown_test_db};
  use chrono::Duration;

  fn new_log(user_id: &str, workout_type: &str, completed_at: DateTime<Utc>) -> NewWorkoutLog {
    NewWorkoutLog {
      user_id: user_id.to_string(),
      workout_type: workout_type.to_string(),
      completed_at,
      duration_minutes: None,
      notes: "teste".to_string(),
    }
  }

  #[tokio::test]
  async fn test_insert_returns_row() {
    let pool = setup_test_db().await;
    let now = Utc::now();

    let row = insert_workout_log(&pool, &new_log("u1", "A", now))
      .await
      .expect("Should insert");

    assert!(row.id > 0);
    assert_eq!(row.workout_type, "A");
    assert_eq!(row.notes, "teste");
    assert!(!row.is_cardio());
    assert_eq!(row.completed_at.timestamp(), now.timestamp());

    teardown_test_db(pool).await;
  }

  #[tokio::test]
  async fn test_load_between_is_half_open() {
    let pool = setup_test_db().await;
    let start = datetime_days_ago(3);
    let end = start + Duration::days(2);

    for at in [start - Duration::seconds(1), start, end - Duration::seconds(1), end] {
      insert_workout_log(&pool, &new_log("u1", "A", at)).await.unwrap();
    }
    insert_workout_log(&pool, &new_log("u2", "A", start)).await.unwrap();

    let logs = load_logs_between(&pool, "u1", start, end).await.unwrap();
    assert_eq!(logs.len(), 2);
    assert!(logs.iter().all(|l| l.user_id == "u1"));

    teardown_test_db(pool).await;
  }

  #[tokio::test]
  async fn test_count_by_filter() {
    let pool = setup_test_db().await;
    let now = Utc::now();
    for t in ["A", "B", "cardio", "cardio", "cardio"] {
      insert_workout_log(&pool, &new_log("u1", t, now)).await.unwrap();
    }
    insert_workout_log(&pool, &new_log("other", "cardio", now)).await.unwrap();

    assert_eq!(count_logs(&pool, "u1", LogFilter::All).await.unwrap(), 5);
    assert_eq!(count_logs(&pool, "u1", LogFilter::Cardio).await.unwrap(), 3);
    assert_eq!(count_logs(&pool, "u1", LogFilter::Strength).await.unwrap(), 2);
    assert_eq!(count_logs(&pool, "nobody", LogFilter::All).await.unwrap(), 0);

    teardown_test_db(pool).await;
  }

  #[tokio::test]
  async fn test_exercise_logs_reference_parent() {
    let pool = setup_test_db().await;
    let parent = insert_workout_log(&pool, &new_log("u1", "A", Utc::now())).await.unwrap();

    let entry = NewExerciseLog {
      exercise_name: "Supino reto".to_string(),
      sets_completed: 4,
      reps: "10-12".to_string(),
      weight_kg: Some(42.5),
    };
    insert_exercise_log(&pool, parent.id, &entry).await.unwrap();

    let rows = load_exercise_logs(&pool, parent.id).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].exercise_name, "Supino reto");
    assert_eq!(rows[0].weight_kg, Some(42.5));
    assert!(rows[0].completed);

    teardown_test_db(pool).await;
  }
}
