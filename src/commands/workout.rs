//! Strength session: tick exercises off, record loads, save once at the end

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use tracing::info;

use crate::db::AppState;
use crate::error::TrackerError;
use crate::logs::{insert_exercise_log, insert_workout_log};
use crate::models::{Exercise, NewExerciseLog, NewWorkoutLog, WorkoutDefinition, WorkoutLog};
use crate::profile::load_active_plan;
use crate::progress::completion_percent;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionExercise {
  pub exercise: Exercise,
  pub completed: bool,
  pub weight_kg: Option<f64>,
}

/// In-progress strength workout; nothing is stored until `finish`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkoutSession {
  pub user_id: String,
  pub workout_type: String,
  pub started_at: DateTime<Utc>,
  pub exercises: Vec<SessionExercise>,
}

impl WorkoutSession {
  pub fn start(user_id: &str, workout: &WorkoutDefinition, started_at: DateTime<Utc>) -> Self {
    Self {
      user_id: user_id.to_string(),
      workout_type: workout.type_code.clone(),
      started_at,
      exercises: workout
        .exercises
        .iter()
        .map(|exercise| SessionExercise {
          exercise: exercise.clone(),
          completed: false,
          weight_kg: None,
        })
        .collect(),
    }
  }

  fn entry_mut(&mut self, exercise_id: &str) -> Result<&mut SessionExercise, TrackerError> {
    self
      .exercises
      .iter_mut()
      .find(|e| e.exercise.id == exercise_id)
      .ok_or_else(|| TrackerError::NotFound(format!("exercise {}", exercise_id)))
  }

  /// Flip completion, returning the new state
  pub fn toggle(&mut self, exercise_id: &str) -> Result<bool, TrackerError> {
    let entry = self.entry_mut(exercise_id)?;
    entry.completed = !entry.completed;
    Ok(entry.completed)
  }

  /// Record the load typed by the user; unreadable input clears it
  pub fn set_weight(&mut self, exercise_id: &str, raw: &str) -> Result<Option<f64>, TrackerError> {
    let entry = self.entry_mut(exercise_id)?;
    entry.weight_kg = parse_weight(raw);
    Ok(entry.weight_kg)
  }

  pub fn completed_count(&self) -> usize {
    self.exercises.iter().filter(|e| e.completed).count()
  }

  pub fn total(&self) -> usize {
    self.exercises.len()
  }

  pub fn percent(&self) -> u8 {
    completion_percent(self.completed_count(), self.total())
  }

  /// Append the workout log and one exercise log per completed exercise
  ///
  /// Both go in one transaction. At least one exercise must be completed.
  pub async fn finish(&self, pool: &SqlitePool, now: DateTime<Utc>) -> Result<WorkoutLog, TrackerError> {
    let done = self.completed_count();
    if done == 0 {
      return Err(TrackerError::Validation(
        "complete at least one exercise before finishing".to_string(),
      ));
    }

    let minutes = (now - self.started_at).num_minutes().max(0);
    let mut tx = pool.begin().await?;

    let log = insert_workout_log(
      &mut *tx,
      &NewWorkoutLog {
        user_id: self.user_id.clone(),
        workout_type: self.workout_type.clone(),
        completed_at: now,
        duration_minutes: Some(minutes),
        notes: format!("{}/{} exercícios completos", done, self.total()),
      },
    )
    .await?;

    for entry in self.exercises.iter().filter(|e| e.completed) {
      let exercise = &entry.exercise;
      insert_exercise_log(
        &mut *tx,
        log.id,
        &NewExerciseLog {
          exercise_name: exercise.name.clone(),
          sets_completed: exercise.sets.as_count().map(i64::from).unwrap_or(0),
          reps: exercise.reps.to_string(),
          weight_kg: entry.weight_kg,
        },
      )
      .await?;
    }

    tx.commit().await?;

    info!(
      user_id = %self.user_id,
      workout_type = %self.workout_type,
      completed = done,
      total = self.total(),
      "Workout saved"
    );
    Ok(log)
  }
}

/// Lenient kg reading: `"42.5"`, `"42,5"`, `"42.5kg"`; anything else is `None`
pub fn parse_weight(raw: &str) -> Option<f64> {
  let normalized = raw.trim().replace(',', ".");
  let numeric: String = normalized
    .chars()
    .take_while(|c| c.is_ascii_digit() || *c == '.')
    .collect();

  numeric
    .parse::<f64>()
    .ok()
    .filter(|w| w.is_finite() && *w >= 0.0)
}

/// Open a session for one workout of the user's active plan
pub async fn start_workout(
  state: &AppState,
  user_id: &str,
  type_code: &str,
) -> Result<WorkoutSession, TrackerError> {
  let active = load_active_plan(&state.db, user_id).await?;
  let workout = active
    .workout(type_code)
    .ok_or_else(|| TrackerError::NotFound(format!("workout {}", type_code)))?;

  Ok(WorkoutSession::start(user_id, workout, Utc::now()))
}

pub async fn finish_workout(state: &AppState, session: &WorkoutSession) -> Result<WorkoutLog, TrackerError> {
  session.finish(&state.db, Utc::now()).await
}
