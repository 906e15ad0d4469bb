use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Log type used for every cardio session
pub const CARDIO_LOG_TYPE: &str = "cardio";

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct WorkoutLog {
  pub id: i64,
  pub user_id: String,
  /// A plan type code, or `"cardio"`
  pub workout_type: String,
  pub completed_at: DateTime<Utc>,
  pub duration_minutes: Option<i64>,
  pub notes: String,
}

impl WorkoutLog {
  pub fn is_cardio(&self) -> bool {
    self.workout_type == CARDIO_LOG_TYPE
  }
}

/// For inserting new workout logs (without id)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewWorkoutLog {
  pub user_id: String,
  pub workout_type: String,
  pub completed_at: DateTime<Utc>,
  pub duration_minutes: Option<i64>,
  pub notes: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ExerciseLog {
  pub id: i64,
  pub workout_log_id: i64,
  pub exercise_name: String,
  pub sets_completed: i64,
  pub reps: String,
  pub weight_kg: Option<f64>,
  pub completed: bool,
}

/// For inserting exercise logs; the parent id is assigned at insert time
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewExerciseLog {
  pub exercise_name: String,
  pub sets_completed: i64,
  pub reps: String,
  pub weight_kg: Option<f64>,
}
