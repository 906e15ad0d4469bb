//! User-facing actions
//!
//! Each function takes the shared `AppState` and returns `TrackerError`, so
//! any outer surface can forward results and errors as they are.

pub mod cardio;
pub mod dashboard;
pub mod onboarding;
pub mod profile;
pub mod workout;

use chrono::{DateTime, TimeZone};

use crate::db::AppState;
use crate::error::TrackerError;
use crate::logs::load_logs_between;
use crate::models::WorkoutLog;
use crate::progress::week_window;

/// This week's session logs, oldest first
pub async fn get_week_logs<Tz: TimeZone>(
  state: &AppState,
  user_id: &str,
  now: &DateTime<Tz>,
) -> Result<Vec<WorkoutLog>, TrackerError> {
  let (start, end) = week_window(now);
  load_logs_between(&state.db, user_id, start, end).await
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::test_utils::*;
  use chrono::Utc;

  #[tokio::test]
  async fn test_get_week_logs_excludes_last_week() {
    let state = setup_test_state().await;
    let now = Utc.with_ymd_and_hms(2026, 10, 21, 12, 0, 0).unwrap();
    seed_workout_log(&state.db, "u1", "A", now).await;
    seed_workout_log(&state.db, "u1", "B", Utc.with_ymd_and_hms(2026, 10, 14, 12, 0, 0).unwrap()).await;

    let logs = get_week_logs(&state, "u1", &now).await.unwrap();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].workout_type, "A");

    teardown_test_db(state.db).await;
  }
}
