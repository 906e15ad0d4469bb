//! Cardio program actions

use crate::cardio::{CardioOverview, CardioTracker};
use crate::db::AppState;
use crate::error::TrackerError;
use crate::models::WorkoutLog;

pub async fn get_cardio_overview(state: &AppState, user_id: &str) -> Result<CardioOverview, TrackerError> {
  let tracker = CardioTracker::load(&state.db, user_id).await?;
  Ok(tracker.overview())
}

/// Advance one week and return the refreshed overview
pub async fn advance_cardio_week(state: &AppState, user_id: &str) -> Result<CardioOverview, TrackerError> {
  let mut tracker = CardioTracker::load(&state.db, user_id).await?;
  tracker.advance_week(&state.db).await?;
  Ok(tracker.overview())
}

pub async fn log_cardio_session(state: &AppState, user_id: &str) -> Result<WorkoutLog, TrackerError> {
  let tracker = CardioTracker::load(&state.db, user_id).await?;
  tracker.log_session(&state.db).await
}
