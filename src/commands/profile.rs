//! Sign-up, profile stats and profile edits

use serde::Serialize;

use crate::cardio::{load_progress, FIRST_WEEK};
use crate::db::AppState;
use crate::error::TrackerError;
use crate::logs::{count_logs, LogFilter};
use crate::models::{bmi, ProfileRow, ProfileUpdate};
use crate::profile::{create_profile, load_profile, update_profile};

#[derive(Debug, Clone, Serialize)]
pub struct ProfileStats {
  pub user_id: String,
  pub display_name: Option<String>,
  pub onboarding_completed: bool,
  pub strength_sessions: i64,
  pub cardio_sessions: i64,
  pub current_cardio_week: u8,
  pub weight: Option<f64>,
  pub height: Option<f64>,
  pub bmi: Option<f64>,
}

pub async fn sign_up(
  state: &AppState,
  user_id: &str,
  display_name: Option<&str>,
) -> Result<ProfileRow, TrackerError> {
  if user_id.trim().is_empty() {
    return Err(TrackerError::Validation("user_id is required".to_string()));
  }
  create_profile(&state.db, user_id, display_name).await
}

pub async fn get_profile_stats(state: &AppState, user_id: &str) -> Result<ProfileStats, TrackerError> {
  let profile = load_profile(&state.db, user_id).await?;
  stats_for(state, profile).await
}

pub async fn edit_profile(
  state: &AppState,
  user_id: &str,
  update: &ProfileUpdate,
) -> Result<ProfileStats, TrackerError> {
  let profile = update_profile(&state.db, user_id, update).await?;
  stats_for(state, profile).await
}

async fn stats_for(state: &AppState, profile: ProfileRow) -> Result<ProfileStats, TrackerError> {
  let strength_sessions = count_logs(&state.db, &profile.user_id, LogFilter::Strength).await?;
  let cardio_sessions = count_logs(&state.db, &profile.user_id, LogFilter::Cardio).await?;
  let current_cardio_week = load_progress(&state.db, &profile.user_id)
    .await?
    .map(|p| p.current_week)
    .unwrap_or(FIRST_WEEK);

  Ok(ProfileStats {
    bmi: bmi(profile.weight, profile.height),
    user_id: profile.user_id,
    display_name: profile.display_name,
    onboarding_completed: profile.onboarding_completed,
    strength_sessions,
    cardio_sessions,
    current_cardio_week,
    weight: profile.weight,
    height: profile.height,
  })
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::test_utils::*;
  use chrono::Utc;

  #[tokio::test]
  async fn test_stats_for_new_user() {
    let state = setup_test_state().await;
    sign_up(&state, "u1", Some("Ana")).await.unwrap();

    let stats = get_profile_stats(&state, "u1").await.unwrap();
    assert_eq!(stats.strength_sessions, 0);
    assert_eq!(stats.cardio_sessions, 0);
    assert_eq!(stats.current_cardio_week, 1);
    assert_eq!(stats.bmi, None);
    assert!(!stats.onboarding_completed);

    teardown_test_db(state.db).await;
  }

  #[tokio::test]
  async fn test_stats_count_sessions_by_kind() {
    let state = setup_test_state().await;
    sign_up(&state, "u1", None).await.unwrap();
    for kind in ["A", "B", "cardio"] {
      seed_workout_log(&state.db, "u1", kind, Utc::now()).await;
    }
    seed_cardio_week(&state.db, "u1", 6).await;

    let stats = get_profile_stats(&state, "u1").await.unwrap();
    assert_eq!(stats.strength_sessions, 2);
    assert_eq!(stats.cardio_sessions, 1);
    assert_eq!(stats.current_cardio_week, 6);

    teardown_test_db(state.db).await;
  }

  #[tokio::test]
  async fn test_edit_profile_updates_bmi() {
    let state = setup_test_state().await;
    sign_up(&state, "u1", None).await.unwrap();

    let update = ProfileUpdate {
      display_name: Some("Bruno".to_string()),
      weight: Some(80.0),
      height: Some(1.75),
    };
    let stats = edit_profile(&state, "u1", &update).await.unwrap();

    assert_eq!(stats.display_name.as_deref(), Some("Bruno"));
    assert_eq!(stats.bmi, Some(26.1));

    teardown_test_db(state.db).await;
  }

  #[tokio::test]
  async fn test_blank_user_id_rejected() {
    let state = setup_test_state().await;

    let err = sign_up(&state, "  ", None).await.unwrap_err();
    assert!(matches!(err, TrackerError::Validation(_)));

    teardown_test_db(state.db).await;
  }
}
