//! Onboarding and plan regeneration

use tracing::{info, warn};

use crate::db::AppState;
use crate::error::TrackerError;
use crate::llm::{GeminiClient, PlanGenerator};
use crate::models::{ProfileInput, TrainingPlan};
use crate::plan::{normalize, ActivePlan};
use crate::profile::{load_profile, save_generated_plan};

/// Validate the form, generate, normalize and store the new plan
///
/// Nothing is written unless every step succeeds, so a failed regeneration
/// leaves the previous plan in place.
pub async fn generate_plan<G: PlanGenerator>(
  state: &AppState,
  generator: &G,
  user_id: &str,
  input: &ProfileInput,
) -> Result<TrainingPlan, TrackerError> {
  let profile = input.validate()?;
  load_profile(&state.db, user_id).await?;

  let raw = generator.generate(&profile).await?;

  let plan = match normalize(Some(&raw)) {
    ActivePlan::Generated(plan) => plan,
    ActivePlan::Default(_) => {
      warn!(user_id = %user_id, "Generator returned no workouts");
      return Err(TrackerError::Generation(
        "generated plan has no workouts".to_string(),
      ));
    }
  };

  save_generated_plan(&state.db, user_id, &profile, &plan).await?;
  info!(user_id = %user_id, types = ?plan.type_codes(), "Onboarding complete");

  Ok(plan)
}

/// `generate_plan` against the configured Gemini endpoint
pub async fn generate_plan_with_gemini(
  state: &AppState,
  user_id: &str,
  input: &ProfileInput,
) -> Result<TrainingPlan, TrackerError> {
  // Form errors win over a missing key
  input.validate()?;
  let client = GeminiClient::new(&state.config.gemini)?;
  generate_plan(state, &client, user_id, input).await
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::plan::default_plan;
  use crate::profile::{create_profile, load_active_plan};
  use crate::test_utils::*;

  #[tokio::test]
  async fn test_generate_plan_persists_normalized_plan() {
    // Arrange
    let state = setup_test_state().await;
    create_profile(&state.db, "u1", None).await.unwrap();
    let stub = StubGenerator::returning(mock_raw_plan(&["A", "B", "C"]));

    // Act
    let plan = generate_plan(&state, &stub, "u1", &mock_profile_input())
      .await
      .expect("Should generate");

    // Assert
    assert_eq!(plan.type_codes(), vec!["A", "B", "C"]);
    let active = load_active_plan(&state.db, "u1").await.unwrap();
    assert!(active.is_generated());
    assert_eq!(active.plan(), &plan);
    assert!(load_profile(&state.db, "u1").await.unwrap().onboarding_completed);

    teardown_test_db(state.db).await;
  }

  #[tokio::test]
  async fn test_invalid_input_never_calls_generator() {
    let state = setup_test_state().await;
    create_profile(&state.db, "u1", None).await.unwrap();
    let stub = StubGenerator::returning(mock_raw_plan(&["A"]));

    let mut input = mock_profile_input();
    input.weight = None;
    let err = generate_plan(&state, &stub, "u1", &input).await.unwrap_err();

    assert_eq!(err, TrackerError::Validation("weight is required".to_string()));
    assert_eq!(stub.calls(), 0);

    teardown_test_db(state.db).await;
  }

  #[tokio::test]
  async fn test_failed_regeneration_keeps_previous_plan() {
    let state = setup_test_state().await;
    create_profile(&state.db, "u1", None).await.unwrap();
    let first = StubGenerator::returning(mock_raw_plan(&["A", "B"]));
    let previous = generate_plan(&state, &first, "u1", &mock_profile_input())
      .await
      .unwrap();

    let broken = StubGenerator::failing(TrackerError::PlanParse("expected value".to_string()));
    let err = generate_plan(&state, &broken, "u1", &mock_profile_input())
      .await
      .unwrap_err();
    assert!(matches!(err, TrackerError::PlanParse(_)));

    let active = load_active_plan(&state.db, "u1").await.unwrap();
    assert_eq!(active.plan(), &previous);

    teardown_test_db(state.db).await;
  }

  #[tokio::test]
  async fn test_empty_generated_plan_is_generation_error() {
    let state = setup_test_state().await;
    create_profile(&state.db, "u1", None).await.unwrap();
    let stub = StubGenerator::returning(mock_raw_plan(&[]));

    let err = generate_plan(&state, &stub, "u1", &mock_profile_input())
      .await
      .unwrap_err();
    assert!(matches!(err, TrackerError::Generation(_)));

    // Still on the default plan
    let active = load_active_plan(&state.db, "u1").await.unwrap();
    assert!(std::ptr::eq(active.plan(), default_plan()));

    teardown_test_db(state.db).await;
  }

  #[tokio::test]
  async fn test_unknown_user_is_not_found_before_generation() {
    let state = setup_test_state().await;
    let stub = StubGenerator::returning(mock_raw_plan(&["A"]));

    let err = generate_plan(&state, &stub, "ghost", &mock_profile_input())
      .await
      .unwrap_err();
    assert!(matches!(err, TrackerError::NotFound(_)));
    assert_eq!(stub.calls(), 0);

    teardown_test_db(state.db).await;
  }

  #[tokio::test]
  async fn test_gemini_without_key_is_generation_error() {
    let state = setup_test_state().await;
    create_profile(&state.db, "u1", None).await.unwrap();

    let err = generate_plan_with_gemini(&state, "u1", &mock_profile_input())
      .await
      .unwrap_err();
    assert_eq!(
      err,
      TrackerError::Generation("API key not configured".to_string())
    );

    teardown_test_db(state.db).await;
  }
}
