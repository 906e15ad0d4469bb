//! Profile persistence
//!
//! The profile row carries the physical data from onboarding and the
//! canonical plan as an embedded JSON document (`plan_json`).

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{info, warn};

use crate::cardio::create_progress;
use crate::error::TrackerError;
use crate::models::{GenerationProfile, ProfileRow, ProfileUpdate, TrainingPlan};
use crate::plan::ActivePlan;

const PROFILE_COLUMNS: &str = "user_id, display_name, weight, height, age, gender, goal, \
   experience_level, training_days_per_week, plan_json, onboarding_completed, created_at, updated_at";

/// Sign-up side effect: profile row plus cardio progress at week 1
///
/// Both rows are created together; an existing user is left as is.
pub async fn create_profile(
  pool: &SqlitePool,
  user_id: &str,
  display_name: Option<&str>,
) -> Result<ProfileRow, TrackerError> {
  let now = Utc::now();
  let mut tx = pool.begin().await?;

  let inserted = sqlx::query(
    r#"
    INSERT INTO profiles (user_id, display_name, created_at, updated_at)
    VALUES (?1, ?2, ?3, ?3)
    ON CONFLICT(user_id) DO NOTHING
    "#,
  )
  .bind(user_id)
  .bind(display_name)
  .bind(now)
  .execute(&mut *tx)
  .await
  .map_err(|e| TrackerError::Persistence(format!("Failed to create profile: {}", e)))?
  .rows_affected();

  create_progress(&mut *tx, user_id).await?;
  tx.commit().await?;

  if inserted > 0 {
    info!(user_id = %user_id, "Profile created");
  }

  load_profile(pool, user_id).await
}

pub async fn load_profile(pool: &SqlitePool, user_id: &str) -> Result<ProfileRow, TrackerError> {
  let sql = format!("SELECT {} FROM profiles WHERE user_id = ?1", PROFILE_COLUMNS);
  sqlx::query_as::<_, ProfileRow>(&sql)
    .bind(user_id)
    .fetch_optional(pool)
    .await
    .map_err(|e| TrackerError::Persistence(format!("Failed to load profile: {}", e)))?
    .ok_or_else(|| TrackerError::NotFound(format!("profile {}", user_id)))
}

/// Decode a stored plan document
///
/// The stored shape is not trusted: anything that does not decode into a
/// valid `TrainingPlan` is reported, not patched up.
pub fn decode_stored_plan(json: &str) -> Result<TrainingPlan, TrackerError> {
  let mut de = serde_json::Deserializer::from_str(json);
  serde_path_to_error::deserialize(&mut de).map_err(|e| {
    TrackerError::Persistence(format!("Stored plan is invalid at {}: {}", e.path(), e))
  })
}

/// The plan the user follows: their generated plan, or the default one
pub async fn load_active_plan(pool: &SqlitePool, user_id: &str) -> Result<ActivePlan, TrackerError> {
  let profile = load_profile(pool, user_id).await?;
  active_plan_of(&profile)
}

pub fn active_plan_of(profile: &ProfileRow) -> Result<ActivePlan, TrackerError> {
  let stored = match profile.plan_json.as_deref() {
    Some(json) => Some(decode_stored_plan(json).map_err(|e| {
      warn!(user_id = %profile.user_id, error = %e, "Stored plan rejected");
      e
    })?),
    None => None,
  };
  Ok(ActivePlan::from_stored(stored))
}

/// Store onboarding data and the canonical plan in one write
pub async fn save_generated_plan(
  pool: &SqlitePool,
  user_id: &str,
  profile: &GenerationProfile,
  plan: &TrainingPlan,
) -> Result<(), TrackerError> {
  let plan_json = serde_json::to_string(plan)
    .map_err(|e| TrackerError::Persistence(format!("Failed to encode plan: {}", e)))?;

  let result = sqlx::query(
    r#"
    UPDATE profiles SET
      weight = ?2,
      height = ?3,
      age = ?4,
      gender = ?5,
      goal = ?6,
      experience_level = ?7,
      training_days_per_week = ?8,
      plan_json = ?9,
      onboarding_completed = 1,
      updated_at = ?10
    WHERE user_id = ?1
    "#,
  )
  .bind(user_id)
  .bind(profile.weight)
  .bind(profile.height)
  .bind(i64::from(profile.age))
  .bind(&profile.gender)
  .bind(&profile.goal)
  .bind(&profile.experience_level)
  .bind(i64::from(profile.training_days_per_week))
  .bind(&plan_json)
  .bind(Utc::now())
  .execute(pool)
  .await
  .map_err(|e| TrackerError::Persistence(format!("Failed to save plan: {}", e)))?;

  if result.rows_affected() == 0 {
    return Err(TrackerError::NotFound(format!("profile {}", user_id)));
  }

  info!(user_id = %user_id, workouts = plan.len(), "Generated plan saved");
  Ok(())
}

/// Apply a profile edit; unspecified fields keep their stored value
pub async fn update_profile(
  pool: &SqlitePool,
  user_id: &str,
  update: &ProfileUpdate,
) -> Result<ProfileRow, TrackerError> {
  update.validate()?;

  let result = sqlx::query(
    r#"
    UPDATE profiles SET
      display_name = COALESCE(?2, display_name),
      weight = COALESCE(?3, weight),
      height = COALESCE(?4, height),
      updated_at = ?5
    WHERE user_id = ?1
    "#,
  )
  .bind(user_id)
  .bind(update.display_name.as_deref().map(str::trim))
  .bind(update.weight)
  .bind(update.height)
  .bind(Utc::now())
  .execute(pool)
  .await
  .map_err(|e| TrackerError::Persistence(format!("Failed to update profile: {}", e)))?;

  if result.rows_affected() == 0 {
    return Err(TrackerError::NotFound(format!("profile {}", user_id)));
  }

  load_profile(pool, user_id).await
}
