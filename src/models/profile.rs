use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::TrackerError;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ProfileRow {
  pub user_id: String,
  pub display_name: Option<String>,
  pub weight: Option<f64>,
  pub height: Option<f64>,
  pub age: Option<i64>,
  pub gender: Option<String>,
  pub goal: Option<String>,
  pub experience_level: Option<String>,
  pub training_days_per_week: Option<i64>,
  pub plan_json: Option<String>,
  pub onboarding_completed: bool,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardioProgress {
  pub user_id: String,
  pub current_week: u8,
  pub updated_at: DateTime<Utc>,
}

/// Onboarding form as submitted; every field is optional until validated
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileInput {
  pub weight: Option<f64>,
  pub height: Option<f64>,
  pub age: Option<u32>,
  pub gender: Option<String>,
  pub goal: Option<String>,
  pub experience_level: Option<String>,
  pub training_days_per_week: Option<u8>,
}

/// Validated physical profile sent to the plan generator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationProfile {
  /// kg
  pub weight: f64,
  /// m
  pub height: f64,
  pub age: u32,
  pub gender: String,
  pub goal: String,
  pub experience_level: String,
  pub training_days_per_week: u8,
}

const MIN_WEIGHT_KG: f64 = 30.0;
const MIN_HEIGHT_M: f64 = 1.0;
const MIN_AGE: u32 = 12;

impl ProfileInput {
  /// Check required fields and ranges before any generation is attempted
  pub fn validate(&self) -> Result<GenerationProfile, TrackerError> {
    let weight = require(self.weight, "weight")?;
    if !weight.is_finite() || weight < MIN_WEIGHT_KG {
      return Err(TrackerError::Validation(format!(
        "weight must be at least {} kg",
        MIN_WEIGHT_KG
      )));
    }

    let height = require(self.height, "height")?;
    if !height.is_finite() || height < MIN_HEIGHT_M {
      return Err(TrackerError::Validation(format!(
        "height must be at least {} m",
        MIN_HEIGHT_M
      )));
    }

    let age = require(self.age, "age")?;
    if age < MIN_AGE {
      return Err(TrackerError::Validation(format!(
        "age must be at least {}",
        MIN_AGE
      )));
    }

    let days = require(self.training_days_per_week, "training_days_per_week")?;
    if !(1..=7).contains(&days) {
      return Err(TrackerError::Validation(
        "training_days_per_week must be between 1 and 7".to_string(),
      ));
    }

    Ok(GenerationProfile {
      weight,
      height,
      age,
      gender: require_text(&self.gender, "gender")?,
      goal: require_text(&self.goal, "goal")?,
      experience_level: require_text(&self.experience_level, "experience_level")?,
      training_days_per_week: days,
    })
  }
}

/// Profile edit; `None` keeps the stored value
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileUpdate {
  pub display_name: Option<String>,
  pub weight: Option<f64>,
  pub height: Option<f64>,
}

impl ProfileUpdate {
  pub fn validate(&self) -> Result<(), TrackerError> {
    if let Some(name) = &self.display_name {
      if name.trim().is_empty() {
        return Err(TrackerError::Validation("display_name must not be blank".to_string()));
      }
    }
    if let Some(weight) = self.weight {
      if !weight.is_finite() || weight < MIN_WEIGHT_KG {
        return Err(TrackerError::Validation(format!(
          "weight must be at least {} kg",
          MIN_WEIGHT_KG
        )));
      }
    }
    if let Some(height) = self.height {
      if !height.is_finite() || height < MIN_HEIGHT_M {
        return Err(TrackerError::Validation(format!(
          "height must be at least {} m",
          MIN_HEIGHT_M
        )));
      }
    }
    Ok(())
  }
}

fn require<T>(value: Option<T>, field: &str) -> Result<T, TrackerError> {
  value.ok_or_else(|| TrackerError::Validation(format!("{} is required", field)))
}

fn require_text(value: &Option<String>, field: &str) -> Result<String, TrackerError> {
  match value.as_deref().map(str::trim) {
    Some(text) if !text.is_empty() => Ok(text.to_string()),
    _ => Err(TrackerError::Validation(format!("{} is required", field))),
  }
}

/// Body mass index rounded to one decimal
pub fn bmi(weight_kg: Option<f64>, height_m: Option<f64>) -> Option<f64> {
  match (weight_kg, height_m) {
    (Some(w), Some(h)) if w > 0.0 && h > 0.0 => Some((w / (h * h) * 10.0).round() / 10.0),
    _ => None,
  }
}
