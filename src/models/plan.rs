use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A field whose JSON shape is taken as-is from the generator
///
/// Sets, reps and rest arrive as whatever the model produced (`3`, `"3"`,
/// `"10-12"`, `"90s"`); only presence is checked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LooseValue(pub Value);

impl LooseValue {
  /// Interpret as a non-negative count when the value allows it
  pub fn as_count(&self) -> Option<u32> {
    match &self.0 {
      Value::Number(n) => n.as_u64().and_then(|v| u32::try_from(v).ok()),
      Value::String(s) => s.trim().parse().ok(),
      _ => None,
    }
  }
}

impl fmt::Display for LooseValue {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match &self.0 {
      Value::String(s) => write!(f, "{}", s),
      Value::Null => Ok(()),
      other => write!(f, "{}", other),
    }
  }
}

impl From<&str> for LooseValue {
  fn from(s: &str) -> Self {
    Self(Value::String(s.to_string()))
  }
}

impl From<u32> for LooseValue {
  fn from(n: u32) -> Self {
    Self(Value::from(n))
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exercise {
  /// `"<type_code>-<position>"`
  pub id: String,
  pub name: String,
  pub sets: LooseValue,
  pub reps: LooseValue,
  pub rest_duration: LooseValue,
  pub muscle_group: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutDefinition {
  pub type_code: String,
  pub display_name: String,
  pub subtitle: String,
  pub color_token: String,
  pub icon: String,
  pub exercises: Vec<Exercise>,
}

/// Workout definitions indexed by type code, in generation order
///
/// Stored as an embedded JSON document on the profile. Decoding goes through
/// `PlanDocument` so a stored plan with duplicate type codes is rejected
/// instead of being trusted at every read site.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "PlanDocument", into = "PlanDocument")]
pub struct TrainingPlan {
  workouts: Vec<WorkoutDefinition>,
  cardio_recommendation: Option<String>,
}

#[derive(Serialize, Deserialize)]
struct PlanDocument {
  workouts: Vec<WorkoutDefinition>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  cardio_recommendation: Option<String>,
}

impl TryFrom<PlanDocument> for TrainingPlan {
  type Error = String;

  fn try_from(doc: PlanDocument) -> Result<Self, Self::Error> {
    let mut plan = TrainingPlan::new(doc.cardio_recommendation);
    for workout in doc.workouts {
      if plan.get(&workout.type_code).is_some() {
        return Err(format!("duplicate workout type code: {}", workout.type_code));
      }
      plan.insert(workout);
    }
    Ok(plan)
  }
}

impl From<TrainingPlan> for PlanDocument {
  fn from(plan: TrainingPlan) -> Self {
    Self {
      workouts: plan.workouts,
      cardio_recommendation: plan.cardio_recommendation,
    }
  }
}

impl TrainingPlan {
  pub fn new(cardio_recommendation: Option<String>) -> Self {
    Self {
      workouts: Vec::new(),
      cardio_recommendation,
    }
  }

  /// Insert keyed by type code. An existing key keeps its position and takes
  /// the new definition.
  pub fn insert(&mut self, workout: WorkoutDefinition) {
    match self
      .workouts
      .iter_mut()
      .find(|w| w.type_code == workout.type_code)
    {
      Some(slot) => *slot = workout,
      None => self.workouts.push(workout),
    }
  }

  pub fn get(&self, type_code: &str) -> Option<&WorkoutDefinition> {
    self.workouts.iter().find(|w| w.type_code == type_code)
  }

  pub fn workouts(&self) -> &[WorkoutDefinition] {
    &self.workouts
  }

  pub fn type_codes(&self) -> Vec<&str> {
    self.workouts.iter().map(|w| w.type_code.as_str()).collect()
  }

  pub fn len(&self) -> usize {
    self.workouts.len()
  }

  pub fn is_empty(&self) -> bool {
    self.workouts.is_empty()
  }

  pub fn cardio_recommendation(&self) -> Option<&str> {
    self.cardio_recommendation.as_deref()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn workout(code: &str, subtitle: &str) -> WorkoutDefinition {
    WorkoutDefinition {
      type_code: code.to_string(),
      display_name: format!("Treino {}", code),
      subtitle: subtitle.to_string(),
      color_token: "#00ff88".to_string(),
      icon: "🏋️".to_string(),
      exercises: Vec::new(),
    }
  }

  #[test]
  fn test_insert_keeps_first_position_on_duplicate() {
    let mut plan = TrainingPlan::new(None);
    plan.insert(workout("A", "Peito"));
    plan.insert(workout("B", "Costas"));
    plan.insert(workout("A", "Pernas"));

    assert_eq!(plan.type_codes(), vec!["A", "B"]);
    assert_eq!(plan.get("A").unwrap().subtitle, "Pernas");
  }

  #[test]
  fn test_decode_rejects_duplicate_codes() {
    let json = serde_json::json!({
      "workouts": [workout("A", "x"), workout("A", "y")]
    });
    let result: Result<TrainingPlan, _> = serde_json::from_value(json);
    let err = result.unwrap_err().to_string();
    assert!(err.contains("duplicate workout type code"), "{}", err);
  }

  #[test]
  fn test_document_preserves_order_and_recommendation() {
    let mut plan = TrainingPlan::new(Some("Caminhe 30 min".to_string()));
    plan.insert(workout("C", "Pernas"));
    plan.insert(workout("A", "Peito"));

    let json = serde_json::to_string(&plan).unwrap();
    let decoded: TrainingPlan = serde_json::from_str(&json).unwrap();

    assert_eq!(decoded.type_codes(), vec!["C", "A"]);
    assert_eq!(decoded.cardio_recommendation(), Some("Caminhe 30 min"));
  }

  #[test]
  fn test_loose_value_count_and_display() {
    assert_eq!(LooseValue::from(4u32).as_count(), Some(4));
    assert_eq!(LooseValue::from(" 3 ").as_count(), Some(3));
    assert_eq!(LooseValue::from("3-4").as_count(), None);
    assert_eq!(LooseValue(Value::from(-2i64)).as_count(), None);

    assert_eq!(LooseValue::from("10-12").to_string(), "10-12");
    assert_eq!(LooseValue::from(12u32).to_string(), "12");
    assert_eq!(LooseValue(Value::Null).to_string(), "");
  }
}
