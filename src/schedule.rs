//! Weekly schedule derivation
//!
//! A `WeekSchedule` is never stored. It is recomputed from the active plan:
//! generated plans go through a fixed slot template, the default plan uses
//! its own hand-authored week.

use chrono::Weekday;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::models::TrainingPlan;
use crate::plan::{display_name, ActivePlan};

pub const DAYS_PER_WEEK: usize = 7;

pub const DAY_NAMES: [&str; DAYS_PER_WEEK] = [
  "Segunda", "Terça", "Quarta", "Quinta", "Sexta", "Sábado", "Domingo",
];

pub const CARDIO_LABEL: &str = "Cardio";
pub const REST_LABEL: &str = "Descanso";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityType {
  Strength,
  Cardio,
  Rest,
}

impl std::fmt::Display for ActivityType {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Self::Strength => write!(f, "strength"),
      Self::Cardio => write!(f, "cardio"),
      Self::Rest => write!(f, "rest"),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayAssignment {
  /// 0 = Monday .. 6 = Sunday
  pub day_index: u8,
  pub activity_type: ActivityType,
  pub workout_type_ref: Option<String>,
  pub label: String,
}

impl DayAssignment {
  fn strength(day_index: u8, type_code: &str) -> Self {
    Self {
      day_index,
      activity_type: ActivityType::Strength,
      workout_type_ref: Some(type_code.to_string()),
      label: display_name(type_code),
    }
  }

  fn cardio(day_index: u8) -> Self {
    Self {
      day_index,
      activity_type: ActivityType::Cardio,
      workout_type_ref: None,
      label: CARDIO_LABEL.to_string(),
    }
  }

  fn rest(day_index: u8, label: &str) -> Self {
    Self {
      day_index,
      activity_type: ActivityType::Rest,
      workout_type_ref: None,
      label: label.to_string(),
    }
  }

  pub fn day_name(&self) -> &'static str {
    DAY_NAMES[usize::from(self.day_index) % DAYS_PER_WEEK]
  }

  pub fn is_rest(&self) -> bool {
    self.activity_type == ActivityType::Rest
  }
}

/// Exactly seven days, Monday first
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekSchedule {
  days: [DayAssignment; DAYS_PER_WEEK],
}

impl WeekSchedule {
  pub fn days(&self) -> &[DayAssignment; DAYS_PER_WEEK] {
    &self.days
  }

  pub fn day(&self, schedule_index: usize) -> &DayAssignment {
    &self.days[schedule_index % DAYS_PER_WEEK]
  }

  pub fn non_rest_days(&self) -> usize {
    self.days.iter().filter(|d| !d.is_rest()).count()
  }

  /// Strength days whose reference is not a workout of `plan`
  pub fn unresolved_days<'a>(&'a self, plan: &TrainingPlan) -> Vec<&'a DayAssignment> {
    self
      .days
      .iter()
      .filter(|d| match &d.workout_type_ref {
        Some(code) => plan.get(code).is_none(),
        None => false,
      })
      .collect()
  }
}

// ---------------------------------------------------------------------------
// Derivation
// ---------------------------------------------------------------------------

/// Schedule for whichever plan variant is active
pub fn derive_schedule(active: &ActivePlan) -> WeekSchedule {
  match active {
    ActivePlan::Default(_) => default_schedule().clone(),
    ActivePlan::Generated(plan) => derive_from_template(plan),
  }
}

/// Slot template for generated plans
///
/// Up to four workouts spread over Mon/Wed/Fri/Sat with cardio on Tue and
/// Thu. Short plans repeat the first workout on Friday or rest on Saturday.
pub fn derive_from_template(plan: &TrainingPlan) -> WeekSchedule {
  let types = plan.type_codes();
  let slot = |i: usize| types.get(i).copied();

  let saturday = match slot(3) {
    Some(code) => DayAssignment::strength(5, code),
    _ => DayAssignment::rest(5, REST_LABEL),
  };

  WeekSchedule {
    days: [
      DayAssignment::strength(0, slot(0).unwrap_or("A")),
      DayAssignment::cardio(1),
      DayAssignment::strength(2, slot(1).unwrap_or("B")),
      DayAssignment::cardio(3),
      DayAssignment::strength(4, slot(2).or(slot(0)).unwrap_or("C")),
      saturday,
      DayAssignment::rest(6, REST_LABEL),
    ],
  }
}

static DEFAULT_SCHEDULE: Lazy<WeekSchedule> = Lazy::new(|| WeekSchedule {
  days: [
    DayAssignment::strength(0, "A"),
    DayAssignment::cardio(1),
    DayAssignment::strength(2, "B"),
    DayAssignment::cardio(3),
    DayAssignment::strength(4, "C"),
    DayAssignment::rest(5, "Descanso ativo"),
    DayAssignment::rest(6, REST_LABEL),
  ],
});

/// Hand-authored week that goes with the default plan
pub fn default_schedule() -> &'static WeekSchedule {
  &DEFAULT_SCHEDULE
}

// ---------------------------------------------------------------------------
// Day-of-week rotation
// ---------------------------------------------------------------------------

/// Map a Sunday-first day number (Sunday = 0 .. Saturday = 6) to the
/// Monday-first schedule index (Monday = 0 .. Sunday = 6)
pub fn schedule_index(source_day_of_week: u32) -> usize {
  ((source_day_of_week % 7 + 6) % 7) as usize
}

pub fn schedule_index_for(weekday: Weekday) -> usize {
  schedule_index(weekday.num_days_from_sunday())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
