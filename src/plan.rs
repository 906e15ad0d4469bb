//! Plan Normalizer
//!
//! Turns the loosely-structured plan returned by the generator into a
//! canonical `TrainingPlan`, or falls back to the built-in default plan when
//! there is nothing usable to normalize.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::{Exercise, LooseValue, TrainingPlan, WorkoutDefinition};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Cyclic color assignment by generation position
pub const PALETTE: [&str; 6] = [
    "#00ff88", "#ffaa00", "#ff0055", "#bb00ff", "#00d4ff", "#ffeb3b",
];

pub const WORKOUT_ICON: &str = "🏋️";

/// The generator does not report muscle groups
pub const UNKNOWN_MUSCLE_GROUP: &str = "Variado";

pub fn display_name(type_code: &str) -> String {
    format!("Treino {}", type_code)
}

pub fn palette_color(position: usize) -> &'static str {
    PALETTE[position % PALETTE.len()]
}

// ---------------------------------------------------------------------------
// Raw generator output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawPlan {
    #[serde(default)]
    pub workouts: Vec<RawWorkout>,
    #[serde(default)]
    pub cardio_recommendation: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawWorkout {
    pub workout_type: String,
    pub name: String,
    pub exercises: Vec<RawExercise>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawExercise {
    pub name: String,
    pub sets: LooseValue,
    pub reps: LooseValue,
    pub rest: LooseValue,
}

// ---------------------------------------------------------------------------
// Active plan
// ---------------------------------------------------------------------------

/// The plan a user is currently following
///
/// Schedules are derived differently for the two variants, so the variant
/// is kept rather than collapsing everything into a `TrainingPlan`.
#[derive(Debug, Clone, PartialEq)]
pub enum ActivePlan {
    Default(&'static TrainingPlan),
    Generated(TrainingPlan),
}

impl ActivePlan {
    pub fn plan(&self) -> &TrainingPlan {
        match self {
            ActivePlan::Default(plan) => *plan,
            ActivePlan::Generated(plan) => plan,
        }
    }

    pub fn workout(&self, type_code: &str) -> Option<&WorkoutDefinition> {
        self.plan().get(type_code)
    }

    pub fn is_generated(&self) -> bool {
        matches!(self, ActivePlan::Generated(_))
    }

    pub fn cardio_recommendation(&self) -> Option<&str> {
        self.plan().cardio_recommendation()
    }

    /// Rebuild from a stored canonical plan (`None` means never generated)
    pub fn from_stored(plan: Option<TrainingPlan>) -> Self {
        match plan {
            Some(plan) if !plan.is_empty() => ActivePlan::Generated(plan),
            _ => ActivePlan::Default(default_plan()),
        }
    }
}

// ---------------------------------------------------------------------------
// Normalization
// ---------------------------------------------------------------------------

/// Normalize a raw plan; absent or empty input yields the default plan itself
pub fn normalize(raw: Option<&RawPlan>) -> ActivePlan {
    let raw = match raw {
        Some(raw) if !raw.workouts.is_empty() => raw,
        _ => {
            debug!("No generated workouts, using default plan");
            return ActivePlan::Default(default_plan());
        }
    };

    let mut plan = TrainingPlan::new(raw.cardio_recommendation.clone());
    for (position, workout) in raw.workouts.iter().enumerate() {
        plan.insert(normalize_workout(position, workout));
    }

    debug!(
        workouts = plan.len(),
        raw_workouts = raw.workouts.len(),
        "Normalized generated plan"
    );
    ActivePlan::Generated(plan)
}

fn normalize_workout(position: usize, raw: &RawWorkout) -> WorkoutDefinition {
    let exercises = raw
        .exercises
        .iter()
        .enumerate()
        .map(|(idx, ex)| Exercise {
            id: format!("{}-{}", raw.workout_type, idx),
            name: ex.name.clone(),
            sets: ex.sets.clone(),
            reps: ex.reps.clone(),
            rest_duration: ex.rest.clone(),
            muscle_group: UNKNOWN_MUSCLE_GROUP.to_string(),
        })
        .collect();

    WorkoutDefinition {
        type_code: raw.workout_type.clone(),
        display_name: display_name(&raw.workout_type),
        subtitle: raw.name.clone(),
        color_token: palette_color(position).to_string(),
        icon: WORKOUT_ICON.to_string(),
        exercises,
    }
}

// ---------------------------------------------------------------------------
// Default plan
// ---------------------------------------------------------------------------

static DEFAULT_PLAN: Lazy<TrainingPlan> = Lazy::new(build_default_plan);

/// Built-in plan used until a generated one exists; never mutated
pub fn default_plan() -> &'static TrainingPlan {
    &DEFAULT_PLAN
}

fn build_default_plan() -> TrainingPlan {
    let mut plan = TrainingPlan::new(None);
    plan.insert(default_workout(
        0,
        "A",
        "Peito + Tríceps + Ombro",
        &[
            ("Supino reto", 4, "10-12", "90s", "Peito"),
            ("Supino inclinado com halteres", 3, "10-12", "90s", "Peito"),
            ("Desenvolvimento com halteres", 3, "10-12", "60s", "Ombro"),
            ("Elevação lateral", 3, "12-15", "60s", "Ombro"),
            ("Tríceps na polia", 3, "12-15", "60s", "Tríceps"),
        ],
    ));
    plan.insert(default_workout(
        1,
        "B",
        "Costas + Bíceps",
        &[
            ("Puxada frontal", 4, "10-12", "90s", "Costas"),
            ("Remada curvada", 3, "10-12", "90s", "Costas"),
            ("Remada baixa", 3, "10-12", "60s", "Costas"),
            ("Rosca direta", 3, "10-12", "60s", "Bíceps"),
            ("Rosca martelo", 3, "12-15", "60s", "Bíceps"),
        ],
    ));
    plan.insert(default_workout(
        2,
        "C",
        "Pernas + Core",
        &[
            ("Agachamento livre", 4, "8-10", "120s", "Quadríceps"),
            ("Leg press", 3, "10-12", "90s", "Quadríceps"),
            ("Mesa flexora", 3, "10-12", "60s", "Posterior"),
            ("Panturrilha em pé", 4, "15-20", "45s", "Panturrilha"),
            ("Prancha", 3, "30-45s", "45s", "Core"),
        ],
    ));
    plan
}

fn default_workout(
    position: usize,
    code: &str,
    subtitle: &str,
    exercises: &[(&str, u32, &str, &str, &str)],
) -> WorkoutDefinition {
    WorkoutDefinition {
        type_code: code.to_string(),
        display_name: display_name(code),
        subtitle: subtitle.to_string(),
        color_token: palette_color(position).to_string(),
        icon: WORKOUT_ICON.to_string(),
        exercises: exercises
            .iter()
            .enumerate()
            .map(|(idx, (name, sets, reps, rest, muscle))| Exercise {
                id: format!("{}-{}", code, idx),
                name: name.to_string(),
                sets: LooseValue::from(*sets),
                reps: LooseValue::from(*reps),
                rest_duration: LooseValue::from(*rest),
                muscle_group: muscle.to_string(),
            })
            .collect(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
