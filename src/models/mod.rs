pub mod plan;
pub mod profile;
pub mod workout;

pub use plan::{Exercise, LooseValue, TrainingPlan, WorkoutDefinition};
pub use profile::{bmi, CardioProgress, GenerationProfile, ProfileInput, ProfileRow, ProfileUpdate};
pub use workout::{ExerciseLog, NewExerciseLog, NewWorkoutLog, WorkoutLog, CARDIO_LOG_TYPE};
