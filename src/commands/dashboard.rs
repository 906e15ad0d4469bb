//! Home screen data: plan, week, progress and cardio position

use chrono::{DateTime, TimeZone};
use serde::Serialize;

use crate::cardio::{CardioOverview, CardioTracker};
use crate::db::AppState;
use crate::error::TrackerError;
use crate::logs::load_logs_between;
use crate::models::{TrainingPlan, WorkoutDefinition};
use crate::profile::load_active_plan;
use crate::progress::{week_window, WeekProgress};
use crate::schedule::{derive_schedule, DayAssignment, WeekSchedule};

#[derive(Debug, Clone, Serialize)]
pub struct DashboardView {
  pub plan: TrainingPlan,
  pub is_generated: bool,
  pub schedule: WeekSchedule,
  pub today: DayAssignment,
  /// Definition behind today's strength slot, if it resolves
  pub today_workout: Option<WorkoutDefinition>,
  pub progress: WeekProgress,
  pub cardio_recommendation: Option<String>,
  pub cardio: CardioOverview,
}

/// Everything the home screen shows, for the user's local `now`
pub async fn get_dashboard<Tz: TimeZone>(
  state: &AppState,
  user_id: &str,
  now: &DateTime<Tz>,
) -> Result<DashboardView, TrackerError> {
  let active = load_active_plan(&state.db, user_id).await?;
  let schedule = derive_schedule(&active);

  let (start, end) = week_window(now);
  let week_logs = load_logs_between(&state.db, user_id, start, end).await?;
  let progress = WeekProgress::at(&schedule, &week_logs, now);

  let today = schedule.day(progress.today_index).clone();
  let today_workout = today
    .workout_type_ref
    .as_deref()
    .and_then(|code| active.workout(code))
    .cloned();

  let tracker = CardioTracker::load(&state.db, user_id).await?;

  Ok(DashboardView {
    plan: active.plan().clone(),
    is_generated: active.is_generated(),
    cardio_recommendation: active.cardio_recommendation().map(str::to_string),
    schedule,
    today,
    today_workout,
    progress,
    cardio: tracker.overview(),
  })
}
