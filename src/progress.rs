//! Weekly progress tracking
//!
//! Pure functions over a schedule and the completion logs of the current
//! calendar week. Nothing here touches the database; callers load the logs
//! for `week_window` and pass them in.

use chrono::{DateTime, Datelike, Duration, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{WorkoutLog, CARDIO_LOG_TYPE};
use crate::schedule::{schedule_index_for, ActivityType, DayAssignment, WeekSchedule, DAYS_PER_WEEK};

/// `round(100 * done / total)`, 0 when there is nothing to do
pub fn completion_percent(done: usize, total: usize) -> u8 {
  if total == 0 {
    return 0;
  }
  let pct = (100.0 * done.min(total) as f64 / total as f64).round();
  pct as u8
}

/// First instant of `date` in `tz`, as UTC
///
/// Falls forward an hour when local midnight does not exist (DST gap).
fn local_midnight<Tz: TimeZone>(tz: &Tz, date: NaiveDate) -> DateTime<Utc> {
  let midnight = date.and_time(chrono::NaiveTime::MIN);
  tz.from_local_datetime(&midnight)
    .earliest()
    .or_else(|| tz.from_local_datetime(&(midnight + Duration::hours(1))).earliest())
    .map(|dt| dt.with_timezone(&Utc))
    .unwrap_or_else(|| Utc.from_utc_datetime(&midnight))
}

/// Current calendar week: Monday 00:00 local up to the next Monday, exclusive
pub fn week_window<Tz: TimeZone>(now: &DateTime<Tz>) -> (DateTime<Utc>, DateTime<Utc>) {
  let tz = now.timezone();
  let today = now.date_naive();
  let monday = today - Duration::days(i64::from(today.weekday().num_days_from_monday()));
  (
    local_midnight(&tz, monday),
    local_midnight(&tz, monday + Duration::days(7)),
  )
}

/// Start of the local day containing `now`, as UTC
pub fn day_start<Tz: TimeZone>(now: &DateTime<Tz>) -> DateTime<Utc> {
  local_midnight(&now.timezone(), now.date_naive())
}

/// Whether one scheduled day is satisfied by the week's logs
pub fn is_day_completed(day: &DayAssignment, logs: &[WorkoutLog]) -> bool {
  match day.activity_type {
    ActivityType::Rest => false,
    ActivityType::Cardio => logs.iter().any(|l| l.workout_type == CARDIO_LOG_TYPE),
    ActivityType::Strength => match &day.workout_type_ref {
      Some(code) => logs.iter().any(|l| &l.workout_type == code),
      None => false,
    },
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekProgress {
  /// Completion flag per schedule day, Monday first
  pub completed_days: [bool; DAYS_PER_WEEK],
  pub completed: usize,
  pub total: usize,
  pub percent: u8,
  pub today_index: usize,
  /// Sessions logged since local midnight
  pub logged_today: usize,
}

impl WeekProgress {
  /// Compute from logs already restricted to the current week
  pub fn compute(schedule: &WeekSchedule, week_logs: &[WorkoutLog], today_index: usize) -> Self {
    let mut completed_days = [false; DAYS_PER_WEEK];
    for (flag, day) in completed_days.iter_mut().zip(schedule.days()) {
      *flag = is_day_completed(day, week_logs);
    }

    let completed = completed_days.iter().filter(|done| **done).count();
    let total = schedule.non_rest_days();

    Self {
      completed_days,
      completed,
      total,
      percent: completion_percent(completed, total),
      today_index: today_index % DAYS_PER_WEEK,
      logged_today: 0,
    }
  }

  /// Compute for the week containing `now`, ignoring logs outside it
  pub fn at<Tz: TimeZone>(schedule: &WeekSchedule, logs: &[WorkoutLog], now: &DateTime<Tz>) -> Self {
    let (start, end) = week_window(now);
    let week_logs: Vec<WorkoutLog> = logs
      .iter()
      .filter(|l| l.completed_at >= start && l.completed_at < end)
      .cloned()
      .collect();

    let today_start = day_start(now);
    let mut progress = Self::compute(schedule, &week_logs, schedule_index_for(now.weekday()));
    progress.logged_today = week_logs
      .iter()
      .filter(|l| l.completed_at >= today_start)
      .count();
    progress
  }

  pub fn is_completed(&self, schedule_index: usize) -> bool {
    self.completed_days[schedule_index % DAYS_PER_WEEK]
  }

  pub fn today_completed(&self) -> bool {
    self.is_completed(self.today_index)
  }
}
