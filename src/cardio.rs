//! 12-Week Progressive Cardio Program
//!
//! A fixed phase table plus one counter per user:
//! - `current_week` in [1, 12], created at 1 on sign-up
//! - phase membership and status (locked, active, done) derive from it
//! - the only transition is `advance_week`, one week at a time, never back
//!
//! Key rules:
//! - In-memory state changes only after the write is confirmed
//! - Advancing past week 12 is a silent no-op
//! - The stored week is updated conditionally on the week last read, so two
//!   sessions racing on the same user cannot double-advance
//! - Logging a session never moves the counter

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{Executor, Sqlite, SqlitePool};
use tracing::{info, warn};

use crate::error::TrackerError;
use crate::logs::insert_workout_log;
use crate::models::{CardioProgress, NewWorkoutLog, WorkoutLog, CARDIO_LOG_TYPE};

pub const FIRST_WEEK: u8 = 1;
pub const PROGRAM_WEEKS: u8 = 12;

// ---------------------------------------------------------------------------
/// Phase Status: Where a phase sits relative to the current week
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseStatus {
    Locked,
    Active,
    Done,
}

// ---------------------------------------------------------------------------
/// Phase Table
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CardioBlock {
    pub activity: &'static str,
    pub duration: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CardioPhase {
    pub name: &'static str,
    pub week_start: u8,
    pub week_end: u8,
    pub blocks: &'static [CardioBlock],
    /// How many times the block sequence repeats; 0 = run once, continuous
    pub repeat_count: u8,
    pub total_duration: &'static str,
    pub tip: &'static str,
    pub color_token: &'static str,
}

impl CardioPhase {
    pub fn contains(&self, week: u8) -> bool {
        self.week_start <= week && week <= self.week_end
    }

    pub fn status(&self, current_week: u8) -> PhaseStatus {
        phase_status(self, current_week)
    }

    /// `"1-3"` style range for display
    pub fn weeks_label(&self) -> String {
        format!("{}-{}", self.week_start, self.week_end)
    }
}

pub static CARDIO_PHASES: [CardioPhase; 4] = [
    CardioPhase {
        name: "Adaptação",
        week_start: 1,
        week_end: 3,
        blocks: &[
            CardioBlock { activity: "Caminhada leve", duration: "5 min" },
            CardioBlock { activity: "Caminhada rápida", duration: "3 min" },
            CardioBlock { activity: "Trote leve", duration: "1 min" },
        ],
        repeat_count: 3,
        total_duration: "~30 min",
        tip: "Mantenha um ritmo em que ainda consiga conversar.",
        color_token: "#00ff88",
    },
    CardioPhase {
        name: "Construção",
        week_start: 4,
        week_end: 6,
        blocks: &[
            CardioBlock { activity: "Caminhada rápida", duration: "2 min" },
            CardioBlock { activity: "Trote", duration: "3 min" },
        ],
        repeat_count: 6,
        total_duration: "~30 min",
        tip: "Se o trote ficar pesado, volte a caminhar antes de parar.",
        color_token: "#ffaa00",
    },
    CardioPhase {
        name: "Resistência",
        week_start: 7,
        week_end: 9,
        blocks: &[
            CardioBlock { activity: "Corrida leve", duration: "8 min" },
            CardioBlock { activity: "Caminhada", duration: "2 min" },
        ],
        repeat_count: 3,
        total_duration: "~30 min",
        tip: "Controle a respiração: inspire pelo nariz, expire pela boca.",
        color_token: "#00d4ff",
    },
    CardioPhase {
        name: "Corrida Contínua",
        week_start: 10,
        week_end: 12,
        blocks: &[
            CardioBlock { activity: "Aquecimento caminhando", duration: "5 min" },
            CardioBlock { activity: "Corrida contínua", duration: "25 min" },
            CardioBlock { activity: "Desaquecimento", duration: "5 min" },
        ],
        repeat_count: 0,
        total_duration: "~35 min",
        tip: "Foque em terminar os 25 minutos, não na velocidade.",
        color_token: "#ff0055",
    },
];

/// `done` past the phase, `active` inside it, `locked` before it
pub fn phase_status(phase: &CardioPhase, current_week: u8) -> PhaseStatus {
    if current_week > phase.week_end {
        PhaseStatus::Done
    } else if phase.contains(current_week) {
        PhaseStatus::Active
    } else {
        PhaseStatus::Locked
    }
}

/// The unique phase containing `current_week`
pub fn current_phase(current_week: u8) -> Option<&'static CardioPhase> {
    CARDIO_PHASES.iter().find(|p| p.contains(current_week))
}

/// Check that phases partition [1, 12] contiguously, in order
pub fn validate_phase_table(phases: &[CardioPhase]) -> Result<(), String> {
    let mut expected_start = FIRST_WEEK;
    for phase in phases {
        if phase.week_start != expected_start {
            return Err(format!(
                "{} starts at week {}, expected {}",
                phase.name, phase.week_start, expected_start
            ));
        }
        if phase.week_end < phase.week_start {
            return Err(format!("{} ends before it starts", phase.name));
        }
        expected_start = phase.week_end + 1;
    }
    if expected_start != PROGRAM_WEEKS + 1 {
        return Err(format!(
            "phases cover weeks 1-{}, expected 1-{}",
            expected_start - 1,
            PROGRAM_WEEKS
        ));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
/// Overview: Current position plus the whole timeline
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct PhaseTimelineEntry {
    pub phase: &'static CardioPhase,
    pub status: PhaseStatus,
}

#[derive(Debug, Clone, Serialize)]
pub struct CardioOverview {
    pub current_week: u8,
    pub total_weeks: u8,
    pub current_phase: Option<&'static CardioPhase>,
    pub timeline: Vec<PhaseTimelineEntry>,
    pub can_advance: bool,
}

impl CardioOverview {
    pub fn compute(current_week: u8) -> Self {
        Self {
            current_week,
            total_weeks: PROGRAM_WEEKS,
            current_phase: current_phase(current_week),
            timeline: CARDIO_PHASES
                .iter()
                .map(|phase| PhaseTimelineEntry {
                    phase,
                    status: phase_status(phase, current_week),
                })
                .collect(),
            can_advance: current_week < PROGRAM_WEEKS,
        }
    }
}

// ---------------------------------------------------------------------------
/// Tracker: In-memory state for one user
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardioTracker {
    pub user_id: String,
    pub current_week: u8,
}

impl CardioTracker {
    /// Load the stored week; a user without a row starts at week 1
    pub async fn load(pool: &SqlitePool, user_id: &str) -> Result<Self, TrackerError> {
        let current_week = load_progress(pool, user_id)
            .await?
            .map(|p| p.current_week)
            .unwrap_or(FIRST_WEEK);

        Ok(Self {
            user_id: user_id.to_string(),
            current_week,
        })
    }

    pub fn current_phase(&self) -> Option<&'static CardioPhase> {
        current_phase(self.current_week)
    }

    pub fn overview(&self) -> CardioOverview {
        CardioOverview::compute(self.current_week)
    }

    /// Move to the next week
    ///
    /// Returns the week after the call. At the last week nothing is written.
    /// On any error `self` is left as it was.
    pub async fn advance_week(&mut self, pool: &SqlitePool) -> Result<u8, TrackerError> {
        if self.current_week >= PROGRAM_WEEKS {
            info!(user_id = %self.user_id, "Cardio program complete, advance ignored");
            return Ok(self.current_week);
        }

        let next_week = self.current_week + 1;
        let applied =
            conditional_advance(pool, &self.user_id, self.current_week, next_week, Utc::now()).await?;

        if !applied {
            let stored = load_progress(pool, &self.user_id)
                .await?
                .map(|p| p.current_week);
            warn!(
                user_id = %self.user_id,
                expected = self.current_week,
                stored = ?stored,
                "Cardio week changed concurrently"
            );
            return Err(TrackerError::Conflict(format!(
                "cardio week for {} is no longer {} (stored: {})",
                self.user_id,
                self.current_week,
                stored.map_or_else(|| "none".to_string(), |w| w.to_string())
            )));
        }

        self.current_week = next_week;
        info!(user_id = %self.user_id, week = next_week, "Cardio week advanced");
        Ok(next_week)
    }

    /// Record a finished cardio session for the current week
    pub async fn log_session(&self, pool: &SqlitePool) -> Result<WorkoutLog, TrackerError> {
        log_session(pool, &self.user_id, self.current_week, Utc::now()).await
    }
}

// ---------------------------------------------------------------------------
// Database Operations
// ---------------------------------------------------------------------------

pub async fn load_progress(
    pool: &SqlitePool,
    user_id: &str,
) -> Result<Option<CardioProgress>, TrackerError> {
    let row: Option<(String, i64, DateTime<Utc>)> = sqlx::query_as(
        "SELECT user_id, current_week, updated_at FROM cardio_progress WHERE user_id = ?1",
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await
    .map_err(|e| TrackerError::Persistence(format!("Failed to load cardio progress: {}", e)))?;

    row.map(|(user_id, week, updated_at)| -> Result<CardioProgress, TrackerError> {
        let current_week = u8::try_from(week)
            .ok()
            .filter(|w| (FIRST_WEEK..=PROGRAM_WEEKS).contains(w))
            .ok_or_else(|| {
                TrackerError::Persistence(format!("Stored cardio week out of range: {}", week))
            })?;
        Ok(CardioProgress {
            user_id,
            current_week,
            updated_at,
        })
    })
    .transpose()
}

/// Create the week-1 row if the user has none
pub async fn create_progress<'e, E>(executor: E, user_id: &str) -> Result<(), TrackerError>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query(
        r#"
        INSERT INTO cardio_progress (user_id, current_week, updated_at)
        VALUES (?1, ?2, ?3)
        ON CONFLICT(user_id) DO NOTHING
        "#,
    )
    .bind(user_id)
    .bind(i64::from(FIRST_WEEK))
    .bind(Utc::now())
    .execute(executor)
    .await
    .map_err(|e| TrackerError::Persistence(format!("Failed to create cardio progress: {}", e)))?;

    Ok(())
}

/// Upsert keyed by user, applied only while the stored week is `expected`
///
/// Returns false when another writer got there first.
pub async fn conditional_advance(
    pool: &SqlitePool,
    user_id: &str,
    expected: u8,
    next: u8,
    now: DateTime<Utc>,
) -> Result<bool, TrackerError> {
    let result = sqlx::query(
        r#"
        INSERT INTO cardio_progress (user_id, current_week, updated_at)
        VALUES (?1, ?2, ?3)
        ON CONFLICT(user_id) DO UPDATE SET
            current_week = excluded.current_week,
            updated_at = excluded.updated_at
        WHERE cardio_progress.current_week = ?4
        "#,
    )
    .bind(user_id)
    .bind(i64::from(next))
    .bind(now)
    .bind(i64::from(expected))
    .execute(pool)
    .await
    .map_err(|e| TrackerError::Persistence(format!("Failed to save cardio progress: {}", e)))?;

    Ok(result.rows_affected() == 1)
}

/// Append a cardio session log; the week only goes into the notes
pub async fn log_session(
    pool: &SqlitePool,
    user_id: &str,
    week: u8,
    completed_at: DateTime<Utc>,
) -> Result<WorkoutLog, TrackerError> {
    let log = insert_workout_log(
        pool,
        &NewWorkoutLog {
            user_id: user_id.to_string(),
            workout_type: CARDIO_LOG_TYPE.to_string(),
            completed_at,
            duration_minutes: None,
            notes: format!("Semana {} - Cardio completo", week),
        },
    )
    .await?;

    info!(user_id = %user_id, week, log_id = log.id, "Cardio session logged");
    Ok(log)
}

// ---------------------------------------------------------------------------
/// Tests
// ---------------------------------------------------------------------------
