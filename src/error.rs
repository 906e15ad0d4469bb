//! Crate-wide error type
//!
//! Every user action returns `TrackerError`. The variants mirror the failure
//! kinds a caller has to distinguish: retry the generation, fix the form, or
//! try the write again.

use serde::{Deserialize, Serialize};

use crate::llm::LlmError;

#[derive(Debug, Clone, thiserror::Error, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "message")]
pub enum TrackerError {
  /// The plan generation service was unreachable or rejected the request
  #[error("Plan generation failed: {0}")]
  Generation(String),

  /// The generated response was not valid plan JSON after fence stripping
  #[error("Plan parse error: {0}")]
  PlanParse(String),

  #[error("Database error: {0}")]
  Persistence(String),

  /// Missing or out-of-range input, rejected before any I/O
  #[error("Validation error: {0}")]
  Validation(String),

  /// Conditional write lost against a concurrent writer
  #[error("Conflict: {0}")]
  Conflict(String),

  #[error("Not found: {0}")]
  NotFound(String),
}

impl From<sqlx::Error> for TrackerError {
  fn from(e: sqlx::Error) -> Self {
    TrackerError::Persistence(e.to_string())
  }
}

impl From<sqlx::migrate::MigrateError> for TrackerError {
  fn from(e: sqlx::migrate::MigrateError) -> Self {
    TrackerError::Persistence(format!("Migration failed: {}", e))
  }
}

impl From<LlmError> for TrackerError {
  fn from(e: LlmError) -> Self {
    match e {
      LlmError::Parse(msg) => TrackerError::PlanParse(msg),
      other => TrackerError::Generation(other.to_string()),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_llm_parse_maps_to_plan_parse() {
    let err: TrackerError = LlmError::Parse("expected value at line 1".to_string()).into();
    assert_eq!(
      err,
      TrackerError::PlanParse("expected value at line 1".to_string())
    );
  }

  #[test]
  fn test_llm_transport_maps_to_generation() {
    let err: TrackerError = LlmError::Request("connection refused".to_string()).into();
    assert!(matches!(err, TrackerError::Generation(ref m) if m.contains("connection refused")));

    let err: TrackerError = LlmError::MissingApiKey.into();
    assert!(matches!(err, TrackerError::Generation(_)));
  }

  #[test]
  fn test_serializes_tagged() {
    let json = serde_json::to_value(TrackerError::Validation("age is required".into())).unwrap();
    assert_eq!(json["type"], "Validation");
    assert_eq!(json["message"], "age is required");
  }
}
