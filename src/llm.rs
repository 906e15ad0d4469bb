//! LLM integration for plan generation
//!
//! This module talks to the Gemini `generateContent` endpoint and turns the
//! model's answer into a `RawPlan` for the normalizer.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};
use url::Url;

use crate::config::GeminiConfig;
use crate::error::TrackerError;
use crate::models::GenerationProfile;
use crate::plan::RawPlan;

/// ---------------------------------------------------------------------------
/// Error Types
/// ---------------------------------------------------------------------------

#[derive(Error, Debug, Serialize)]
pub enum LlmError {
  #[error("API key not configured")]
  MissingApiKey,

  #[error("Request failed: {0}")]
  Request(String),

  #[error("API error: {0}")]
  Api(String),

  #[error("Parse error: {0}")]
  Parse(String),
}

/// ---------------------------------------------------------------------------
/// Gemini API Types
/// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
  system_instruction: Content,
  contents: Vec<Content>,
  generation_config: GenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  role: Option<String>,
  #[serde(default)]
  parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
  #[serde(default)]
  text: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
  temperature: f32,
  response_mime_type: String,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
  #[serde(default)]
  candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
  content: Option<Content>,
  #[allow(dead_code)]
  finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorResponse {
  error: GeminiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorDetail {
  message: String,
}

/// ---------------------------------------------------------------------------
/// Generator Seam
/// ---------------------------------------------------------------------------

/// Anything that can turn a validated profile into a raw plan
///
/// Implemented by `GeminiClient`; tests substitute a canned generator.
#[allow(async_fn_in_trait)]
pub trait PlanGenerator {
  async fn generate(&self, profile: &GenerationProfile) -> Result<RawPlan, TrackerError>;
}

/// ---------------------------------------------------------------------------
/// Gemini Client
/// ---------------------------------------------------------------------------

pub struct GeminiClient {
  client: Client,
  api_key: String,
  endpoint: Url,
  temperature: f32,
}

impl GeminiClient {
  /// Build a client from configuration; fails without an API key
  pub fn new(config: &GeminiConfig) -> Result<Self, LlmError> {
    let api_key = config.api_key.clone().ok_or(LlmError::MissingApiKey)?;

    Ok(Self {
      client: Client::new(),
      api_key,
      endpoint: generate_url(&config.api_base, &config.model)?,
      temperature: config.temperature,
    })
  }

  pub fn endpoint(&self) -> &Url {
    &self.endpoint
  }

  /// Send a system instruction and one user message, return the model text
  pub async fn complete(&self, system_prompt: &str, user_message: &str) -> Result<String, LlmError> {
    let request = GenerateRequest {
      system_instruction: Content {
        role: None,
        parts: vec![Part {
          text: Some(system_prompt.to_string()),
        }],
      },
      contents: vec![Content {
        role: Some("user".to_string()),
        parts: vec![Part {
          text: Some(user_message.to_string()),
        }],
      }],
      generation_config: GenerationConfig {
        temperature: self.temperature,
        response_mime_type: "application/json".to_string(),
      },
    };

    let response = self
      .client
      .post(self.endpoint.clone())
      .header("x-goog-api-key", &self.api_key)
      .header("content-type", "application/json")
      .json(&request)
      .send()
      .await
      .map_err(|e| LlmError::Request(e.to_string()))?;

    let status = response.status();
    let body = response
      .text()
      .await
      .map_err(|e| LlmError::Request(e.to_string()))?;

    if !status.is_success() {
      if let Ok(error_resp) = serde_json::from_str::<GeminiErrorResponse>(&body) {
        return Err(LlmError::Api(error_resp.error.message));
      }
      return Err(LlmError::Api(format!("HTTP {}: {}", status, body)));
    }

    let parsed: GenerateResponse =
      serde_json::from_str(&body).map_err(|e| LlmError::Api(format!("Unexpected response: {}", e)))?;

    let text: String = parsed
      .candidates
      .into_iter()
      .filter_map(|c| c.content)
      .flat_map(|c| c.parts)
      .filter_map(|p| p.text)
      .next()
      .ok_or_else(|| LlmError::Api("No text content in response".to_string()))?;

    Ok(text)
  }
}

impl PlanGenerator for GeminiClient {
  async fn generate(&self, profile: &GenerationProfile) -> Result<RawPlan, TrackerError> {
    let system_prompt = include_str!("prompts/trainer_system.txt");
    let user_message = build_user_message(profile);

    info!(
      goal = %profile.goal,
      days = profile.training_days_per_week,
      "Requesting training plan"
    );

    let text = self.complete(system_prompt, &user_message).await.map_err(|e| {
      warn!(error = %e, "Plan generation request failed");
      TrackerError::from(e)
    })?;

    let plan = parse_plan_reply(&text)?;
    debug!(workouts = plan.workouts.len(), "Plan generated");
    Ok(plan)
  }
}

/// `<base>/v1beta/models/<model>:generateContent`
fn generate_url(api_base: &str, model: &str) -> Result<Url, LlmError> {
  let mut base = api_base.trim().to_string();
  if !base.ends_with('/') {
    base.push('/');
  }

  Url::parse(&base)
    .and_then(|b| b.join(&format!("v1beta/models/{}:generateContent", model)))
    .map_err(|e| LlmError::Request(format!("Invalid API base {}: {}", api_base, e)))
}

fn build_user_message(profile: &GenerationProfile) -> String {
  format!(
    r#"Monte um plano de treino de musculação para esta pessoa.

PERFIL:
- Peso: {} kg
- Altura: {} m
- Idade: {} anos
- Gênero: {}
- Objetivo: {}
- Nível de experiência: {}
- Dias de treino por semana: {}

Responda apenas com o JSON no formato descrito nas instruções."#,
    profile.weight,
    profile.height,
    profile.age,
    profile.gender,
    profile.goal,
    profile.experience_level,
    profile.training_days_per_week
  )
}

/// Remove a surrounding Markdown code fence (```json ... ``` or ``` ... ```)
///
/// Text without a fence comes back trimmed and otherwise untouched. The
/// `json` tag may be followed by a newline or sit on the same line as the
/// document.
pub fn strip_code_fences(text: &str) -> &str {
  let trimmed = text.trim();
  let Some(rest) = trimmed.strip_prefix("```") else {
    return trimmed;
  };

  let body = match rest.get(..4) {
    Some(tag) if tag.eq_ignore_ascii_case("json") => &rest[4..],
    _ => rest,
  };
  let body = body.trim();
  body.strip_suffix("```").unwrap_or(body).trim()
}

/// Strip fences and decode the model text into a `RawPlan`
///
/// Errors name the JSON path of the first offending field.
pub fn parse_plan_reply(text: &str) -> Result<RawPlan, LlmError> {
  let mut de = serde_json::Deserializer::from_str(strip_code_fences(text));
  serde_path_to_error::deserialize(&mut de)
    .map_err(|e| LlmError::Parse(format!("plan parse at {}: {}", e.path(), e)))
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
