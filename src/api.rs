//! Typed REST client for the FitCoach backend
//!
//! One async function per consumed endpoint. Every call takes the API
//! configuration and a bearer token explicitly; nothing here reads shared
//! mutable state.

use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Serialize;
use std::env;

use crate::models::{
  DataEnvelope, Exercise, PersonalRecord, PlanCreate, SessionCreate, SessionSet, SetCreate,
  WorkoutPlan, WorkoutSession,
};

/// ---------------------------------------------------------------------------
/// Configuration
/// ---------------------------------------------------------------------------

const DEFAULT_API_BASE: &str = "http://localhost:8000/api/v1";

#[derive(Debug, Clone)]
pub struct ApiConfig {
  pub base_url: String,
}

impl ApiConfig {
  /// Read the API base from `FITCOACH_API_URL`, falling back to the local
  /// development backend.
  pub fn from_env() -> Self {
    let base_url = env::var("FITCOACH_API_URL").unwrap_or_else(|_| DEFAULT_API_BASE.to_string());
    Self::new(base_url)
  }

  pub fn new(base_url: impl Into<String>) -> Self {
    let mut base_url = base_url.into();
    while base_url.ends_with('/') {
      base_url.pop();
    }
    Self { base_url }
  }

  fn endpoint(&self, path: &str) -> String {
    format!("{}{}", self.base_url, path)
  }
}

/// ---------------------------------------------------------------------------
/// Error Handling
/// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
  #[error("HTTP request failed: {0}")]
  Request(#[from] reqwest::Error),

  #[error("API error {status}: {message}")]
  Api { status: u16, message: String },

  #[error("Invalid API URL: {0}")]
  InvalidUrl(String),

  #[error("Not authenticated")]
  NotAuthenticated,

  #[error("Database error: {0}")]
  Database(String),
}

impl Serialize for ApiError {
  fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
  where
    S: serde::Serializer,
  {
    serializer.serialize_str(&self.to_string())
  }
}

/// Map non-2xx responses to an error, reading the body as the message.
/// 401 collapses to `NotAuthenticated` so callers can prompt for login.
async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
  let status = response.status();
  if status == reqwest::StatusCode::UNAUTHORIZED {
    return Err(ApiError::NotAuthenticated);
  }
  if !status.is_success() {
    let message = response.text().await.unwrap_or_default();
    return Err(ApiError::Api {
      status: status.as_u16(),
      message,
    });
  }
  Ok(response)
}

/// ---------------------------------------------------------------------------
/// Exercise Catalog
/// ---------------------------------------------------------------------------

/// Search the exercise catalog by name fragment.
/// An empty server result means "no matches", not an error.
pub async fn search_exercises(
  config: &ApiConfig,
  access_token: &str,
  query: &str,
) -> Result<Vec<Exercise>, ApiError> {
  let mut url = url::Url::parse(&config.endpoint("/workouts/exercises"))
    .map_err(|e| ApiError::InvalidUrl(e.to_string()))?;
  url.query_pairs_mut().append_pair("q", query);

  let client = Client::new();
  let response = client
    .get(url)
    .bearer_auth(access_token)
    .send()
    .await?;

  let envelope: DataEnvelope<Exercise> = check_status(response).await?.json().await?;
  Ok(envelope.data)
}

pub async fn create_exercise(
  config: &ApiConfig,
  access_token: &str,
  name: &str,
) -> Result<Exercise, ApiError> {
  let client = Client::new();
  let response = client
    .post(config.endpoint("/workouts/exercises"))
    .bearer_auth(access_token)
    .json(&serde_json::json!({ "name": name }))
    .send()
    .await?;

  Ok(check_status(response).await?.json().await?)
}

/// ---------------------------------------------------------------------------
/// Plans
/// ---------------------------------------------------------------------------

pub async fn list_plans(
  config: &ApiConfig,
  access_token: &str,
) -> Result<Vec<WorkoutPlan>, ApiError> {
  let client = Client::new();
  let response = client
    .get(config.endpoint("/workouts/plans"))
    .bearer_auth(access_token)
    .send()
    .await?;

  Ok(check_status(response).await?.json().await?)
}

pub async fn create_plan(
  config: &ApiConfig,
  access_token: &str,
  plan: &PlanCreate,
) -> Result<WorkoutPlan, ApiError> {
  let client = Client::new();
  let response = client
    .post(config.endpoint("/workouts/plans"))
    .bearer_auth(access_token)
    .json(plan)
    .send()
    .await?;

  Ok(check_status(response).await?.json().await?)
}

/// ---------------------------------------------------------------------------
/// Sessions
/// ---------------------------------------------------------------------------

pub async fn list_sessions(
  config: &ApiConfig,
  access_token: &str,
  page: u32,
  page_size: u32,
) -> Result<Vec<WorkoutSession>, ApiError> {
  let client = Client::new();
  let url = format!(
    "{}?page={}&page_size={}",
    config.endpoint("/workouts/sessions"),
    page,
    page_size
  );
  let response = client.get(&url).bearer_auth(access_token).send().await?;

  Ok(check_status(response).await?.json().await?)
}

/// Create the session record. Called lazily, on the first logged set.
pub async fn start_session(
  config: &ApiConfig,
  access_token: &str,
  plan_id: Option<&str>,
  started_at: DateTime<Utc>,
) -> Result<WorkoutSession, ApiError> {
  let body = SessionCreate {
    plan_id: plan_id.map(str::to_owned),
    started_at,
  };

  let client = Client::new();
  let response = client
    .post(config.endpoint("/workouts/sessions"))
    .bearer_auth(access_token)
    .json(&body)
    .send()
    .await?;

  Ok(check_status(response).await?.json().await?)
}

/// Submit one set. The response carries the server-assigned PR flag.
pub async fn log_set(
  config: &ApiConfig,
  access_token: &str,
  session_id: &str,
  set: &SetCreate,
) -> Result<SessionSet, ApiError> {
  let client = Client::new();
  let response = client
    .post(config.endpoint(&format!("/workouts/sessions/{}/sets", session_id)))
    .bearer_auth(access_token)
    .json(set)
    .send()
    .await?;

  Ok(check_status(response).await?.json().await?)
}

/// Complete the session. The response carries the server-computed summary
/// (duration, total volume).
pub async fn complete_session(
  config: &ApiConfig,
  access_token: &str,
  session_id: &str,
) -> Result<WorkoutSession, ApiError> {
  let client = Client::new();
  let response = client
    .post(config.endpoint(&format!("/workouts/sessions/{}/complete", session_id)))
    .bearer_auth(access_token)
    .send()
    .await?;

  Ok(check_status(response).await?.json().await?)
}

/// ---------------------------------------------------------------------------
/// Personal Records
/// ---------------------------------------------------------------------------

pub async fn pending_celebrations(
  config: &ApiConfig,
  access_token: &str,
) -> Result<Vec<PersonalRecord>, ApiError> {
  let client = Client::new();
  let response = client
    .get(config.endpoint("/personal-records/pending-celebrations"))
    .bearer_auth(access_token)
    .send()
    .await?;

  let envelope: DataEnvelope<PersonalRecord> = check_status(response).await?.json().await?;
  Ok(envelope.data)
}

/// Acknowledge a celebrated record. The server returns 204.
pub async fn celebrate_pr(
  config: &ApiConfig,
  access_token: &str,
  pr_id: &str,
) -> Result<(), ApiError> {
  let client = Client::new();
  let response = client
    .post(config.endpoint(&format!("/personal-records/{}/celebrate", pr_id)))
    .bearer_auth(access_token)
    .send()
    .await?;

  check_status(response).await?;
  Ok(())
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use super::*;
  use mockito::Matcher;

  fn config_for(server: &mockito::ServerGuard) -> ApiConfig {
    ApiConfig::new(server.url())
  }

  #[test]
  fn test_config_strips_trailing_slashes() {
    let config = ApiConfig::new("http://localhost:8000/api/v1///");
    assert_eq!(config.base_url, "http://localhost:8000/api/v1");
    assert_eq!(
      config.endpoint("/workouts/plans"),
      "http://localhost:8000/api/v1/workouts/plans"
    );
  }

  #[test]
  fn test_config_from_env_override() {
    temp_env::with_var("FITCOACH_API_URL", Some("https://coach.example/api/v1"), || {
      let config = ApiConfig::from_env();
      assert_eq!(config.base_url, "https://coach.example/api/v1");
    });
  }

  #[test]
  fn test_config_from_env_default() {
    temp_env::with_var("FITCOACH_API_URL", None::<&str>, || {
      let config = ApiConfig::from_env();
      assert_eq!(config.base_url, DEFAULT_API_BASE);
    });
  }

  #[tokio::test]
  async fn test_search_exercises_encodes_query() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
      .mock("GET", "/workouts/exercises")
      .match_query(Matcher::UrlEncoded("q".into(), "bench press".into()))
      .match_header("authorization", "Bearer tok-1")
      .with_status(200)
      .with_header("content-type", "application/json")
      .with_body(
        r#"{"data":[{"id":"ex-1","name":"Bench Press","category":"chest","muscle_groups":["chest","triceps"],"equipment":["barbell"]}]}"#,
      )
      .create_async()
      .await;

    let result = search_exercises(&config_for(&server), "tok-1", "bench press")
      .await
      .unwrap();

    mock.assert_async().await;
    assert_eq!(result.len(), 1);
    assert_eq!(result[0].name, "Bench Press");
    assert_eq!(result[0].category.as_deref(), Some("chest"));
  }

  #[tokio::test]
  async fn test_search_exercises_no_matches() {
    let mut server = mockito::Server::new_async().await;
    server
      .mock("GET", "/workouts/exercises")
      .match_query(Matcher::Any)
      .with_status(200)
      .with_header("content-type", "application/json")
      .with_body(r#"{"data":[]}"#)
      .create_async()
      .await;

    let result = search_exercises(&config_for(&server), "tok-1", "zzz")
      .await
      .unwrap();
    assert!(result.is_empty());
  }

  #[tokio::test]
  async fn test_create_exercise_returns_created() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
      .mock("POST", "/workouts/exercises")
      .match_body(Matcher::Json(serde_json::json!({ "name": "Zercher Squat" })))
      .with_status(201)
      .with_header("content-type", "application/json")
      .with_body(r#"{"id":"ex-9","name":"Zercher Squat","category":null,"muscle_groups":null,"equipment":null}"#)
      .create_async()
      .await;

    let exercise = create_exercise(&config_for(&server), "tok-1", "Zercher Squat")
      .await
      .unwrap();

    mock.assert_async().await;
    assert_eq!(exercise.id, "ex-9");
    assert_eq!(exercise.name, "Zercher Squat");
  }

  #[tokio::test]
  async fn test_start_session_posts_plan_reference() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
      .mock("POST", "/workouts/sessions")
      .match_body(Matcher::PartialJson(serde_json::json!({ "plan_id": "plan-1" })))
      .with_status(201)
      .with_header("content-type", "application/json")
      .with_body(
        r#"{"id":"sess-1","plan_id":"plan-1","started_at":"2025-06-01T10:00:00Z","completed_at":null,"duration_minutes":null,"total_volume_kg":null,"notes":null}"#,
      )
      .create_async()
      .await;

    let session = start_session(&config_for(&server), "tok-1", Some("plan-1"), Utc::now())
      .await
      .unwrap();

    mock.assert_async().await;
    assert_eq!(session.id, "sess-1");
    assert!(session.completed_at.is_none());
  }

  #[tokio::test]
  async fn test_log_set_carries_pr_flag() {
    let mut server = mockito::Server::new_async().await;
    server
      .mock("POST", "/workouts/sessions/sess-1/sets")
      .match_body(Matcher::Json(serde_json::json!({
        "exercise_id": "ex-1",
        "weight_kg": 100.0,
        "reps": 5,
        "set_number": 1
      })))
      .with_status(201)
      .with_header("content-type", "application/json")
      .with_body(
        r#"{"id":"set-1","exercise_id":"ex-1","set_number":1,"weight_kg":100.0,"reps":5,"rpe":null,"is_pr":true,"notes":null}"#,
      )
      .create_async()
      .await;

    let set = log_set(
      &config_for(&server),
      "tok-1",
      "sess-1",
      &SetCreate {
        exercise_id: "ex-1".to_string(),
        weight_kg: 100.0,
        reps: 5,
        set_number: 1,
      },
    )
    .await
    .unwrap();

    assert!(set.is_pr);
    assert_eq!(set.set_number, 1);
  }

  #[tokio::test]
  async fn test_complete_session_returns_summary() {
    let mut server = mockito::Server::new_async().await;
    server
      .mock("POST", "/workouts/sessions/sess-1/complete")
      .with_status(200)
      .with_header("content-type", "application/json")
      .with_body(
        r#"{"id":"sess-1","plan_id":null,"started_at":"2025-06-01T10:00:00Z","completed_at":"2025-06-01T11:02:00Z","duration_minutes":62,"total_volume_kg":1240.0,"notes":null}"#,
      )
      .create_async()
      .await;

    let session = complete_session(&config_for(&server), "tok-1", "sess-1")
      .await
      .unwrap();

    assert_eq!(session.duration_minutes, Some(62));
    assert_eq!(session.total_volume_kg, Some(1240.0));
  }

  #[tokio::test]
  async fn test_pending_celebrations_parses_trimmed_shape() {
    let mut server = mockito::Server::new_async().await;
    server
      .mock("GET", "/personal-records/pending-celebrations")
      .with_status(200)
      .with_header("content-type", "application/json")
      .with_body(
        r#"{"data":[{"id":"pr-1","exercise_name":"Bench Press","weight_kg":100.0,"reps":8,"pr_type":"weight"}]}"#,
      )
      .create_async()
      .await;

    let prs = pending_celebrations(&config_for(&server), "tok-1")
      .await
      .unwrap();

    assert_eq!(prs.len(), 1);
    assert_eq!(prs[0].exercise_name.as_deref(), Some("Bench Press"));
    assert!(prs[0].achieved_at.is_none());
  }

  #[tokio::test]
  async fn test_celebrate_pr_accepts_no_content() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
      .mock("POST", "/personal-records/pr-1/celebrate")
      .with_status(204)
      .create_async()
      .await;

    celebrate_pr(&config_for(&server), "tok-1", "pr-1")
      .await
      .unwrap();
    mock.assert_async().await;
  }

  #[tokio::test]
  async fn test_unauthorized_maps_to_not_authenticated() {
    let mut server = mockito::Server::new_async().await;
    server
      .mock("GET", "/workouts/plans")
      .with_status(401)
      .with_body(r#"{"detail":"Not authenticated"}"#)
      .create_async()
      .await;

    let err = list_plans(&config_for(&server), "stale").await.unwrap_err();
    assert!(matches!(err, ApiError::NotAuthenticated));
  }

  #[tokio::test]
  async fn test_server_error_carries_status_and_body() {
    let mut server = mockito::Server::new_async().await;
    server
      .mock("POST", "/workouts/sessions/sess-1/complete")
      .with_status(404)
      .with_body(r#"{"detail":"Session not found"}"#)
      .create_async()
      .await;

    let err = complete_session(&config_for(&server), "tok-1", "sess-1")
      .await
      .unwrap_err();

    match err {
      ApiError::Api { status, message } => {
        assert_eq!(status, 404);
        assert!(message.contains("Session not found"));
      }
      other => panic!("Expected ApiError::Api, got {:?}", other),
    }
  }
}
