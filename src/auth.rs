//! Account authentication against the FitCoach backend
//!
//! Login and register both yield a short-lived bearer token; the token is
//! persisted in the local database with an explicit lifecycle: login writes
//! it, logout clears it, and every consumer receives it as a parameter.

use chrono::{DateTime, Duration, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::api::{ApiConfig, ApiError};

const TOKEN_EXPIRY_BUFFER_MINUTES: i64 = 5;

/// ---------------------------------------------------------------------------
/// Token Data Structures
/// ---------------------------------------------------------------------------

/// Response from the auth endpoints. The refresh token is optional on the
/// wire; without one, expiry means logging in again.
#[allow(dead_code)]
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
  pub access_token: String,
  #[serde(default)]
  pub token_type: String,
  pub expires_in: i64, // seconds
  #[serde(default)]
  pub refresh_token: Option<String>,
}

/// Stored token state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthTokens {
  pub access_token: String,
  pub refresh_token: Option<String>,
  pub expires_at: DateTime<Utc>,
}

impl AuthTokens {
  pub fn from_response(resp: TokenResponse) -> Self {
    Self {
      access_token: resp.access_token,
      refresh_token: resp.refresh_token,
      expires_at: Utc::now() + Duration::seconds(resp.expires_in),
    }
  }

  pub fn needs_refresh(&self) -> bool {
    let buffer = Duration::minutes(TOKEN_EXPIRY_BUFFER_MINUTES);
    Utc::now() + buffer >= self.expires_at
  }
}

/// ---------------------------------------------------------------------------
/// Auth Endpoints
/// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct RegisterRequest<'a> {
  email: &'a str,
  username: &'a str,
  password: &'a str,
}

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
  email: &'a str,
  password: &'a str,
}

#[derive(Debug, Serialize)]
struct RefreshRequest<'a> {
  refresh_token: &'a str,
}

async fn token_request<B: Serialize>(
  config: &ApiConfig,
  path: &str,
  body: &B,
) -> Result<AuthTokens, ApiError> {
  let client = Client::new();
  let response = client
    .post(format!("{}{}", config.base_url, path))
    .json(body)
    .send()
    .await?;

  let status = response.status();
  if !status.is_success() {
    let message = response.text().await.unwrap_or_default();
    return Err(ApiError::Api {
      status: status.as_u16(),
      message,
    });
  }

  let token_response: TokenResponse = response.json().await?;
  Ok(AuthTokens::from_response(token_response))
}

pub async fn register(
  config: &ApiConfig,
  email: &str,
  username: &str,
  password: &str,
) -> Result<AuthTokens, ApiError> {
  token_request(
    config,
    "/auth/register",
    &RegisterRequest {
      email,
      username,
      password,
    },
  )
  .await
}

pub async fn login(
  config: &ApiConfig,
  email: &str,
  password: &str,
) -> Result<AuthTokens, ApiError> {
  token_request(config, "/auth/login", &LoginRequest { email, password }).await
}

pub async fn refresh(config: &ApiConfig, refresh_token: &str) -> Result<AuthTokens, ApiError> {
  token_request(config, "/auth/refresh", &RefreshRequest { refresh_token }).await
}

/// Revoke the refresh token server-side. Best-effort: the local session is
/// cleared regardless of the outcome.
pub async fn revoke(config: &ApiConfig, refresh_token: &str) -> Result<(), ApiError> {
  let client = Client::new();
  let response = client
    .post(format!("{}/auth/logout", config.base_url))
    .json(&RefreshRequest { refresh_token })
    .send()
    .await?;

  let status = response.status();
  if !status.is_success() {
    let message = response.text().await.unwrap_or_default();
    return Err(ApiError::Api {
      status: status.as_u16(),
      message,
    });
  }
  Ok(())
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
