use crate::api::{ApiConfig, ApiError};
use crate::auth::{self, AuthTokens};
use crate::db::{AppState, DbPool};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use tauri::State;

/// ---------------------------------------------------------------------------
/// Account Commands
/// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct AuthStatus {
  pub is_authenticated: bool,
  pub email: Option<String>,
  pub expires_at: Option<String>,
  pub needs_refresh: bool,
}

#[tauri::command]
pub async fn register(
  state: State<'_, Arc<AppState>>,
  email: String,
  username: String,
  password: String,
) -> Result<AuthStatus, ApiError> {
  let tokens = auth::register(&state.api, &email, &username, &password).await?;
  save_account(&state.db, &email, &tokens).await?;

  println!("Registered account {}", email);
  Ok(status_for(&email, &tokens))
}

#[tauri::command]
pub async fn login(
  state: State<'_, Arc<AppState>>,
  email: String,
  password: String,
) -> Result<AuthStatus, ApiError> {
  let tokens = auth::login(&state.api, &email, &password).await?;
  save_account(&state.db, &email, &tokens).await?;

  println!("Logged in as {}", email);
  Ok(status_for(&email, &tokens))
}

/// Clear the stored session. Server-side revocation is best-effort; the
/// local session is gone either way.
#[tauri::command]
pub async fn logout(state: State<'_, Arc<AppState>>) -> Result<(), ApiError> {
  if let Some(tokens) = load_tokens(&state.db).await? {
    if let Some(refresh_token) = &tokens.refresh_token {
      if let Err(e) = auth::revoke(&state.api, refresh_token).await {
        eprintln!("Warning: token revocation failed: {}", e);
      }
    }
  }

  clear_account(&state.db).await?;
  println!("Logged out");
  Ok(())
}

#[tauri::command]
pub async fn get_auth_status(state: State<'_, Arc<AppState>>) -> Result<AuthStatus, ApiError> {
  let email = load_email(&state.db).await?;
  match load_tokens(&state.db).await? {
    Some(tokens) => Ok(AuthStatus {
      is_authenticated: Utc::now() < tokens.expires_at || tokens.refresh_token.is_some(),
      email,
      expires_at: Some(tokens.expires_at.to_rfc3339()),
      needs_refresh: tokens.needs_refresh(),
    }),
    None => Ok(AuthStatus {
      is_authenticated: false,
      email: None,
      expires_at: None,
      needs_refresh: false,
    }),
  }
}

fn status_for(email: &str, tokens: &AuthTokens) -> AuthStatus {
  AuthStatus {
    is_authenticated: true,
    email: Some(email.to_string()),
    expires_at: Some(tokens.expires_at.to_rfc3339()),
    needs_refresh: tokens.needs_refresh(),
  }
}

/// ---------------------------------------------------------------------------
/// Get Valid Access Token (with auto-refresh)
/// ---------------------------------------------------------------------------

/// Internal helper: get a valid bearer token, refreshing when close to
/// expiry. Every workflow command obtains the token through here.
pub async fn get_valid_access_token(db: &DbPool, api: &ApiConfig) -> Result<String, ApiError> {
  let mut tokens = load_tokens(db).await?.ok_or(ApiError::NotAuthenticated)?;

  if tokens.needs_refresh() {
    match tokens.refresh_token.clone() {
      Some(refresh_token) => {
        tokens = auth::refresh(api, &refresh_token).await?;
        save_tokens(db, &tokens).await?;
        println!("Access token refreshed");
      }
      None => {
        // No refresh token: the access token is usable until it actually
        // expires, then the user must log in again
        if Utc::now() >= tokens.expires_at {
          return Err(ApiError::NotAuthenticated);
        }
      }
    }
  }

  Ok(tokens.access_token)
}

/// ---------------------------------------------------------------------------
/// Database Helpers
/// ---------------------------------------------------------------------------

async fn save_account(db: &DbPool, email: &str, tokens: &AuthTokens) -> Result<(), ApiError> {
  sqlx::query(
    r#"
        UPDATE auth_state SET email = ?1, access_token = ?2, refresh_token = ?3,
            token_expires_at = ?4 WHERE id = 1
        "#,
  )
  .bind(email)
  .bind(&tokens.access_token)
  .bind(&tokens.refresh_token)
  .bind(tokens.expires_at)
  .execute(db)
  .await
  .map_err(|e| ApiError::Database(e.to_string()))?;

  Ok(())
}

pub async fn save_tokens(db: &DbPool, tokens: &AuthTokens) -> Result<(), ApiError> {
  sqlx::query(
    "UPDATE auth_state SET access_token = ?1, refresh_token = ?2,
         token_expires_at = ?3 WHERE id = 1",
  )
  .bind(&tokens.access_token)
  .bind(&tokens.refresh_token)
  .bind(tokens.expires_at)
  .execute(db)
  .await
  .map_err(|e| ApiError::Database(e.to_string()))?;

  Ok(())
}

pub async fn load_tokens(db: &DbPool) -> Result<Option<AuthTokens>, ApiError> {
  let row: Option<(Option<String>, Option<String>, Option<DateTime<Utc>>)> = sqlx::query_as(
    "SELECT access_token, refresh_token, token_expires_at FROM auth_state WHERE id = 1",
  )
  .fetch_optional(db)
  .await
  .map_err(|e| ApiError::Database(e.to_string()))?;

  match row {
    Some((Some(access), refresh, Some(expires))) => Ok(Some(AuthTokens {
      access_token: access,
      refresh_token: refresh,
      expires_at: expires,
    })),
    _ => Ok(None),
  }
}

async fn load_email(db: &DbPool) -> Result<Option<String>, ApiError> {
  let row: Option<(Option<String>,)> =
    sqlx::query_as("SELECT email FROM auth_state WHERE id = 1")
      .fetch_optional(db)
      .await
      .map_err(|e| ApiError::Database(e.to_string()))?;

  Ok(row.and_then(|(email,)| email))
}

async fn clear_account(db: &DbPool) -> Result<(), ApiError> {
  sqlx::query(
    "UPDATE auth_state SET email = NULL, access_token = NULL, refresh_token = NULL,
         token_expires_at = NULL WHERE id = 1",
  )
  .execute(db)
  .await
  .map_err(|e| ApiError::Database(e.to_string()))?;

  Ok(())
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
