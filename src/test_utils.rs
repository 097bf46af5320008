//! Test utilities and helpers for integration and unit testing
//!
//! This module provides common test infrastructure including:
//! - Database setup/teardown
//! - Token seeding
//! - Mock data factories

use chrono::{Duration, Utc};
use sqlx::SqlitePool;
use std::sync::Arc;

use crate::api::ApiConfig;
use crate::db::AppState;
use crate::models::{Exercise, PersonalRecord, SessionSet, WorkoutSession};

/// ---------------------------------------------------------------------------
/// Database Test Utilities
/// ---------------------------------------------------------------------------

/// Create an in-memory SQLite database for testing
/// Runs all migrations and returns a ready-to-use pool
///
/// Uses max_connections(1) to prevent multiple pool connections from creating
/// isolated in-memory databases, which would cause intermittent test failures
pub async fn setup_test_db() -> SqlitePool {
  let pool = sqlx::sqlite::SqlitePoolOptions::new()
    .max_connections(1)
    .connect("sqlite::memory:")
    .await
    .expect("Failed to create in-memory database");

  // Run migrations
  sqlx::migrate!("./migrations")
    .run(&pool)
    .await
    .expect("Failed to run migrations");

  pool
}

/// Close a test database pool
pub async fn teardown_test_db(pool: SqlitePool) {
  pool.close().await;
}

/// Seed the database with a logged-in account whose token is valid for
/// `minutes_valid` minutes
pub async fn seed_test_tokens(pool: &SqlitePool, access_token: &str, minutes_valid: i64) {
  sqlx::query(
    "UPDATE auth_state SET email = 'test@example.com', access_token = ?1,
         refresh_token = NULL, token_expires_at = ?2 WHERE id = 1",
  )
  .bind(access_token)
  .bind(Utc::now() + Duration::minutes(minutes_valid))
  .execute(pool)
  .await
  .expect("Failed to seed tokens");
}

/// Build the managed application state against an arbitrary API base
/// (usually a mock server)
pub fn make_test_state(pool: SqlitePool, base_url: &str) -> Arc<AppState> {
  Arc::new(AppState::new(pool, ApiConfig::new(base_url)))
}

/// ---------------------------------------------------------------------------
/// Mock Data Factories
/// ---------------------------------------------------------------------------

pub fn mock_exercise(id: &str, name: &str) -> Exercise {
  Exercise {
    id: id.to_string(),
    name: name.to_string(),
    category: Some("strength".to_string()),
    muscle_groups: None,
    equipment: None,
  }
}

/// An open session, as returned by the session-create endpoint
pub fn mock_open_session(id: &str) -> WorkoutSession {
  WorkoutSession {
    id: id.to_string(),
    plan_id: None,
    started_at: Utc::now(),
    completed_at: None,
    duration_minutes: None,
    total_volume_kg: None,
    notes: None,
  }
}

/// A completed session summary, as returned by the complete endpoint
pub fn mock_summary(id: &str, duration_minutes: i64, total_volume_kg: f64) -> WorkoutSession {
  WorkoutSession {
    id: id.to_string(),
    plan_id: None,
    started_at: Utc::now() - Duration::minutes(duration_minutes),
    completed_at: Some(Utc::now()),
    duration_minutes: Some(duration_minutes),
    total_volume_kg: Some(total_volume_kg),
    notes: None,
  }
}

pub fn mock_logged_set(id: &str, exercise_id: &str, set_number: i64, is_pr: bool) -> SessionSet {
  SessionSet {
    id: id.to_string(),
    exercise_id: exercise_id.to_string(),
    set_number,
    weight_kg: Some(100.0),
    reps: Some(5),
    rpe: None,
    is_pr,
    notes: None,
  }
}

pub fn mock_pr(id: &str) -> PersonalRecord {
  PersonalRecord {
    id: id.to_string(),
    exercise_id: Some("ex-1".to_string()),
    exercise_name: Some("Bench Press".to_string()),
    weight_kg: 100.0,
    reps: 8,
    pr_type: Some("weight".to_string()),
    achieved_at: None,
    celebrated: Some(false),
  }
}

/// ---------------------------------------------------------------------------
/// Tests for Test Utilities
/// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use super::*;

  #[tokio::test]
  async fn test_setup_db_creates_schema() {
    let pool = setup_test_db().await;

    // The single auth_state row exists from the start
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM auth_state")
      .fetch_one(&pool)
      .await
      .expect("Failed to query auth_state");
    assert_eq!(count, 1);

    teardown_test_db(pool).await;
  }

  #[tokio::test]
  async fn test_seed_tokens_round_trip() {
    let pool = setup_test_db().await;
    seed_test_tokens(&pool, "tok-1", 30).await;

    let tokens = crate::commands::auth::load_tokens(&pool)
      .await
      .expect("Failed to load tokens")
      .expect("Expected seeded tokens");

    assert_eq!(tokens.access_token, "tok-1");
    assert!(!tokens.needs_refresh());

    teardown_test_db(pool).await;
  }

  #[test]
  fn test_mock_factories_create_valid_data() {
    let exercise = mock_exercise("ex-1", "Bench Press");
    assert_eq!(exercise.name, "Bench Press");

    let session = mock_open_session("sess-1");
    assert!(session.completed_at.is_none());

    let summary = mock_summary("sess-1", 62, 1240.0);
    assert_eq!(summary.duration_minutes, Some(62));
    assert!(summary.completed_at.is_some());

    let set = mock_logged_set("set-1", "ex-1", 2, true);
    assert_eq!(set.set_number, 2);
    assert!(set.is_pr);

    let pr = mock_pr("pr-1");
    assert_eq!(pr.celebrated, Some(false));
  }
}
