use crate::api;
use crate::commands::auth::get_valid_access_token;
use crate::db::AppState;
use crate::models::{Exercise, SetCreate, WorkoutSession};
use crate::session::{SessionError, SessionLogger, SessionSnapshot};
use chrono::Utc;
use std::sync::Arc;
use tauri::State;

/// ---------------------------------------------------------------------------
/// Screen Lifecycle
/// ---------------------------------------------------------------------------

/// Mount a fresh logging screen. Replaces any previous logging instance and
/// invalidates in-flight PR checks from it.
#[tauri::command]
pub async fn start_logging(
  state: State<'_, Arc<AppState>>,
  plan_id: Option<String>,
) -> Result<SessionSnapshot, SessionError> {
  state.celebrations.lock().await.reset();

  let mut logger = state.logger.lock().await;
  *logger = SessionLogger::new(plan_id);
  Ok(logger.snapshot())
}

/// Leaving the logging screen. Discards the result of any PR check still in
/// flight; the logging state itself is kept until the next `start_logging`.
#[tauri::command]
pub async fn leave_logging(state: State<'_, Arc<AppState>>) -> Result<(), SessionError> {
  state.celebrations.lock().await.invalidate();
  Ok(())
}

#[tauri::command]
pub async fn session_snapshot(
  state: State<'_, Arc<AppState>>,
) -> Result<SessionSnapshot, SessionError> {
  Ok(state.logger.lock().await.snapshot())
}

/// ---------------------------------------------------------------------------
/// Row Management
/// ---------------------------------------------------------------------------

/// Append a pending row for the picked exercise. No session is created.
#[tauri::command]
pub async fn add_exercise(
  state: State<'_, Arc<AppState>>,
  exercise: Exercise,
) -> Result<SessionSnapshot, SessionError> {
  let mut logger = state.logger.lock().await;
  logger.add_exercise(exercise)?;
  Ok(logger.snapshot())
}

#[tauri::command]
pub async fn update_set_input(
  state: State<'_, Arc<AppState>>,
  index: usize,
  weight: String,
  reps: String,
) -> Result<(), SessionError> {
  state.logger.lock().await.set_input(index, weight, reps)
}

/// ---------------------------------------------------------------------------
/// Log Set
/// ---------------------------------------------------------------------------

/// Validate a row, lazily create the session record on the first logged set,
/// and submit the set. The logger lock is held across the whole span, so
/// concurrent submissions serialize and only one can ever create the
/// session. On failure the row stays pending and a created session identity
/// is retained for retry.
#[tauri::command]
pub async fn log_set(
  state: State<'_, Arc<AppState>>,
  index: usize,
) -> Result<SessionSnapshot, SessionError> {
  let mut logger = state.logger.lock().await;
  let pending = logger.prepare_log(index)?;

  let access_token = get_valid_access_token(&state.db, &state.api).await?;

  let session_id = match logger.active_session_id().map(str::to_owned) {
    Some(id) => id,
    None => {
      let session =
        api::start_session(&state.api, &access_token, logger.plan_id(), Utc::now()).await?;
      println!("Started session {}", session.id);
      let id = session.id.clone();
      logger.attach_session(session);
      id
    }
  };

  let set = api::log_set(
    &state.api,
    &access_token,
    &session_id,
    &SetCreate {
      exercise_id: pending.exercise_id,
      weight_kg: pending.weight_kg,
      reps: pending.reps,
      set_number: pending.set_number,
    },
  )
  .await?;

  if logger.mark_logged(index, set)? {
    println!("Personal record on set {} of session {}", index, session_id);
  }

  Ok(logger.snapshot())
}

/// ---------------------------------------------------------------------------
/// Finish
/// ---------------------------------------------------------------------------

/// Complete the session. Requires at least one logged set; terminal once it
/// succeeds. Returns the server summary (duration, total volume).
#[tauri::command]
pub async fn finish_session(
  state: State<'_, Arc<AppState>>,
) -> Result<WorkoutSession, SessionError> {
  let mut logger = state.logger.lock().await;
  let session_id = logger.ensure_finishable()?.to_string();

  let access_token = get_valid_access_token(&state.db, &state.api).await?;
  let summary = api::complete_session(&state.api, &access_token, &session_id).await?;

  logger.finish(summary.clone());
  println!("Completed session {}", session_id);
  Ok(summary)
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
