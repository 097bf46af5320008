use crate::api;
use crate::commands::auth::get_valid_access_token;
use crate::db::AppState;
use crate::models::PersonalRecord;
use std::sync::Arc;
use tauri::State;

/// ---------------------------------------------------------------------------
/// PR Celebration Commands
/// ---------------------------------------------------------------------------

/// Poll for pending celebratable records when the trigger counter moved.
/// This path must never fail the caller: every error is logged and swallowed
/// and the command returns an empty list instead.
#[tauri::command]
pub async fn check_pending_prs(
  state: State<'_, Arc<AppState>>,
) -> Result<Vec<PersonalRecord>, String> {
  let trigger = state.logger.lock().await.pr_trigger();

  let generation = {
    let mut watcher = state.celebrations.lock().await;
    if !watcher.should_poll(trigger) {
      return Ok(Vec::new());
    }
    watcher.generation()
  };

  // The watcher lock is released during the fetch; the generation stamp
  // detects a screen teardown that happened mid-flight.
  let access_token = match get_valid_access_token(&state.db, &state.api).await {
    Ok(token) => token,
    Err(e) => {
      eprintln!("Warning: PR check skipped: {}", e);
      return Ok(Vec::new());
    }
  };

  let records = match api::pending_celebrations(&state.api, &access_token).await {
    Ok(records) => records,
    Err(e) => {
      eprintln!("Warning: PR check failed: {}", e);
      return Ok(Vec::new());
    }
  };

  let watcher = state.celebrations.lock().await;
  if watcher.generation() != generation {
    // Stale: the logging screen went away while we were fetching
    return Ok(Vec::new());
  }
  Ok(watcher.filter_fresh(records))
}

/// Acknowledge one shown record, whether it was dismissed or auto-closed.
/// At most one acknowledgment call is ever issued per record; failures are
/// logged and swallowed.
#[tauri::command]
pub async fn celebrate_pr(state: State<'_, Arc<AppState>>, pr_id: String) -> Result<(), String> {
  {
    let mut watcher = state.celebrations.lock().await;
    if !watcher.mark_acked(&pr_id) {
      return Ok(());
    }
  }

  let access_token = match get_valid_access_token(&state.db, &state.api).await {
    Ok(token) => token,
    Err(e) => {
      eprintln!("Warning: PR acknowledgment skipped: {}", e);
      return Ok(());
    }
  };

  if let Err(e) = api::celebrate_pr(&state.api, &access_token, &pr_id).await {
    eprintln!("Warning: failed to acknowledge PR {}: {}", pr_id, e);
  }
  Ok(())
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
