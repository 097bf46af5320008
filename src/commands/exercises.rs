use crate::api::{self, ApiError};
use crate::commands::auth::get_valid_access_token;
use crate::db::AppState;
use crate::models::Exercise;
use std::sync::Arc;
use tauri::State;

/// ---------------------------------------------------------------------------
/// Exercise Resolver
/// ---------------------------------------------------------------------------

/// Search-as-you-type against the catalog. An empty query suppresses the
/// search entirely; an empty result list means no matches.
#[tauri::command]
pub async fn search_exercises(
  state: State<'_, Arc<AppState>>,
  query: String,
) -> Result<Vec<Exercise>, ApiError> {
  if query.trim().is_empty() {
    return Ok(Vec::new());
  }

  let access_token = get_valid_access_token(&state.db, &state.api).await?;
  api::search_exercises(&state.api, &access_token, &query).await
}

/// Create-on-miss: submit the raw query text as a new exercise name. The
/// created exercise is used exactly like a picked candidate. Duplicate
/// names are the server's concern, not ours.
#[tauri::command]
pub async fn create_exercise(
  state: State<'_, Arc<AppState>>,
  name: String,
) -> Result<Exercise, ApiError> {
  let access_token = get_valid_access_token(&state.db, &state.api).await?;
  let exercise = api::create_exercise(&state.api, &access_token, &name).await?;
  println!("Created exercise {} ({})", exercise.name, exercise.id);
  Ok(exercise)
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
