use crate::api::{self, ApiError};
use crate::commands::auth::get_valid_access_token;
use crate::db::AppState;
use crate::models::{PlanCreate, WorkoutPlan, WorkoutSession};
use std::sync::Arc;
use tauri::State;

/// ---------------------------------------------------------------------------
/// Dashboard Commands
/// ---------------------------------------------------------------------------

#[tauri::command]
pub async fn list_plans(state: State<'_, Arc<AppState>>) -> Result<Vec<WorkoutPlan>, ApiError> {
  let access_token = get_valid_access_token(&state.db, &state.api).await?;
  api::list_plans(&state.api, &access_token).await
}

#[tauri::command]
pub async fn create_plan(
  state: State<'_, Arc<AppState>>,
  name: String,
  goal: String,
  days_per_week: i64,
  duration_weeks: Option<i64>,
) -> Result<WorkoutPlan, ApiError> {
  let access_token = get_valid_access_token(&state.db, &state.api).await?;
  let plan = api::create_plan(
    &state.api,
    &access_token,
    &PlanCreate {
      name,
      goal,
      days_per_week,
      duration_weeks,
    },
  )
  .await?;

  println!("Created plan {} ({})", plan.name, plan.id);
  Ok(plan)
}

/// Recent sessions for the dashboard list.
#[tauri::command]
pub async fn list_recent_sessions(
  state: State<'_, Arc<AppState>>,
  page: Option<u32>,
  page_size: Option<u32>,
) -> Result<Vec<WorkoutSession>, ApiError> {
  let access_token = get_valid_access_token(&state.db, &state.api).await?;
  api::list_sessions(
    &state.api,
    &access_token,
    page.unwrap_or(1),
    page_size.unwrap_or(20),
  )
  .await
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
