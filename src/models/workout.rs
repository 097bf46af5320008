use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Catalog exercise. Server-owned; immutable from the client once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exercise {
  pub id: String,
  pub name: String,
  #[serde(default)]
  pub category: Option<String>,
  #[serde(default)]
  pub muscle_groups: Option<Vec<String>>,
  #[serde(default)]
  pub equipment: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkoutPlan {
  pub id: String,
  pub name: String,
  #[serde(default)]
  pub description: Option<String>,
  #[serde(default)]
  pub goal: Option<String>,
  #[serde(default)]
  pub duration_weeks: Option<i64>,
  #[serde(default)]
  pub days_per_week: Option<i64>,
  pub is_active: bool,
  #[serde(default)]
  pub is_ai_generated: bool,
  pub created_at: DateTime<Utc>,
}

/// A workout session. `duration_minutes` and `total_volume_kg` are computed
/// server-side and only present after completion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkoutSession {
  pub id: String,
  #[serde(default)]
  pub plan_id: Option<String>,
  pub started_at: DateTime<Utc>,
  #[serde(default)]
  pub completed_at: Option<DateTime<Utc>>,
  #[serde(default)]
  pub duration_minutes: Option<i64>,
  #[serde(default)]
  pub total_volume_kg: Option<f64>,
  #[serde(default)]
  pub notes: Option<String>,
}

/// A logged set as echoed back by the server, PR flag included.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSet {
  pub id: String,
  pub exercise_id: String,
  pub set_number: i64,
  #[serde(default)]
  pub weight_kg: Option<f64>,
  #[serde(default)]
  pub reps: Option<i64>,
  #[serde(default)]
  pub rpe: Option<f64>,
  pub is_pr: bool,
  #[serde(default)]
  pub notes: Option<String>,
}

/// A personal record pending celebration. The pending-celebrations endpoint
/// returns a trimmed shape; the optional fields only appear on the full list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonalRecord {
  pub id: String,
  #[serde(default)]
  pub exercise_id: Option<String>,
  #[serde(default)]
  pub exercise_name: Option<String>,
  pub weight_kg: f64,
  pub reps: i64,
  #[serde(default)]
  pub pr_type: Option<String>,
  #[serde(default)]
  pub achieved_at: Option<DateTime<Utc>>,
  #[serde(default)]
  pub celebrated: Option<bool>,
}

/// `{"data": [...]}` wrapper used by exercise search and pending celebrations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataEnvelope<T> {
  pub data: Vec<T>,
}

/// ---------------------------------------------------------------------------
/// Request Payloads
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanCreate {
  pub name: String,
  pub goal: String,
  pub days_per_week: i64,
  pub duration_weeks: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionCreate {
  pub plan_id: Option<String>,
  pub started_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetCreate {
  pub exercise_id: String,
  pub weight_kg: f64,
  pub reps: i64,
  pub set_number: i64,
}
