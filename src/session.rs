//! Interactive session logging state machine
//!
//! Tracks one logging screen instance: a list of set rows, the lazily
//! created session record, and the terminal finished summary. The state is
//! an explicit closed set so "finished but still holding mutable rows"
//! cannot be represented.
//!
//! Key rules:
//! - The session record is created on the first logged set, never on
//!   navigation. All later submissions reuse its identity.
//! - Per-exercise set numbers start at 1 and count only *logged* rows at
//!   earlier positions, so a failed submit can be retried with a stable
//!   number.
//! - Finishing requires at least one logged set and is not re-enterable.

use serde::Serialize;

use crate::api::ApiError;
use crate::models::{Exercise, SessionSet, WorkoutSession};

/// ---------------------------------------------------------------------------
/// Error Handling
/// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
  #[error("Enter valid weight and reps")]
  InvalidInput,

  #[error("No such set row: {0}")]
  RowNotFound(usize),

  #[error("Set already logged")]
  AlreadyLogged,

  #[error("No sets logged yet")]
  NothingLogged,

  #[error("Workout already finished")]
  AlreadyFinished,

  #[error(transparent)]
  Api(#[from] ApiError),
}

impl Serialize for SessionError {
  fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
  where
    S: serde::Serializer,
  {
    serializer.serialize_str(&self.to_string())
  }
}

/// ---------------------------------------------------------------------------
/// State
/// ---------------------------------------------------------------------------

/// One row on the logging screen. Weight and reps hold the raw text inputs
/// until the row is logged; `logged` carries the server echo afterwards.
#[derive(Debug, Clone, Serialize)]
pub struct SetRow {
  pub exercise: Exercise,
  pub weight: String,
  pub reps: String,
  pub logged: Option<SessionSet>,
}

impl SetRow {
  fn pending(exercise: Exercise) -> Self {
    Self {
      exercise,
      weight: String::new(),
      reps: String::new(),
      logged: None,
    }
  }
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum SessionState {
  /// No rows logged, no session record.
  Empty,
  /// Session record exists; rows may still be pending.
  Active { session: WorkoutSession },
  /// Terminal. Holds the server summary (duration, total volume).
  Finished { summary: WorkoutSession },
}

/// A validated set submission, ready to send.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingSet {
  pub exercise_id: String,
  pub weight_kg: f64,
  pub reps: i64,
  pub set_number: i64,
}

/// Serializable view of the whole logging screen for the webview.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
  #[serde(flatten)]
  pub state: SessionState,
  pub rows: Vec<SetRow>,
  pub pr_trigger: u64,
}

pub struct SessionLogger {
  plan_id: Option<String>,
  state: SessionState,
  rows: Vec<SetRow>,
  /// Monotonic counter observed by the celebration watcher. Bumped on every
  /// PR-flagged set and once on completion.
  pr_trigger: u64,
}

impl SessionLogger {
  pub fn new(plan_id: Option<String>) -> Self {
    Self {
      plan_id,
      state: SessionState::Empty,
      rows: Vec::new(),
      pr_trigger: 0,
    }
  }

  pub fn plan_id(&self) -> Option<&str> {
    self.plan_id.as_deref()
  }

  pub fn state(&self) -> &SessionState {
    &self.state
  }

  pub fn rows(&self) -> &[SetRow] {
    &self.rows
  }

  pub fn pr_trigger(&self) -> u64 {
    self.pr_trigger
  }

  pub fn is_finished(&self) -> bool {
    matches!(self.state, SessionState::Finished { .. })
  }

  /// Session identity while the session is open. None before the first
  /// logged set and after completion.
  pub fn active_session_id(&self) -> Option<&str> {
    match &self.state {
      SessionState::Active { session } => Some(session.id.as_str()),
      _ => None,
    }
  }

  pub fn logged_count(&self) -> usize {
    self.rows.iter().filter(|r| r.logged.is_some()).count()
  }

  pub fn snapshot(&self) -> SessionSnapshot {
    SessionSnapshot {
      state: self.state.clone(),
      rows: self.rows.clone(),
      pr_trigger: self.pr_trigger,
    }
  }

  /// -------------------------------------------------------------------------
  /// Transitions
  /// -------------------------------------------------------------------------

  /// Append a pending row for an exercise. Never creates a session.
  pub fn add_exercise(&mut self, exercise: Exercise) -> Result<usize, SessionError> {
    if self.is_finished() {
      return Err(SessionError::AlreadyFinished);
    }
    self.rows.push(SetRow::pending(exercise));
    Ok(self.rows.len() - 1)
  }

  /// Update the raw inputs of a pending row.
  pub fn set_input(
    &mut self,
    index: usize,
    weight: String,
    reps: String,
  ) -> Result<(), SessionError> {
    if self.is_finished() {
      return Err(SessionError::AlreadyFinished);
    }
    let row = self
      .rows
      .get_mut(index)
      .ok_or(SessionError::RowNotFound(index))?;
    if row.logged.is_some() {
      return Err(SessionError::AlreadyLogged);
    }
    row.weight = weight;
    row.reps = reps;
    Ok(())
  }

  /// Validate a row's inputs and compute its set number. Rejects invalid
  /// weight/reps locally, with no state change and nothing sent to the
  /// server. The caller submits the result and reports back via
  /// `mark_logged`.
  pub fn prepare_log(&self, index: usize) -> Result<PendingSet, SessionError> {
    if self.is_finished() {
      return Err(SessionError::AlreadyFinished);
    }
    let row = self.rows.get(index).ok_or(SessionError::RowNotFound(index))?;
    if row.logged.is_some() {
      return Err(SessionError::AlreadyLogged);
    }

    let weight_kg: f64 = row
      .weight
      .trim()
      .parse()
      .map_err(|_| SessionError::InvalidInput)?;
    let reps: i64 = row
      .reps
      .trim()
      .parse()
      .map_err(|_| SessionError::InvalidInput)?;
    if !weight_kg.is_finite() || weight_kg <= 0.0 || reps <= 0 {
      return Err(SessionError::InvalidInput);
    }

    Ok(PendingSet {
      exercise_id: row.exercise.id.clone(),
      weight_kg,
      reps,
      set_number: self.set_number_for(index),
    })
  }

  /// 1 + count of logged rows for the same exercise at positions up to and
  /// including `index`. Pending rows do not count, so retries are stable.
  fn set_number_for(&self, index: usize) -> i64 {
    let exercise_id = &self.rows[index].exercise.id;
    let prior = self.rows[..=index]
      .iter()
      .filter(|r| r.exercise.id == *exercise_id && r.logged.is_some())
      .count() as i64;
    prior + 1
  }

  /// Attach the lazily created session record. First call transitions
  /// Empty -> Active; an identity attached earlier is kept, so the record
  /// is created at most once per logging instance.
  pub fn attach_session(&mut self, session: WorkoutSession) {
    if matches!(self.state, SessionState::Empty) {
      self.state = SessionState::Active { session };
    }
  }

  /// Record the server echo for a submitted row. Bumps the PR trigger when
  /// the server flagged the set as a personal record.
  pub fn mark_logged(&mut self, index: usize, set: SessionSet) -> Result<bool, SessionError> {
    let row = self
      .rows
      .get_mut(index)
      .ok_or(SessionError::RowNotFound(index))?;
    let is_pr = set.is_pr;
    row.logged = Some(set);
    if is_pr {
      self.pr_trigger += 1;
    }
    Ok(is_pr)
  }

  /// Check that the session can be finished and return its identity.
  pub fn ensure_finishable(&self) -> Result<&str, SessionError> {
    match &self.state {
      SessionState::Finished { .. } => Err(SessionError::AlreadyFinished),
      SessionState::Empty => Err(SessionError::NothingLogged),
      SessionState::Active { session } => {
        if self.logged_count() == 0 {
          return Err(SessionError::NothingLogged);
        }
        Ok(session.id.as_str())
      }
    }
  }

  /// Transition to the terminal state with the server summary. Bumps the PR
  /// trigger once more to catch records confirmed only at completion.
  pub fn finish(&mut self, summary: WorkoutSession) {
    self.state = SessionState::Finished { summary };
    self.pr_trigger += 1;
  }
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
