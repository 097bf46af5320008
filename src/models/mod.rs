pub mod workout;

pub use workout::{
  DataEnvelope, Exercise, PersonalRecord, PlanCreate, SessionCreate, SessionSet, SetCreate,
  WorkoutPlan, WorkoutSession,
};
