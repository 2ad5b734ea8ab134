//! Commands for generating and persisting mesocycles

use chrono::{DateTime, Utc};

use crate::db::{AppState, StoreError, TrainingStore};
use crate::program::{generate_program, FullProgramRecommendation};
use crate::snapshot::TrainingSnapshot;

/// Build a program from the user's current snapshot without saving it
pub async fn generate_program_for_user(
  state: &AppState,
  user_id: &str,
  now: DateTime<Utc>,
) -> Result<FullProgramRecommendation, StoreError> {
  let store = state.store();
  let snapshot = TrainingSnapshot::load(&store, user_id, now, state.config.history_window_days).await;
  Ok(generate_program(&snapshot, now.date_naive()))
}

/// Persist a generated program; returns the mesocycle id
pub async fn save_program(state: &AppState, program: &FullProgramRecommendation) -> Result<i64, StoreError> {
  state.store().save_mesocycle(program).await
}

pub async fn generate_and_save_program(
  state: &AppState,
  user_id: &str,
  now: DateTime<Utc>,
) -> Result<(i64, FullProgramRecommendation), StoreError> {
  let program = generate_program_for_user(state, user_id, now).await?;
  let mesocycle_id = save_program(state, &program).await?;
  Ok((mesocycle_id, program))
}
