//! Commands for weekly fatigue logging and deload checks

use chrono::{DateTime, Utc};

use crate::db::{AppState, StoreError, TrainingStore};
use crate::deload::{evaluate_deload, DeloadTriggers};
use crate::models::{ExperienceLevel, WeeklyFatigueLog};

/// Append one week's log; a second log for the same week is rejected
pub async fn log_weekly_fatigue(state: &AppState, log: &WeeklyFatigueLog) -> Result<(), StoreError> {
  state.store().append_weekly_fatigue_log(log).await
}

/// Evaluate the two most recent logs of a mesocycle
pub async fn check_deload(
  state: &AppState,
  user_id: &str,
  mesocycle_id: i64,
  now: DateTime<Utc>,
) -> Result<DeloadTriggers, StoreError> {
  let store = state.store();
  let logs = store.load_weekly_fatigue_logs(mesocycle_id, 2).await?;
  let experience = store
    .load_profile(user_id)
    .await?
    .map(|p| p.experience)
    .unwrap_or(ExperienceLevel::Novice);

  Ok(evaluate_deload(&logs, experience, now.date_naive()))
}
