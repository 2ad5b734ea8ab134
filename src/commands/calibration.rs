//! Command for recording a strength calibration test

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use crate::calibration::{evaluate_calibration_test, CalibrationTest};
use crate::db::{AppState, StoreError, TrainingStore};
use crate::models::{Sex, StrengthCalibrationRecord};

#[derive(Debug, Clone, Serialize)]
pub struct CalibrationOutcome {
  pub record: StrengthCalibrationRecord,
  /// False when the test did not beat the stored best meaningfully
  pub stored: bool,
}

pub async fn record_calibration(
  state: &AppState,
  user_id: &str,
  test: &CalibrationTest,
  tested_at: DateTime<Utc>,
) -> Result<CalibrationOutcome, StoreError> {
  if test.weight <= 0.0 || test.reps == 0 {
    return Err(StoreError::InvalidData(format!(
      "calibration for {} needs a positive weight and at least one rep",
      test.exercise_name
    )));
  }

  let store = state.store();
  let (profile, body) = tokio::join!(store.load_profile(user_id), store.load_latest_body_composition(user_id));
  let sex = profile?.map(|p| p.sex).unwrap_or(Sex::Male);
  let body = body?;

  let record = evaluate_calibration_test(test, sex, body.as_ref(), tested_at);
  let stored = store.upsert_calibration(user_id, &record).await?;

  info!(
    user_id,
    exercise = %record.exercise_name,
    e1rm = record.estimated_1rm,
    stored,
    "calibration recorded"
  );

  Ok(CalibrationOutcome { record, stored })
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::commands::testing::test_state;
  use crate::models::Confidence;
  use crate::test_utils::*;
  use serial_test::serial;

  fn bench(weight: f64, reps: u32) -> CalibrationTest {
    CalibrationTest {
      exercise_name: "Barbell Bench Press".to_string(),
      weight,
      reps,
      rpe: Some(9.0),
    }
  }

  #[tokio::test]
  #[serial]
  async fn test_first_test_is_stored_with_percentile() {
    let state = test_state().await;
    state
      .store()
      .save_body_composition("u1", &mock_body(80.0, 180.0, 15.0))
      .await
      .unwrap();

    let outcome = record_calibration(&state, "u1", &bench(100.0, 5), datetime_now()).await.unwrap();

    assert!(outcome.stored);
    assert_eq!(outcome.record.confidence, Confidence::High);
    assert!(outcome.record.percentile.is_some());
    assert!(outcome.record.estimated_1rm > 100.0);

    teardown_test_db(state.db).await;
  }

  #[tokio::test]
  #[serial]
  async fn test_marginal_retest_keeps_prior_record() {
    let state = test_state().await;

    let first = record_calibration(&state, "u1", &bench(100.0, 5), datetime_now()).await.unwrap();
    let retest = record_calibration(&state, "u1", &bench(100.0, 5), datetime_now()).await.unwrap();
    assert!(first.stored);
    assert!(!retest.stored);

    let better = record_calibration(&state, "u1", &bench(107.5, 5), datetime_now()).await.unwrap();
    assert!(better.stored);

    let count = state.store().load_calibrations("u1").await.unwrap().len();
    assert_eq!(count, 2);

    teardown_test_db(state.db).await;
  }

  #[tokio::test]
  #[serial]
  async fn test_rejects_empty_test() {
    let state = test_state().await;
    let result = record_calibration(&state, "u1", &bench(100.0, 0), datetime_now()).await;
    assert!(matches!(result, Err(StoreError::InvalidData(_))));
    teardown_test_db(state.db).await;
  }
}
