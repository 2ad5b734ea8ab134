//! Commands for logging sessions and planning the next one

use chrono::{DateTime, Duration, Utc};

use crate::db::{AppState, StoreError, TrainingStore};
use crate::models::ExerciseHistoryRecord;
use crate::progression::{decide_next_session, NextSessionTarget};

/// Append a completed session for one exercise
pub async fn log_exercise_session(
    state: &AppState,
    user_id: &str,
    record: &ExerciseHistoryRecord,
) -> Result<(), StoreError> {
    if record.sets.is_empty() {
        return Err(StoreError::InvalidData(format!(
            "session for {} has no sets",
            record.exercise_name
        )));
    }
    state.store().append_exercise_history(user_id, record).await
}

/// Load and rep target for the next session of `exercise_name`
pub async fn next_session_target(
    state: &AppState,
    user_id: &str,
    exercise_name: &str,
    rep_range: (u32, u32),
    now: DateTime<Utc>,
) -> Result<NextSessionTarget, StoreError> {
    let since = now - Duration::days(i64::from(state.config.history_window_days));
    let history = state.store().load_exercise_history(user_id, since).await?;
    Ok(decide_next_session(exercise_name, &history, rep_range))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing::test_state;
    use crate::progression::ProgressionDecision;
    use crate::test_utils::*;
    use serial_test::serial;

    #[tokio::test]
    #[serial]
    async fn test_logged_sessions_drive_next_target() {
        // Arrange
        let state = test_state().await;
        log_exercise_session(&state, "u1", &mock_history("Barbell Row", 4, vec![(60.0, 10), (60.0, 9)]))
            .await
            .unwrap();
        log_exercise_session(&state, "u1", &mock_history("Barbell Row", 1, vec![(60.0, 12), (60.0, 12)]))
            .await
            .unwrap();

        // Act
        let next = next_session_target(&state, "u1", "Barbell Row", (8, 12), datetime_now())
            .await
            .unwrap();

        // Assert: the latest session topped out the range
        assert_eq!(next.decision, ProgressionDecision::IncreaseLoad);
        assert_eq!(next.weight, Some(62.5));

        teardown_test_db(state.db).await;
    }

    #[tokio::test]
    #[serial]
    async fn test_sessions_outside_window_are_ignored() {
        let state = test_state().await;
        log_exercise_session(&state, "u1", &mock_history("Barbell Row", 90, vec![(60.0, 12)]))
            .await
            .unwrap();

        let next = next_session_target(&state, "u1", "Barbell Row", (8, 12), datetime_now())
            .await
            .unwrap();
        assert_eq!(next.decision, ProgressionDecision::NoHistory);

        teardown_test_db(state.db).await;
    }

    #[tokio::test]
    #[serial]
    async fn test_empty_session_is_rejected() {
        let state = test_state().await;
        let result = log_exercise_session(&state, "u1", &mock_history("Barbell Row", 0, vec![])).await;
        assert!(matches!(result, Err(StoreError::InvalidData(_))));
        teardown_test_db(state.db).await;
    }
}
