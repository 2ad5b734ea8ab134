//! Test utilities and helpers for unit testing
//!
//! This module provides common test infrastructure including:
//! - Database setup/teardown and seeders
//! - Mock data factories
//! - Helper assertions

use chrono::{DateTime, Duration, TimeZone, Utc};
use sqlx::SqlitePool;

use crate::catalog::ExerciseCatalog;
use crate::db::{SqliteStore, TrainingStore};
use crate::models::{
  BodyComposition, Confidence, ExerciseHistoryRecord, SetLog, StrengthCalibrationRecord,
  UserTrainingProfile, WeeklyFatigueLog,
};
use crate::snapshot::TrainingSnapshot;

/// ---------------------------------------------------------------------------
/// Database Test Utilities
/// ---------------------------------------------------------------------------

/// Create an in-memory SQLite database for testing
/// Runs all migrations and returns a ready-to-use pool
///
/// Uses max_connections(1) to prevent multiple pool connections from creating
/// isolated in-memory databases, which would cause intermittent test failures
pub async fn setup_test_db() -> SqlitePool {
  let pool = sqlx::sqlite::SqlitePoolOptions::new()
    .max_connections(1)
    .connect("sqlite::memory:")
    .await
    .expect("Failed to create in-memory database");

  sqlx::migrate!("./migrations")
    .run(&pool)
    .await
    .expect("Failed to run migrations");

  pool
}

/// Close a test database pool
pub async fn teardown_test_db(pool: SqlitePool) {
  pool.close().await;
}

/// Store a profile through the real store
pub async fn seed_test_profile(pool: &SqlitePool, profile: &UserTrainingProfile) {
  SqliteStore::new(pool.clone())
    .save_profile(profile)
    .await
    .expect("Failed to seed profile");
}

/// Insert a bare mesocycle row so fatigue logs have something to reference
pub async fn seed_test_mesocycle(pool: &SqlitePool, user_id: &str) -> i64 {
  sqlx::query(
    r#"
    INSERT INTO mesocycles (
      user_id, start_date, split_name, periodization_model, length_weeks, program_json, created_at
    )
    VALUES (?, '2024-03-11', 'Full Body', 'linear', 5, '{}', ?)
    "#,
  )
  .bind(user_id)
  .bind(Utc::now().to_rfc3339())
  .execute(pool)
  .await
  .expect("Failed to seed mesocycle")
  .last_insert_rowid()
}

/// ---------------------------------------------------------------------------
/// Mock Data Factories
/// ---------------------------------------------------------------------------

pub fn mock_body(weight: f64, height: f64, bf: f64) -> BodyComposition {
  BodyComposition {
    weight_kg: weight,
    height_cm: height,
    body_fat_pct: bf,
    measured_at: Utc::now(),
  }
}

/// Calibration whose tested set is a single rep at the given e1RM
pub fn mock_calibration(name: &str, e1rm: f64, confidence: Confidence) -> StrengthCalibrationRecord {
  StrengthCalibrationRecord {
    exercise_name: name.to_string(),
    tested_weight: e1rm,
    tested_reps: 1,
    tested_rpe: None,
    estimated_1rm: e1rm,
    confidence,
    percentile: None,
    tested_at: Utc::now(),
  }
}

/// One session of completed `(weight, reps)` sets performed `days_ago`
pub fn mock_history(name: &str, days_ago: i64, sets: Vec<(f64, u32)>) -> ExerciseHistoryRecord {
  ExerciseHistoryRecord {
    exercise_name: name.to_string(),
    performed_at: datetime_days_ago(days_ago),
    sets: sets
      .into_iter()
      .map(|(weight, reps)| SetLog {
        weight,
        reps,
        rpe: None,
        completed: true,
      })
      .collect(),
  }
}

/// Neutral weekly log; later weeks are logged later
pub fn mock_fatigue_log(week: u32, fatigue: u8) -> WeeklyFatigueLog {
  let base = Utc
    .with_ymd_and_hms(2024, 3, 3, 18, 0, 0)
    .single()
    .expect("valid base timestamp");
  WeeklyFatigueLog {
    mesocycle_id: 1,
    week_number: week,
    perceived_fatigue: fatigue,
    sleep_quality: 3,
    motivation: 4,
    missed_reps: 0,
    strength_decline: false,
    joint_pain: false,
    logged_at: base + Duration::weeks(i64::from(week)),
  }
}

/// Snapshot with the builtin catalog and no stored data
pub fn mock_snapshot(profile: UserTrainingProfile) -> TrainingSnapshot {
  TrainingSnapshot {
    profile,
    body: None,
    calibrations: Vec::new(),
    history: Vec::new(),
    catalog: ExerciseCatalog::builtin(),
  }
}

/// ---------------------------------------------------------------------------
/// Time Helpers
/// ---------------------------------------------------------------------------

/// Create a DateTime N days ago from now
pub fn datetime_days_ago(days: i64) -> DateTime<Utc> {
  Utc::now() - Duration::days(days)
}

/// Create a DateTime representing now
pub fn datetime_now() -> DateTime<Utc> {
  Utc::now()
}

/// ---------------------------------------------------------------------------
/// Test Macros
/// ---------------------------------------------------------------------------

/// Assert two floats are approximately equal within a tolerance
#[macro_export]
macro_rules! assert_approx_eq {
  ($left:expr, $right:expr, $tolerance:expr) => {
    let diff = ($left - $right).abs();
    assert!(
      diff < $tolerance,
      "Values not approximately equal: {} vs {} (diff: {}, tolerance: {})",
      $left,
      $right,
      diff,
      $tolerance
    );
  };
}

/// ---------------------------------------------------------------------------
/// Tests for Test Utilities
/// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use super::*;

  #[tokio::test]
  async fn test_setup_db_creates_schema() {
    let pool = setup_test_db().await;

    let tables: Vec<(String,)> = sqlx::query_as(
      "SELECT name FROM sqlite_master WHERE type='table' AND name IN ('training_profiles', 'mesocycles', 'mesocycle_exercises', 'weekly_fatigue_logs')"
    )
    .fetch_all(&pool)
    .await
    .expect("Failed to query tables");

    assert_eq!(tables.len(), 4, "Expected 4 tables, got {}", tables.len());

    teardown_test_db(pool).await;
  }

  #[tokio::test]
  async fn test_seed_mesocycle_returns_row_id() {
    let pool = setup_test_db().await;

    let first = seed_test_mesocycle(&pool, "u1").await;
    let second = seed_test_mesocycle(&pool, "u1").await;
    assert!(second > first);

    teardown_test_db(pool).await;
  }

  #[test]
  fn test_mock_history_sets_are_completed() {
    let record = mock_history("Barbell Row", 3, vec![(60.0, 10), (60.0, 9)]);
    assert_eq!(record.completed_sets().count(), 2);
    assert!(record.performed_at < datetime_now());
  }

  #[test]
  fn test_mock_fatigue_logs_are_ordered_by_week() {
    assert!(mock_fatigue_log(2, 3).logged_at > mock_fatigue_log(1, 3).logged_at);
  }

  #[test]
  fn test_assert_approx_eq_macro() {
    assert_approx_eq!(1.0_f64, 1.0001_f64, 0.001);
  }
}
