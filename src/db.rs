//! Persistence boundary
//!
//! The engine reads an immutable snapshot through `TrainingStore` and writes
//! back programs, sessions, calibrations and weekly fatigue logs. Read
//! failures are the caller's to degrade; write failures always propagate.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::Row;
use std::collections::BTreeSet;
use tracing::{debug, info};

use crate::calibration::should_replace_calibration;
use crate::config::EngineConfig;
use crate::models::{
  BodyComposition, Equipment, ExerciseHistoryRecord, MuscleGroup, SetLog,
  StrengthCalibrationRecord, UserTrainingProfile, WeeklyFatigueLog,
};
use crate::program::FullProgramRecommendation;

pub type DbPool = SqlitePool;

/// Application state shared by the command layer
pub struct AppState {
  pub db: DbPool,
  pub config: EngineConfig,
}

impl AppState {
  pub fn store(&self) -> SqliteStore {
    SqliteStore::new(self.db.clone())
  }
}

/// ---------------------------------------------------------------------------
/// Error Handling
/// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error, Serialize)]
#[serde(tag = "type", content = "message")]
pub enum StoreError {
  #[error("Database error: {0}")]
  Database(String),

  #[error("Serialization error: {0}")]
  Serialization(String),

  #[error("Not found: {0}")]
  NotFound(String),

  #[error("Invalid stored data: {0}")]
  InvalidData(String),
}

impl From<sqlx::Error> for StoreError {
  fn from(e: sqlx::Error) -> Self {
    StoreError::Database(e.to_string())
  }
}

impl From<sqlx::migrate::MigrateError> for StoreError {
  fn from(e: sqlx::migrate::MigrateError) -> Self {
    StoreError::Database(format!("Migration failed: {}", e))
  }
}

impl From<serde_json::Error> for StoreError {
  fn from(e: serde_json::Error) -> Self {
    StoreError::Serialization(e.to_string())
  }
}

/// ---------------------------------------------------------------------------
/// Store Interface
/// ---------------------------------------------------------------------------

#[async_trait]
pub trait TrainingStore: Send + Sync {
  async fn load_profile(&self, user_id: &str) -> Result<Option<UserTrainingProfile>, StoreError>;

  async fn load_latest_body_composition(&self, user_id: &str) -> Result<Option<BodyComposition>, StoreError>;

  async fn load_calibrations(&self, user_id: &str) -> Result<Vec<StrengthCalibrationRecord>, StoreError>;

  /// Sessions performed at or after `since`, most recent first
  async fn load_exercise_history(
    &self,
    user_id: &str,
    since: DateTime<Utc>,
  ) -> Result<Vec<ExerciseHistoryRecord>, StoreError>;

  async fn load_injuries(&self, user_id: &str) -> Result<BTreeSet<MuscleGroup>, StoreError>;

  /// Most recent week first
  async fn load_weekly_fatigue_logs(&self, mesocycle_id: i64, limit: u32) -> Result<Vec<WeeklyFatigueLog>, StoreError>;

  async fn save_profile(&self, profile: &UserTrainingProfile) -> Result<(), StoreError>;

  async fn save_body_composition(&self, user_id: &str, body: &BodyComposition) -> Result<(), StoreError>;

  async fn record_injury(&self, user_id: &str, muscle: MuscleGroup) -> Result<(), StoreError>;

  /// Writes the mesocycle and all of its exercise blocks, or nothing
  async fn save_mesocycle(&self, program: &FullProgramRecommendation) -> Result<i64, StoreError>;

  async fn append_exercise_history(&self, user_id: &str, record: &ExerciseHistoryRecord) -> Result<(), StoreError>;

  /// Stores the record only if it beats the prior best e1RM by more than 2%
  async fn upsert_calibration(&self, user_id: &str, record: &StrengthCalibrationRecord) -> Result<bool, StoreError>;

  async fn append_weekly_fatigue_log(&self, log: &WeeklyFatigueLog) -> Result<(), StoreError>;
}

/// ---------------------------------------------------------------------------
/// Row Helpers
/// ---------------------------------------------------------------------------

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, StoreError> {
  DateTime::parse_from_rfc3339(raw)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| StoreError::InvalidData(format!("bad timestamp '{}': {}", raw, e)))
}

fn parse_text<T: std::str::FromStr<Err = String>>(raw: &str) -> Result<T, StoreError> {
  raw.parse().map_err(StoreError::InvalidData)
}

fn get_u32(row: &SqliteRow, column: &str) -> u32 {
  row.get::<i64, _>(column).clamp(0, i64::from(u32::MAX)) as u32
}

fn get_u8(row: &SqliteRow, column: &str) -> u8 {
  row.get::<i64, _>(column).clamp(0, i64::from(u8::MAX)) as u8
}

fn fatigue_log_from_row(row: &SqliteRow) -> Result<WeeklyFatigueLog, StoreError> {
  let logged_at: String = row.get("logged_at");
  Ok(WeeklyFatigueLog {
    mesocycle_id: row.get("mesocycle_id"),
    week_number: get_u32(row, "week_number"),
    perceived_fatigue: get_u8(row, "perceived_fatigue"),
    sleep_quality: get_u8(row, "sleep_quality"),
    motivation: get_u8(row, "motivation"),
    missed_reps: get_u32(row, "missed_reps"),
    strength_decline: row.get("strength_decline"),
    joint_pain: row.get("joint_pain"),
    logged_at: parse_timestamp(&logged_at)?,
  })
}

/// ---------------------------------------------------------------------------
/// SQLite Store
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct SqliteStore {
  pool: DbPool,
}

impl SqliteStore {
  pub fn new(pool: DbPool) -> Self {
    Self { pool }
  }

  pub fn pool(&self) -> &DbPool {
    &self.pool
  }
}

#[async_trait]
impl TrainingStore for SqliteStore {
  async fn load_profile(&self, user_id: &str) -> Result<Option<UserTrainingProfile>, StoreError> {
    let row = sqlx::query(
      r#"
      SELECT user_id, age, sex, experience, goal, sleep_quality, stress_level,
             training_age_years, days_per_week, available_equipment_json
      FROM training_profiles
      WHERE user_id = ?
      "#,
    )
    .bind(user_id)
    .fetch_optional(&self.pool)
    .await?;

    let Some(row) = row else {
      return Ok(None);
    };

    let sex: String = row.get("sex");
    let experience: String = row.get("experience");
    let goal: String = row.get("goal");
    let equipment_json: String = row.get("available_equipment_json");
    let available_equipment: BTreeSet<Equipment> = serde_json::from_str(&equipment_json)?;

    Ok(Some(UserTrainingProfile {
      user_id: row.get("user_id"),
      age: get_u32(&row, "age"),
      sex: parse_text(&sex)?,
      experience: parse_text(&experience)?,
      goal: parse_text(&goal)?,
      sleep_quality: get_u8(&row, "sleep_quality"),
      stress_level: get_u8(&row, "stress_level"),
      training_age_years: row.get("training_age_years"),
      days_per_week: get_u8(&row, "days_per_week"),
      available_equipment,
      injured_muscles: BTreeSet::new(),
    }))
  }

  async fn load_latest_body_composition(&self, user_id: &str) -> Result<Option<BodyComposition>, StoreError> {
    let row = sqlx::query(
      r#"
      SELECT weight_kg, height_cm, body_fat_pct, measured_at
      FROM body_compositions
      WHERE user_id = ?
      ORDER BY measured_at DESC
      LIMIT 1
      "#,
    )
    .bind(user_id)
    .fetch_optional(&self.pool)
    .await?;

    row
      .map(|row| {
        let measured_at: String = row.get("measured_at");
        Ok(BodyComposition {
          weight_kg: row.get("weight_kg"),
          height_cm: row.get("height_cm"),
          body_fat_pct: row.get("body_fat_pct"),
          measured_at: parse_timestamp(&measured_at)?,
        })
      })
      .transpose()
  }

  async fn load_calibrations(&self, user_id: &str) -> Result<Vec<StrengthCalibrationRecord>, StoreError> {
    let rows = sqlx::query(
      r#"
      SELECT exercise_name, tested_weight, tested_reps, tested_rpe, estimated_1rm,
             confidence, percentile, tested_at
      FROM strength_calibrations
      WHERE user_id = ?
      ORDER BY tested_at DESC
      "#,
    )
    .bind(user_id)
    .fetch_all(&self.pool)
    .await?;

    rows
      .iter()
      .map(|row| {
        let confidence: String = row.get("confidence");
        let tested_at: String = row.get("tested_at");
        Ok(StrengthCalibrationRecord {
          exercise_name: row.get("exercise_name"),
          tested_weight: row.get("tested_weight"),
          tested_reps: get_u32(row, "tested_reps"),
          tested_rpe: row.get("tested_rpe"),
          estimated_1rm: row.get("estimated_1rm"),
          confidence: parse_text(&confidence)?,
          percentile: row.get("percentile"),
          tested_at: parse_timestamp(&tested_at)?,
        })
      })
      .collect()
  }

  async fn load_exercise_history(
    &self,
    user_id: &str,
    since: DateTime<Utc>,
  ) -> Result<Vec<ExerciseHistoryRecord>, StoreError> {
    let rows = sqlx::query(
      r#"
      SELECT exercise_name, performed_at, sets_json
      FROM exercise_history
      WHERE user_id = ? AND performed_at >= ?
      ORDER BY performed_at DESC
      "#,
    )
    .bind(user_id)
    .bind(since.to_rfc3339())
    .fetch_all(&self.pool)
    .await?;

    rows
      .iter()
      .map(|row| {
        let performed_at: String = row.get("performed_at");
        let sets_json: String = row.get("sets_json");
        let sets: Vec<SetLog> = serde_json::from_str(&sets_json)?;
        Ok(ExerciseHistoryRecord {
          exercise_name: row.get("exercise_name"),
          performed_at: parse_timestamp(&performed_at)?,
          sets,
        })
      })
      .collect()
  }

  async fn load_injuries(&self, user_id: &str) -> Result<BTreeSet<MuscleGroup>, StoreError> {
    let muscles: Vec<String> = sqlx::query_scalar("SELECT muscle FROM injuries WHERE user_id = ? AND active = 1")
      .bind(user_id)
      .fetch_all(&self.pool)
      .await?;

    muscles.iter().map(|m| parse_text(m)).collect()
  }

  async fn load_weekly_fatigue_logs(&self, mesocycle_id: i64, limit: u32) -> Result<Vec<WeeklyFatigueLog>, StoreError> {
    let rows = sqlx::query(
      r#"
      SELECT mesocycle_id, week_number, perceived_fatigue, sleep_quality, motivation,
             missed_reps, strength_decline, joint_pain, logged_at
      FROM weekly_fatigue_logs
      WHERE mesocycle_id = ?
      ORDER BY week_number DESC, logged_at DESC
      LIMIT ?
      "#,
    )
    .bind(mesocycle_id)
    .bind(i64::from(limit))
    .fetch_all(&self.pool)
    .await?;

    rows.iter().map(fatigue_log_from_row).collect()
  }

  async fn save_profile(&self, profile: &UserTrainingProfile) -> Result<(), StoreError> {
    let equipment_json = serde_json::to_string(&profile.available_equipment)?;

    sqlx::query(
      r#"
      INSERT INTO training_profiles (
        user_id, age, sex, experience, goal, sleep_quality, stress_level,
        training_age_years, days_per_week, available_equipment_json, updated_at
      )
      VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
      ON CONFLICT(user_id) DO UPDATE SET
        age = excluded.age,
        sex = excluded.sex,
        experience = excluded.experience,
        goal = excluded.goal,
        sleep_quality = excluded.sleep_quality,
        stress_level = excluded.stress_level,
        training_age_years = excluded.training_age_years,
        days_per_week = excluded.days_per_week,
        available_equipment_json = excluded.available_equipment_json,
        updated_at = excluded.updated_at
      "#,
    )
    .bind(&profile.user_id)
    .bind(i64::from(profile.age))
    .bind(profile.sex.to_string())
    .bind(profile.experience.to_string())
    .bind(profile.goal.to_string())
    .bind(i64::from(profile.sleep_quality))
    .bind(i64::from(profile.stress_level))
    .bind(profile.training_age_years)
    .bind(i64::from(profile.days_per_week))
    .bind(&equipment_json)
    .bind(Utc::now().to_rfc3339())
    .execute(&self.pool)
    .await?;

    Ok(())
  }

  async fn save_body_composition(&self, user_id: &str, body: &BodyComposition) -> Result<(), StoreError> {
    sqlx::query(
      r#"
      INSERT INTO body_compositions (user_id, weight_kg, height_cm, body_fat_pct, measured_at)
      VALUES (?, ?, ?, ?, ?)
      "#,
    )
    .bind(user_id)
    .bind(body.weight_kg)
    .bind(body.height_cm)
    .bind(body.body_fat_pct)
    .bind(body.measured_at.to_rfc3339())
    .execute(&self.pool)
    .await?;

    Ok(())
  }

  async fn record_injury(&self, user_id: &str, muscle: MuscleGroup) -> Result<(), StoreError> {
    sqlx::query("INSERT INTO injuries (user_id, muscle, active, reported_at) VALUES (?, ?, 1, ?)")
      .bind(user_id)
      .bind(muscle.as_str())
      .bind(Utc::now().to_rfc3339())
      .execute(&self.pool)
      .await?;

    Ok(())
  }

  async fn save_mesocycle(&self, program: &FullProgramRecommendation) -> Result<i64, StoreError> {
    let program_json = serde_json::to_string(program)?;
    let mut tx = self.pool.begin().await?;

    let mesocycle_id = sqlx::query(
      r#"
      INSERT INTO mesocycles (
        user_id, start_date, split_name, periodization_model, length_weeks, program_json, created_at
      )
      VALUES (?, ?, ?, ?, ?, ?, ?)
      "#,
    )
    .bind(&program.user_id)
    .bind(program.start_date.to_string())
    .bind(&program.split_name)
    .bind(program.periodization.model.as_str())
    .bind(i64::from(program.mesocycle_length_weeks()))
    .bind(&program_json)
    .bind(Utc::now().to_rfc3339())
    .execute(&mut *tx)
    .await?
    .last_insert_rowid();

    let mut blocks = 0usize;
    for week in &program.weeks {
      for session in &week.sessions {
        for (position, exercise) in session.exercises.iter().enumerate() {
          sqlx::query(
            r#"
            INSERT INTO mesocycle_exercises (
              mesocycle_id, week_number, session_date, session_label, position,
              exercise_name, sets, min_reps, max_reps, target_rir, target_weight
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
          )
          .bind(mesocycle_id)
          .bind(i64::from(week.week_number))
          .bind(session.date.to_string())
          .bind(&session.label)
          .bind(position as i64)
          .bind(&exercise.exercise_name)
          .bind(i64::from(exercise.sets))
          .bind(i64::from(exercise.rep_range.min_reps))
          .bind(i64::from(exercise.rep_range.max_reps))
          .bind(i64::from(exercise.rep_range.target_rir))
          .bind(exercise.target_weight)
          .execute(&mut *tx)
          .await?;
          blocks += 1;
        }
      }
    }

    tx.commit().await?;

    info!(
      mesocycle_id,
      user_id = %program.user_id,
      exercise_blocks = blocks,
      "mesocycle saved"
    );

    Ok(mesocycle_id)
  }

  async fn append_exercise_history(&self, user_id: &str, record: &ExerciseHistoryRecord) -> Result<(), StoreError> {
    let sets_json = serde_json::to_string(&record.sets)?;

    sqlx::query(
      r#"
      INSERT INTO exercise_history (user_id, exercise_name, performed_at, sets_json)
      VALUES (?, ?, ?, ?)
      "#,
    )
    .bind(user_id)
    .bind(&record.exercise_name)
    .bind(record.performed_at.to_rfc3339())
    .bind(&sets_json)
    .execute(&self.pool)
    .await?;

    Ok(())
  }

  async fn upsert_calibration(&self, user_id: &str, record: &StrengthCalibrationRecord) -> Result<bool, StoreError> {
    let prior_best: Option<f64> = sqlx::query_scalar(
      "SELECT MAX(estimated_1rm) FROM strength_calibrations WHERE user_id = ? AND exercise_name = ?",
    )
    .bind(user_id)
    .bind(&record.exercise_name)
    .fetch_one(&self.pool)
    .await?;

    if !should_replace_calibration(prior_best, record.estimated_1rm) {
      debug!(
        exercise = %record.exercise_name,
        e1rm = record.estimated_1rm,
        prior_best,
        "calibration not a meaningful improvement; kept prior record"
      );
      return Ok(false);
    }

    sqlx::query(
      r#"
      INSERT INTO strength_calibrations (
        user_id, exercise_name, tested_weight, tested_reps, tested_rpe,
        estimated_1rm, confidence, percentile, tested_at
      )
      VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
      "#,
    )
    .bind(user_id)
    .bind(&record.exercise_name)
    .bind(record.tested_weight)
    .bind(i64::from(record.tested_reps))
    .bind(record.tested_rpe)
    .bind(record.estimated_1rm)
    .bind(record.confidence.to_string())
    .bind(record.percentile)
    .bind(record.tested_at.to_rfc3339())
    .execute(&self.pool)
    .await?;

    Ok(true)
  }

  async fn append_weekly_fatigue_log(&self, log: &WeeklyFatigueLog) -> Result<(), StoreError> {
    sqlx::query(
      r#"
      INSERT INTO weekly_fatigue_logs (
        mesocycle_id, week_number, perceived_fatigue, sleep_quality, motivation,
        missed_reps, strength_decline, joint_pain, logged_at
      )
      VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
      "#,
    )
    .bind(log.mesocycle_id)
    .bind(i64::from(log.week_number))
    .bind(i64::from(log.perceived_fatigue))
    .bind(i64::from(log.sleep_quality))
    .bind(i64::from(log.motivation))
    .bind(i64::from(log.missed_reps))
    .bind(log.strength_decline)
    .bind(log.joint_pain)
    .bind(log.logged_at.to_rfc3339())
    .execute(&self.pool)
    .await?;

    Ok(())
  }
}

/// ---------------------------------------------------------------------------
/// Initialization
/// ---------------------------------------------------------------------------

/// Initialize the database connection pool and run migrations
pub async fn initialize_db(config: &EngineConfig) -> Result<DbPool, StoreError> {
  info!(url = %config.database_url, "initializing database");

  let pool = SqlitePoolOptions::new()
    .max_connections(config.max_connections)
    .connect(&config.database_url)
    .await?;

  sqlx::migrate!("./migrations").run(&pool).await?;

  info!("database initialized");

  Ok(pool)
}

/// Start date of a stored mesocycle
pub async fn load_mesocycle_start(pool: &DbPool, mesocycle_id: i64) -> Result<NaiveDate, StoreError> {
  let raw: Option<String> = sqlx::query_scalar("SELECT start_date FROM mesocycles WHERE id = ?")
    .bind(mesocycle_id)
    .fetch_optional(pool)
    .await?;

  let raw = raw.ok_or_else(|| StoreError::NotFound(format!("mesocycle {}", mesocycle_id)))?;
  raw
    .parse::<NaiveDate>()
    .map_err(|e| StoreError::InvalidData(format!("bad start date '{}': {}", raw, e)))
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
