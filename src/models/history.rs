use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
  Low,
  Medium,
  High,
}

impl std::fmt::Display for Confidence {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Self::Low => write!(f, "low"),
      Self::Medium => write!(f, "medium"),
      Self::High => write!(f, "high"),
    }
  }
}

impl std::str::FromStr for Confidence {
  type Err = String;
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "low" => Ok(Self::Low),
      "medium" => Ok(Self::Medium),
      "high" => Ok(Self::High),
      _ => Err(format!("Unknown confidence: {}", s)),
    }
  }
}

/// ---------------------------------------------------------------------------
/// Strength Calibration
/// ---------------------------------------------------------------------------

/// One calibration test. Superseded by later tests only on a meaningful e1RM gain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrengthCalibrationRecord {
  pub exercise_name: String,
  pub tested_weight: f64,
  pub tested_reps: u32,
  pub tested_rpe: Option<f64>,
  pub estimated_1rm: f64,
  pub confidence: Confidence,
  /// Population percentile (0-100) when body composition was known
  pub percentile: Option<f64>,
  pub tested_at: DateTime<Utc>,
}

/// ---------------------------------------------------------------------------
/// Exercise History
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetLog {
  pub weight: f64,
  pub reps: u32,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub rpe: Option<f64>,
  pub completed: bool,
}

/// One session's worth of sets for a single exercise (append-only)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExerciseHistoryRecord {
  pub exercise_name: String,
  pub performed_at: DateTime<Utc>,
  pub sets: Vec<SetLog>,
}

impl ExerciseHistoryRecord {
  pub fn completed_sets(&self) -> impl Iterator<Item = &SetLog> {
    self.sets.iter().filter(|s| s.completed)
  }
}

/// ---------------------------------------------------------------------------
/// Weekly Fatigue Log
/// ---------------------------------------------------------------------------

/// One row per mesocycle week; scales are 1-5
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeeklyFatigueLog {
  pub mesocycle_id: i64,
  pub week_number: u32,
  pub perceived_fatigue: u8,
  pub sleep_quality: u8,
  pub motivation: u8,
  pub missed_reps: u32,
  pub strength_decline: bool,
  pub joint_pain: bool,
  pub logged_at: DateTime<Utc>,
}
