//! Turning a tested set into a calibration record, and deciding whether a
//! new test supersedes the stored one.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{BodyComposition, Confidence, Sex, StrengthCalibrationRecord};
use crate::strength::{estimate_1rm, strength_percentile};

/// New e1RM must beat the prior best by more than this fraction
pub const MEANINGFUL_IMPROVEMENT: f64 = 0.02;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalibrationTest {
  pub exercise_name: String,
  pub weight: f64,
  pub reps: u32,
  pub rpe: Option<f64>,
}

/// Low-rep sets with a reported RPE predict a max best; high-rep sets worst
pub fn calibration_confidence(reps: u32, rpe: Option<f64>) -> Confidence {
  match (reps, rpe) {
    (0..=5, Some(_)) => Confidence::High,
    (0..=10, _) => Confidence::Medium,
    _ => Confidence::Low,
  }
}

pub fn evaluate_calibration_test(
  test: &CalibrationTest,
  sex: Sex,
  body: Option<&BodyComposition>,
  tested_at: DateTime<Utc>,
) -> StrengthCalibrationRecord {
  let estimated_1rm = estimate_1rm(test.weight, test.reps, test.rpe);
  let percentile =
    body.and_then(|b| strength_percentile(&test.exercise_name, sex, b.weight_kg, estimated_1rm));

  StrengthCalibrationRecord {
    exercise_name: test.exercise_name.clone(),
    tested_weight: test.weight,
    tested_reps: test.reps,
    tested_rpe: test.rpe,
    estimated_1rm,
    confidence: calibration_confidence(test.reps, test.rpe),
    percentile,
    tested_at,
  }
}

/// A test is stored when there is no prior best or it beats it by more than 2%
pub fn should_replace_calibration(prior_best: Option<f64>, new_e1rm: f64) -> bool {
  match prior_best {
    None => new_e1rm > 0.0,
    Some(prior) => new_e1rm > prior * (1.0 + MEANINGFUL_IMPROVEMENT),
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::test_utils::mock_body;

  fn test_set(name: &str, weight: f64, reps: u32, rpe: Option<f64>) -> CalibrationTest {
    CalibrationTest {
      exercise_name: name.to_string(),
      weight,
      reps,
      rpe,
    }
  }

  #[test]
  fn test_confidence_tiers() {
    assert_eq!(calibration_confidence(3, Some(9.0)), Confidence::High);
    assert_eq!(calibration_confidence(3, None), Confidence::Medium);
    assert_eq!(calibration_confidence(8, Some(8.0)), Confidence::Medium);
    assert_eq!(calibration_confidence(15, Some(8.0)), Confidence::Low);
  }

  #[test]
  fn test_evaluate_with_body_composition() {
    let body = mock_body(100.0, 180.0, 15.0);
    let record = evaluate_calibration_test(
      &test_set("Barbell Bench Press", 100.0, 1, Some(10.0)),
      Sex::Male,
      Some(&body),
      Utc::now(),
    );
    assert_eq!(record.estimated_1rm, 100.0);
    assert_eq!(record.confidence, Confidence::High);
    assert_eq!(record.percentile, Some(50.0));
  }

  #[test]
  fn test_percentile_needs_body_and_standard() {
    let record = evaluate_calibration_test(
      &test_set("Barbell Bench Press", 80.0, 5, Some(8.0)),
      Sex::Male,
      None,
      Utc::now(),
    );
    assert!(record.percentile.is_none());
    assert!(record.estimated_1rm > 80.0);

    let body = mock_body(80.0, 180.0, 15.0);
    let record = evaluate_calibration_test(&test_set("Cable Fly", 20.0, 12, None), Sex::Male, Some(&body), Utc::now());
    assert!(record.percentile.is_none());
    assert_eq!(record.confidence, Confidence::Low);
  }

  #[test]
  fn test_replace_only_on_meaningful_gain() {
    assert!(should_replace_calibration(None, 100.0));
    assert!(!should_replace_calibration(Some(100.0), 101.5));
    assert!(!should_replace_calibration(Some(100.0), 102.0));
    assert!(should_replace_calibration(Some(100.0), 102.5));
    assert!(!should_replace_calibration(Some(100.0), 95.0));
  }
}
