//! Recovery profile: how much training volume and frequency a lifter can
//! recover from, and how often they need a planned deload.
//!
//! Adjustments are multiplicative and applied in a fixed order:
//! age bracket -> sleep -> stress -> training age. Inputs are clamped to
//! their documented scales, so there is no failure mode.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::UserTrainingProfile;

const BASE_DELOAD_FREQUENCY_WEEKS: u32 = 5;
const MIN_DELOAD_FREQUENCY_WEEKS: u32 = 3;

const VOLUME_MULTIPLIER_RANGE: (f64, f64) = (0.5, 1.3);
const FREQUENCY_MULTIPLIER_RANGE: (f64, f64) = (0.7, 1.2);

/// Sleep quality 1..=5
const SLEEP_VOLUME_FACTORS: [f64; 5] = [0.70, 0.85, 1.00, 1.05, 1.10];
/// Stress level 1..=5
const STRESS_VOLUME_FACTORS: [f64; 5] = [1.10, 1.05, 1.00, 0.85, 0.75];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecoveryFactors {
  pub volume_multiplier: f64,
  pub frequency_multiplier: f64,
  pub deload_frequency_weeks: u32,
  pub warnings: Vec<String>,
}

pub fn calculate_recovery_factors(profile: &UserTrainingProfile) -> RecoveryFactors {
  let mut volume: f64 = 1.0;
  let mut frequency: f64 = 1.0;
  let mut deload_weeks = BASE_DELOAD_FREQUENCY_WEEKS;
  let mut warnings = Vec::new();

  // Age bracket
  match profile.age {
    a if a < 25 => {
      volume *= 1.05;
      frequency *= 1.05;
      deload_weeks = 6;
    }
    25..=34 => {}
    35..=44 => {
      volume *= 0.95;
      deload_weeks = 5;
    }
    45..=54 => {
      volume *= 0.85;
      frequency *= 0.95;
      deload_weeks = 4;
      warnings.push(
        "Age 45+: prioritise joint care with longer warm-ups and controlled tempos".to_string(),
      );
    }
    _ => {
      volume *= 0.75;
      frequency *= 0.90;
      deload_weeks = 3;
      warnings.push(
        "Age 55+: recovery is the priority - keep most sets shy of failure".to_string(),
      );
    }
  }

  // Sleep
  let sleep = profile.sleep();
  volume *= SLEEP_VOLUME_FACTORS[usize::from(sleep - 1)];
  if sleep <= 2 {
    warnings.push("Poor sleep quality limits recovery - volume reduced".to_string());
  }

  // Stress
  let stress = profile.stress();
  volume *= STRESS_VOLUME_FACTORS[usize::from(stress - 1)];
  if stress >= 4 {
    warnings.push("High life stress detected - volume reduced to protect recovery".to_string());
  }

  // Training age
  if profile.training_age_years < 1.0 {
    volume *= 0.8;
    deload_weeks = 8;
  } else if profile.training_age_years >= 5.0 {
    deload_weeks = deload_weeks.saturating_sub(1);
  }

  // Poor sleep and high stress each pull the next deload one week closer
  if sleep <= 2 {
    deload_weeks = deload_weeks.saturating_sub(1);
  }
  if stress >= 4 {
    deload_weeks = deload_weeks.saturating_sub(1);
  }

  let factors = RecoveryFactors {
    volume_multiplier: volume.clamp(VOLUME_MULTIPLIER_RANGE.0, VOLUME_MULTIPLIER_RANGE.1),
    frequency_multiplier: frequency.clamp(FREQUENCY_MULTIPLIER_RANGE.0, FREQUENCY_MULTIPLIER_RANGE.1),
    deload_frequency_weeks: deload_weeks.max(MIN_DELOAD_FREQUENCY_WEEKS),
    warnings,
  };

  debug!(
    volume = factors.volume_multiplier,
    frequency = factors.frequency_multiplier,
    deload_weeks = factors.deload_frequency_weeks,
    "recovery factors computed"
  );

  factors
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use super::*;
  use crate::models::ExperienceLevel;

  fn profile(age: u32, sleep: u8, stress: u8, training_age: f64) -> UserTrainingProfile {
    UserTrainingProfile {
      age,
      sleep_quality: sleep,
      stress_level: stress,
      training_age_years: training_age,
      experience: ExperienceLevel::Intermediate,
      ..UserTrainingProfile::default()
    }
  }

  #[test]
  fn test_baseline_adult() {
    let factors = calculate_recovery_factors(&profile(30, 3, 3, 2.0));
    crate::assert_approx_eq!(factors.volume_multiplier, 1.0, 1e-9);
    crate::assert_approx_eq!(factors.frequency_multiplier, 1.0, 1e-9);
    assert_eq!(factors.deload_frequency_weeks, 5);
    assert!(factors.warnings.is_empty());
  }

  #[test]
  fn test_young_lifter_recovers_faster() {
    let factors = calculate_recovery_factors(&profile(22, 3, 3, 2.0));
    crate::assert_approx_eq!(factors.volume_multiplier, 1.05, 1e-9);
    crate::assert_approx_eq!(factors.frequency_multiplier, 1.05, 1e-9);
    assert_eq!(factors.deload_frequency_weeks, 6);
  }

  #[test]
  fn test_older_lifter_gets_warnings_and_frequent_deloads() {
    let factors = calculate_recovery_factors(&profile(50, 3, 3, 2.0));
    crate::assert_approx_eq!(factors.volume_multiplier, 0.85, 1e-9);
    crate::assert_approx_eq!(factors.frequency_multiplier, 0.95, 1e-9);
    assert_eq!(factors.deload_frequency_weeks, 4);
    assert_eq!(factors.warnings.len(), 1);

    let factors = calculate_recovery_factors(&profile(60, 3, 3, 2.0));
    crate::assert_approx_eq!(factors.volume_multiplier, 0.75, 1e-9);
    assert_eq!(factors.deload_frequency_weeks, 3);
    assert!(factors.warnings[0].contains("55+"));
  }

  #[test]
  fn test_poor_sleep_and_high_stress_shorten_deload_cadence() {
    let factors = calculate_recovery_factors(&profile(30, 2, 4, 2.0));
    // 0.85 (sleep) * 0.85 (stress)
    crate::assert_approx_eq!(factors.volume_multiplier, 0.7225, 1e-9);
    assert_eq!(factors.deload_frequency_weeks, 3);
    assert_eq!(factors.warnings.len(), 2);
  }

  #[test]
  fn test_deload_cadence_never_below_floor() {
    let factors = calculate_recovery_factors(&profile(60, 1, 5, 10.0));
    assert_eq!(factors.deload_frequency_weeks, 3);
  }

  #[test]
  fn test_new_lifter_deloads_rarely() {
    let factors = calculate_recovery_factors(&profile(30, 3, 3, 0.5));
    assert_eq!(factors.deload_frequency_weeks, 8);
    crate::assert_approx_eq!(factors.volume_multiplier, 0.8, 1e-9);
  }

  #[test]
  fn test_veteran_deloads_one_week_sooner() {
    let factors = calculate_recovery_factors(&profile(30, 3, 3, 6.0));
    assert_eq!(factors.deload_frequency_weeks, 4);
  }

  #[test]
  fn test_multipliers_always_within_clamp_ranges() {
    for age in [18, 24, 30, 40, 50, 60, 75] {
      for sleep in 0..=6 {
        for stress in 0..=6 {
          for training_age in [0.0, 0.5, 2.0, 5.0, 12.0] {
            let f = calculate_recovery_factors(&profile(age, sleep, stress, training_age));
            assert!((0.5..=1.3).contains(&f.volume_multiplier));
            assert!((0.7..=1.2).contains(&f.frequency_multiplier));
            assert!(f.deload_frequency_weeks >= 3);
          }
        }
      }
    }
  }
}
