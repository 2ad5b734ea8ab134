//! Early deload detection from the trailing weekly fatigue logs

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::models::{ExperienceLevel, WeeklyFatigueLog};

pub const FATIGUE_REASON: &str = "Perceived fatigue elevated for 2+ weeks";
pub const PERFORMANCE_REASON: &str = "Performance declining (strength loss or missed reps)";
pub const SLEEP_REASON: &str = "Poor sleep for 2+ consecutive weeks";
pub const MOTIVATION_REASON: &str = "Motivation low for 2+ weeks";
pub const JOINT_PAIN_REASON: &str = "Joint pain reported";

const MISSED_REPS_LIMIT: u32 = 5;
const NOVICE_MIN_REASONS: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeloadType {
  Volume,
  Intensity,
  Full,
}

impl std::fmt::Display for DeloadType {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Self::Volume => write!(f, "volume"),
      Self::Intensity => write!(f, "intensity"),
      Self::Full => write!(f, "full"),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeloadPrescription {
  pub deload_type: DeloadType,
  pub volume_modifier: f64,
  pub intensity_modifier: f64,
  pub guidance: String,
}

impl DeloadPrescription {
  pub fn for_type(deload_type: DeloadType) -> Self {
    let (volume_modifier, intensity_modifier, guidance) = match deload_type {
      DeloadType::Volume => (0.5, 0.9, "Halve your sets; keep loads close to normal"),
      DeloadType::Intensity => (0.8, 0.7, "Keep most sets but drop loads to ~70% and stay far from failure"),
      DeloadType::Full => (0.5, 0.6, "Cut both sets and loads; prioritise sleep and easy movement"),
    };
    Self {
      deload_type,
      volume_modifier,
      intensity_modifier,
      guidance: guidance.to_string(),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeloadTriggers {
  pub should_deload: bool,
  pub reasons: Vec<String>,
  /// Type of the last typed trigger that fired
  pub suggested_deload_type: Option<DeloadType>,
  /// Triggers fired but were held back for a novice
  pub suppressed: bool,
  pub suggested_start: Option<NaiveDate>,
  pub prescription: Option<DeloadPrescription>,
}

impl DeloadTriggers {
  fn none() -> Self {
    Self {
      should_deload: false,
      reasons: Vec::new(),
      suggested_deload_type: None,
      suppressed: false,
      suggested_start: None,
      prescription: None,
    }
  }
}

/// First Monday strictly after `today`
pub fn next_monday_after(today: NaiveDate) -> NaiveDate {
  let days_ahead = 7 - i64::from(today.weekday().num_days_from_monday());
  today + Duration::days(days_ahead)
}

/// Evaluates the two most recent weekly logs
///
/// `logs` may arrive in any order. The two highest week numbers are used,
/// with `logged_at` breaking ties.
pub fn evaluate_deload(
  logs: &[WeeklyFatigueLog],
  experience: ExperienceLevel,
  today: NaiveDate,
) -> DeloadTriggers {
  if logs.len() < 2 {
    return DeloadTriggers::none();
  }

  let mut ordered: Vec<&WeeklyFatigueLog> = logs.iter().collect();
  ordered.sort_by(|a, b| (b.week_number, b.logged_at).cmp(&(a.week_number, a.logged_at)));
  let (current, previous) = (ordered[0], ordered[1]);

  let mut reasons = Vec::new();
  let mut deload_type = None;

  if current.perceived_fatigue >= 4 && previous.perceived_fatigue >= 3 {
    reasons.push(FATIGUE_REASON.to_string());
    deload_type = Some(DeloadType::Volume);
  }

  if current.strength_decline || current.missed_reps > MISSED_REPS_LIMIT {
    reasons.push(PERFORMANCE_REASON.to_string());
    deload_type = Some(DeloadType::Intensity);
  }

  if current.sleep_quality <= 2 && previous.sleep_quality <= 2 {
    reasons.push(SLEEP_REASON.to_string());
    deload_type = Some(DeloadType::Full);
  }

  if current.motivation <= 2 && previous.motivation <= 3 {
    reasons.push(MOTIVATION_REASON.to_string());
  }

  if current.joint_pain {
    reasons.push(JOINT_PAIN_REASON.to_string());
    deload_type = Some(DeloadType::Intensity);
  }

  if reasons.is_empty() {
    return DeloadTriggers::none();
  }

  if experience == ExperienceLevel::Novice && reasons.len() < NOVICE_MIN_REASONS {
    info!(reasons = ?reasons, "deload trigger suppressed for novice");
    return DeloadTriggers {
      reasons,
      suggested_deload_type: deload_type,
      suppressed: true,
      ..DeloadTriggers::none()
    };
  }

  info!(reasons = ?reasons, deload_type = ?deload_type, "deload recommended");

  DeloadTriggers {
    should_deload: true,
    reasons,
    suggested_deload_type: deload_type,
    suppressed: false,
    suggested_start: Some(next_monday_after(today)),
    prescription: Some(DeloadPrescription::for_type(deload_type.unwrap_or(DeloadType::Volume))),
  }
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use super::*;
  use crate::test_utils::mock_fatigue_log;

  fn today() -> NaiveDate {
    // Wednesday
    NaiveDate::from_ymd_opt(2024, 3, 13).unwrap()
  }

  #[test]
  fn test_single_log_never_fires() {
    let mut log = mock_fatigue_log(1, 5);
    log.joint_pain = true;
    log.strength_decline = true;
    let triggers = evaluate_deload(&[log], ExperienceLevel::Advanced, today());
    assert!(!triggers.should_deload);
    assert!(triggers.reasons.is_empty());
    assert!(evaluate_deload(&[], ExperienceLevel::Advanced, today()).reasons.is_empty());
  }

  #[test]
  fn test_sustained_fatigue_triggers_volume_deload() {
    let logs = vec![mock_fatigue_log(2, 4), mock_fatigue_log(1, 5)];
    let triggers = evaluate_deload(&logs, ExperienceLevel::Intermediate, today());
    assert!(triggers.should_deload);
    assert!(triggers.reasons.contains(&FATIGUE_REASON.to_string()));
    assert_eq!(triggers.suggested_deload_type, Some(DeloadType::Volume));
    assert_eq!(triggers.suggested_start, NaiveDate::from_ymd_opt(2024, 3, 18));

    let prescription = triggers.prescription.unwrap();
    assert_eq!(prescription.volume_modifier, 0.5);
    assert_eq!(prescription.intensity_modifier, 0.9);
  }

  #[test]
  fn test_logs_are_ordered_by_week() {
    // Previous week first in the slice: 5 then 2 would not fire
    let logs = vec![mock_fatigue_log(1, 5), mock_fatigue_log(2, 2)];
    let triggers = evaluate_deload(&logs, ExperienceLevel::Intermediate, today());
    assert!(!triggers.should_deload);
  }

  #[test]
  fn test_backfilled_week_is_still_previous() {
    // Week 2 entered a day after week 3
    let current = mock_fatigue_log(3, 4);
    let mut previous = mock_fatigue_log(2, 3);
    previous.logged_at = current.logged_at + Duration::days(1);
    let triggers = evaluate_deload(&[current, previous], ExperienceLevel::Intermediate, today());
    assert!(triggers.should_deload);
    assert_eq!(triggers.reasons, vec![FATIGUE_REASON.to_string()]);
  }

  #[test]
  fn test_higher_priority_triggers_override_type() {
    let mut current = mock_fatigue_log(2, 4);
    current.strength_decline = true;
    let logs = vec![current, mock_fatigue_log(1, 4)];
    let triggers = evaluate_deload(&logs, ExperienceLevel::Intermediate, today());
    assert_eq!(triggers.suggested_deload_type, Some(DeloadType::Intensity));
    assert_eq!(triggers.reasons.len(), 2);

    let mut current = mock_fatigue_log(2, 4);
    current.joint_pain = true;
    let logs = vec![current, mock_fatigue_log(1, 4)];
    let triggers = evaluate_deload(&logs, ExperienceLevel::Intermediate, today());
    assert_eq!(triggers.suggested_deload_type, Some(DeloadType::Intensity));
  }

  #[test]
  fn test_two_weeks_of_poor_sleep_is_full_deload() {
    let mut current = mock_fatigue_log(2, 2);
    current.sleep_quality = 2;
    let mut previous = mock_fatigue_log(1, 2);
    previous.sleep_quality = 1;
    let triggers = evaluate_deload(&[current, previous], ExperienceLevel::Advanced, today());
    assert!(triggers.should_deload);
    assert_eq!(triggers.suggested_deload_type, Some(DeloadType::Full));
    assert_eq!(triggers.prescription.map(|p| p.intensity_modifier), Some(0.6));
  }

  #[test]
  fn test_missed_reps_threshold() {
    let mut current = mock_fatigue_log(2, 2);
    current.missed_reps = 5;
    let triggers = evaluate_deload(&[current.clone(), mock_fatigue_log(1, 2)], ExperienceLevel::Advanced, today());
    assert!(!triggers.should_deload);

    current.missed_reps = 6;
    let triggers = evaluate_deload(&[current, mock_fatigue_log(1, 2)], ExperienceLevel::Advanced, today());
    assert_eq!(triggers.reasons, vec![PERFORMANCE_REASON.to_string()]);
  }

  #[test]
  fn test_motivation_alone_keeps_default_prescription() {
    let mut current = mock_fatigue_log(2, 2);
    current.motivation = 2;
    let mut previous = mock_fatigue_log(1, 2);
    previous.motivation = 3;
    let triggers = evaluate_deload(&[current, previous], ExperienceLevel::Intermediate, today());
    assert!(triggers.should_deload);
    assert_eq!(triggers.suggested_deload_type, None);
    assert_eq!(triggers.prescription.map(|p| p.deload_type), Some(DeloadType::Volume));
  }

  #[test]
  fn test_novice_needs_two_reasons() {
    let logs = vec![mock_fatigue_log(2, 4), mock_fatigue_log(1, 5)];
    let triggers = evaluate_deload(&logs, ExperienceLevel::Novice, today());
    assert!(!triggers.should_deload);
    assert!(triggers.suppressed);
    assert_eq!(triggers.reasons.len(), 1);
    assert!(triggers.prescription.is_none());

    let mut current = mock_fatigue_log(2, 4);
    current.joint_pain = true;
    let triggers = evaluate_deload(&[current, mock_fatigue_log(1, 5)], ExperienceLevel::Novice, today());
    assert!(triggers.should_deload);
    assert!(!triggers.suppressed);
  }

  #[test]
  fn test_next_monday() {
    let monday = NaiveDate::from_ymd_opt(2024, 3, 11).unwrap();
    assert_eq!(next_monday_after(monday), NaiveDate::from_ymd_opt(2024, 3, 18).unwrap());
    let sunday = NaiveDate::from_ymd_opt(2024, 3, 17).unwrap();
    assert_eq!(next_monday_after(sunday), NaiveDate::from_ymd_opt(2024, 3, 18).unwrap());
  }
}
