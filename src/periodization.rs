//! Periodization planner
//!
//! A mesocycle is `deload_frequency_weeks` training weeks followed by one
//! deload week. The deload week is always the last entry of the plan.

use serde::{Deserialize, Serialize};

use crate::models::{ExperienceLevel, TrainingGoal, UserTrainingProfile};
use crate::recovery::RecoveryFactors;

pub const DELOAD_INTENSITY_MODIFIER: f64 = 0.6;
pub const DELOAD_VOLUME_MODIFIER: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeriodizationModel {
  Linear,
  DailyUndulating,
  WeeklyUndulating,
  Block,
}

impl PeriodizationModel {
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Linear => "linear",
      Self::DailyUndulating => "daily_undulating",
      Self::WeeklyUndulating => "weekly_undulating",
      Self::Block => "block",
    }
  }

  pub fn is_undulating(&self) -> bool {
    matches!(self, Self::DailyUndulating | Self::WeeklyUndulating)
  }
}

impl std::fmt::Display for PeriodizationModel {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.as_str())
  }
}

/// Phases of a block-periodized mesocycle, roughly 50/35/15% of the training weeks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockPhase {
  Hypertrophy,
  Strength,
  Peak,
}

impl BlockPhase {
  pub fn for_progress(progress: f64) -> Self {
    if progress <= 0.5 {
      BlockPhase::Hypertrophy
    } else if progress <= 0.85 {
      BlockPhase::Strength
    } else {
      BlockPhase::Peak
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RpeTarget {
  pub min: f64,
  pub max: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyProgression {
  pub week: u32,
  pub intensity_modifier: f64,
  pub volume_modifier: f64,
  pub rpe_target: RpeTarget,
  pub is_deload: bool,
  pub focus: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodizationPlan {
  pub model: PeriodizationModel,
  /// Training weeks plus the terminal deload week
  pub mesocycle_length_weeks: u32,
  pub training_weeks: u32,
  pub weekly_progression: Vec<WeeklyProgression>,
}

impl PeriodizationPlan {
  pub fn deload_week(&self) -> Option<&WeeklyProgression> {
    self.weekly_progression.last().filter(|w| w.is_deload)
  }
}

/// Fraction of the training block completed at the end of `week` (1-based)
pub fn week_progress(week: u32, training_weeks: u32) -> f64 {
  if training_weeks == 0 {
    return 1.0;
  }
  (f64::from(week) / f64::from(training_weeks)).clamp(0.0, 1.0)
}

pub fn select_model(profile: &UserTrainingProfile) -> PeriodizationModel {
  let years = profile.training_age_years;
  if profile.experience == ExperienceLevel::Novice || years < 1.0 {
    PeriodizationModel::Linear
  } else if profile.experience == ExperienceLevel::Intermediate || years < 3.0 {
    if profile.goal == TrainingGoal::Cut {
      PeriodizationModel::WeeklyUndulating
    } else {
      PeriodizationModel::DailyUndulating
    }
  } else {
    PeriodizationModel::Block
  }
}

pub fn build_periodization_plan(
  profile: &UserTrainingProfile,
  recovery: &RecoveryFactors,
) -> PeriodizationPlan {
  let model = select_model(profile);
  let training_weeks = recovery.deload_frequency_weeks.max(1);

  let mut weekly_progression: Vec<WeeklyProgression> = (1..=training_weeks)
    .map(|week| training_week(model, week, training_weeks))
    .collect();

  weekly_progression.push(WeeklyProgression {
    week: training_weeks + 1,
    intensity_modifier: DELOAD_INTENSITY_MODIFIER,
    volume_modifier: DELOAD_VOLUME_MODIFIER,
    rpe_target: RpeTarget { min: 5.0, max: 6.0 },
    is_deload: true,
    focus: "Deload".to_string(),
  });

  PeriodizationPlan {
    model,
    mesocycle_length_weeks: training_weeks + 1,
    training_weeks,
    weekly_progression,
  }
}

fn training_week(model: PeriodizationModel, week: u32, training_weeks: u32) -> WeeklyProgression {
  let p = week_progress(week, training_weeks);
  let heavy_week = week % 2 == 0;

  let (intensity, volume, rpe_min, focus) = match model {
    PeriodizationModel::Linear => (
      0.80 + 0.15 * p,
      0.90 + 0.20 * p,
      6.5 + 2.0 * p,
      "Linear progression".to_string(),
    ),
    PeriodizationModel::WeeklyUndulating => {
      if heavy_week {
        (0.95 + 0.05 * p, 0.90, 8.0, "Intensity emphasis".to_string())
      } else {
        (0.85 + 0.05 * p, 1.10, 7.0, "Volume emphasis".to_string())
      }
    }
    PeriodizationModel::DailyUndulating => {
      let swing = if heavy_week { 0.025 } else { -0.025 };
      (
        0.90 + 0.05 * p + swing,
        1.00 - swing * 2.0,
        7.0 + p,
        "Daily undulating".to_string(),
      )
    }
    PeriodizationModel::Block => match BlockPhase::for_progress(p) {
      BlockPhase::Hypertrophy => (0.75 + 0.2 * p, 1.10, 7.0, "Hypertrophy block".to_string()),
      BlockPhase::Strength => (0.85 + 0.1 * p, 0.90, 8.0, "Strength block".to_string()),
      BlockPhase::Peak => (0.97, 0.70, 9.0, "Peak block".to_string()),
    },
  };

  let rpe_min = round_half(rpe_min).min(9.0);
  WeeklyProgression {
    week,
    intensity_modifier: round2(intensity),
    volume_modifier: round2(volume),
    rpe_target: RpeTarget {
      min: rpe_min,
      max: (rpe_min + 1.0).min(10.0),
    },
    is_deload: false,
    focus,
  }
}

fn round2(value: f64) -> f64 {
  (value * 100.0).round() / 100.0
}

fn round_half(value: f64) -> f64 {
  (value * 2.0).round() / 2.0
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use super::*;
  use crate::recovery::calculate_recovery_factors;

  fn profile(experience: ExperienceLevel, years: f64, goal: TrainingGoal) -> UserTrainingProfile {
    UserTrainingProfile {
      experience,
      training_age_years: years,
      goal,
      ..UserTrainingProfile::default()
    }
  }

  fn recovery(deload_weeks: u32) -> RecoveryFactors {
    RecoveryFactors {
      volume_multiplier: 1.0,
      frequency_multiplier: 1.0,
      deload_frequency_weeks: deload_weeks,
      warnings: vec![],
    }
  }

  #[test]
  fn test_model_selection() {
    assert_eq!(select_model(&profile(ExperienceLevel::Novice, 4.0, TrainingGoal::Bulk)), PeriodizationModel::Linear);
    assert_eq!(select_model(&profile(ExperienceLevel::Advanced, 0.5, TrainingGoal::Bulk)), PeriodizationModel::Linear);
    assert_eq!(
      select_model(&profile(ExperienceLevel::Intermediate, 2.0, TrainingGoal::Cut)),
      PeriodizationModel::WeeklyUndulating
    );
    assert_eq!(
      select_model(&profile(ExperienceLevel::Intermediate, 2.0, TrainingGoal::Bulk)),
      PeriodizationModel::DailyUndulating
    );
    assert_eq!(
      select_model(&profile(ExperienceLevel::Advanced, 2.0, TrainingGoal::Bulk)),
      PeriodizationModel::DailyUndulating
    );
    assert_eq!(select_model(&profile(ExperienceLevel::Advanced, 6.0, TrainingGoal::Bulk)), PeriodizationModel::Block);
  }

  #[test]
  fn test_every_plan_ends_with_single_deload() {
    for experience in [ExperienceLevel::Novice, ExperienceLevel::Intermediate, ExperienceLevel::Advanced] {
      for years in [0.5, 2.0, 6.0] {
        for goal in [TrainingGoal::Cut, TrainingGoal::Bulk] {
          for weeks in 3..=8 {
            let plan = build_periodization_plan(&profile(experience, years, goal), &recovery(weeks));
            let deloads: Vec<_> = plan.weekly_progression.iter().filter(|w| w.is_deload).collect();
            assert_eq!(deloads.len(), 1);
            let last = plan.weekly_progression.last().unwrap();
            assert!(last.is_deload);
            assert_eq!(last.volume_modifier, 0.5);
            assert_eq!(last.intensity_modifier, 0.6);
            assert_eq!(last.rpe_target, RpeTarget { min: 5.0, max: 6.0 });
            assert_eq!(plan.weekly_progression.len() as u32, plan.mesocycle_length_weeks);
          }
        }
      }
    }
  }

  #[test]
  fn test_linear_is_monotonic() {
    let plan = build_periodization_plan(&profile(ExperienceLevel::Novice, 0.5, TrainingGoal::Bulk), &recovery(6));
    let training: Vec<_> = plan.weekly_progression.iter().filter(|w| !w.is_deload).collect();
    for pair in training.windows(2) {
      assert!(pair[1].intensity_modifier >= pair[0].intensity_modifier);
      assert!(pair[1].volume_modifier >= pair[0].volume_modifier);
      assert!(pair[1].rpe_target.min >= pair[0].rpe_target.min);
    }
    assert_eq!(training.last().unwrap().intensity_modifier, 0.95);
  }

  #[test]
  fn test_undulating_oscillates() {
    let plan = build_periodization_plan(
      &profile(ExperienceLevel::Intermediate, 2.0, TrainingGoal::Cut),
      &recovery(4),
    );
    let w = &plan.weekly_progression;
    assert!(w[1].intensity_modifier > w[0].intensity_modifier);
    assert!(w[2].intensity_modifier < w[1].intensity_modifier);
    assert!(w[1].volume_modifier < w[0].volume_modifier);
  }

  #[test]
  fn test_block_phases() {
    let plan = build_periodization_plan(&profile(ExperienceLevel::Advanced, 6.0, TrainingGoal::Bulk), &recovery(7));
    let focus: Vec<_> = plan.weekly_progression.iter().map(|w| w.focus.as_str()).collect();
    assert_eq!(
      focus,
      vec![
        "Hypertrophy block",
        "Hypertrophy block",
        "Hypertrophy block",
        "Strength block",
        "Strength block",
        "Peak block",
        "Peak block",
        "Deload",
      ]
    );
  }

  #[test]
  fn test_novice_scenario_mesocycle_length() {
    let p = UserTrainingProfile {
      experience: ExperienceLevel::Novice,
      goal: TrainingGoal::Bulk,
      sleep_quality: 3,
      stress_level: 3,
      training_age_years: 0.5,
      days_per_week: 4,
      ..UserTrainingProfile::default()
    };
    let recovery = calculate_recovery_factors(&p);
    let plan = build_periodization_plan(&p, &recovery);
    assert!((6..=8).contains(&recovery.deload_frequency_weeks));
    assert!((7..=9).contains(&plan.mesocycle_length_weeks));
    assert_eq!(plan.model, PeriodizationModel::Linear);
  }
}
