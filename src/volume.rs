//! Weekly hard-set targets per muscle, and the split that distributes them
//!
//! Targets interpolate between MEV and MRV by goal, are scaled by the
//! recovery volume multiplier, and always stay inside the tier's
//! landmarks so that `mev <= sets <= mrv` holds for every muscle.

use chrono::Weekday;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::models::{ExperienceLevel, MuscleGroup, TrainingGoal};
use crate::recovery::RecoveryFactors;

const SMALL_MUSCLE_SHARE: f64 = 0.7;
const SMALL_MUSCLE_MIN_SETS: u32 = 4;

/// ---------------------------------------------------------------------------
/// Splits & Weekly Schedule
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SplitType {
  FullBody,
  UpperLower,
  PushPullLegs,
}

impl SplitType {
  pub fn for_days(days_per_week: u8) -> Self {
    match days_per_week {
      0..=3 => SplitType::FullBody,
      4 => SplitType::UpperLower,
      _ => SplitType::PushPullLegs,
    }
  }

  pub fn name(&self) -> &'static str {
    match self {
      SplitType::FullBody => "Full Body",
      SplitType::UpperLower => "Upper/Lower",
      SplitType::PushPullLegs => "Push/Pull/Legs",
    }
  }

  /// Session templates, cycled across the training days
  fn templates(&self) -> &'static [(&'static str, &'static [MuscleGroup])] {
    use MuscleGroup::*;
    match self {
      SplitType::FullBody => &[(
        "Full Body",
        &[Quads, Hamstrings, Glutes, Back, Chest, Shoulders, Biceps, Triceps, Calves, Abs],
      )],
      SplitType::UpperLower => &[
        ("Upper", &[Back, Chest, Shoulders, Biceps, Triceps]),
        ("Lower", &[Quads, Hamstrings, Glutes, Calves, Abs]),
      ],
      SplitType::PushPullLegs => &[
        ("Push", &[Chest, Shoulders, Triceps]),
        ("Pull", &[Back, Biceps]),
        ("Legs", &[Quads, Hamstrings, Glutes, Calves, Abs]),
      ],
    }
  }
}

impl std::fmt::Display for SplitType {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.name())
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledDay {
  pub weekday: Weekday,
  pub label: String,
  pub muscles: Vec<MuscleGroup>,
}

fn training_weekdays(days_per_week: u8) -> &'static [Weekday] {
  use Weekday::*;
  match days_per_week {
    0 | 1 => &[Mon],
    2 => &[Mon, Thu],
    3 => &[Mon, Wed, Fri],
    4 => &[Mon, Tue, Thu, Fri],
    5 => &[Mon, Tue, Wed, Fri, Sat],
    _ => &[Mon, Tue, Wed, Thu, Fri, Sat],
  }
}

/// Training days for one week, in calendar order
pub fn weekly_schedule(split: SplitType, days_per_week: u8) -> Vec<ScheduledDay> {
  let templates = split.templates();
  training_weekdays(days_per_week)
    .iter()
    .enumerate()
    .map(|(i, weekday)| {
      let (label, muscles) = templates[i % templates.len()];
      ScheduledDay {
        weekday: *weekday,
        label: label.to_string(),
        muscles: muscles.to_vec(),
      }
    })
    .collect()
}

/// ---------------------------------------------------------------------------
/// Volume Landmarks & Allocation
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolumeLandmarks {
  pub mev: u32,
  pub mrv: u32,
}

impl VolumeLandmarks {
  pub fn for_experience(experience: ExperienceLevel) -> Self {
    match experience {
      ExperienceLevel::Novice => Self { mev: 6, mrv: 12 },
      ExperienceLevel::Intermediate => Self { mev: 10, mrv: 18 },
      ExperienceLevel::Advanced => Self { mev: 12, mrv: 25 },
    }
  }

  fn scaled(&self, share: f64, floor: u32) -> Self {
    let mev = ((f64::from(self.mev) * share).round() as u32).max(floor);
    let mrv = ((f64::from(self.mrv) * share).round() as u32).max(mev);
    Self { mev, mrv }
  }
}

/// Where between MEV and MRV the weekly target sits
pub fn goal_volume_fraction(goal: TrainingGoal) -> f64 {
  match goal {
    TrainingGoal::Cut => 0.3,
    TrainingGoal::Maintain | TrainingGoal::Recomp => 0.5,
    TrainingGoal::Bulk => 0.7,
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MuscleVolume {
  pub sets: u32,
  pub frequency: u32,
  pub mev: u32,
  pub mrv: u32,
}

pub type VolumePerMuscle = BTreeMap<MuscleGroup, MuscleVolume>;

/// Weekly sets for a single muscle under the tier landmarks
pub fn target_weekly_sets(
  landmarks: VolumeLandmarks,
  goal: TrainingGoal,
  volume_multiplier: f64,
) -> u32 {
  let span = f64::from(landmarks.mrv - landmarks.mev);
  let target = f64::from(landmarks.mev) + span * goal_volume_fraction(goal);
  ((target * volume_multiplier).round() as u32).clamp(landmarks.mev, landmarks.mrv)
}

pub fn allocate_volume(
  days_per_week: u8,
  split: SplitType,
  experience: ExperienceLevel,
  goal: TrainingGoal,
  recovery: &RecoveryFactors,
) -> VolumePerMuscle {
  let landmarks = VolumeLandmarks::for_experience(experience);
  let target = target_weekly_sets(landmarks, goal, recovery.volume_multiplier);
  let days = u32::from(days_per_week.max(1));

  let frequency = match split {
    SplitType::FullBody => days.min(3),
    _ => 2u32.min(days),
  };

  MuscleGroup::PRIORITY
    .iter()
    .map(|&muscle| {
      let volume = if muscle.is_small() {
        let small = landmarks.scaled(SMALL_MUSCLE_SHARE, SMALL_MUSCLE_MIN_SETS);
        let sets = ((f64::from(target) * SMALL_MUSCLE_SHARE).round() as u32).max(SMALL_MUSCLE_MIN_SETS);
        MuscleVolume {
          sets,
          frequency,
          mev: small.mev,
          mrv: small.mrv,
        }
      } else {
        MuscleVolume {
          sets: target,
          frequency,
          mev: landmarks.mev,
          mrv: landmarks.mrv,
        }
      };
      (muscle, volume)
    })
    .collect()
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
