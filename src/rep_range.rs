//! Rep range, RIR, tempo and rest for a single exercise slot
//!
//! Adjustments stack on a goal x mechanic base range in a fixed order:
//! fiber bias, position in session, periodization progress, then the novice
//! floor. Bounds are clamped last.

use serde::{Deserialize, Serialize};

use crate::catalog::fiber_profile;
use crate::models::{ExerciseDefinition, ExperienceLevel, FiberProfile, Mechanic, TrainingGoal};
use crate::periodization::{BlockPhase, PeriodizationModel};

const DEFAULT_TEMPO: &str = "2-0-1-0";
const SLOW_ECCENTRIC_TEMPO: &str = "3-1-1-0";
const MAX_RIR: i32 = 4;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepRangeConfig {
  pub min_reps: u32,
  pub max_reps: u32,
  pub target_rir: u32,
  /// eccentric-pause-concentric-pause, in seconds
  pub tempo: String,
  pub rest_seconds: u32,
}

/// Everything about the current week that shapes an exercise prescription
#[derive(Debug, Clone, Copy)]
pub struct RepRangeContext {
  pub goal: TrainingGoal,
  pub experience: ExperienceLevel,
  pub model: PeriodizationModel,
  /// week / training weeks, in [0, 1]
  pub progress: f64,
}

fn base_range(goal: TrainingGoal, mechanic: Mechanic) -> (i32, i32) {
  match (goal, mechanic) {
    (TrainingGoal::Bulk, Mechanic::Compound) => (6, 10),
    (TrainingGoal::Bulk, Mechanic::Isolation) => (10, 15),
    (TrainingGoal::Cut, Mechanic::Compound) => (5, 8),
    (TrainingGoal::Cut, Mechanic::Isolation) => (8, 12),
    (TrainingGoal::Recomp, Mechanic::Compound) => (6, 10),
    (TrainingGoal::Recomp, Mechanic::Isolation) => (8, 12),
    (TrainingGoal::Maintain, Mechanic::Compound) => (8, 12),
    (TrainingGoal::Maintain, Mechanic::Isolation) => (10, 15),
  }
}

fn fiber_adjustment(fiber: FiberProfile) -> (i32, i32) {
  match fiber {
    FiberProfile::FastTwitch => (-1, -1),
    FiberProfile::Mixed => (0, 0),
    FiberProfile::SlowTwitch => (2, 3),
  }
}

/// Accumulated fatigue later in a session favours lighter, higher-rep work
fn position_adjustment(position: usize) -> i32 {
  match position {
    0 | 1 => 0,
    2 | 3 => 1,
    _ => 2,
  }
}

fn progression_adjustment(model: PeriodizationModel, progress: f64) -> (i32, i32) {
  match model {
    PeriodizationModel::Linear => {
      let shift = if progress < 0.33 {
        2
      } else if progress < 0.66 {
        0
      } else {
        -2
      };
      (shift, shift)
    }
    PeriodizationModel::Block => {
      let shift = match BlockPhase::for_progress(progress) {
        BlockPhase::Hypertrophy => 2,
        BlockPhase::Strength => -2,
        BlockPhase::Peak => -3,
      };
      (shift, shift)
    }
    PeriodizationModel::DailyUndulating | PeriodizationModel::WeeklyUndulating => (-1, 2),
  }
}

/// RIR descends from the tier ceiling toward 0 as the mesocycle progresses
pub fn target_rir(experience: ExperienceLevel, progress: f64) -> u32 {
  let (ceiling, rate) = match experience {
    ExperienceLevel::Novice => (3.0, 0.67),
    ExperienceLevel::Intermediate => (3.0, 1.0),
    ExperienceLevel::Advanced => (2.0, 1.0),
  };
  let progress = progress.clamp(0.0, 1.0);
  let rir = ceiling as i32 - (progress * ceiling * rate).round() as i32;
  rir.clamp(0, MAX_RIR) as u32
}

pub fn rest_seconds(min_reps: u32, mechanic: Mechanic) -> u32 {
  match mechanic {
    Mechanic::Compound => match min_reps {
      0..=6 => 180,
      7..=10 => 120,
      _ => 90,
    },
    Mechanic::Isolation => {
      if min_reps <= 10 {
        90
      } else {
        60
      }
    }
  }
}

pub fn calculate_rep_range(
  exercise: &ExerciseDefinition,
  position_in_session: usize,
  ctx: &RepRangeContext,
) -> RepRangeConfig {
  let (mut min, mut max) = base_range(ctx.goal, exercise.mechanic);

  let (fiber_min, fiber_max) = fiber_adjustment(fiber_profile(exercise.primary_muscle));
  min += fiber_min;
  max += fiber_max;

  let position = position_adjustment(position_in_session);
  min += position;
  max += position;

  let (phase_min, phase_max) = progression_adjustment(ctx.model, ctx.progress);
  min += phase_min;
  max += phase_max;

  if ctx.experience == ExperienceLevel::Novice {
    min = min.max(6);
    max = max.max(8);
  }

  let min = min.clamp(1, 20);
  let max = max.clamp(min + 2, 30);

  let tempo = if ctx.goal == TrainingGoal::Bulk && ctx.progress <= 0.33 {
    SLOW_ECCENTRIC_TEMPO
  } else {
    DEFAULT_TEMPO
  };

  RepRangeConfig {
    min_reps: min as u32,
    max_reps: max as u32,
    target_rir: target_rir(ctx.experience, ctx.progress),
    tempo: tempo.to_string(),
    rest_seconds: rest_seconds(min as u32, exercise.mechanic),
  }
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
