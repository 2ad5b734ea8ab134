//! Weekly fatigue ceilings and the minimum SFR an exercise must clear

use serde::{Deserialize, Serialize};

use crate::models::{ExperienceLevel, TrainingGoal, UserTrainingProfile};

const BASE_SYSTEMIC_LIMIT: f64 = 100.0;
const BASE_LOCAL_LIMIT: f64 = 80.0;
const BASE_MIN_SFR: f64 = 0.6;
const WARNING_THRESHOLD: f64 = 0.8;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FatigueBudgetConfig {
  pub systemic_limit: u32,
  pub local_limit: u32,
  pub min_sfr_threshold: f64,
  /// Fraction of a limit at which a warning is raised
  pub warning_threshold: f64,
}

impl FatigueBudgetConfig {
  pub fn systemic_warning_level(&self) -> f64 {
    f64::from(self.systemic_limit) * self.warning_threshold
  }
}

pub fn calculate_fatigue_budget(profile: &UserTrainingProfile) -> FatigueBudgetConfig {
  let mut systemic = BASE_SYSTEMIC_LIMIT;
  let mut local = BASE_LOCAL_LIMIT;
  let mut min_sfr = BASE_MIN_SFR;

  if profile.age >= 55 {
    systemic *= 0.8;
    local *= 0.85;
    min_sfr += 0.15;
  } else if profile.age >= 45 {
    systemic *= 0.9;
    local *= 0.9;
    min_sfr += 0.05;
  }

  match profile.experience {
    ExperienceLevel::Novice => {
      systemic *= 0.85;
      local *= 0.85;
      min_sfr += 0.1;
    }
    ExperienceLevel::Intermediate => {}
    ExperienceLevel::Advanced => {
      systemic *= 1.1;
      local *= 1.1;
      min_sfr -= 0.05;
    }
  }

  // Sleep/stress recovery multiplier in (0, 1], mapped onto [0.7, 1.3] x base
  let sleep = f64::from(profile.sleep());
  let stress = f64::from(profile.stress());
  let recovery = (sleep / 5.0) * (1.0 - (stress - 1.0) / 8.0);
  systemic *= (0.7 + 0.6 * recovery).clamp(0.7, 1.3);

  if profile.goal == TrainingGoal::Cut {
    systemic *= 0.9;
    local *= 0.85;
  }

  FatigueBudgetConfig {
    systemic_limit: systemic.round() as u32,
    local_limit: local.round() as u32,
    min_sfr_threshold: (min_sfr * 100.0).round() / 100.0,
    warning_threshold: WARNING_THRESHOLD,
  }
}
