use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::exercise::{Equipment, MuscleGroup};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sex {
  Male,
  Female,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExperienceLevel {
  Novice,
  Intermediate,
  Advanced,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrainingGoal {
  Cut,
  Bulk,
  Recomp,
  Maintain,
}

macro_rules! text_enum {
  ($ty:ident, $label:literal, { $($variant:ident => $text:literal),+ $(,)? }) => {
    impl std::fmt::Display for $ty {
      fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
          $(Self::$variant => write!(f, $text),)+
        }
      }
    }

    impl std::str::FromStr for $ty {
      type Err = String;
      fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
          $($text => Ok(Self::$variant),)+
          _ => Err(format!(concat!("Unknown ", $label, ": {}"), s)),
        }
      }
    }
  };
}

text_enum!(Sex, "sex", { Male => "male", Female => "female" });
text_enum!(ExperienceLevel, "experience level", {
  Novice => "novice",
  Intermediate => "intermediate",
  Advanced => "advanced",
});
text_enum!(TrainingGoal, "goal", {
  Cut => "cut",
  Bulk => "bulk",
  Recomp => "recomp",
  Maintain => "maintain",
});

/// ---------------------------------------------------------------------------
/// User Training Profile
/// ---------------------------------------------------------------------------

/// Read-only input to a single program generation request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserTrainingProfile {
  pub user_id: String,
  pub age: u32,
  pub sex: Sex,
  pub experience: ExperienceLevel,
  pub goal: TrainingGoal,
  /// 1 (poor) - 5 (excellent)
  pub sleep_quality: u8,
  /// 1 (low) - 5 (very high)
  pub stress_level: u8,
  pub training_age_years: f64,
  pub days_per_week: u8,
  pub available_equipment: BTreeSet<Equipment>,
  pub injured_muscles: BTreeSet<MuscleGroup>,
}

impl Default for UserTrainingProfile {
  fn default() -> Self {
    Self {
      user_id: String::new(),
      age: 30,
      sex: Sex::Male,
      experience: ExperienceLevel::Novice,
      goal: TrainingGoal::Bulk,
      sleep_quality: 3,
      stress_level: 3,
      training_age_years: 0.0,
      days_per_week: 3,
      available_equipment: Equipment::ALL.into_iter().collect(),
      injured_muscles: BTreeSet::new(),
    }
  }
}

impl UserTrainingProfile {
  /// Safe fallback used when no stored profile exists
  pub fn default_for(user_id: &str) -> Self {
    Self {
      user_id: user_id.to_string(),
      ..Self::default()
    }
  }

  pub fn sleep(&self) -> u8 {
    self.sleep_quality.clamp(1, 5)
  }

  pub fn stress(&self) -> u8 {
    self.stress_level.clamp(1, 5)
  }

  pub fn training_days(&self) -> u8 {
    self.days_per_week.clamp(1, 6)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_default_profile() {
    let profile = UserTrainingProfile::default_for("u1");
    assert_eq!(profile.user_id, "u1");
    assert_eq!(profile.age, 30);
    assert_eq!(profile.experience, ExperienceLevel::Novice);
    assert_eq!(profile.goal, TrainingGoal::Bulk);
    assert_eq!(profile.sleep_quality, 3);
    assert_eq!(profile.available_equipment.len(), 5);
  }

  #[test]
  fn test_enum_text_roundtrip() {
    assert_eq!("intermediate".parse::<ExperienceLevel>(), Ok(ExperienceLevel::Intermediate));
    assert_eq!(TrainingGoal::Recomp.to_string(), "recomp");
    assert!("bulking".parse::<TrainingGoal>().is_err());
  }

  #[test]
  fn test_out_of_range_inputs_are_clamped() {
    let profile = UserTrainingProfile {
      sleep_quality: 0,
      stress_level: 9,
      days_per_week: 7,
      ..UserTrainingProfile::default()
    };
    assert_eq!(profile.sleep(), 1);
    assert_eq!(profile.stress(), 5);
    assert_eq!(profile.training_days(), 6);
  }
}
