use serde::{Deserialize, Serialize};

/// ---------------------------------------------------------------------------
/// Muscle Groups
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MuscleGroup {
  Quads,
  Hamstrings,
  Glutes,
  Back,
  Chest,
  Shoulders,
  Biceps,
  Triceps,
  Calves,
  Abs,
}

impl MuscleGroup {
  /// Compound-first session order: legs -> back -> chest -> shoulders -> arms -> calves -> abs
  pub const PRIORITY: [MuscleGroup; 10] = [
    MuscleGroup::Quads,
    MuscleGroup::Hamstrings,
    MuscleGroup::Glutes,
    MuscleGroup::Back,
    MuscleGroup::Chest,
    MuscleGroup::Shoulders,
    MuscleGroup::Biceps,
    MuscleGroup::Triceps,
    MuscleGroup::Calves,
    MuscleGroup::Abs,
  ];

  pub fn priority(&self) -> usize {
    Self::PRIORITY.iter().position(|m| m == self).unwrap_or(Self::PRIORITY.len())
  }

  /// Small groups get a reduced share of the weekly volume target
  pub fn is_small(&self) -> bool {
    matches!(
      self,
      MuscleGroup::Biceps | MuscleGroup::Triceps | MuscleGroup::Calves | MuscleGroup::Abs
    )
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      MuscleGroup::Quads => "quads",
      MuscleGroup::Hamstrings => "hamstrings",
      MuscleGroup::Glutes => "glutes",
      MuscleGroup::Back => "back",
      MuscleGroup::Chest => "chest",
      MuscleGroup::Shoulders => "shoulders",
      MuscleGroup::Biceps => "biceps",
      MuscleGroup::Triceps => "triceps",
      MuscleGroup::Calves => "calves",
      MuscleGroup::Abs => "abs",
    }
  }
}

impl std::fmt::Display for MuscleGroup {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.as_str())
  }
}

impl std::str::FromStr for MuscleGroup {
  type Err = String;
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Self::PRIORITY
      .iter()
      .copied()
      .find(|m| m.as_str() == s)
      .ok_or_else(|| format!("Unknown muscle group: {}", s))
  }
}

/// Dominant fiber type of a muscle, used to bias rep ranges
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FiberProfile {
  FastTwitch,
  Mixed,
  SlowTwitch,
}

/// ---------------------------------------------------------------------------
/// Movement Classification
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MovementPattern {
  Squat,
  Hinge,
  Lunge,
  HorizontalPush,
  VerticalPush,
  HorizontalPull,
  VerticalPull,
  KneeExtension,
  KneeFlexion,
  HipExtension,
  Fly,
  LateralRaise,
  ElbowFlexion,
  ElbowExtension,
  CalfRaise,
  Core,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Equipment {
  Barbell,
  Dumbbell,
  Cable,
  Machine,
  Bodyweight,
}

impl Equipment {
  pub const ALL: [Equipment; 5] = [
    Equipment::Barbell,
    Equipment::Dumbbell,
    Equipment::Cable,
    Equipment::Machine,
    Equipment::Bodyweight,
  ];

  pub fn as_str(&self) -> &'static str {
    match self {
      Equipment::Barbell => "barbell",
      Equipment::Dumbbell => "dumbbell",
      Equipment::Cable => "cable",
      Equipment::Machine => "machine",
      Equipment::Bodyweight => "bodyweight",
    }
  }
}

impl std::str::FromStr for Equipment {
  type Err = String;
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Self::ALL
      .iter()
      .copied()
      .find(|e| e.as_str() == s)
      .ok_or_else(|| format!("Unknown equipment: {}", s))
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mechanic {
  Compound,
  Isolation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
  Beginner,
  Intermediate,
  Advanced,
}

/// ---------------------------------------------------------------------------
/// Exercise Definition (catalog reference data)
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseDefinition {
  pub name: String,
  pub primary_muscle: MuscleGroup,
  pub secondary_muscles: Vec<MuscleGroup>,
  pub pattern: MovementPattern,
  pub equipment: Equipment,
  pub mechanic: Mechanic,
  pub difficulty: Difficulty,
  pub default_rep_range: (u8, u8),
  pub default_rir: u8,
}

impl ExerciseDefinition {
  pub fn is_compound(&self) -> bool {
    self.mechanic == Mechanic::Compound
  }

  /// True if any worked muscle (primary or secondary) is in the given set
  pub fn touches_any(&self, muscles: &std::collections::BTreeSet<MuscleGroup>) -> bool {
    muscles.contains(&self.primary_muscle)
      || self.secondary_muscles.iter().any(|m| muscles.contains(m))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_priority_is_compound_first() {
    assert!(MuscleGroup::Quads.priority() < MuscleGroup::Back.priority());
    assert!(MuscleGroup::Back.priority() < MuscleGroup::Chest.priority());
    assert!(MuscleGroup::Triceps.priority() < MuscleGroup::Calves.priority());
    assert_eq!(MuscleGroup::Abs.priority(), 9);
  }

  #[test]
  fn test_muscle_group_parse() {
    assert_eq!("hamstrings".parse::<MuscleGroup>(), Ok(MuscleGroup::Hamstrings));
    assert!("forearms".parse::<MuscleGroup>().is_err());
  }

  #[test]
  fn test_small_muscles() {
    assert!(MuscleGroup::Calves.is_small());
    assert!(!MuscleGroup::Glutes.is_small());
  }
}
