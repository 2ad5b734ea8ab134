//! Exercise catalog and the static lookup tables the engine ranks it with
//!
//! The catalog is read-only reference data. The engine only ever asks it for
//! the exercises that train a muscle under the user's equipment and injury
//! constraints; everything else here is constant tables:
//! - SFR (stimulus-to-fatigue ratio) by movement pattern x equipment
//! - systemic fatigue cost by movement pattern, scaled by equipment
//! - dominant fiber profile per muscle

use std::collections::BTreeSet;

use crate::models::{
  Difficulty, Equipment, ExerciseDefinition, FiberProfile, MovementPattern, MuscleGroup,
};

/// ---------------------------------------------------------------------------
/// Catalog
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct ExerciseCatalog {
  exercises: Vec<ExerciseDefinition>,
}

/// Constraints applied when pulling candidates for a muscle
#[derive(Debug, Clone, Copy)]
pub struct ExerciseFilter<'a> {
  pub equipment: &'a BTreeSet<Equipment>,
  pub excluded_muscles: &'a BTreeSet<MuscleGroup>,
  pub max_difficulty: Option<Difficulty>,
}

impl ExerciseCatalog {
  pub fn new(exercises: Vec<ExerciseDefinition>) -> Self {
    Self { exercises }
  }

  /// The catalog shipped with the engine
  pub fn builtin() -> Self {
    let exercises = builtin::EXERCISES
      .iter()
      .map(
        |&(name, primary, secondary, pattern, equipment, mechanic, difficulty, reps, rir)| {
          ExerciseDefinition {
            name: name.to_string(),
            primary_muscle: primary,
            secondary_muscles: secondary.to_vec(),
            pattern,
            equipment,
            mechanic,
            difficulty,
            default_rep_range: reps,
            default_rir: rir,
          }
        },
      )
      .collect();
    Self { exercises }
  }

  pub fn all(&self) -> &[ExerciseDefinition] {
    &self.exercises
  }

  pub fn len(&self) -> usize {
    self.exercises.len()
  }

  pub fn is_empty(&self) -> bool {
    self.exercises.is_empty()
  }

  /// Case-insensitive lookup by exercise name
  pub fn find(&self, name: &str) -> Option<&ExerciseDefinition> {
    self
      .exercises
      .iter()
      .find(|e| e.name.eq_ignore_ascii_case(name))
  }

  /// Every exercise whose primary target is `muscle`
  pub fn exercises_for_muscle(&self, muscle: MuscleGroup) -> Vec<&ExerciseDefinition> {
    self
      .exercises
      .iter()
      .filter(|e| e.primary_muscle == muscle)
      .collect()
  }

  /// Exercises for `muscle` that the user can perform
  pub fn eligible(&self, muscle: MuscleGroup, filter: &ExerciseFilter<'_>) -> Vec<&ExerciseDefinition> {
    self
      .exercises_for_muscle(muscle)
      .into_iter()
      .filter(|e| filter.equipment.contains(&e.equipment))
      .filter(|e| !e.touches_any(filter.excluded_muscles))
      .filter(|e| filter.max_difficulty.is_none_or(|max| e.difficulty <= max))
      .collect()
  }
}

/// ---------------------------------------------------------------------------
/// Static Tables
/// ---------------------------------------------------------------------------

/// Stimulus-to-fatigue ratio for a pattern performed with a given implement
pub fn sfr_score(pattern: MovementPattern, equipment: Equipment) -> f64 {
  builtin::SFR_TABLE
    .iter()
    .find(|(p, e, _)| *p == pattern && *e == equipment)
    .map(|(_, _, score)| *score)
    .unwrap_or(DEFAULT_SFR)
}

const DEFAULT_SFR: f64 = 0.75;

/// Systemic fatigue of one hard set of this pattern, before equipment scaling
pub fn base_pattern_fatigue(pattern: MovementPattern) -> f64 {
  match pattern {
    MovementPattern::Hinge => 10.0,
    MovementPattern::Squat => 9.0,
    MovementPattern::Lunge => 7.0,
    MovementPattern::HorizontalPush | MovementPattern::VerticalPush => 6.0,
    MovementPattern::HorizontalPull | MovementPattern::VerticalPull => 5.0,
    MovementPattern::HipExtension => 5.0,
    MovementPattern::KneeExtension | MovementPattern::KneeFlexion | MovementPattern::Fly => 3.0,
    MovementPattern::LateralRaise
    | MovementPattern::ElbowFlexion
    | MovementPattern::ElbowExtension
    | MovementPattern::CalfRaise
    | MovementPattern::Core => 2.0,
  }
}

/// Free weights stabilised by the lifter cost more than guided implements
pub fn equipment_fatigue_modifier(equipment: Equipment) -> f64 {
  match equipment {
    Equipment::Barbell => 1.2,
    Equipment::Dumbbell => 1.0,
    Equipment::Bodyweight => 0.9,
    Equipment::Cable => 0.8,
    Equipment::Machine => 0.7,
  }
}

/// Systemic cost of `sets` hard sets of an exercise
pub fn systemic_fatigue_cost(exercise: &ExerciseDefinition, sets: u32) -> f64 {
  base_pattern_fatigue(exercise.pattern)
    * equipment_fatigue_modifier(exercise.equipment)
    * f64::from(sets)
    * 0.15
}

pub fn fiber_profile(muscle: MuscleGroup) -> FiberProfile {
  match muscle {
    MuscleGroup::Hamstrings | MuscleGroup::Triceps => FiberProfile::FastTwitch,
    MuscleGroup::Calves | MuscleGroup::Abs => FiberProfile::SlowTwitch,
    _ => FiberProfile::Mixed,
  }
}

/// Heavy barbell lifts that get a primer single in the warm-up
pub const HEAVY_COMPOUNDS: [&str; 4] = [
  "Barbell Back Squat",
  "Conventional Deadlift",
  "Barbell Bench Press",
  "Overhead Press",
];

pub fn is_heavy_compound(name: &str) -> bool {
  HEAVY_COMPOUNDS.iter().any(|lift| lift.eq_ignore_ascii_case(name))
}

mod builtin {
  use crate::models::Difficulty::{self, *};
  use crate::models::Equipment::{self, *};
  use crate::models::Mechanic::{self, *};
  use crate::models::MovementPattern::{self, *};
  use crate::models::MuscleGroup::{self, *};

  pub type Seed = (
    &'static str,
    MuscleGroup,
    &'static [MuscleGroup],
    MovementPattern,
    Equipment,
    Mechanic,
    Difficulty,
    (u8, u8),
    u8,
  );

  pub const EXERCISES: &[Seed] = &[
    // Quads
    ("Barbell Back Squat", Quads, &[Glutes, Hamstrings], Squat, Barbell, Compound, Intermediate, (6, 10), 2),
    ("Hack Squat", Quads, &[Glutes], Squat, Machine, Compound, Intermediate, (8, 12), 2),
    ("Leg Press", Quads, &[Glutes], Squat, Machine, Compound, Beginner, (8, 12), 2),
    ("Goblet Squat", Quads, &[Glutes], Squat, Dumbbell, Compound, Beginner, (8, 12), 2),
    ("Bulgarian Split Squat", Quads, &[Glutes], Lunge, Dumbbell, Compound, Intermediate, (8, 12), 2),
    ("Leg Extension", Quads, &[], KneeExtension, Machine, Isolation, Beginner, (10, 15), 1),
    // Hamstrings
    ("Romanian Deadlift", Hamstrings, &[Glutes, Back], Hinge, Barbell, Compound, Intermediate, (6, 10), 2),
    ("Dumbbell Romanian Deadlift", Hamstrings, &[Glutes], Hinge, Dumbbell, Compound, Beginner, (8, 12), 2),
    ("Conventional Deadlift", Hamstrings, &[Glutes, Back, Quads], Hinge, Barbell, Compound, Advanced, (3, 6), 2),
    ("Lying Leg Curl", Hamstrings, &[], KneeFlexion, Machine, Isolation, Beginner, (10, 15), 1),
    ("Seated Leg Curl", Hamstrings, &[], KneeFlexion, Machine, Isolation, Beginner, (10, 15), 1),
    ("Nordic Curl", Hamstrings, &[], KneeFlexion, Bodyweight, Isolation, Advanced, (5, 8), 2),
    // Glutes
    ("Barbell Hip Thrust", Glutes, &[Hamstrings], HipExtension, Barbell, Compound, Intermediate, (8, 12), 2),
    ("Cable Pull-Through", Glutes, &[Hamstrings], HipExtension, Cable, Compound, Beginner, (10, 15), 2),
    ("Glute Bridge", Glutes, &[Hamstrings], HipExtension, Bodyweight, Isolation, Beginner, (12, 20), 2),
    ("Walking Lunge", Glutes, &[Quads], Lunge, Dumbbell, Compound, Beginner, (10, 14), 2),
    // Back
    ("Barbell Row", Back, &[Biceps], HorizontalPull, Barbell, Compound, Intermediate, (6, 10), 2),
    ("Pull-Up", Back, &[Biceps], VerticalPull, Bodyweight, Compound, Intermediate, (5, 10), 2),
    ("Lat Pulldown", Back, &[Biceps], VerticalPull, Cable, Compound, Beginner, (8, 12), 2),
    ("Seated Cable Row", Back, &[Biceps], HorizontalPull, Cable, Compound, Beginner, (8, 12), 2),
    ("Chest-Supported Dumbbell Row", Back, &[Biceps], HorizontalPull, Dumbbell, Compound, Beginner, (8, 12), 2),
    ("Machine Row", Back, &[Biceps], HorizontalPull, Machine, Compound, Beginner, (8, 12), 2),
    // Chest
    ("Barbell Bench Press", Chest, &[Triceps, Shoulders], HorizontalPush, Barbell, Compound, Intermediate, (6, 10), 2),
    ("Dumbbell Bench Press", Chest, &[Triceps, Shoulders], HorizontalPush, Dumbbell, Compound, Beginner, (8, 12), 2),
    ("Incline Dumbbell Press", Chest, &[Shoulders, Triceps], HorizontalPush, Dumbbell, Compound, Beginner, (8, 12), 2),
    ("Machine Chest Press", Chest, &[Triceps], HorizontalPush, Machine, Compound, Beginner, (8, 12), 2),
    ("Push-Up", Chest, &[Triceps, Shoulders], HorizontalPush, Bodyweight, Compound, Beginner, (10, 20), 2),
    ("Cable Fly", Chest, &[], Fly, Cable, Isolation, Beginner, (10, 15), 1),
    // Shoulders
    ("Overhead Press", Shoulders, &[Triceps], VerticalPush, Barbell, Compound, Intermediate, (5, 8), 2),
    ("Seated Dumbbell Shoulder Press", Shoulders, &[Triceps], VerticalPush, Dumbbell, Compound, Beginner, (8, 12), 2),
    ("Machine Shoulder Press", Shoulders, &[Triceps], VerticalPush, Machine, Compound, Beginner, (8, 12), 2),
    ("Dumbbell Lateral Raise", Shoulders, &[], LateralRaise, Dumbbell, Isolation, Beginner, (12, 20), 1),
    ("Cable Lateral Raise", Shoulders, &[], LateralRaise, Cable, Isolation, Beginner, (12, 20), 1),
    ("Reverse Pec Deck", Shoulders, &[Back], Fly, Machine, Isolation, Beginner, (12, 20), 1),
    // Biceps
    ("Barbell Curl", Biceps, &[], ElbowFlexion, Barbell, Isolation, Beginner, (8, 12), 1),
    ("Dumbbell Curl", Biceps, &[], ElbowFlexion, Dumbbell, Isolation, Beginner, (10, 15), 1),
    ("Incline Dumbbell Curl", Biceps, &[], ElbowFlexion, Dumbbell, Isolation, Intermediate, (10, 15), 1),
    ("Cable Curl", Biceps, &[], ElbowFlexion, Cable, Isolation, Beginner, (10, 15), 1),
    // Triceps
    ("Close-Grip Bench Press", Triceps, &[Chest], HorizontalPush, Barbell, Compound, Intermediate, (6, 10), 2),
    ("Cable Triceps Pushdown", Triceps, &[], ElbowExtension, Cable, Isolation, Beginner, (10, 15), 1),
    ("Overhead Cable Triceps Extension", Triceps, &[], ElbowExtension, Cable, Isolation, Intermediate, (10, 15), 1),
    ("Skull Crusher", Triceps, &[], ElbowExtension, Barbell, Isolation, Intermediate, (8, 12), 1),
    // Calves
    ("Standing Calf Raise", Calves, &[], CalfRaise, Machine, Isolation, Beginner, (10, 15), 1),
    ("Seated Calf Raise", Calves, &[], CalfRaise, Machine, Isolation, Beginner, (12, 20), 1),
    ("Dumbbell Calf Raise", Calves, &[], CalfRaise, Dumbbell, Isolation, Beginner, (12, 20), 1),
    // Abs
    ("Cable Crunch", Abs, &[], Core, Cable, Isolation, Beginner, (10, 15), 1),
    ("Crunch", Abs, &[], Core, Bodyweight, Isolation, Beginner, (15, 25), 1),
    ("Hanging Leg Raise", Abs, &[], Core, Bodyweight, Isolation, Intermediate, (8, 15), 1),
    ("Ab Wheel Rollout", Abs, &[], Core, Bodyweight, Isolation, Advanced, (6, 12), 1),
  ];

  pub const SFR_TABLE: &[(MovementPattern, Equipment, f64)] = &[
    (Squat, Barbell, 0.7),
    (Squat, Machine, 0.9),
    (Squat, Dumbbell, 0.8),
    (Hinge, Barbell, 0.6),
    (Hinge, Dumbbell, 0.7),
    (Hinge, Cable, 0.8),
    (Lunge, Barbell, 0.65),
    (Lunge, Dumbbell, 0.75),
    (Lunge, Bodyweight, 0.8),
    (HorizontalPush, Barbell, 0.75),
    (HorizontalPush, Dumbbell, 0.85),
    (HorizontalPush, Machine, 0.9),
    (HorizontalPush, Bodyweight, 0.8),
    (VerticalPush, Barbell, 0.65),
    (VerticalPush, Dumbbell, 0.75),
    (VerticalPush, Machine, 0.85),
    (HorizontalPull, Barbell, 0.7),
    (HorizontalPull, Dumbbell, 0.85),
    (HorizontalPull, Cable, 0.9),
    (HorizontalPull, Machine, 0.9),
    (VerticalPull, Bodyweight, 0.8),
    (VerticalPull, Cable, 0.9),
    (VerticalPull, Machine, 0.9),
    (KneeExtension, Machine, 1.0),
    (KneeFlexion, Machine, 1.0),
    (KneeFlexion, Bodyweight, 0.7),
    (HipExtension, Barbell, 0.85),
    (HipExtension, Cable, 0.9),
    (HipExtension, Machine, 0.95),
    (HipExtension, Bodyweight, 0.8),
    (Fly, Cable, 1.0),
    (Fly, Machine, 1.0),
    (Fly, Dumbbell, 0.85),
    (LateralRaise, Dumbbell, 0.95),
    (LateralRaise, Cable, 1.0),
    (LateralRaise, Machine, 1.0),
    (ElbowFlexion, Barbell, 0.85),
    (ElbowFlexion, Dumbbell, 0.95),
    (ElbowFlexion, Cable, 1.0),
    (ElbowExtension, Barbell, 0.8),
    (ElbowExtension, Dumbbell, 0.9),
    (ElbowExtension, Cable, 1.0),
    (CalfRaise, Machine, 0.95),
    (CalfRaise, Dumbbell, 0.85),
    (CalfRaise, Bodyweight, 0.8),
    (Core, Cable, 0.95),
    (Core, Bodyweight, 0.85),
  ];
}
