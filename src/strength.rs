//! Load math shared by the weight resolver and calibration
//!
//! e1RM estimation, RIR-based working weights, plate rounding, warm-up
//! ladders, and the two static strength tables (population standards and
//! related-lift ratios).

use serde::{Deserialize, Serialize};

use crate::catalog::is_heavy_compound;
use crate::models::{ExperienceLevel, FfmiBracket, Sex};

const SAFETY_MARGIN: f64 = 0.95;
const HIGH_REP_THRESHOLD: u32 = 12;
const SMALL_PLATE_CUTOFF: f64 = 20.0;
const PLATE_INCREMENT: f64 = 2.5;
const PRIMER_THRESHOLD_KG: f64 = 80.0;
const FEMALE_STANDARD_SCALE: f64 = 0.7;

fn round1(value: f64) -> f64 {
  (value * 10.0).round() / 10.0
}

/// ---------------------------------------------------------------------------
/// e1RM & Working Weight
/// ---------------------------------------------------------------------------

/// Estimated one-rep max from a sub-maximal set
///
/// A single is returned as-is. Sets above 12 reps use a linear estimate;
/// otherwise reps-in-reserve implied by RPE are added to the rep count and
/// the Brzycki, Epley and Lombardi estimates are averaged.
pub fn estimate_1rm(weight: f64, reps: u32, rpe: Option<f64>) -> f64 {
  if reps == 0 || weight <= 0.0 {
    return 0.0;
  }
  if reps == 1 {
    return weight;
  }
  if reps > HIGH_REP_THRESHOLD {
    return round1(weight * (1.0 + f64::from(reps) / 40.0));
  }

  let effective_reps = match rpe {
    Some(rpe) => f64::from(reps) + (10.0 - rpe.clamp(1.0, 10.0)),
    None => f64::from(reps),
  };

  let brzycki = weight * 36.0 / (37.0 - effective_reps);
  let epley = weight * (1.0 + effective_reps / 30.0);
  let lombardi = weight * effective_reps.powf(0.10);

  round1((brzycki + epley + lombardi) / 3.0)
}

/// Load for `target_reps` leaving `target_rir` in the tank, with a 5% safety margin
pub fn working_weight_from_e1rm(e1rm: f64, target_reps: u32, target_rir: u32) -> f64 {
  let effective_reps = f64::from(target_reps + target_rir);
  let percentage = ((37.0 - effective_reps) / 36.0).max(0.0);
  round1(e1rm * percentage * SAFETY_MARGIN)
}

/// Nearest whole kilogram under 20 kg, nearest 2.5 kg from 20 kg up
pub fn round_to_nearest_plate(weight: f64) -> f64 {
  let weight = weight.max(0.0);
  if weight < SMALL_PLATE_CUTOFF {
    let rounded = weight.round();
    if rounded < SMALL_PLATE_CUTOFF {
      return rounded;
    }
  }
  ((weight / PLATE_INCREMENT).round() * PLATE_INCREMENT).max(SMALL_PLATE_CUTOFF)
}

/// ---------------------------------------------------------------------------
/// Warm-up Ladder
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WarmupSet {
  /// Fraction of the working weight
  pub percentage: f64,
  pub weight: f64,
  pub reps: u32,
  pub rest_seconds: u32,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub note: Option<String>,
}

impl WarmupSet {
  fn at(working_weight: f64, percentage: f64, reps: u32, rest_seconds: u32) -> Self {
    Self {
      percentage,
      weight: round_to_nearest_plate(working_weight * percentage),
      reps,
      rest_seconds,
      note: None,
    }
  }
}

pub fn warmup_protocol(exercise_name: &str, working_weight: f64) -> Vec<WarmupSet> {
  if working_weight < SMALL_PLATE_CUTOFF {
    return vec![WarmupSet::at(working_weight, 0.5, 12, 60)];
  }

  let mut ladder = vec![
    WarmupSet::at(working_weight, 0.4, 10, 60),
    WarmupSet::at(working_weight, 0.6, 6, 90),
    WarmupSet::at(working_weight, 0.8, 3, 120),
  ];

  if is_heavy_compound(exercise_name) && working_weight > PRIMER_THRESHOLD_KG {
    let mut primer = WarmupSet::at(working_weight, 0.9, 1, 120);
    primer.note = Some("Primer single: crisp and fast, not a grind".to_string());
    ladder.push(primer);
  }

  ladder
}

/// ---------------------------------------------------------------------------
/// Strength Standards
/// ---------------------------------------------------------------------------

/// e1RM as a multiple of body weight, by FFMI bracket [low, average, high]
struct StandardRow {
  lift: &'static str,
  novice: [f64; 3],
  intermediate: [f64; 3],
  advanced: [f64; 3],
}

const STRENGTH_STANDARDS: &[StandardRow] = &[
  StandardRow {
    lift: "Barbell Back Squat",
    novice: [0.9, 1.0, 1.1],
    intermediate: [1.25, 1.4, 1.5],
    advanced: [1.6, 1.8, 2.0],
  },
  StandardRow {
    lift: "Barbell Bench Press",
    novice: [0.65, 0.75, 0.85],
    intermediate: [0.9, 1.0, 1.1],
    advanced: [1.2, 1.35, 1.5],
  },
  StandardRow {
    lift: "Conventional Deadlift",
    novice: [1.1, 1.25, 1.4],
    intermediate: [1.5, 1.7, 1.85],
    advanced: [2.0, 2.2, 2.4],
  },
  StandardRow {
    lift: "Overhead Press",
    novice: [0.4, 0.5, 0.55],
    intermediate: [0.6, 0.65, 0.75],
    advanced: [0.8, 0.9, 1.0],
  },
  StandardRow {
    lift: "Barbell Row",
    novice: [0.55, 0.65, 0.75],
    intermediate: [0.8, 0.9, 1.0],
    advanced: [1.05, 1.15, 1.3],
  },
];

fn standard_row(lift: &str) -> Option<&'static StandardRow> {
  STRENGTH_STANDARDS
    .iter()
    .find(|row| row.lift.eq_ignore_ascii_case(lift))
}

fn sex_scale(sex: Sex) -> f64 {
  match sex {
    Sex::Male => 1.0,
    Sex::Female => FEMALE_STANDARD_SCALE,
  }
}

/// Bodyweight multiple for a named lift, if it has a population standard
pub fn standard_ratio(
  lift: &str,
  experience: ExperienceLevel,
  bracket: FfmiBracket,
  sex: Sex,
) -> Option<f64> {
  let row = standard_row(lift)?;
  let by_bracket = match experience {
    ExperienceLevel::Novice => row.novice,
    ExperienceLevel::Intermediate => row.intermediate,
    ExperienceLevel::Advanced => row.advanced,
  };
  let index = match bracket {
    FfmiBracket::Low => 0,
    FfmiBracket::Average => 1,
    FfmiBracket::High => 2,
  };
  Some(by_bracket[index] * sex_scale(sex))
}

/// Population percentile (0-99) of an e1RM, using average-FFMI standards
///
/// Anchors: novice standard -> 25th, intermediate -> 50th, advanced -> 80th,
/// 125% of advanced -> 95th.
pub fn strength_percentile(lift: &str, sex: Sex, bodyweight_kg: f64, e1rm: f64) -> Option<f64> {
  if bodyweight_kg <= 0.0 {
    return None;
  }
  let row = standard_row(lift)?;
  let scale = sex_scale(sex);
  let ratio = e1rm / bodyweight_kg;
  let anchors = [
    (0.0, 0.0),
    (row.novice[1] * scale, 25.0),
    (row.intermediate[1] * scale, 50.0),
    (row.advanced[1] * scale, 80.0),
    (row.advanced[1] * scale * 1.25, 95.0),
  ];

  let percentile = anchors
    .windows(2)
    .find(|pair| ratio <= pair[1].0)
    .map(|pair| {
      let (x0, y0) = pair[0];
      let (x1, y1) = pair[1];
      y0 + (ratio - x0) / (x1 - x0) * (y1 - y0)
    })
    .unwrap_or(99.0);

  Some(round1(percentile.clamp(0.0, 99.0)))
}

/// ---------------------------------------------------------------------------
/// Related Lifts
/// ---------------------------------------------------------------------------

/// (exercise, parent lift, e1RM ratio to the parent)
const RELATED_LIFTS: &[(&str, &str, f64)] = &[
  ("Dumbbell Bench Press", "Barbell Bench Press", 0.8),
  ("Incline Dumbbell Press", "Barbell Bench Press", 0.7),
  ("Machine Chest Press", "Barbell Bench Press", 0.9),
  ("Close-Grip Bench Press", "Barbell Bench Press", 0.9),
  ("Hack Squat", "Barbell Back Squat", 1.1),
  ("Leg Press", "Barbell Back Squat", 1.8),
  ("Goblet Squat", "Barbell Back Squat", 0.4),
  ("Bulgarian Split Squat", "Barbell Back Squat", 0.35),
  ("Romanian Deadlift", "Conventional Deadlift", 0.7),
  ("Dumbbell Romanian Deadlift", "Conventional Deadlift", 0.5),
  ("Barbell Hip Thrust", "Conventional Deadlift", 1.0),
  ("Seated Dumbbell Shoulder Press", "Overhead Press", 0.75),
  ("Machine Shoulder Press", "Overhead Press", 0.9),
  ("Seated Cable Row", "Barbell Row", 0.9),
  ("Machine Row", "Barbell Row", 0.9),
  ("Chest-Supported Dumbbell Row", "Barbell Row", 0.6),
  ("Lat Pulldown", "Barbell Row", 0.85),
  ("Skull Crusher", "Close-Grip Bench Press", 0.45),
];

/// Parent lift and ratio for an exercise that has one
pub fn related_lift(exercise_name: &str) -> Option<(&'static str, f64)> {
  RELATED_LIFTS
    .iter()
    .find(|(name, _, _)| name.eq_ignore_ascii_case(exercise_name))
    .map(|(_, parent, ratio)| (*parent, *ratio))
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
