//! Working-weight recommendation
//!
//! Tiers are tried strictly in order and the first one that has data wins:
//! calibration test -> recent history -> related lift -> population
//! standards -> finding-weight protocol. Every tier reports which one it was
//! through `WeightSource`, and every emitted weight is plate-rounded.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::{
  BodyComposition, Confidence, ExerciseHistoryRecord, StrengthCalibrationRecord,
  UserTrainingProfile,
};
use crate::strength::{
  estimate_1rm, related_lift, round_to_nearest_plate, standard_ratio, warmup_protocol,
  working_weight_from_e1rm, WarmupSet,
};

const HISTORY_SESSIONS: usize = 10;
const HISTORY_MAX_REPS: u32 = 12;
const HIGH_CONFIDENCE_SESSIONS: usize = 3;
const STANDARDS_CONSERVATIVE_FACTOR: f64 = 0.8;
const FINDING_WEIGHT_BODYWEIGHT_SHARE: f64 = 0.2;
const FINDING_WEIGHT_DEFAULT_KG: f64 = 20.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "tier", rename_all = "snake_case")]
pub enum WeightSource {
  Calibrated {
    e1rm: f64,
    tested_at: DateTime<Utc>,
  },
  FromHistory {
    e1rm: f64,
    sessions: usize,
  },
  FromRelatedLift {
    parent: String,
    ratio: f64,
    parent_e1rm: f64,
  },
  FromStandards {
    bodyweight_kg: f64,
    bodyweight_ratio: f64,
  },
  NeedsCalibration,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightRange {
  pub low: f64,
  pub high: f64,
}

/// Step-up instructions used when there is nothing to estimate from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FindingWeightProtocol {
  pub starting_weight: f64,
  pub increment: f64,
  pub target_rpe: f64,
  pub steps: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkingWeightRecommendation {
  pub exercise_name: String,
  pub recommended_weight: f64,
  pub weight_range: WeightRange,
  pub confidence: Confidence,
  pub rationale: String,
  pub source: WeightSource,
  pub warmup_protocol: Vec<WarmupSet>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub finding_weight_protocol: Option<FindingWeightProtocol>,
}

/// An e1RM taken directly from this exercise's own data
struct DirectEstimate {
  e1rm: f64,
  confidence: Confidence,
  source: WeightSource,
}

/// ---------------------------------------------------------------------------
/// Resolver
/// ---------------------------------------------------------------------------

pub struct WeightResolver<'a> {
  profile: &'a UserTrainingProfile,
  body: Option<&'a BodyComposition>,
  calibrations: &'a [StrengthCalibrationRecord],
  history: &'a [ExerciseHistoryRecord],
}

impl<'a> WeightResolver<'a> {
  pub fn new(
    profile: &'a UserTrainingProfile,
    body: Option<&'a BodyComposition>,
    calibrations: &'a [StrengthCalibrationRecord],
    history: &'a [ExerciseHistoryRecord],
  ) -> Self {
    Self {
      profile,
      body,
      calibrations,
      history,
    }
  }

  pub fn resolve(&self, exercise_name: &str, target_reps: u32, target_rir: u32) -> WorkingWeightRecommendation {
    let recommendation = self
      .from_direct(exercise_name, target_reps, target_rir)
      .or_else(|| self.from_related_lift(exercise_name, target_reps, target_rir))
      .or_else(|| self.from_standards(exercise_name, target_reps, target_rir))
      .unwrap_or_else(|| self.finding_weight(exercise_name));

    debug!(
      exercise = exercise_name,
      weight = recommendation.recommended_weight,
      confidence = %recommendation.confidence,
      "working weight resolved"
    );

    recommendation
  }

  /// Latest calibration test for an exercise
  fn latest_calibration(&self, exercise_name: &str) -> Option<&'a StrengthCalibrationRecord> {
    self
      .calibrations
      .iter()
      .filter(|c| c.exercise_name.eq_ignore_ascii_case(exercise_name))
      .max_by_key(|c| c.tested_at)
  }

  /// Conservative e1RM ceiling from the most recent sessions
  fn history_estimate(&self, exercise_name: &str) -> Option<(f64, usize)> {
    let mut sessions: Vec<&ExerciseHistoryRecord> = self
      .history
      .iter()
      .filter(|h| h.exercise_name.eq_ignore_ascii_case(exercise_name))
      .collect();
    sessions.sort_by(|a, b| b.performed_at.cmp(&a.performed_at));
    sessions.truncate(HISTORY_SESSIONS);

    let mut estimates: Vec<f64> = Vec::new();
    let mut contributing = 0;
    for session in &sessions {
      let before = estimates.len();
      estimates.extend(
        session
          .completed_sets()
          .filter(|s| (1..=HISTORY_MAX_REPS).contains(&s.reps) && s.weight > 0.0)
          .map(|s| estimate_1rm(s.weight, s.reps, s.rpe)),
      );
      if estimates.len() > before {
        contributing += 1;
      }
    }

    if estimates.is_empty() {
      return None;
    }

    estimates.sort_by(|a, b| b.total_cmp(a));
    let index = (estimates.len() as f64 * 0.1).floor() as usize;
    Some((estimates[index], contributing))
  }

  fn direct_estimate(&self, exercise_name: &str) -> Option<DirectEstimate> {
    if let Some(calibration) = self.latest_calibration(exercise_name) {
      return Some(DirectEstimate {
        e1rm: calibration.estimated_1rm,
        confidence: calibration.confidence,
        source: WeightSource::Calibrated {
          e1rm: calibration.estimated_1rm,
          tested_at: calibration.tested_at,
        },
      });
    }

    self.history_estimate(exercise_name).map(|(e1rm, sessions)| DirectEstimate {
      e1rm,
      confidence: if sessions >= HIGH_CONFIDENCE_SESSIONS {
        Confidence::High
      } else {
        Confidence::Medium
      },
      source: WeightSource::FromHistory { e1rm, sessions },
    })
  }

  fn from_direct(&self, exercise_name: &str, target_reps: u32, target_rir: u32) -> Option<WorkingWeightRecommendation> {
    let estimate = self.direct_estimate(exercise_name)?;
    let working = working_weight_from_e1rm(estimate.e1rm, target_reps, target_rir);
    let rationale = match &estimate.source {
      WeightSource::Calibrated { .. } => format!(
        "Based on your calibration test (e1RM {:.1} kg) for {} reps at {} RIR",
        estimate.e1rm, target_reps, target_rir
      ),
      _ => format!(
        "Based on your recent sessions (conservative e1RM {:.1} kg) for {} reps at {} RIR",
        estimate.e1rm, target_reps, target_rir
      ),
    };
    Some(banded(exercise_name, working, estimate.confidence, rationale, estimate.source))
  }

  fn from_related_lift(&self, exercise_name: &str, target_reps: u32, target_rir: u32) -> Option<WorkingWeightRecommendation> {
    let (parent, ratio) = related_lift(exercise_name)?;
    let parent_estimate = self.direct_estimate(parent)?;
    let e1rm = parent_estimate.e1rm * ratio;
    let working = working_weight_from_e1rm(e1rm, target_reps, target_rir);
    let rationale = format!(
      "Estimated from your {} (e1RM {:.1} kg x {:.2})",
      parent, parent_estimate.e1rm, ratio
    );
    Some(banded(
      exercise_name,
      working,
      Confidence::Medium,
      rationale,
      WeightSource::FromRelatedLift {
        parent: parent.to_string(),
        ratio,
        parent_e1rm: parent_estimate.e1rm,
      },
    ))
  }

  fn from_standards(&self, exercise_name: &str, target_reps: u32, target_rir: u32) -> Option<WorkingWeightRecommendation> {
    let body = self.body?;
    let bracket = body.ffmi_bracket(self.profile.sex);
    let ratio = standard_ratio(exercise_name, self.profile.experience, bracket, self.profile.sex).or_else(|| {
      let (parent, child_ratio) = related_lift(exercise_name)?;
      standard_ratio(parent, self.profile.experience, bracket, self.profile.sex).map(|r| r * child_ratio)
    })?;

    let e1rm = body.weight_kg * ratio * STANDARDS_CONSERVATIVE_FACTOR;
    let working = working_weight_from_e1rm(e1rm, target_reps, target_rir);
    let recommended = round_to_nearest_plate(working);

    Some(WorkingWeightRecommendation {
      exercise_name: exercise_name.to_string(),
      recommended_weight: recommended,
      weight_range: WeightRange {
        low: round_to_nearest_plate(working * 0.9),
        high: recommended,
      },
      confidence: Confidence::Low,
      rationale: format!(
        "Estimated from population standards for your body weight ({:.1} kg); \
         start light and adjust after the first session",
        body.weight_kg
      ),
      source: WeightSource::FromStandards {
        bodyweight_kg: body.weight_kg,
        bodyweight_ratio: ratio,
      },
      warmup_protocol: warmup_protocol(exercise_name, recommended),
      finding_weight_protocol: None,
    })
  }

  fn finding_weight(&self, exercise_name: &str) -> WorkingWeightRecommendation {
    let starting = match self.body {
      Some(body) => round_to_nearest_plate(body.weight_kg * FINDING_WEIGHT_BODYWEIGHT_SHARE),
      None => FINDING_WEIGHT_DEFAULT_KG,
    };
    let increment = if starting >= 20.0 { 2.5 } else { 1.0 };

    WorkingWeightRecommendation {
      exercise_name: exercise_name.to_string(),
      recommended_weight: starting,
      weight_range: WeightRange {
        low: starting,
        high: starting,
      },
      confidence: Confidence::Low,
      rationale: "No data for this exercise yet; find your working weight this session".to_string(),
      source: WeightSource::NeedsCalibration,
      warmup_protocol: warmup_protocol(exercise_name, starting),
      finding_weight_protocol: Some(FindingWeightProtocol {
        starting_weight: starting,
        increment,
        target_rpe: 7.0,
        steps: vec![
          format!("Perform one set at {} kg for the target reps", starting),
          "Rate the set: how many more reps could you have done?".to_string(),
          format!("If RPE is below 7, add {} kg and rest 2 minutes", increment),
          "Repeat until a set lands at RPE 7-8, then use that weight for your working sets".to_string(),
        ],
      }),
    }
  }
}

/// Recommendation with a symmetric variance band: +/-5% at high confidence, +/-10% otherwise
fn banded(
  exercise_name: &str,
  working: f64,
  confidence: Confidence,
  rationale: String,
  source: WeightSource,
) -> WorkingWeightRecommendation {
  let band = if confidence == Confidence::High { 0.05 } else { 0.10 };
  let recommended = round_to_nearest_plate(working);
  WorkingWeightRecommendation {
    exercise_name: exercise_name.to_string(),
    recommended_weight: recommended,
    weight_range: WeightRange {
      low: round_to_nearest_plate(working * (1.0 - band)),
      high: round_to_nearest_plate(working * (1.0 + band)),
    },
    confidence,
    rationale,
    source,
    warmup_protocol: warmup_protocol(exercise_name, recommended),
    finding_weight_protocol: None,
  }
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
