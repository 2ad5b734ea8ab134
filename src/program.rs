//! Session & mesocycle assembly
//!
//! Composes recovery, fatigue budget, volume, periodization, rep ranges and
//! working weights into a dated multi-week program. Pure over a
//! `TrainingSnapshot` and "today": the same inputs always produce the same
//! program.

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::catalog::{sfr_score, systemic_fatigue_cost, ExerciseCatalog, ExerciseFilter};
use crate::fatigue::{calculate_fatigue_budget, FatigueBudgetConfig};
use crate::models::{
  Difficulty, Equipment, ExerciseDefinition, ExperienceLevel, Mechanic, MuscleGroup,
  UserTrainingProfile,
};
use crate::periodization::{build_periodization_plan, week_progress, PeriodizationPlan, WeeklyProgression};
use crate::recovery::{calculate_recovery_factors, RecoveryFactors};
use crate::rep_range::{calculate_rep_range, RepRangeConfig, RepRangeContext};
use crate::snapshot::TrainingSnapshot;
use crate::strength::round_to_nearest_plate;
use crate::volume::{allocate_volume, weekly_schedule, ScheduledDay, SplitType, VolumePerMuscle};
use crate::weights::{WeightResolver, WorkingWeightRecommendation};

const COMPOUND_SET_CAP: u32 = 4;
const ISOLATION_SET_CAP: u32 = 3;
const DELOAD_RIR: u32 = 4;
const MINUTES_PER_SET: f64 = 2.5;
const SESSION_OVERHEAD_MINUTES: f64 = 10.0;

/// ---------------------------------------------------------------------------
/// Output Types
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailedExercise {
  pub exercise_name: String,
  pub primary_muscle: MuscleGroup,
  pub equipment: Equipment,
  pub mechanic: Mechanic,
  pub sets: u32,
  pub rep_range: RepRangeConfig,
  /// Working weight for this week; `None` for bodyweight movements
  pub target_weight: Option<f64>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub weight_recommendation: Option<WorkingWeightRecommendation>,
  pub sfr: f64,
  pub systemic_fatigue: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailedSession {
  pub date: NaiveDate,
  pub weekday: Weekday,
  pub label: String,
  pub exercises: Vec<DetailedExercise>,
  pub total_sets: u32,
  pub estimated_duration_minutes: u32,
  pub systemic_fatigue: f64,
  /// Systemic cost passed the warning level of the fatigue budget
  pub fatigue_warning: bool,
  /// Exercise selection was cut short by the fatigue budget
  pub truncated: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MesocycleWeek {
  pub week_number: u32,
  pub start_date: NaiveDate,
  pub is_deload: bool,
  pub progression: WeeklyProgression,
  pub sessions: Vec<DetailedSession>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FullProgramRecommendation {
  pub user_id: String,
  pub split: SplitType,
  pub split_name: String,
  pub start_date: NaiveDate,
  pub weekly_schedule: Vec<ScheduledDay>,
  pub periodization: PeriodizationPlan,
  pub recovery: RecoveryFactors,
  pub fatigue_budget: FatigueBudgetConfig,
  pub volume_per_muscle: VolumePerMuscle,
  pub weeks: Vec<MesocycleWeek>,
  pub warnings: Vec<String>,
}

impl FullProgramRecommendation {
  pub fn mesocycle_length_weeks(&self) -> u32 {
    self.periodization.mesocycle_length_weeks
  }
}

/// First Monday on or after `today`
pub fn mesocycle_start(today: NaiveDate) -> NaiveDate {
  let offset = (7 - i64::from(today.weekday().num_days_from_monday())) % 7;
  today + Duration::days(offset)
}

/// ---------------------------------------------------------------------------
/// Exercise Selection
/// ---------------------------------------------------------------------------

/// Ranked candidates for one muscle
///
/// Filters by equipment and injuries, narrows to beginner movements for
/// novices and to the SFR floor when that leaves something, then ranks by
/// SFR (ties by name) with the first slot(s) reserved for compounds.
pub fn select_exercises<'c>(
  catalog: &'c ExerciseCatalog,
  muscle: MuscleGroup,
  profile: &UserTrainingProfile,
  min_sfr: f64,
) -> Vec<&'c ExerciseDefinition> {
  let filter = ExerciseFilter {
    equipment: &profile.available_equipment,
    excluded_muscles: &profile.injured_muscles,
    max_difficulty: None,
  };
  let mut candidates = catalog.eligible(muscle, &filter);

  if profile.experience == ExperienceLevel::Novice {
    let beginner: Vec<_> = candidates
      .iter()
      .copied()
      .filter(|e| e.difficulty == Difficulty::Beginner)
      .collect();
    if !beginner.is_empty() {
      candidates = beginner;
    }
  }

  let efficient: Vec<_> = candidates
    .iter()
    .copied()
    .filter(|e| sfr_score(e.pattern, e.equipment) >= min_sfr)
    .collect();
  if !efficient.is_empty() {
    candidates = efficient;
  }

  candidates.sort_by(|a, b| {
    sfr_score(b.pattern, b.equipment)
      .total_cmp(&sfr_score(a.pattern, a.equipment))
      .then_with(|| a.name.cmp(&b.name))
  });

  let compound_slots = if muscle.is_small() { 1 } else { 2 };
  let leading: Vec<&ExerciseDefinition> = candidates
    .iter()
    .copied()
    .filter(|e| e.is_compound())
    .take(compound_slots)
    .collect();
  let rest: Vec<&ExerciseDefinition> = candidates
    .into_iter()
    .filter(|e| !leading.iter().any(|l| l.name == e.name))
    .collect();

  leading.into_iter().chain(rest).collect()
}

/// ---------------------------------------------------------------------------
/// Assembler
/// ---------------------------------------------------------------------------

pub struct ProgramAssembler<'a> {
  snapshot: &'a TrainingSnapshot,
  budget: FatigueBudgetConfig,
  volume: VolumePerMuscle,
  plan: PeriodizationPlan,
  resolver: WeightResolver<'a>,
}

impl<'a> ProgramAssembler<'a> {
  pub fn new(
    snapshot: &'a TrainingSnapshot,
    budget: FatigueBudgetConfig,
    volume: VolumePerMuscle,
    plan: PeriodizationPlan,
  ) -> Self {
    let resolver = WeightResolver::new(
      &snapshot.profile,
      snapshot.body.as_ref(),
      &snapshot.calibrations,
      &snapshot.history,
    );
    Self {
      snapshot,
      budget,
      volume,
      plan,
      resolver,
    }
  }

  fn rep_context(&self, progression: &WeeklyProgression) -> RepRangeContext {
    let progress = if progression.is_deload {
      1.0
    } else {
      week_progress(progression.week, self.plan.training_weeks)
    };
    RepRangeContext {
      goal: self.snapshot.profile.goal,
      experience: self.snapshot.profile.experience,
      model: self.plan.model,
      progress,
    }
  }

  fn detail_exercise(
    &self,
    exercise: &ExerciseDefinition,
    sets: u32,
    position: usize,
    progression: &WeeklyProgression,
  ) -> DetailedExercise {
    let mut rep_range = calculate_rep_range(exercise, position, &self.rep_context(progression));
    if progression.is_deload {
      rep_range.target_rir = DELOAD_RIR;
    }

    let weight_recommendation = match exercise.equipment {
      Equipment::Bodyweight => None,
      _ => Some(self.resolver.resolve(&exercise.name, rep_range.max_reps, rep_range.target_rir)),
    };
    let target_weight = weight_recommendation
      .as_ref()
      .map(|w| round_to_nearest_plate(w.recommended_weight * progression.intensity_modifier));

    DetailedExercise {
      exercise_name: exercise.name.clone(),
      primary_muscle: exercise.primary_muscle,
      equipment: exercise.equipment,
      mechanic: exercise.mechanic,
      sets,
      rep_range,
      target_weight,
      weight_recommendation,
      sfr: sfr_score(exercise.pattern, exercise.equipment),
      systemic_fatigue: systemic_fatigue_cost(exercise, sets),
    }
  }

  /// Per-session set target for a muscle this week
  fn session_sets(&self, muscle: MuscleGroup, volume_modifier: f64) -> u32 {
    let Some(volume) = self.volume.get(&muscle) else {
      return 0;
    };
    let per_session = volume.sets.div_ceil(volume.frequency.max(1));
    ((f64::from(per_session) * volume_modifier).round() as u32).max(1)
  }

  pub fn build_session(
    &self,
    day: &ScheduledDay,
    date: NaiveDate,
    progression: &WeeklyProgression,
    warnings: &mut Vec<String>,
  ) -> DetailedSession {
    let profile = &self.snapshot.profile;
    let limit = f64::from(self.budget.systemic_limit);

    let mut muscles = day.muscles.clone();
    muscles.sort_by_key(|m| m.priority());

    let mut exercises: Vec<DetailedExercise> = Vec::new();
    let mut running_cost = 0.0;
    let mut truncated = false;

    'muscles: for muscle in muscles {
      let candidates = select_exercises(&self.snapshot.catalog, muscle, profile, self.budget.min_sfr_threshold);
      if candidates.is_empty() {
        let warning = format!(
          "No eligible exercises for {} with your equipment and injuries; it is skipped",
          muscle
        );
        if !warnings.contains(&warning) {
          warnings.push(warning);
        }
        continue;
      }

      let mut remaining = self.session_sets(muscle, progression.volume_modifier);
      for exercise in candidates {
        if remaining == 0 {
          break;
        }
        if running_cost > limit {
          truncated = true;
          break 'muscles;
        }
        let cap = if exercise.is_compound() {
          COMPOUND_SET_CAP
        } else {
          ISOLATION_SET_CAP
        };
        let sets = remaining.min(cap);
        let detailed = self.detail_exercise(exercise, sets, exercises.len(), progression);
        running_cost += detailed.systemic_fatigue;
        remaining -= sets;
        exercises.push(detailed);
      }
    }

    if truncated {
      warn!(
        date = %date,
        label = %day.label,
        cost = running_cost,
        limit,
        "session truncated by systemic fatigue budget"
      );
      warnings.push(format!(
        "{} session on {} was shortened to stay within your fatigue budget",
        day.label, date
      ));
    }

    let total_sets: u32 = exercises.iter().map(|e| e.sets).sum();
    let systemic_fatigue = (running_cost * 100.0).round() / 100.0;

    DetailedSession {
      date,
      weekday: day.weekday,
      label: day.label.clone(),
      exercises,
      total_sets,
      estimated_duration_minutes: (f64::from(total_sets) * MINUTES_PER_SET + SESSION_OVERHEAD_MINUTES).round() as u32,
      systemic_fatigue,
      fatigue_warning: running_cost > self.budget.systemic_warning_level(),
      truncated,
    }
  }

  pub fn build_weeks(&self, schedule: &[ScheduledDay], start: NaiveDate, warnings: &mut Vec<String>) -> Vec<MesocycleWeek> {
    self
      .plan
      .weekly_progression
      .iter()
      .map(|progression| {
        let week_start = start + Duration::weeks(i64::from(progression.week) - 1);
        let sessions = schedule
          .iter()
          .map(|day| {
            let date = week_start + Duration::days(i64::from(day.weekday.num_days_from_monday()));
            self.build_session(day, date, progression, warnings)
          })
          .collect();
        MesocycleWeek {
          week_number: progression.week,
          start_date: week_start,
          is_deload: progression.is_deload,
          progression: progression.clone(),
          sessions,
        }
      })
      .collect()
  }
}

/// Generates a complete mesocycle for the snapshot's user
pub fn generate_program(snapshot: &TrainingSnapshot, today: NaiveDate) -> FullProgramRecommendation {
  let profile = &snapshot.profile;
  let days = profile.training_days();

  let recovery = calculate_recovery_factors(profile);
  let budget = calculate_fatigue_budget(profile);
  let split = SplitType::for_days(days);
  let volume = allocate_volume(days, split, profile.experience, profile.goal, &recovery);
  let plan = build_periodization_plan(profile, &recovery);
  let schedule = weekly_schedule(split, days);
  let start_date = mesocycle_start(today);

  let mut warnings = recovery.warnings.clone();
  let assembler = ProgramAssembler::new(snapshot, budget.clone(), volume.clone(), plan.clone());
  let weeks = assembler.build_weeks(&schedule, start_date, &mut warnings);

  info!(
    user_id = %profile.user_id,
    split = %split,
    model = %plan.model,
    weeks = plan.mesocycle_length_weeks,
    "program generated"
  );

  FullProgramRecommendation {
    user_id: profile.user_id.clone(),
    split,
    split_name: split.name().to_string(),
    start_date,
    weekly_schedule: schedule,
    periodization: plan,
    recovery,
    fatigue_budget: budget,
    volume_per_muscle: volume,
    weeks,
    warnings,
  }
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
