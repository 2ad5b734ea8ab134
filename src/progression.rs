//! Next-Session Progression (double progression)
//!
//! Decides the load and rep target for an exercise's next session from how
//! the most recent sessions went against the prescribed rep range.
//!
//! Key principles:
//! - Reps first, then load: the weight only moves once every working set
//!   reaches the top of the range
//! - One bad session is noise; two consecutive sessions below the range
//!   floor mean the load is too heavy
//! - Every emitted weight is plate-rounded

use serde::{Deserialize, Serialize};

use crate::models::{ExerciseHistoryRecord, SetLog};
use crate::strength::round_to_nearest_plate;

const LARGE_INCREMENT_KG: f64 = 2.5;
const SMALL_INCREMENT_KG: f64 = 1.0;
const LARGE_INCREMENT_FROM_KG: f64 = 20.0;
const REGRESSION_FACTOR: f64 = 0.9;

// ---------------------------------------------------------------------------
/// Progression Decision: What the next session should do
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgressionDecision {
    IncreaseLoad, // Every working set hit the top of the range
    AddReps,      // Inside the range, keep the load and chase reps
    Hold,         // Fell short once, repeat the session
    Regress,      // Below the floor two sessions running
    NoHistory,    // Nothing logged yet
}

impl std::fmt::Display for ProgressionDecision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::IncreaseLoad => write!(f, "increase_load"),
            Self::AddReps => write!(f, "add_reps"),
            Self::Hold => write!(f, "hold"),
            Self::Regress => write!(f, "regress"),
            Self::NoHistory => write!(f, "no_history"),
        }
    }
}

// ---------------------------------------------------------------------------
/// Next Session Target
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NextSessionTarget {
    pub exercise_name: String,
    pub decision: ProgressionDecision,
    /// `None` when there is no logged load to build on
    pub weight: Option<f64>,
    pub target_reps: u32,
    pub reason: String,
}

/// Load increment for the next step up from `weight`
pub fn load_increment(weight: f64) -> f64 {
    if weight >= LARGE_INCREMENT_FROM_KG {
        LARGE_INCREMENT_KG
    } else {
        SMALL_INCREMENT_KG
    }
}

/// Heaviest completed set of a session is treated as the working load
fn working_sets(record: &ExerciseHistoryRecord) -> Vec<&SetLog> {
    let top = record
        .completed_sets()
        .map(|s| s.weight)
        .fold(0.0_f64, f64::max);
    record
        .completed_sets()
        .filter(|s| (s.weight - top).abs() < f64::EPSILON)
        .collect()
}

fn fell_below_floor(record: &ExerciseHistoryRecord, min_reps: u32) -> bool {
    let sets = working_sets(record);
    sets.is_empty() || sets.iter().any(|s| s.reps < min_reps)
}

/// Decide the next session for one exercise
///
/// `history` holds this exercise's sessions in any order; the two most
/// recent are considered.
pub fn decide_next_session(
    exercise_name: &str,
    history: &[ExerciseHistoryRecord],
    rep_range: (u32, u32),
) -> NextSessionTarget {
    let (min_reps, max_reps) = rep_range;

    let mut sessions: Vec<&ExerciseHistoryRecord> = history
        .iter()
        .filter(|h| h.exercise_name.eq_ignore_ascii_case(exercise_name))
        .collect();
    sessions.sort_by(|a, b| b.performed_at.cmp(&a.performed_at));

    let Some(latest) = sessions.first() else {
        return NextSessionTarget {
            exercise_name: exercise_name.to_string(),
            decision: ProgressionDecision::NoHistory,
            weight: None,
            target_reps: min_reps,
            reason: "No sessions logged yet; start with the recommended working weight".to_string(),
        };
    };

    let sets = working_sets(latest);
    let weight = sets.first().map(|s| s.weight).unwrap_or(0.0);

    let target = |decision, weight: f64, target_reps, reason: String| NextSessionTarget {
        exercise_name: exercise_name.to_string(),
        decision,
        weight: Some(round_to_nearest_plate(weight)),
        target_reps,
        reason,
    };

    if !sets.is_empty() && sets.iter().all(|s| s.reps >= max_reps) {
        let increment = load_increment(weight);
        return target(
            ProgressionDecision::IncreaseLoad,
            weight + increment,
            min_reps,
            format!("All working sets reached {} reps; add {} kg", max_reps, increment),
        );
    }

    if fell_below_floor(latest, min_reps) {
        let previous_short = sessions
            .get(1)
            .is_some_and(|previous| fell_below_floor(previous, min_reps));
        if previous_short {
            return target(
                ProgressionDecision::Regress,
                weight * REGRESSION_FACTOR,
                min_reps,
                format!("Below {} reps for two sessions in a row; drop the load 10%", min_reps),
            );
        }
        return target(
            ProgressionDecision::Hold,
            weight,
            min_reps,
            format!("Missed the {}-rep floor once; repeat this load", min_reps),
        );
    }

    let lowest = sets.iter().map(|s| s.reps).min().unwrap_or(min_reps);
    target(
        ProgressionDecision::AddReps,
        weight,
        (lowest + 1).min(max_reps),
        "Inside the rep range; keep the load and add a rep".to_string(),
    )
}

// ---------------------------------------------------------------------------
/// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::mock_history;

    #[test]
    fn test_no_history() {
        let next = decide_next_session("Barbell Row", &[], (8, 12));
        assert_eq!(next.decision, ProgressionDecision::NoHistory);
        assert_eq!(next.weight, None);
        assert_eq!(next.target_reps, 8);
    }

    #[test]
    fn test_top_of_range_increases_load() {
        let history = vec![mock_history("Barbell Row", 2, vec![(60.0, 12), (60.0, 12), (60.0, 13)])];
        let next = decide_next_session("Barbell Row", &history, (8, 12));
        assert_eq!(next.decision, ProgressionDecision::IncreaseLoad);
        assert_eq!(next.weight, Some(62.5));
        assert_eq!(next.target_reps, 8);
    }

    #[test]
    fn test_light_loads_use_small_increment() {
        let history = vec![mock_history("Dumbbell Lateral Raise", 2, vec![(8.0, 20), (8.0, 20)])];
        let next = decide_next_session("Dumbbell Lateral Raise", &history, (12, 20));
        assert_eq!(next.decision, ProgressionDecision::IncreaseLoad);
        assert_eq!(next.weight, Some(9.0));
    }

    #[test]
    fn test_inside_range_adds_reps() {
        let history = vec![mock_history("Barbell Row", 2, vec![(60.0, 10), (60.0, 9), (60.0, 12)])];
        let next = decide_next_session("Barbell Row", &history, (8, 12));
        assert_eq!(next.decision, ProgressionDecision::AddReps);
        assert_eq!(next.weight, Some(60.0));
        assert_eq!(next.target_reps, 10);
    }

    #[test]
    fn test_lighter_backoff_sets_are_ignored() {
        let history = vec![mock_history("Barbell Row", 2, vec![(60.0, 12), (60.0, 12), (40.0, 6)])];
        let next = decide_next_session("Barbell Row", &history, (8, 12));
        assert_eq!(next.decision, ProgressionDecision::IncreaseLoad);
    }

    #[test]
    fn test_single_miss_holds() {
        let history = vec![
            mock_history("Barbell Row", 2, vec![(60.0, 7), (60.0, 8)]),
            mock_history("Barbell Row", 5, vec![(60.0, 9), (60.0, 9)]),
        ];
        let next = decide_next_session("Barbell Row", &history, (8, 12));
        assert_eq!(next.decision, ProgressionDecision::Hold);
        assert_eq!(next.weight, Some(60.0));
    }

    #[test]
    fn test_two_consecutive_misses_regress() {
        let history = vec![
            mock_history("Barbell Row", 5, vec![(60.0, 6), (60.0, 7)]),
            mock_history("Barbell Row", 2, vec![(60.0, 7), (60.0, 8)]),
        ];
        let next = decide_next_session("Barbell Row", &history, (8, 12));
        assert_eq!(next.decision, ProgressionDecision::Regress);
        // 60 * 0.9 = 54 -> 55
        assert_eq!(next.weight, Some(55.0));
    }

    #[test]
    fn test_other_exercises_are_ignored() {
        let history = vec![mock_history("Barbell Curl", 1, vec![(30.0, 12)])];
        let next = decide_next_session("Barbell Row", &history, (8, 12));
        assert_eq!(next.decision, ProgressionDecision::NoHistory);
    }
}
