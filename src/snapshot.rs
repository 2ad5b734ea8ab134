//! Point-in-time view of everything a program generation reads
//!
//! Reads run concurrently. A failed read degrades to an empty or default
//! value with a warning so generation still produces a program.

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, warn};

use crate::catalog::ExerciseCatalog;
use crate::db::{StoreError, TrainingStore};
use crate::models::{BodyComposition, ExerciseHistoryRecord, StrengthCalibrationRecord, UserTrainingProfile};

#[derive(Debug, Clone)]
pub struct TrainingSnapshot {
  pub profile: UserTrainingProfile,
  pub body: Option<BodyComposition>,
  pub calibrations: Vec<StrengthCalibrationRecord>,
  pub history: Vec<ExerciseHistoryRecord>,
  pub catalog: ExerciseCatalog,
}

fn degrade<T>(result: Result<T, StoreError>, what: &str, user_id: &str, fallback: impl FnOnce() -> T) -> T {
  result.unwrap_or_else(|e| {
    warn!(user_id, error = %e, "failed to load {}; using default", what);
    fallback()
  })
}

impl TrainingSnapshot {
  /// Loads the user's data as of `now`, reading history back `history_window_days`
  pub async fn load<S>(store: &S, user_id: &str, now: DateTime<Utc>, history_window_days: u32) -> Self
  where
    S: TrainingStore + ?Sized,
  {
    let since = now - Duration::days(i64::from(history_window_days));

    let (profile, body, calibrations, history, injuries) = tokio::join!(
      store.load_profile(user_id),
      store.load_latest_body_composition(user_id),
      store.load_calibrations(user_id),
      store.load_exercise_history(user_id, since),
      store.load_injuries(user_id),
    );

    let mut profile = degrade(profile, "profile", user_id, || None)
      .unwrap_or_else(|| UserTrainingProfile::default_for(user_id));
    let body = degrade(body, "body composition", user_id, || None);
    let calibrations = degrade(calibrations, "calibrations", user_id, Vec::new);
    let history = degrade(history, "exercise history", user_id, Vec::new);
    profile
      .injured_muscles
      .extend(degrade(injuries, "injuries", user_id, Default::default));

    debug!(
      user_id,
      has_body = body.is_some(),
      calibrations = calibrations.len(),
      history = history.len(),
      injuries = profile.injured_muscles.len(),
      "training snapshot loaded"
    );

    Self {
      profile,
      body,
      calibrations,
      history,
      catalog: ExerciseCatalog::builtin(),
    }
  }
}
