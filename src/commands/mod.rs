//! Command surface: async entry points over `AppState`
//!
//! Each command loads what it needs through the store, runs the pure
//! engine, and writes results back. Errors serialize as tagged JSON.

pub mod calibration;
pub mod deload;
pub mod program;
pub mod progression;

pub use calibration::{record_calibration, CalibrationOutcome};
pub use deload::{check_deload, log_weekly_fatigue};
pub use program::{generate_and_save_program, generate_program_for_user, save_program};
pub use progression::{log_exercise_session, next_session_target};

#[cfg(test)]
pub(crate) mod testing {
  use crate::config::EngineConfig;
  use crate::db::AppState;
  use crate::test_utils::setup_test_db;

  pub async fn test_state() -> AppState {
    AppState {
      db: setup_test_db().await,
      config: EngineConfig::default(),
    }
  }
}
