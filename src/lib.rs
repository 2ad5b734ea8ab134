//! Hypertrophy training program engine
//!
//! Turns a user's training profile, body composition, strength calibrations
//! and recent exercise history into a periodized mesocycle with per-set load
//! prescriptions, and watches weekly fatigue logs for early deload signals.

pub mod calibration;
pub mod catalog;
pub mod commands;
pub mod config;
pub mod db;
pub mod deload;
pub mod fatigue;
pub mod models;
pub mod periodization;
pub mod program;
pub mod progression;
pub mod recovery;
pub mod rep_range;
pub mod snapshot;
pub mod strength;
pub mod volume;
pub mod weights;

#[cfg(test)]
mod test_utils;

use tracing_subscriber::EnvFilter;

pub use config::{ConfigError, EngineConfig};
pub use db::{initialize_db, AppState, SqliteStore, StoreError, TrainingStore};
pub use program::{generate_program, FullProgramRecommendation};
pub use snapshot::TrainingSnapshot;

/// Install the global fmt subscriber using the configured filter
///
/// Safe to call more than once; later calls are no-ops.
pub fn init_tracing(config: &EngineConfig) {
  let filter = EnvFilter::try_new(&config.log_filter).unwrap_or_else(|_| EnvFilter::new("info"));
  let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Load configuration, set up logging and open the database
pub async fn bootstrap() -> Result<AppState, StoreError> {
  let config = EngineConfig::from_env().map_err(|e| StoreError::InvalidData(e.to_string()))?;
  init_tracing(&config);

  let db = initialize_db(&config).await?;
  tracing::info!("engine ready");

  Ok(AppState { db, config })
}
