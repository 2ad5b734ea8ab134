pub mod body;
pub mod exercise;
pub mod history;
pub mod profile;

pub use body::{BodyComposition, FfmiBracket};
pub use exercise::{
  Difficulty, Equipment, ExerciseDefinition, FiberProfile, Mechanic, MovementPattern, MuscleGroup,
};
pub use history::{
  Confidence, ExerciseHistoryRecord, SetLog, StrengthCalibrationRecord, WeeklyFatigueLog,
};
pub use profile::{ExperienceLevel, Sex, TrainingGoal, UserTrainingProfile};
