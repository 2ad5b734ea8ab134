use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::profile::Sex;

/// Latest body scan. Newer scans supersede older ones; never edited in place.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BodyComposition {
  pub weight_kg: f64,
  pub height_cm: f64,
  pub body_fat_pct: f64,
  pub measured_at: DateTime<Utc>,
}

/// FFMI bracket used to key the strength standards
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FfmiBracket {
  Low,
  Average,
  High,
}

impl BodyComposition {
  pub fn lean_mass_kg(&self) -> f64 {
    let bf = self.body_fat_pct.clamp(0.0, 70.0);
    self.weight_kg * (1.0 - bf / 100.0)
  }

  /// Fat-Free Mass Index: lean mass / height(m)^2
  pub fn ffmi(&self) -> f64 {
    let height_m = self.height_cm / 100.0;
    if height_m <= 0.0 {
      return 0.0;
    }
    self.lean_mass_kg() / (height_m * height_m)
  }

  /// FFMI adjusted to a 1.8 m reference height
  pub fn normalized_ffmi(&self) -> f64 {
    let height_m = self.height_cm / 100.0;
    self.ffmi() + 6.1 * (1.8 - height_m)
  }

  pub fn ffmi_bracket(&self, sex: Sex) -> FfmiBracket {
    // Female thresholds sit ~3 points lower
    let offset = match sex {
      Sex::Male => 0.0,
      Sex::Female => 3.0,
    };
    match self.normalized_ffmi() + offset {
      f if f < 19.0 => FfmiBracket::Low,
      f if f <= 22.0 => FfmiBracket::Average,
      _ => FfmiBracket::High,
    }
  }
}
