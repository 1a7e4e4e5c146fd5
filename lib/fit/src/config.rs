//! Fit configuration
//!
//! Ease bands and weights used by the size-fit optimizer. `Default`
//! reproduces the calibrated values.

use serde::{Deserialize, Serialize};

/// Weight applied to |waist ease| on tops
pub const DEFAULT_TOP_WAIST_FACTOR: f64 = 0.3;

/// Comfortable ease range for one dimension.
///
/// Inside `[min, max]` the penalty is `inside_weight * (ease - min)`;
/// outside it is `outside_weight * |ease - outside_center|`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EaseBand {
    pub min: f64,
    pub max: f64,
    pub inside_weight: f64,
    pub outside_weight: f64,
    pub outside_center: f64,
}

impl EaseBand {
    pub const fn new(min: f64, max: f64, inside_weight: f64, outside_weight: f64, outside_center: f64) -> Self {
        Self {
            min,
            max,
            inside_weight,
            outside_weight,
            outside_center,
        }
    }

    /// Penalty for a signed ease (garment minus body)
    pub fn penalty(&self, ease: f64) -> f64 {
        if (self.min..=self.max).contains(&ease) {
            self.inside_weight * (ease - self.min)
        } else {
            self.outside_weight * (ease - self.outside_center).abs()
        }
    }
}

/// Size-fit optimizer configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FitConfig {
    /// Waist on bottoms: 0-2" ease preferred
    pub bottom_waist: EaseBand,
    /// Hip on bottoms: 0-3" ease preferred, half weight
    pub bottom_hip: EaseBand,
    /// Chest on tops: 2-4" ease preferred, 3" ideal outside the band
    pub top_chest: EaseBand,
    /// Tops are forgiving at the waist
    pub top_waist_factor: f64,
}

impl Default for FitConfig {
    fn default() -> Self {
        Self {
            bottom_waist: EaseBand::new(0.0, 2.0, 1.0, 2.0, 0.0),
            bottom_hip: EaseBand::new(0.0, 3.0, 0.5, 1.5, 0.0),
            top_chest: EaseBand::new(2.0, 4.0, 1.0, 2.0, 3.0),
            top_waist_factor: DEFAULT_TOP_WAIST_FACTOR,
        }
    }
}

impl FitConfig {
    /// Validate the configuration
    /// - Checks that every band has `min <= max`
    /// - Checks that every weight is non-negative
    pub fn validate(&self) -> Result<(), FitConfigError> {
        for (name, band) in [
            ("bottom_waist", &self.bottom_waist),
            ("bottom_hip", &self.bottom_hip),
            ("top_chest", &self.top_chest),
        ] {
            if band.min > band.max {
                return Err(FitConfigError::InvertedBand(name.to_string()));
            }
            if band.inside_weight < 0.0 || band.outside_weight < 0.0 {
                return Err(FitConfigError::NegativeWeight(name.to_string()));
            }
        }
        if self.top_waist_factor < 0.0 {
            return Err(FitConfigError::NegativeWeight("top_waist_factor".to_string()));
        }
        Ok(())
    }
}

/// Errors that can occur during fit configuration validation
#[derive(Debug, Clone, thiserror::Error)]
pub enum FitConfigError {
    #[error("Ease band '{0}' has min greater than max")]
    InvertedBand(String),

    #[error("Weight '{0}' is negative")]
    NegativeWeight(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_band_penalties() {
        let config = FitConfig::default();

        assert_eq!(config.bottom_waist.penalty(1.5), 1.5);
        assert_eq!(config.bottom_waist.penalty(-1.0), 2.0);
        assert_eq!(config.bottom_waist.penalty(3.0), 6.0);

        assert_eq!(config.bottom_hip.penalty(2.0), 1.0);
        assert_eq!(config.bottom_hip.penalty(-2.0), 3.0);

        assert_eq!(config.top_chest.penalty(2.0), 0.0);
        assert_eq!(config.top_chest.penalty(4.0), 2.0);
        assert_eq!(config.top_chest.penalty(6.0), 6.0);
        assert_eq!(config.top_chest.penalty(0.0), 6.0);
    }

    #[test]
    fn test_validate() {
        assert!(FitConfig::default().validate().is_ok());

        let mut config = FitConfig::default();
        config.top_chest.min = 5.0;
        assert!(matches!(config.validate(), Err(FitConfigError::InvertedBand(ref n)) if n == "top_chest"));

        let mut config = FitConfig::default();
        config.top_waist_factor = -0.1;
        assert!(matches!(config.validate(), Err(FitConfigError::NegativeWeight(_))));
    }

    #[test]
    fn test_partial_config_deserializes_with_defaults() {
        let config: FitConfig = serde_json::from_str(r#"{"top_waist_factor": 0.5}"#).unwrap();
        assert_eq!(config.top_waist_factor, 0.5);
        assert_eq!(config.bottom_hip, FitConfig::default().bottom_hip);
    }
}
