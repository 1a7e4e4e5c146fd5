//! Matching configuration
//!
//! Every weight and threshold the equivalence matcher uses lives here as a
//! named, overridable value. `Default` reproduces the calibrated constants;
//! `validate_and_normalize` checks a custom configuration before use.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Fusion weight of title-word similarity
pub const DEFAULT_TITLE_WEIGHT: f64 = 0.20;
/// Fusion weight of ingredient/material similarity
pub const DEFAULT_INGREDIENT_WEIGHT: f64 = 0.50;
/// Fusion weight of attribute similarity
pub const DEFAULT_ATTRIBUTE_WEIGHT: f64 = 0.20;
/// Fusion weight of exact brand identity
pub const DEFAULT_BRAND_WEIGHT: f64 = 0.10;

/// Minimum combined score a candidate must exceed to be offered
pub const DEFAULT_VIABILITY_THRESHOLD: f64 = 0.40;
/// Feature score above which a qualitative reason is emitted
pub const DEFAULT_REASON_THRESHOLD: f64 = 0.70;
/// Relative difference under which two numeric attributes count as equal
pub const DEFAULT_NUMERIC_TOLERANCE: f64 = 0.20;
/// Word-set overlap at which two leading ingredients share wording
pub const DEFAULT_SHARED_WORDING_OVERLAP: f64 = 0.50;

/// A scored feature of a candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Feature {
    Title,
    Ingredients,
    Attributes,
    Brand,
}

impl Feature {
    pub const ALL: [Feature; 4] = [
        Feature::Title,
        Feature::Ingredients,
        Feature::Attributes,
        Feature::Brand,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Feature::Title => "title",
            Feature::Ingredients => "ingredients",
            Feature::Attributes => "attributes",
            Feature::Brand => "brand",
        }
    }
}

/// Top-level fusion weights
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct FeatureWeights {
    pub title: f64,
    pub ingredients: f64,
    pub attributes: f64,
    pub brand: f64,
}

impl Default for FeatureWeights {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE_WEIGHT,
            ingredients: DEFAULT_INGREDIENT_WEIGHT,
            attributes: DEFAULT_ATTRIBUTE_WEIGHT,
            brand: DEFAULT_BRAND_WEIGHT,
        }
    }
}

impl FeatureWeights {
    pub fn get(&self, feature: Feature) -> f64 {
        match feature {
            Feature::Title => self.title,
            Feature::Ingredients => self.ingredients,
            Feature::Attributes => self.attributes,
            Feature::Brand => self.brand,
        }
    }

    pub fn set(&mut self, feature: Feature, weight: f64) {
        match feature {
            Feature::Title => self.title = weight,
            Feature::Ingredients => self.ingredients = weight,
            Feature::Attributes => self.attributes = weight,
            Feature::Brand => self.brand = weight,
        }
    }

    fn sum(&self) -> f64 {
        Feature::ALL.iter().map(|f| self.get(*f)).sum()
    }
}

/// Blend of the three ingredient-list signals
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct IngredientWeights {
    /// Jaccard over the whole normalized list
    pub overall: f64,
    /// Jaccard over the first three entries as sets
    pub first_three_overlap: f64,
    /// Share of the first three positions that match exactly
    pub positional: f64,
}

impl Default for IngredientWeights {
    fn default() -> Self {
        Self {
            overall: 0.40,
            first_three_overlap: 0.35,
            positional: 0.25,
        }
    }
}

/// Savings-percent bands that earn a savings reason
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct SavingsBands {
    pub exceptional_percent: f64,
    pub significant_percent: f64,
}

impl Default for SavingsBands {
    fn default() -> Self {
        Self {
            exceptional_percent: 40.0,
            significant_percent: 25.0,
        }
    }
}

/// Full matcher configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MatchConfig {
    #[serde(default)]
    pub weights: FeatureWeights,
    #[serde(default)]
    pub ingredient_weights: IngredientWeights,
    #[serde(default = "default_viability_threshold")]
    pub viability_threshold: f64,
    #[serde(default = "default_reason_threshold")]
    pub reason_threshold: f64,
    #[serde(default = "default_numeric_tolerance")]
    pub numeric_tolerance: f64,
    #[serde(default = "default_shared_wording_overlap")]
    pub shared_wording_overlap: f64,
    #[serde(default)]
    pub savings_bands: SavingsBands,
}

fn default_viability_threshold() -> f64 {
    DEFAULT_VIABILITY_THRESHOLD
}

fn default_reason_threshold() -> f64 {
    DEFAULT_REASON_THRESHOLD
}

fn default_numeric_tolerance() -> f64 {
    DEFAULT_NUMERIC_TOLERANCE
}

fn default_shared_wording_overlap() -> f64 {
    DEFAULT_SHARED_WORDING_OVERLAP
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            weights: FeatureWeights::default(),
            ingredient_weights: IngredientWeights::default(),
            viability_threshold: DEFAULT_VIABILITY_THRESHOLD,
            reason_threshold: DEFAULT_REASON_THRESHOLD,
            numeric_tolerance: DEFAULT_NUMERIC_TOLERANCE,
            shared_wording_overlap: DEFAULT_SHARED_WORDING_OVERLAP,
            savings_bands: SavingsBands::default(),
        }
    }
}

impl MatchConfig {
    /// Validate the configuration
    /// - Checks that weights are finite, non-negative and not all zero
    /// - Checks that thresholds lie in [0, 1]
    /// - Normalizes the ingredient blend to sum to 1.0 if it doesn't
    pub fn validate_and_normalize(&mut self) -> Result<(), ConfigError> {
        for feature in Feature::ALL {
            if !self.weights.get(feature).is_finite() {
                return Err(ConfigError::NonFiniteWeight(feature.name().to_string()));
            }
            if self.weights.get(feature) < 0.0 {
                return Err(ConfigError::NegativeWeight(feature.name().to_string()));
            }
        }
        if self.weights.sum() <= 0.0 {
            return Err(ConfigError::ZeroTotalWeight);
        }

        let blend = &mut self.ingredient_weights;
        for (name, weight) in [
            ("overall", blend.overall),
            ("first_three_overlap", blend.first_three_overlap),
            ("positional", blend.positional),
        ] {
            if !weight.is_finite() {
                return Err(ConfigError::NonFiniteWeight(name.to_string()));
            }
            if weight < 0.0 {
                return Err(ConfigError::NegativeWeight(name.to_string()));
            }
        }
        let blend_sum = blend.overall + blend.first_three_overlap + blend.positional;
        if blend_sum <= 0.0 {
            return Err(ConfigError::ZeroTotalWeight);
        }
        if (blend_sum - 1.0).abs() > 0.001 {
            blend.overall /= blend_sum;
            blend.first_three_overlap /= blend_sum;
            blend.positional /= blend_sum;
        }

        for (name, value) in [
            ("viability_threshold", self.viability_threshold),
            ("reason_threshold", self.reason_threshold),
            ("numeric_tolerance", self.numeric_tolerance),
            ("shared_wording_overlap", self.shared_wording_overlap),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::OutOfRange { name: name.to_string(), value });
            }
        }

        if self.savings_bands.significant_percent > self.savings_bands.exceptional_percent {
            return Err(ConfigError::SavingsBandsOutOfOrder);
        }

        Ok(())
    }

    /// Copy of this configuration with some fusion weights replaced.
    /// Negative overrides are clamped to zero.
    pub fn with_weights(&self, overrides: &HashMap<Feature, f64>) -> MatchConfig {
        let mut modified = self.clone();
        for (feature, weight) in overrides {
            modified.weights.set(*feature, weight.max(0.0));
        }
        modified
    }
}

/// Errors that can occur during configuration validation
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    #[error("Weight '{0}' is negative")]
    NegativeWeight(String),

    #[error("Weight '{0}' is not a finite number")]
    NonFiniteWeight(String),

    #[error("Total weight cannot be zero")]
    ZeroTotalWeight,

    #[error("'{name}' must lie in [0, 1], got {value}")]
    OutOfRange { name: String, value: f64 },

    #[error("Significant savings band exceeds the exceptional band")]
    SavingsBandsOutOfOrder,
}
