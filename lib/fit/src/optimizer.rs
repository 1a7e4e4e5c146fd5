//! Size-fit optimizer
//!
//! Picks the size label in a chart whose garment measurements sit closest to
//! a comfortable ease over the wearer's body measurements.

use crate::config::FitConfig;
use fairshelf_core::{round_to, SizeBucket, SizeChart};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use tracing::trace;

/// Title words that mark a garment as a bottom
const BOTTOM_WORDS: [&str; 4] = ["jeans", "pants", "shorts", "trousers"];

/// Which body dimensions drive the fit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GarmentType {
    Top,
    Bottom,
}

impl GarmentType {
    /// Infer the garment type from a product title
    pub fn from_title(title: &str) -> Self {
        let title = title.to_lowercase();
        if BOTTOM_WORDS.iter().any(|w| title.contains(w)) {
            GarmentType::Bottom
        } else {
            GarmentType::Top
        }
    }
}

/// Body measurements in inches
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UserMeasurements {
    #[serde(alias = "waist_inches")]
    pub waist: f64,
    #[serde(alias = "hip_inches")]
    pub hip: f64,
    #[serde(default, alias = "chest_inches")]
    pub chest: Option<f64>,
    #[serde(default, alias = "height_inches")]
    pub height: Option<f64>,
}

impl UserMeasurements {
    pub fn new(waist: f64, hip: f64) -> Self {
        Self {
            waist,
            hip,
            chest: None,
            height: None,
        }
    }

    pub fn with_chest(mut self, chest: f64) -> Self {
        self.chest = Some(chest);
        self
    }
}

/// A measured dimension in a deviation report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dimension {
    Chest,
    Waist,
    Hip,
    Length,
}

impl Dimension {
    /// Key used in size charts and reports
    pub fn key(self) -> &'static str {
        match self {
            Dimension::Chest => "chest",
            Dimension::Waist => "waist",
            Dimension::Hip => "hip",
            Dimension::Length => "length",
        }
    }
}

/// Garment against body for one dimension. Length carries the garment value only.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Deviation {
    pub garment: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<f64>,
    /// Signed ease, garment minus body
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_tenths"
    )]
    pub diff: Option<f64>,
}

fn serialize_tenths<S: Serializer>(diff: &Option<f64>, serializer: S) -> Result<S::Ok, S::Error> {
    match diff {
        Some(d) => serializer.serialize_some(&round_tenths(*d)),
        None => serializer.serialize_none(),
    }
}

pub(crate) fn round_tenths(value: f64) -> f64 {
    round_to(value, 1)
}

/// Per-dimension deviations of one size, in report order.
///
/// Serializes as a JSON object keyed by dimension.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeviationReport {
    entries: Vec<(Dimension, Deviation)>,
}

impl DeviationReport {
    fn push(&mut self, dimension: Dimension, deviation: Deviation) {
        self.entries.push((dimension, deviation));
    }

    pub fn get(&self, dimension: Dimension) -> Option<&Deviation> {
        self.entries.iter().find(|(d, _)| *d == dimension).map(|(_, dev)| dev)
    }

    pub fn iter(&self) -> impl Iterator<Item = &(Dimension, Deviation)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for DeviationReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (dimension, deviation) in &self.entries {
            map.serialize_entry(dimension.key(), deviation)?;
        }
        map.end()
    }
}

/// Best size found in a chart
#[derive(Debug, Clone, PartialEq)]
pub struct SizeFit {
    pub size: String,
    /// Total penalty; lower fits better
    pub penalty: f64,
    pub report: DeviationReport,
}

/// Scores size charts against body measurements
#[derive(Debug, Clone, Default)]
pub struct SizeFitOptimizer {
    config: FitConfig,
}

impl SizeFitOptimizer {
    pub fn new(config: FitConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &FitConfig {
        &self.config
    }

    /// Pick the lowest-penalty size. Ties go to the size listed first;
    /// an empty chart yields `None`.
    pub fn recommend(
        &self,
        measurements: &UserMeasurements,
        chart: &SizeChart,
        garment: GarmentType,
    ) -> Option<SizeFit> {
        let mut best: Option<SizeFit> = None;

        for bucket in chart.iter() {
            let (penalty, report) = self.score_bucket(measurements, bucket, garment);
            trace!("Size {} penalty {:.2}", bucket.label, penalty);

            if best.as_ref().map_or(true, |b| penalty < b.penalty) {
                best = Some(SizeFit {
                    size: bucket.label.clone(),
                    penalty,
                    report,
                });
            }
        }

        best
    }

    /// Penalty and deviation report of a single size.
    ///
    /// A dimension is scored only when both the chart and the wearer provide
    /// it. Length is reported but never penalized.
    pub fn score_bucket(
        &self,
        measurements: &UserMeasurements,
        bucket: &SizeBucket,
        garment: GarmentType,
    ) -> (f64, DeviationReport) {
        let mut penalty = 0.0;
        let mut report = DeviationReport::default();

        let mut compare = |dimension: Dimension, user: Option<f64>| {
            let measured = bucket.get(dimension.key())?;
            let user = user?;
            let diff = measured - user;
            report.push(
                dimension,
                Deviation {
                    garment: measured,
                    user: Some(user),
                    diff: Some(diff),
                },
            );
            Some(diff)
        };

        match garment {
            GarmentType::Bottom => {
                if let Some(diff) = compare(Dimension::Waist, Some(measurements.waist)) {
                    penalty += self.config.bottom_waist.penalty(diff);
                }
                if let Some(diff) = compare(Dimension::Hip, Some(measurements.hip)) {
                    penalty += self.config.bottom_hip.penalty(diff);
                }
            }
            GarmentType::Top => {
                if let Some(diff) = compare(Dimension::Chest, measurements.chest) {
                    penalty += self.config.top_chest.penalty(diff);
                }
                if let Some(diff) = compare(Dimension::Waist, Some(measurements.waist)) {
                    penalty += self.config.top_waist_factor * diff.abs();
                }
            }
        }

        if let Some(length) = bucket.get(Dimension::Length.key()) {
            report.push(
                Dimension::Length,
                Deviation {
                    garment: length,
                    user: None,
                    diff: None,
                },
            );
        }

        (penalty, report)
    }
}

/// [`SizeFitOptimizer::recommend`] with the default configuration
pub fn recommend_size(
    measurements: &UserMeasurements,
    chart: &SizeChart,
    garment: GarmentType,
) -> Option<SizeFit> {
    SizeFitOptimizer::default().recommend(measurements, chart, garment)
}
