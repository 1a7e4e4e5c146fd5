//! # FairShelf Fit
//!
//! Size recommendation for target-side clothing.
//!
//! - [`SizeFitOptimizer`] - Scores every size in a chart against body measurements
//! - [`fit_notes`] - Plain-language notes for a chosen size
//! - [`ChartExtractor`] - Reads size charts from images ([`HttpChartExtractor`])
//! - [`FitDecoder`] - Picks the chart source and produces a [`SizeRecommendation`]
//!
//! ## Example
//!
//! ```rust
//! use fairshelf_core::SizeChart;
//! use fairshelf_fit::{fit_notes, recommend_size, GarmentType, UserMeasurements};
//!
//! let chart = SizeChart::new()
//!     .with_size("4", &[("waist", 28.0), ("hip", 38.0)])
//!     .with_size("6", &[("waist", 29.0), ("hip", 40.0)]);
//!
//! let fit = recommend_size(&UserMeasurements::new(28.0, 40.0), &chart, GarmentType::Bottom).unwrap();
//! assert_eq!(fit.size, "6");
//! assert_eq!(fit_notes(&fit.report), vec!["Waist fits well with 1\" ease", "Hip fit looks good"]);
//! ```

pub mod config;
pub mod decoder;
pub mod extract;
pub mod notes;
pub mod optimizer;

pub use config::{EaseBand, FitConfig, FitConfigError};
pub use decoder::{ClothingMatch, ClothingMatchResponse, FitDecoder, SizeRecommendation, SizeResponse};
pub use extract::{
    parse_chart, ChartExtractor, ExtractionError, ExtractorConfig, HttpChartExtractor,
    DEFAULT_EXTRACTION_TIMEOUT,
};
pub use notes::fit_notes;
pub use optimizer::{
    recommend_size, Deviation, DeviationReport, Dimension, GarmentType, SizeFit, SizeFitOptimizer,
    UserMeasurements,
};
