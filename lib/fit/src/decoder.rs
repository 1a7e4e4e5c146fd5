//! Fit decoder
//!
//! Ties chart sourcing to the optimizer: a chart supplied by the caller wins,
//! then one extracted from an image, then the catalog's own chart for the
//! product.

use crate::config::{FitConfig, FitConfigError};
use crate::extract::{ChartExtractor, DEFAULT_EXTRACTION_TIMEOUT};
use crate::notes::fit_notes;
use crate::optimizer::{DeviationReport, GarmentType, SizeFitOptimizer, UserMeasurements};
use fairshelf_core::{round_to, savings, Audience, Catalog, Department, Item, SizeChart};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Recommended size with its justification
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SizeRecommendation {
    pub recommended_size: String,
    pub garment_type: GarmentType,
    pub fit_notes: Vec<String>,
    pub measurements_comparison: DeviationReport,
}

/// Response structure for the size endpoint
#[derive(Debug, Clone, Serialize)]
pub struct SizeResponse {
    pub found_recommendation: bool,
    pub recommendation: Option<SizeRecommendation>,
    pub message: String,
}

impl SizeResponse {
    pub fn new(recommendation: Option<SizeRecommendation>) -> Self {
        let message = match &recommendation {
            Some(r) => format!("Recommended size: {}", r.recommended_size),
            None => "Could not determine size recommendation. Please check the size chart manually."
                .to_string(),
        };
        Self {
            found_recommendation: recommendation.is_some(),
            recommendation,
            message,
        }
    }
}

/// A cheaper target-side garment for a source garment, sized for the wearer
#[derive(Debug, Clone)]
pub struct ClothingMatch {
    pub source: Item,
    pub target: Item,
    pub savings_amount: f64,
    pub savings_percent: f64,
    pub size: Option<SizeRecommendation>,
}

/// Equivalent garment as reported to callers
#[derive(Debug, Clone, Serialize)]
pub struct EquivalentGarment {
    pub id: String,
    pub title: String,
    pub price: f64,
    pub savings_amount: f64,
    pub savings_percent: f64,
}

/// Size block of a clothing match; `size` is "Unknown" without a chart
#[derive(Debug, Clone, Serialize)]
pub struct SizeSummary {
    pub size: String,
    pub fit_notes: Vec<String>,
    pub measurements: Option<DeviationReport>,
}

/// Response structure for the clothing match endpoint
#[derive(Debug, Clone, Serialize)]
pub struct ClothingMatchResponse {
    pub found_match: bool,
    pub original_product: String,
    pub original_price: f64,
    pub mens_equivalent: EquivalentGarment,
    pub size_recommendation: SizeSummary,
    pub message: String,
}

impl ClothingMatchResponse {
    pub fn new(original_product: &str, found: ClothingMatch) -> Self {
        let size = match found.size {
            Some(r) => SizeSummary {
                size: r.recommended_size,
                fit_notes: r.fit_notes,
                measurements: Some(r.measurements_comparison),
            },
            None => SizeSummary {
                size: "Unknown".to_string(),
                fit_notes: Vec::new(),
                measurements: None,
            },
        };
        let savings_amount = round_to(found.savings_amount, 2);

        Self {
            found_match: true,
            original_product: original_product.to_string(),
            original_price: round_to(found.source.price, 2),
            message: format!("Buy Men's {} - Save ${:.2}!", size.size, savings_amount),
            mens_equivalent: EquivalentGarment {
                id: found.target.id,
                title: found.target.title,
                price: round_to(found.target.price, 2),
                savings_amount,
                savings_percent: round_to(found.savings_percent, 1),
            },
            size_recommendation: size,
        }
    }
}

/// Recommends target-side sizes for clothing
#[derive(Clone)]
pub struct FitDecoder {
    catalog: Arc<Catalog>,
    optimizer: SizeFitOptimizer,
    extractor: Option<Arc<dyn ChartExtractor>>,
    extraction_timeout: Duration,
}

impl FitDecoder {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self {
            catalog,
            optimizer: SizeFitOptimizer::default(),
            extractor: None,
            extraction_timeout: DEFAULT_EXTRACTION_TIMEOUT,
        }
    }

    pub fn with_config(mut self, config: FitConfig) -> Result<Self, FitConfigError> {
        config.validate()?;
        self.optimizer = SizeFitOptimizer::new(config);
        Ok(self)
    }

    /// Enable chart extraction from images, bounded by `timeout`
    pub fn with_extractor(mut self, extractor: Arc<dyn ChartExtractor>, timeout: Duration) -> Self {
        self.extractor = Some(extractor);
        self.extraction_timeout = timeout;
        self
    }

    pub fn has_extractor(&self) -> bool {
        self.extractor.is_some()
    }

    /// Recommend a size without touching the extractor.
    ///
    /// Uses `chart` when it is given and non-empty, else the chart of the
    /// target-side clothing item the title resolves to.
    pub fn recommend_from_catalog(
        &self,
        title: &str,
        measurements: &UserMeasurements,
        chart: Option<&SizeChart>,
    ) -> Option<SizeRecommendation> {
        let chart = match chart.filter(|c| !c.is_empty()) {
            Some(chart) => chart,
            None => self.catalog_chart(title)?,
        };
        self.recommend_with_chart(title, measurements, chart)
    }

    /// Recommend a size, extracting the chart from `chart_url` if needed.
    ///
    /// Extraction failures and timeouts are logged and fall back to the
    /// catalog chart. `None` only when no chart is available at all.
    pub async fn recommend(
        &self,
        title: &str,
        measurements: &UserMeasurements,
        chart_url: Option<&str>,
        chart: Option<&SizeChart>,
    ) -> Option<SizeRecommendation> {
        if let Some(chart) = chart.filter(|c| !c.is_empty()) {
            return self.recommend_with_chart(title, measurements, chart);
        }

        if let Some(url) = chart_url {
            if let Some(extracted) = self.extract_chart(url).await {
                return self.recommend_with_chart(title, measurements, &extracted);
            }
        }

        self.recommend_from_catalog(title, measurements, None)
    }

    async fn extract_chart(&self, url: &str) -> Option<SizeChart> {
        let Some(extractor) = &self.extractor else {
            debug!("No chart extractor configured, ignoring {}", url);
            return None;
        };

        match tokio::time::timeout(self.extraction_timeout, extractor.extract(url)).await {
            Ok(Ok(chart)) if !chart.is_empty() => Some(chart),
            Ok(Ok(_)) => {
                warn!("Extracted size chart from {} is empty, using catalog chart", url);
                None
            }
            Ok(Err(e)) => {
                warn!("Size chart extraction failed for {}: {}", url, e);
                None
            }
            Err(_) => {
                warn!(
                    "Size chart extraction timed out after {:?} for {}",
                    self.extraction_timeout, url
                );
                None
            }
        }
    }

    /// Find the target-side garment for a source garment and size it.
    ///
    /// The equivalent is the first target clothing item with the same brand
    /// and subcategory. Sizing uses its catalog chart only.
    pub fn match_clothing(&self, source_title: &str, measurements: &UserMeasurements) -> Option<ClothingMatch> {
        let source = self
            .catalog
            .side(Audience::Womens, Department::Clothing)
            .resolve_item(source_title)?;

        let target = self
            .catalog
            .side(Audience::Mens, Department::Clothing)
            .items()
            .find(|item| item.brand == source.brand && item.subcategory == source.subcategory)?;

        debug!("Clothing equivalent for {}: {}", source.id, target.id);

        let size = target
            .size_chart
            .as_ref()
            .and_then(|chart| self.recommend_from_catalog(&target.title, measurements, Some(chart)));

        let (savings_amount, savings_percent) = savings(source.price, target.price);

        Some(ClothingMatch {
            source: source.clone(),
            target: target.clone(),
            savings_amount,
            savings_percent,
            size,
        })
    }

    fn catalog_chart(&self, title: &str) -> Option<&SizeChart> {
        self.catalog
            .side(Audience::Mens, Department::Clothing)
            .resolve_item(title)?
            .size_chart
            .as_ref()
    }

    fn recommend_with_chart(
        &self,
        title: &str,
        measurements: &UserMeasurements,
        chart: &SizeChart,
    ) -> Option<SizeRecommendation> {
        let garment = GarmentType::from_title(title);
        let fit = self.optimizer.recommend(measurements, chart, garment)?;
        debug!("Recommended size {} for '{}' (penalty {:.2})", fit.size, title, fit.penalty);

        Some(SizeRecommendation {
            recommended_size: fit.size,
            garment_type: garment,
            fit_notes: fit_notes(&fit.report),
            measurements_comparison: fit.report,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::ExtractionError;
    use async_trait::async_trait;
    use fairshelf_core::Category;
    use serde_json::json;

    fn garment(id: &str, title: &str, price: f64, chart: Option<SizeChart>) -> Item {
        Item {
            id: id.to_string(),
            title: title.to_string(),
            price,
            category: Category::Clothing,
            subcategory: "hoodies".to_string(),
            brand: Some("H&M".to_string()),
            ingredients: vec!["80% cotton".to_string(), "20% polyester".to_string()],
            attributes: None,
            size_chart: chart,
            available_sizes: vec![],
            retailers: vec![],
            image_url: None,
        }
    }

    fn mens_hoodie_chart() -> SizeChart {
        SizeChart::new()
            .with_size("XS", &[("chest", 34.0), ("waist", 28.0), ("length", 26.0)])
            .with_size("S", &[("chest", 36.0), ("waist", 30.0), ("length", 27.0)])
            .with_size("M", &[("chest", 38.0), ("waist", 32.0), ("length", 28.0)])
    }

    fn catalog() -> Arc<Catalog> {
        let mut catalog = Catalog::new();
        catalog
            .insert(
                Audience::Womens,
                "hm boyfriend hoodie",
                garment("wc001", "H&M Women's Boyfriend Fit Hoodie", 45.0, None),
            )
            .unwrap();
        catalog
            .insert(
                Audience::Mens,
                "hm basic hoodie",
                garment("mc001", "H&M Men's Regular Fit Hoodie", 24.99, Some(mens_hoodie_chart())),
            )
            .unwrap();
        Arc::new(catalog)
    }

    struct FixedExtractor(SizeChart);

    #[async_trait]
    impl ChartExtractor for FixedExtractor {
        async fn extract(&self, _image_url: &str) -> Result<SizeChart, ExtractionError> {
            Ok(self.0.clone())
        }
    }

    struct FailingExtractor;

    #[async_trait]
    impl ChartExtractor for FailingExtractor {
        async fn extract(&self, _image_url: &str) -> Result<SizeChart, ExtractionError> {
            Err(ExtractionError::EmptyResponse)
        }
    }

    struct SlowExtractor;

    #[async_trait]
    impl ChartExtractor for SlowExtractor {
        async fn extract(&self, _image_url: &str) -> Result<SizeChart, ExtractionError> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(SizeChart::new().with_size("XXL", &[("chest", 60.0)]))
        }
    }

    fn user() -> UserMeasurements {
        UserMeasurements::new(30.0, 40.0).with_chest(33.0)
    }

    #[test]
    fn test_recommend_from_catalog_chart() {
        let decoder = FitDecoder::new(catalog());
        let rec = decoder
            .recommend_from_catalog("H&M Men's Regular Fit Hoodie", &user(), None)
            .unwrap();

        // S: chest ease 3 -> 1, waist exact
        assert_eq!(rec.recommended_size, "S");
        assert_eq!(rec.garment_type, GarmentType::Top);
        assert_eq!(rec.fit_notes.last().unwrap(), "Body length: 27 inches");
    }

    #[test]
    fn test_supplied_chart_wins() {
        let decoder = FitDecoder::new(catalog());
        let chart = SizeChart::new().with_size("ONE", &[("chest", 50.0)]);
        let rec = decoder
            .recommend_from_catalog("H&M Men's Regular Fit Hoodie", &user(), Some(&chart))
            .unwrap();
        assert_eq!(rec.recommended_size, "ONE");
    }

    #[test]
    fn test_no_chart_anywhere() {
        let decoder = FitDecoder::new(catalog());
        assert!(decoder.recommend_from_catalog("Unlisted Parka", &user(), None).is_none());
        assert!(!SizeResponse::new(None).found_recommendation);
    }

    #[tokio::test]
    async fn test_extracted_chart_is_used() {
        let chart = SizeChart::new().with_size("Tall", &[("chest", 36.0)]);
        let decoder = FitDecoder::new(catalog())
            .with_extractor(Arc::new(FixedExtractor(chart)), Duration::from_secs(1));

        let rec = decoder
            .recommend("H&M Men's Regular Fit Hoodie", &user(), Some("https://img/chart.png"), None)
            .await
            .unwrap();
        assert_eq!(rec.recommended_size, "Tall");
    }

    #[tokio::test]
    async fn test_empty_supplied_chart_uses_catalog() {
        let decoder = FitDecoder::new(catalog());
        let rec = decoder
            .recommend("H&M Men's Regular Fit Hoodie", &user(), None, Some(&SizeChart::new()))
            .await
            .unwrap();
        assert_eq!(rec.recommended_size, "S");
    }

    #[tokio::test]
    async fn test_empty_extracted_chart_uses_catalog() {
        let decoder = FitDecoder::new(catalog())
            .with_extractor(Arc::new(FixedExtractor(SizeChart::new())), Duration::from_secs(1));

        let rec = decoder
            .recommend("H&M Men's Regular Fit Hoodie", &user(), Some("https://img/chart.png"), None)
            .await
            .unwrap();
        assert_eq!(rec.recommended_size, "S");
    }

    #[tokio::test]
    async fn test_extraction_failure_falls_back_to_catalog() {
        let decoder = FitDecoder::new(catalog())
            .with_extractor(Arc::new(FailingExtractor), Duration::from_secs(1));

        let rec = decoder
            .recommend("H&M Men's Regular Fit Hoodie", &user(), Some("https://img/chart.png"), None)
            .await
            .unwrap();
        assert_eq!(rec.recommended_size, "S");
    }

    #[tokio::test]
    async fn test_extraction_timeout_falls_back_to_catalog() {
        let decoder = FitDecoder::new(catalog())
            .with_extractor(Arc::new(SlowExtractor), Duration::from_millis(20));

        let rec = decoder
            .recommend("H&M Men's Regular Fit Hoodie", &user(), Some("https://img/chart.png"), None)
            .await
            .unwrap();
        assert_eq!(rec.recommended_size, "S");
    }

    #[tokio::test]
    async fn test_url_without_extractor_uses_catalog() {
        let decoder = FitDecoder::new(catalog());
        assert!(!decoder.has_extractor());

        let rec = decoder
            .recommend("H&M Men's Regular Fit Hoodie", &user(), Some("https://img/chart.png"), None)
            .await;
        assert_eq!(rec.unwrap().recommended_size, "S");
    }

    #[test]
    fn test_match_clothing() {
        let decoder = FitDecoder::new(catalog());
        let found = decoder
            .match_clothing("H&M Women's Boyfriend Fit Hoodie", &UserMeasurements::new(28.0, 38.0))
            .unwrap();

        assert_eq!(found.target.id, "mc001");
        assert!((found.savings_amount - 20.01).abs() < 1e-9);
        // no chest given: waist alone decides
        assert_eq!(found.size.as_ref().unwrap().recommended_size, "XS");

        let response = ClothingMatchResponse::new("H&M Women's Boyfriend Fit Hoodie", found);
        assert_eq!(response.message, "Buy Men's XS - Save $20.01!");
        assert_eq!(response.mens_equivalent.savings_percent, 44.5);

        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["size_recommendation"]["measurements"]["waist"]["diff"], json!(0.0));
    }

    #[test]
    fn test_match_clothing_unknown_source() {
        let decoder = FitDecoder::new(catalog());
        assert!(decoder.match_clothing("Mystery Cardigan", &user()).is_none());
    }

    #[test]
    fn test_with_config_validates() {
        let mut config = FitConfig::default();
        config.bottom_hip.min = 10.0;
        assert!(FitDecoder::new(catalog()).with_config(config).is_err());
    }
}
