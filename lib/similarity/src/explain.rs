//! Explainability for equivalence matches
//!
//! Builds the human-readable reasons attached to a match and the response
//! structures returned to callers. Rounding of money, percentages and scores
//! happens here and nowhere else.

use crate::config::{Feature, MatchConfig};
use crate::first_three::check_first_three_with;
use fairshelf_core::{round_to, AttributeValue, Item};
use serde::Serialize;

/// Where a match came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchOrigin {
    /// Pinned by a curated override
    Curated,
    /// Computed by feature scoring
    Computed,
}

/// One feature's contribution to a computed score
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FeatureScore {
    pub feature: Feature,
    /// Raw similarity in [0, 1]
    pub score: f64,
    /// Fusion weight the score entered with
    pub weight: f64,
}

/// A cheaper functional equivalent for a source product
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductMatch {
    pub target_id: String,
    pub title: String,
    pub price: f64,
    pub savings_amount: f64,
    pub savings_percent: f64,
    pub similarity_score: f64,
    pub match_reasons: Vec<String>,
    pub origin: MatchOrigin,
    /// Per-feature breakdown; empty for curated matches
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub features: Vec<FeatureScore>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl ProductMatch {
    /// Copy with money at 2 decimals and percent at 1. Computed scores are
    /// rounded to 2 decimals; a curated score is reported as pinned.
    pub fn rounded(&self) -> Self {
        let mut rounded = self.clone();
        rounded.price = round_to(self.price, 2);
        rounded.savings_amount = round_to(self.savings_amount, 2);
        rounded.savings_percent = round_to(self.savings_percent, 1);
        if self.origin == MatchOrigin::Computed {
            rounded.similarity_score = round_to(self.similarity_score, 2);
        }
        for feature in &mut rounded.features {
            feature.score = round_to(feature.score, 2);
        }
        rounded
    }
}

/// Response structure for the match endpoints
#[derive(Debug, Clone, Serialize)]
pub struct MatchResponse {
    pub found_match: bool,
    pub original_product: String,
    pub original_price: f64,
    #[serde(rename = "match")]
    pub product_match: Option<ProductMatch>,
    pub message: String,
}

impl MatchResponse {
    pub fn new(original_product: &str, original_price: f64, found: Option<ProductMatch>) -> Self {
        match found {
            Some(m) => {
                let m = m.rounded();
                Self {
                    found_match: true,
                    original_product: original_product.to_string(),
                    original_price: round_to(original_price, 2),
                    message: format!(
                        "Found equivalent! Save ${:.2} ({:.0}%)",
                        m.savings_amount, m.savings_percent
                    ),
                    product_match: Some(m),
                }
            }
            None => Self {
                found_match: false,
                original_product: original_product.to_string(),
                original_price: round_to(original_price, 2),
                product_match: None,
                message: "No cheaper equivalent found for this product.".to_string(),
            },
        }
    }
}

/// Inputs to reason generation for a computed match
pub struct ReasonContext<'a> {
    pub source_ingredients: Option<&'a [String]>,
    pub source: Option<&'a Item>,
    pub target: &'a Item,
    pub features: &'a [FeatureScore],
    pub savings_percent: f64,
}

/// Build the ordered list of reasons explaining a computed match
pub fn build_reasons(ctx: &ReasonContext<'_>, config: &MatchConfig) -> Vec<String> {
    let mut reasons = Vec::new();

    if let Some(source_ingredients) = ctx.source_ingredients {
        if !source_ingredients.is_empty() && !ctx.target.ingredients.is_empty() {
            let report = check_first_three_with(
                source_ingredients,
                ctx.target.ingredients.as_slice(),
                config.shared_wording_overlap,
            );
            if report.is_match {
                reasons.push(format!("First {} of 3 key ingredients match", report.matched_count));
            }
        }
    }

    for feature in ctx.features.iter().filter(|f| f.score > config.reason_threshold) {
        match feature.feature {
            Feature::Ingredients => {
                if !reasons.iter().any(|r| r.to_lowercase().contains("ingredient")) {
                    reasons.push("Highly similar ingredient formula".to_string());
                }
            }
            Feature::Attributes => reasons.extend(attribute_reasons(ctx.source, ctx.target)),
            Feature::Brand => reasons.push(format!(
                "Same brand ({})",
                ctx.target.brand.as_deref().unwrap_or("Unknown")
            )),
            Feature::Title => {}
        }
    }

    if reasons.is_empty() {
        reasons.push("Functionally equivalent product".to_string());
    }

    let bands = &config.savings_bands;
    if ctx.savings_percent >= bands.exceptional_percent {
        reasons.push(format!("Exceptional savings opportunity ({:.0}%)", ctx.savings_percent));
    } else if ctx.savings_percent >= bands.significant_percent {
        reasons.push(format!("Significant gendered price markup ({:.0}%)", ctx.savings_percent));
    }

    reasons
}

/// Call out the attributes shoppers care about, or a generic line
fn attribute_reasons(source: Option<&Item>, target: &Item) -> Vec<String> {
    let Some(source) = source else {
        return vec!["Similar product specifications".to_string()];
    };

    let mut reasons = Vec::new();

    if let (Some(s), Some(t)) = (source.attribute("blade_count"), target.attribute("blade_count")) {
        if s == t {
            reasons.push(format!("Same blade count ({} blades)", s));
        }
    }

    if let (Some(s), Some(t)) = (
        source.attribute("size_oz").and_then(AttributeValue::as_f64),
        target.attribute("size_oz").and_then(AttributeValue::as_f64),
    ) {
        if t > s {
            reasons.push(format!("Equivalent is LARGER ({}oz vs {}oz)", t, s));
        }
    }

    if let (Some(s), Some(t)) = (
        source.attribute("protection_hours"),
        target.attribute("protection_hours"),
    ) {
        if s == t {
            reasons.push(format!("Same {}-hour protection", s));
        }
    }

    if reasons.is_empty() {
        reasons.push("Similar product specifications".to_string());
    }
    reasons
}

#[cfg(test)]
mod tests {
    use super::*;
    use fairshelf_core::Category;
    use serde_json::json;

    fn item(id: &str, attributes: serde_json::Value, ingredients: &[&str]) -> Item {
        Item {
            id: id.to_string(),
            title: format!("Item {}", id),
            price: 5.0,
            category: Category::PersonalCare,
            subcategory: "shave_gel".to_string(),
            brand: Some("Barbasol".to_string()),
            ingredients: ingredients.iter().map(|s| s.to_string()).collect(),
            attributes: serde_json::from_value(attributes).unwrap(),
            size_chart: None,
            available_sizes: vec![],
            retailers: vec![],
            image_url: None,
        }
    }

    fn feature(feature: Feature, score: f64) -> FeatureScore {
        FeatureScore { feature, score, weight: 0.25 }
    }

    #[test]
    fn test_reasons_ingredient_and_attribute_callouts() {
        let source = item("w003", json!({"size_oz": 7, "skin_type": "sensitive"}),
            &["water", "palmitic acid", "triethanolamine"]);
        let target = item("m003", json!({"size_oz": 10, "skin_type": "sensitive"}),
            &["water", "palmitic acid", "triethanolamine"]);
        let features = [
            feature(Feature::Title, 0.1),
            feature(Feature::Ingredients, 0.9),
            feature(Feature::Attributes, 0.85),
            feature(Feature::Brand, 0.0),
        ];
        let ctx = ReasonContext {
            source_ingredients: Some(source.ingredients.as_slice()),
            source: Some(&source),
            target: &target,
            features: &features,
            savings_percent: 50.1,
        };

        let reasons = build_reasons(&ctx, &MatchConfig::default());
        assert_eq!(
            reasons,
            vec![
                "First 3 of 3 key ingredients match".to_string(),
                "Equivalent is LARGER (10oz vs 7oz)".to_string(),
                "Exceptional savings opportunity (50%)".to_string(),
            ]
        );
    }

    #[test]
    fn test_reasons_fallback_and_brand() {
        let source = item("w001", json!({}), &[]);
        let target = item("m001", json!({}), &[]);

        let no_signal = [feature(Feature::Title, 0.3)];
        let ctx = ReasonContext {
            source_ingredients: None,
            source: Some(&source),
            target: &target,
            features: &no_signal,
            savings_percent: 10.0,
        };
        assert_eq!(build_reasons(&ctx, &MatchConfig::default()), vec!["Functionally equivalent product"]);

        let brand = [feature(Feature::Brand, 1.0)];
        let ctx = ReasonContext { features: &brand, savings_percent: 30.0, ..ctx };
        assert_eq!(
            build_reasons(&ctx, &MatchConfig::default()),
            vec!["Same brand (Barbasol)", "Significant gendered price markup (30%)"]
        );
    }

    #[test]
    fn test_attribute_reasons_specific() {
        let source = item("w005", json!({"protection_hours": 48, "blade_count": 5}), &[]);
        let target = item("m005", json!({"protection_hours": 48, "blade_count": 5}), &[]);
        assert_eq!(
            attribute_reasons(Some(&source), &target),
            vec!["Same blade count (5 blades)", "Same 48-hour protection"]
        );
        assert_eq!(attribute_reasons(None, &target), vec!["Similar product specifications"]);
    }

    fn response_match() -> ProductMatch {
        ProductMatch {
            target_id: "m002".into(),
            title: "Gillette Fusion5 ProGlide Razor".into(),
            price: 11.99,
            savings_amount: 15.99 - 11.99,
            savings_percent: (15.99 - 11.99) / 15.99 * 100.0,
            similarity_score: 0.87,
            match_reasons: vec![],
            origin: MatchOrigin::Curated,
            features: vec![],
            product_url: None,
            image_url: None,
        }
    }

    #[test]
    fn test_match_response_rounds_at_boundary() {
        let response = MatchResponse::new("Gillette Venus Original Razor", 15.99, Some(response_match()));
        let found = response.product_match.unwrap();

        assert!(response.found_match);
        assert_eq!(found.savings_amount, 4.0);
        assert_eq!(found.savings_percent, 25.0);
        assert_eq!(response.message, "Found equivalent! Save $4.00 (25%)");

        let computed = ProductMatch {
            similarity_score: 0.8761,
            origin: MatchOrigin::Computed,
            ..response_match()
        };
        assert_eq!(computed.rounded().similarity_score, 0.88);

        let json = serde_json::to_value(MatchResponse::new("x", 1.0, None)).unwrap();
        assert_eq!(json["found_match"], json!(false));
        assert!(json["match"].is_null());
    }
}
