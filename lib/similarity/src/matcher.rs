//! Equivalence matcher
//!
//! Resolves a source product against the catalog and finds the cheapest
//! functional equivalent on the target side, either from a curated override
//! or by fusing per-feature similarity scores.

use crate::config::{ConfigError, Feature, MatchConfig};
use crate::distance::{attribute_similarity, ingredient_similarity, title_similarity};
use crate::explain::{build_reasons, FeatureScore, MatchOrigin, ProductMatch, ReasonContext};
use fairshelf_core::{savings, Audience, Catalog, Category, Item, ItemCollection};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// A source product to find an equivalent for
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRequest {
    pub title: String,
    pub price: f64,
    pub category: Category,
    #[serde(default)]
    pub ingredients: Option<Vec<String>>,
    #[serde(default)]
    pub brand: Option<String>,
}

impl MatchRequest {
    pub fn new(title: impl Into<String>, price: f64, category: Category) -> Self {
        Self {
            title: title.into(),
            price,
            category,
            ingredients: None,
            brand: None,
        }
    }

    pub fn with_ingredients<S: Into<String>>(mut self, ingredients: impl IntoIterator<Item = S>) -> Self {
        self.ingredients = Some(ingredients.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_brand(mut self, brand: impl Into<String>) -> Self {
        self.brand = Some(brand.into());
        self
    }
}

/// A scored target candidate
#[derive(Debug, Clone)]
pub struct RankedCandidate<'a> {
    pub item: &'a Item,
    /// Weighted mean of the present feature scores
    pub score: f64,
    pub features: Vec<FeatureScore>,
}

/// Finds cheaper functional equivalents in the target catalog
#[derive(Debug, Clone)]
pub struct EquivalenceMatcher {
    catalog: Arc<Catalog>,
    config: MatchConfig,
}

impl EquivalenceMatcher {
    /// Create a matcher with the default configuration
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self {
            catalog,
            config: MatchConfig::default(),
        }
    }

    /// Create a matcher with a custom configuration, validated first
    pub fn with_config(catalog: Arc<Catalog>, mut config: MatchConfig) -> Result<Self, ConfigError> {
        config.validate_and_normalize()?;
        Ok(Self { catalog, config })
    }

    /// Copy of this matcher with some fusion weights replaced
    pub fn with_weights(&self, overrides: &HashMap<Feature, f64>) -> Result<Self, ConfigError> {
        Self::with_config(self.catalog.clone(), self.config.with_weights(overrides))
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    /// Find the best cheaper equivalent for a source product.
    ///
    /// A curated override for the resolved source item wins outright. Otherwise
    /// the best-scoring candidate that is strictly cheaper and clears the
    /// viability threshold is returned; ties go to the candidate listed first
    /// in the catalog. `None` means no cheaper equivalent exists.
    pub fn find_equivalent(&self, request: &MatchRequest) -> Option<ProductMatch> {
        let department = request.category.department();
        let sources = self.catalog.side(Audience::Womens, department);
        let targets = self.catalog.side(Audience::Mens, department);

        let source = sources.resolve_item(&request.title);
        match source {
            Some(item) => debug!("Resolved '{}' to {}", request.title, item.id),
            None => debug!("No catalog entry for '{}', matching without source item", request.title),
        }

        if let Some(found) = source.and_then(|item| self.curated_match(request, item, targets)) {
            return Some(found);
        }

        let ranked = self.rank(request, source, targets);
        let best = ranked.into_iter().find(|candidate| {
            candidate.item.price < request.price && candidate.score > self.config.viability_threshold
        })?;

        let (savings_amount, savings_percent) = savings(request.price, best.item.price);
        let reasons = build_reasons(
            &ReasonContext {
                source_ingredients: source_ingredients(request, source),
                source,
                target: best.item,
                features: &best.features,
                savings_percent,
            },
            &self.config,
        );

        debug!("Best equivalent {} with score {:.3}", best.item.id, best.score);

        Some(ProductMatch {
            target_id: best.item.id.clone(),
            title: best.item.title.clone(),
            price: best.item.price,
            savings_amount,
            savings_percent,
            similarity_score: best.score,
            match_reasons: reasons,
            origin: MatchOrigin::Computed,
            features: best.features,
            product_url: None,
            image_url: best.item.image_url.clone(),
        })
    }

    /// The pinned match for a source item, if it has one and its target is
    /// present in the catalog
    fn curated_match(&self, request: &MatchRequest, source: &Item, targets: &ItemCollection) -> Option<ProductMatch> {
        let pair = self.catalog.overrides().get(&source.id)?;
        let Some(target) = targets.get_by_id(&pair.target_id) else {
            warn!(
                "Curated override {} -> {} points at a missing item, scoring instead",
                pair.source_id, pair.target_id
            );
            return None;
        };

        debug!("Curated override {} -> {}", pair.source_id, pair.target_id);
        let (savings_amount, savings_percent) = savings(request.price, target.price);

        Some(ProductMatch {
            target_id: target.id.clone(),
            title: target.title.clone(),
            price: target.price,
            savings_amount,
            savings_percent,
            similarity_score: pair.similarity_score,
            match_reasons: pair.reasons.clone(),
            origin: MatchOrigin::Curated,
            features: Vec::new(),
            product_url: None,
            image_url: target.image_url.clone(),
        })
    }

    /// Score every eligible target candidate, best first.
    ///
    /// Candidates must share the resolved source's subcategory; without a
    /// resolved source every target is eligible. The sort is stable, so equal
    /// scores keep catalog order.
    pub fn rank<'a>(
        &self,
        request: &MatchRequest,
        source: Option<&Item>,
        targets: &'a ItemCollection,
    ) -> Vec<RankedCandidate<'a>> {
        let mut ranked: Vec<RankedCandidate<'a>> = targets
            .items()
            .filter(|candidate| source.map_or(true, |s| s.subcategory == candidate.subcategory))
            .map(|candidate| {
                let features = self.score_features(request, source, candidate);
                let score = fuse(&features);
                debug!("Candidate {} scored {:.3}", candidate.id, score);
                RankedCandidate { item: candidate, score, features }
            })
            .collect();

        ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
        ranked
    }

    /// Per-feature scores of one candidate. Features lacking data on either
    /// side are left out rather than scored zero.
    pub fn score_features(&self, request: &MatchRequest, source: Option<&Item>, candidate: &Item) -> Vec<FeatureScore> {
        let weights = &self.config.weights;
        let mut features = Vec::with_capacity(4);

        features.push(FeatureScore {
            feature: Feature::Title,
            score: title_similarity(&request.title, &candidate.title),
            weight: weights.title,
        });

        if let Some(ingredients) = source_ingredients(request, source) {
            if !ingredients.is_empty() && !candidate.ingredients.is_empty() {
                features.push(FeatureScore {
                    feature: Feature::Ingredients,
                    score: ingredient_similarity(
                        ingredients,
                        candidate.ingredients.as_slice(),
                        &self.config.ingredient_weights,
                    ),
                    weight: weights.ingredients,
                });
            }
        }

        if let (Some(source_attrs), Some(candidate_attrs)) =
            (source.and_then(Item::attribute_map), candidate.attribute_map())
        {
            features.push(FeatureScore {
                feature: Feature::Attributes,
                score: attribute_similarity(source_attrs, candidate_attrs, self.config.numeric_tolerance),
                weight: weights.attributes,
            });
        }

        features.push(FeatureScore {
            feature: Feature::Brand,
            score: brand_score(request, source, candidate),
            weight: weights.brand,
        });

        features
    }
}

/// Ingredients supplied with the request, else those of the resolved item
fn source_ingredients<'a>(request: &'a MatchRequest, source: Option<&'a Item>) -> Option<&'a [String]> {
    match &request.ingredients {
        Some(list) if !list.is_empty() => Some(list.as_slice()),
        _ => source.map(|item| item.ingredients.as_slice()).filter(|list| !list.is_empty()),
    }
}

/// 1.0 when the brands agree. A brand given with the request is compared
/// case-insensitively; otherwise the resolved item's brand must be identical.
fn brand_score(request: &MatchRequest, source: Option<&Item>, candidate: &Item) -> f64 {
    let Some(candidate_brand) = candidate.brand.as_deref().filter(|b| !b.is_empty()) else {
        return 0.0;
    };

    let same = match (request.brand.as_deref(), source) {
        (Some(brand), _) => brand.to_lowercase() == candidate_brand.to_lowercase(),
        (None, Some(item)) => item.brand.as_deref() == Some(candidate_brand),
        (None, None) => false,
    };

    if same { 1.0 } else { 0.0 }
}

/// Weighted mean over the features present
fn fuse(features: &[FeatureScore]) -> f64 {
    let total_weight: f64 = features.iter().map(|f| f.weight).sum();
    if total_weight <= 0.0 {
        return 0.0;
    }

    let weighted: f64 = features.iter().map(|f| f.score * f.weight).sum();
    (weighted / total_weight).clamp(0.0, 1.0)
}
