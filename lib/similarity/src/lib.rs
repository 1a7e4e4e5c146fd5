//! # FairShelf Similarity
//!
//! Finds cheaper functional equivalents for products marketed to one
//! audience among the products marketed to the other.
//!
//! ## Features
//!
//! - **Curated overrides**: Hand-verified pairs are returned verbatim
//! - **Feature fusion**: Title, ingredient, attribute and brand similarity
//!   combined as a weighted mean over the features both sides carry
//! - **First-three rule**: Position-wise check of the leading ingredients
//! - **Explainability**: Ordered, human-readable reasons and a per-feature breakdown
//!
//! ## Example
//!
//! ```rust
//! use fairshelf_core::{Audience, Catalog, Category, Item};
//! use fairshelf_similarity::{EquivalenceMatcher, MatchRequest, MatchResponse};
//! use std::sync::Arc;
//!
//! let gel = |id: &str, title: &str, price: f64, brand: &str| Item {
//!     id: id.to_string(),
//!     title: title.to_string(),
//!     price,
//!     category: Category::PersonalCare,
//!     subcategory: "shave_gel".to_string(),
//!     brand: Some(brand.to_string()),
//!     ingredients: vec!["water".into(), "palmitic acid".into(), "triethanolamine".into()],
//!     attributes: None,
//!     size_chart: None,
//!     available_sizes: vec![],
//!     retailers: vec![],
//!     image_url: None,
//! };
//!
//! let mut catalog = Catalog::new();
//! catalog.insert(Audience::Womens, "skintimate", gel("w003", "Skintimate Shave Gel", 3.99, "Skintimate")).unwrap();
//! catalog.insert(Audience::Mens, "barbasol", gel("m003", "Barbasol Shave Cream", 1.99, "Barbasol")).unwrap();
//!
//! let matcher = EquivalenceMatcher::new(Arc::new(catalog));
//! let request = MatchRequest::new("Skintimate Shave Gel", 3.99, Category::PersonalCare);
//!
//! let found = matcher.find_equivalent(&request);
//! let response = MatchResponse::new(&request.title, request.price, found);
//! assert!(response.found_match);
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │   Request   │────>│   Resolve   │────>│  Override?  │──── yes ──┐
//! │ (title, $)  │     │ (catalog)   │     │  (curated)  │           │
//! └─────────────┘     └─────────────┘     └─────────────┘           │
//!                                                │ no               │
//!                                         ┌─────────────┐           │
//!                                         │    Rank     │           │
//!                                         │ (features)  │           │
//!                                         └─────────────┘           │
//!                                                │                  │
//!                                         ┌─────────────┐           │
//!                                         │  Explain    │<──────────┘
//!                                         │  (reasons)  │
//!                                         └─────────────┘
//! ```

pub mod config;
pub mod distance;
pub mod explain;
pub mod first_three;
pub mod matcher;

// Re-export main types for convenience
pub use config::{
    ConfigError,
    Feature,
    FeatureWeights,
    IngredientWeights,
    MatchConfig,
    SavingsBands,
};
pub use fairshelf_core::{round_to, savings};
pub use explain::{FeatureScore, MatchOrigin, MatchResponse, ProductMatch};
pub use first_three::{check_first_three, FirstThreeReport, PositionMatch, PositionMatchKind};
pub use matcher::{EquivalenceMatcher, MatchRequest, RankedCandidate};
