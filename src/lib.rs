//! # FairShelf
//!
//! Finds the product marketed to men that does the same job as a product
//! marketed to women, for less, and recommends the size to buy when it is
//! a garment.
//!
//! ## Quick Start
//!
//! ### As a Server
//!
//! ```bash
//! cargo install fairshelf
//! fairshelf --http-port 8000
//! ```
//!
//! ### As a Library
//!
//! ```rust,no_run
//! use fairshelf::prelude::*;
//! use std::sync::Arc;
//!
//! let catalog = Arc::new(builtin_catalog().unwrap());
//! let matcher = EquivalenceMatcher::new(catalog);
//!
//! let request = MatchRequest::new("Gillette Venus Original Razor", 15.99, Category::PersonalCare);
//! let response = MatchResponse::new(&request.title, request.price, matcher.find_equivalent(&request));
//! println!("{}", response.message);
//! ```
//!
//! ## Crate Structure
//!
//! - [`fairshelf-core`](https://docs.rs/fairshelf-core) - Catalog data model, overrides, title resolution
//! - [`fairshelf-similarity`](https://docs.rs/fairshelf-similarity) - Equivalence matcher and First-Three rule
//! - [`fairshelf-fit`](https://docs.rs/fairshelf-fit) - Size-fit optimizer and size-chart extraction
//! - [`fairshelf-storage`](https://docs.rs/fairshelf-storage) - Catalog loading and savings ledger
//! - [`fairshelf-api`](https://docs.rs/fairshelf-api) - REST API

// Re-export core types
pub use fairshelf_core::{
    Audience, Catalog, Category, CuratedOverride, Item, ItemCollection, SizeChart,
    Error, Result,
};

// Re-export matching
pub use fairshelf_similarity::{
    check_first_three, EquivalenceMatcher, MatchConfig, MatchRequest, MatchResponse, ProductMatch,
};

// Re-export sizing
pub use fairshelf_fit::{
    fit_notes, recommend_size, FitConfig, FitDecoder, GarmentType, SizeRecommendation, SizeResponse,
    UserMeasurements,
};

// Re-export storage
pub use fairshelf_storage::{builtin_catalog, load_catalog, InMemorySavingsStore, SavingsEntry, SavingsStore};

// Re-export API
pub use fairshelf_api::{AppState, RestApi};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        Audience, Catalog, Category, Item, SizeChart,
        EquivalenceMatcher, MatchRequest, MatchResponse,
        FitDecoder, GarmentType, UserMeasurements, recommend_size,
        builtin_catalog, load_catalog, InMemorySavingsStore, SavingsStore,
        AppState, RestApi,
    };
}
