//! # FairShelf Core
//!
//! Reference data for the FairShelf equivalence engine.
//!
//! This crate provides the catalog data model and lookups:
//!
//! - [`Item`] - An immutable catalog record (title, price, ingredients, attributes, size chart)
//! - [`ItemCollection`] - Ordered, key-addressed item storage with fuzzy title resolution
//! - [`Catalog`] - Source and target sides per department, plus curated overrides
//! - [`OverrideTable`] - Hand-verified pairings that take precedence over scoring
//!
//! ## Example
//!
//! ```rust
//! use fairshelf_core::{Audience, Catalog, Category, Item};
//!
//! let item = Item {
//!     id: "w001".to_string(),
//!     title: "Gillette Venus Original Razor".to_string(),
//!     price: 15.99,
//!     category: Category::PersonalCare,
//!     subcategory: "razors".to_string(),
//!     brand: Some("Gillette".to_string()),
//!     ingredients: vec!["5 blade cartridge".to_string()],
//!     attributes: None,
//!     size_chart: None,
//!     available_sizes: vec![],
//!     retailers: vec![],
//!     image_url: None,
//! };
//!
//! let mut catalog = Catalog::new();
//! catalog.insert(Audience::Womens, "gillette venus", item).unwrap();
//!
//! let side = catalog.side(Audience::Womens, Category::PersonalCare.department());
//! assert_eq!(side.resolve("Gillette Venus Original Razor"), Some("gillette venus"));
//! ```

pub mod collection;
pub mod error;
pub mod item;
pub mod overrides;
pub mod pricing;

pub use collection::{Catalog, ItemCollection, MIN_WORD_OVERLAP};
pub use error::{Error, Result};
pub use item::{
    Attributes, AttributeValue, Audience, Category, Department, Item, Measurements, SizeBucket,
    SizeChart,
};
pub use overrides::{CuratedOverride, OverrideTable};
pub use pricing::{round_to, savings};
