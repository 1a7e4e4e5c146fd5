//! Catalog loading
//!
//! A catalog document lists source-side and target-side items, each with its
//! lookup key, plus curated overrides. Document order is catalog order.

use anyhow::{Context, Result};
use fairshelf_core::{Audience, Catalog, CuratedOverride, Department, Item};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{info, warn};

/// The seed catalog shipped with the crate
pub const BUILTIN_CATALOG: &str = include_str!("../data/catalog.json");

/// One item with its lookup key
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub key: String,
    #[serde(flatten)]
    pub item: Item,
}

/// On-disk catalog document
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogDocument {
    #[serde(default)]
    pub womens: Vec<CatalogEntry>,
    #[serde(default)]
    pub mens: Vec<CatalogEntry>,
    #[serde(default)]
    pub overrides: Vec<CuratedOverride>,
}

impl CatalogDocument {
    /// Build the immutable catalog, rejecting duplicate keys or ids, bad
    /// prices and malformed overrides
    pub fn into_catalog(self) -> Result<Catalog> {
        let mut catalog = Catalog::new();

        for (audience, entries) in [(Audience::Womens, self.womens), (Audience::Mens, self.mens)] {
            for entry in entries {
                let id = entry.item.id.clone();
                catalog
                    .insert(audience, &entry.key, entry.item)
                    .with_context(|| format!("Invalid catalog entry '{}' ({})", entry.key, id))?;
            }
        }

        for pair in self.overrides {
            let source = pair.source_id.clone();
            if !has_item(&catalog, Audience::Womens, &pair.source_id) {
                warn!("Curated override source {} is not in the catalog", pair.source_id);
            }
            if !has_item(&catalog, Audience::Mens, &pair.target_id) {
                warn!("Curated override target {} is not in the catalog", pair.target_id);
            }
            catalog
                .insert_override(pair)
                .with_context(|| format!("Invalid curated override for {}", source))?;
        }

        Ok(catalog)
    }
}

fn has_item(catalog: &Catalog, audience: Audience, id: &str) -> bool {
    [Department::Goods, Department::Clothing]
        .into_iter()
        .any(|d| catalog.side(audience, d).get_by_id(id).is_some())
}

/// Parse a catalog from JSON text
pub fn parse_catalog(json: &str) -> Result<Catalog> {
    let document: CatalogDocument = serde_json::from_str(json).context("Malformed catalog document")?;
    document.into_catalog()
}

/// The built-in seed catalog
pub fn builtin_catalog() -> Result<Catalog> {
    parse_catalog(BUILTIN_CATALOG)
}

/// Load a catalog from a JSON file
pub fn load_catalog<P: AsRef<Path>>(path: P) -> Result<Catalog> {
    let path = path.as_ref();
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read catalog {}", path.display()))?;
    let catalog = parse_catalog(&json).with_context(|| format!("Failed to load catalog {}", path.display()))?;

    info!(
        "Loaded catalog from {}: {} womens items, {} mens items, {} curated pairs",
        path.display(),
        catalog.count(Audience::Womens),
        catalog.count(Audience::Mens),
        catalog.overrides().len()
    );
    Ok(catalog)
}

#[cfg(test)]
mod tests {
    use super::*;
    use fairshelf_core::Category;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_builtin_catalog() {
        let catalog = builtin_catalog().unwrap();

        assert_eq!(catalog.count(Audience::Womens), 10);
        assert_eq!(catalog.count(Audience::Mens), 10);
        assert_eq!(catalog.overrides().len(), 5);

        let goods = catalog.side(Audience::Womens, Department::Goods);
        let venus = goods.resolve_item("Gillette Venus Original Razor").unwrap();
        assert_eq!(venus.id, "w001");
        assert_eq!(venus.ingredients.len(), 5);

        let pair = catalog.overrides().get("w001").unwrap();
        assert_eq!(pair.target_id, "m002");
        assert_eq!(pair.similarity_score, 0.87);
    }

    #[test]
    fn test_builtin_clothing_uses_materials_and_charts() {
        let catalog = builtin_catalog().unwrap();
        let clothing = catalog.side(Audience::Mens, Department::Clothing);
        let hoodie = clothing.get_by_id("mc001").unwrap();

        assert_eq!(hoodie.category, Category::Clothing);
        assert!(!hoodie.ingredients.is_empty());
        let chart = hoodie.size_chart.as_ref().unwrap();
        assert_eq!(chart.labels().first(), Some(&"XS"));
    }

    #[test]
    fn test_load_catalog_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{
                "womens": [{{"key": "pink soap", "id": "w1", "title": "Pink Soap", "price": 5.0,
                            "category": "personal_care", "subcategory": "soap"}}],
                "mens": [{{"key": "blue soap", "id": "m1", "title": "Blue Soap", "price": 3.0,
                          "category": "personal_care", "subcategory": "soap"}}],
                "overrides": [{{"womens_id": "w1", "mens_id": "m1", "similarity_score": 0.9,
                               "match_reasons": ["Same soap"]}}]
            }}"#
        )
        .unwrap();

        let catalog = load_catalog(file.path()).unwrap();
        assert_eq!(catalog.count(Audience::Womens), 1);
        assert_eq!(catalog.overrides().get("w1").unwrap().reasons, vec!["Same soap"]);
    }

    #[test]
    fn test_duplicate_key_rejected() {
        let json = r#"{"mens": [
            {"key": "soap", "id": "m1", "title": "Soap", "price": 1.0, "category": "personal_care", "subcategory": "soap"},
            {"key": "Soap", "id": "m2", "title": "Soap", "price": 1.0, "category": "personal_care", "subcategory": "soap"}
        ]}"#;
        let err = parse_catalog(json).unwrap_err();
        assert!(format!("{:#}", err).contains("'Soap'"));
    }

    #[test]
    fn test_nonpositive_price_rejected() {
        let json = r#"{"womens": [
            {"key": "free", "id": "w1", "title": "Free", "price": 0, "category": "personal_care", "subcategory": "soap"}
        ]}"#;
        assert!(parse_catalog(json).is_err());
    }

    #[test]
    fn test_missing_file() {
        let err = load_catalog("/definitely/not/here.json").unwrap_err();
        assert!(err.to_string().contains("Failed to read catalog"));
    }
}
