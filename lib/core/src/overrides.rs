//! Curated overrides ("golden pairs")
//!
//! A curated override pins the equivalent for a source item together with a
//! hand-verified score and explanation. Matching consults this table before
//! computing anything, and a hit is returned verbatim.

use crate::{Error, Result};
use ahash::AHashMap;
use serde::{Deserialize, Serialize};

/// A manually verified source → target pairing
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CuratedOverride {
    #[serde(alias = "womens_id")]
    pub source_id: String,
    #[serde(alias = "mens_id")]
    pub target_id: String,
    pub similarity_score: f64,
    #[serde(alias = "match_reasons")]
    pub reasons: Vec<String>,
}

impl CuratedOverride {
    pub fn new(
        source_id: impl Into<String>,
        target_id: impl Into<String>,
        similarity_score: f64,
        reasons: Vec<String>,
    ) -> Self {
        Self {
            source_id: source_id.into(),
            target_id: target_id.into(),
            similarity_score,
            reasons,
        }
    }
}

/// Override lookup keyed by source item id. Holds at most one override per
/// source id and remembers insertion order for listing.
#[derive(Debug, Clone, Default)]
pub struct OverrideTable {
    pairs: Vec<CuratedOverride>,
    by_source: AHashMap<String, usize>,
}

impl OverrideTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, pair: CuratedOverride) -> Result<()> {
        if !(0.0..=1.0).contains(&pair.similarity_score) {
            return Err(Error::InvalidOverrideScore {
                source_id: pair.source_id,
                score: pair.similarity_score,
            });
        }
        if self.by_source.contains_key(&pair.source_id) {
            return Err(Error::OverrideExists(pair.source_id));
        }

        self.by_source.insert(pair.source_id.clone(), self.pairs.len());
        self.pairs.push(pair);
        Ok(())
    }

    pub fn get(&self, source_id: &str) -> Option<&CuratedOverride> {
        self.by_source.get(source_id).map(|&idx| &self.pairs[idx])
    }

    pub fn iter(&self) -> impl Iterator<Item = &CuratedOverride> {
        self.pairs.iter()
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(source: &str, target: &str, score: f64) -> CuratedOverride {
        CuratedOverride::new(source, target, score, vec!["Same blade count (5 blades)".into()])
    }

    #[test]
    fn test_insert_and_get() {
        let mut table = OverrideTable::new();
        table.insert(pair("w001", "m002", 0.87)).unwrap();

        let found = table.get("w001").unwrap();
        assert_eq!(found.target_id, "m002");
        assert_eq!(found.similarity_score, 0.87);
        assert!(table.get("w002").is_none());
    }

    #[test]
    fn test_one_override_per_source() {
        let mut table = OverrideTable::new();
        table.insert(pair("w001", "m002", 0.87)).unwrap();

        assert!(matches!(
            table.insert(pair("w001", "m001", 0.5)),
            Err(Error::OverrideExists(_))
        ));
        assert_eq!(table.len(), 1);
        assert_eq!(table.get("w001").unwrap().target_id, "m002");
    }

    #[test]
    fn test_score_out_of_range_rejected() {
        let mut table = OverrideTable::new();
        assert!(matches!(
            table.insert(pair("w001", "m002", 1.2)),
            Err(Error::InvalidOverrideScore { .. })
        ));
        assert!(table.is_empty());
    }

    #[test]
    fn test_legacy_field_names() {
        let parsed: CuratedOverride = serde_json::from_value(serde_json::json!({
            "womens_id": "w003",
            "mens_id": "m003",
            "similarity_score": 0.91,
            "match_reasons": ["Identical first 3 active ingredients"]
        }))
        .unwrap();

        assert_eq!(parsed.source_id, "w003");
        assert_eq!(parsed.reasons.len(), 1);
    }
}
