use crate::{Audience, Category, CuratedOverride, Department, Error, Item, OverrideTable, Result};
use ahash::{AHashMap, AHashSet};

/// Minimum number of shared words for a word-overlap resolution
pub const MIN_WORD_OVERLAP: usize = 2;

/// An ordered collection of catalog items addressed by lookup key.
///
/// Iteration follows insertion order; matching relies on it to break ties.
#[derive(Debug, Clone, Default)]
pub struct ItemCollection {
    entries: Vec<(String, Item)>,
    by_key: AHashMap<String, usize>,
    by_id: AHashMap<String, usize>,
}

impl ItemCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an item under a lookup key. Keys are stored lower-cased.
    pub fn insert(&mut self, key: &str, item: Item) -> Result<()> {
        let key = key.trim().to_lowercase();
        if !(item.price > 0.0) {
            return Err(Error::InvalidPrice(item.id));
        }
        if self.by_key.contains_key(&key) {
            return Err(Error::DuplicateKey(key));
        }
        if self.by_id.contains_key(&item.id) {
            return Err(Error::ItemExists(item.id));
        }

        let idx = self.entries.len();
        self.by_key.insert(key.clone(), idx);
        self.by_id.insert(item.id.clone(), idx);
        self.entries.push((key, item));
        Ok(())
    }

    /// Keys are stored trimmed and lowercased, so lookups are too
    pub fn get(&self, key: &str) -> Option<&Item> {
        self.by_key.get(key.trim().to_lowercase().as_str()).map(|&idx| &self.entries[idx].1)
    }

    pub fn get_by_id(&self, id: &str) -> Option<&Item> {
        self.by_id.get(id).map(|&idx| &self.entries[idx].1)
    }

    /// Iterate `(key, item)` pairs in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Item)> {
        self.entries.iter().map(|(k, item)| (k.as_str(), item))
    }

    pub fn items(&self) -> impl Iterator<Item = &Item> {
        self.entries.iter().map(|(_, item)| item)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Resolve a free-text product title to a catalog key.
    ///
    /// Tried in order, first hit wins:
    /// 1. a key contained in the query, or the query contained in a key
    /// 2. an item title contained in the query, or the query contained in a title
    /// 3. the key whose key and title words share the most words with the
    ///    query, provided at least [`MIN_WORD_OVERLAP`] words are shared
    pub fn resolve(&self, query: &str) -> Option<&str> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return None;
        }

        if let Some((key, _)) = self
            .entries
            .iter()
            .find(|(key, _)| query.contains(key.as_str()) || key.contains(query.as_str()))
        {
            return Some(key);
        }

        if let Some((key, _)) = self.entries.iter().find(|(_, item)| {
            let title = item.title.to_lowercase();
            query.contains(title.as_str()) || title.contains(query.as_str())
        }) {
            return Some(key);
        }

        let query_words: AHashSet<&str> = query.split_whitespace().collect();
        let mut best: Option<&str> = None;
        let mut best_overlap = 0;

        for (key, item) in &self.entries {
            let title = item.title.to_lowercase();
            let candidate_words: AHashSet<&str> =
                key.split_whitespace().chain(title.split_whitespace()).collect();

            let overlap = query_words.intersection(&candidate_words).count();
            if overlap > best_overlap && overlap >= MIN_WORD_OVERLAP {
                best_overlap = overlap;
                best = Some(key);
            }
        }

        best
    }

    /// Resolve a query straight to the item
    pub fn resolve_item(&self, query: &str) -> Option<&Item> {
        self.resolve(query).and_then(|key| self.get(key))
    }
}

/// The full catalog: source and target sides per department, plus curated
/// overrides. Immutable once built; share it behind an `Arc`.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    womens_goods: ItemCollection,
    womens_clothing: ItemCollection,
    mens_goods: ItemCollection,
    mens_clothing: ItemCollection,
    overrides: OverrideTable,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an item; the department is derived from its category
    pub fn insert(&mut self, audience: Audience, key: &str, item: Item) -> Result<()> {
        let department = item.category.department();
        self.side_mut(audience, department).insert(key, item)
    }

    pub fn insert_override(&mut self, pair: CuratedOverride) -> Result<()> {
        self.overrides.insert(pair)
    }

    pub fn side(&self, audience: Audience, department: Department) -> &ItemCollection {
        match (audience, department) {
            (Audience::Womens, Department::Goods) => &self.womens_goods,
            (Audience::Womens, Department::Clothing) => &self.womens_clothing,
            (Audience::Mens, Department::Goods) => &self.mens_goods,
            (Audience::Mens, Department::Clothing) => &self.mens_clothing,
        }
    }

    fn side_mut(&mut self, audience: Audience, department: Department) -> &mut ItemCollection {
        match (audience, department) {
            (Audience::Womens, Department::Goods) => &mut self.womens_goods,
            (Audience::Womens, Department::Clothing) => &mut self.womens_clothing,
            (Audience::Mens, Department::Goods) => &mut self.mens_goods,
            (Audience::Mens, Department::Clothing) => &mut self.mens_clothing,
        }
    }

    pub fn overrides(&self) -> &OverrideTable {
        &self.overrides
    }

    /// All items of one audience, goods first, then clothing
    pub fn audience_items(&self, audience: Audience) -> impl Iterator<Item = &Item> {
        self.side(audience, Department::Goods)
            .items()
            .chain(self.side(audience, Department::Clothing).items())
    }

    pub fn count(&self, audience: Audience) -> usize {
        self.side(audience, Department::Goods).len() + self.side(audience, Department::Clothing).len()
    }

    /// Case-insensitive substring search over keys and titles of both audiences
    pub fn search(&self, query: &str, category: Option<Category>) -> Vec<&Item> {
        let query = query.trim().to_lowercase();
        let mut results = Vec::new();

        for audience in [Audience::Womens, Audience::Mens] {
            for department in [Department::Goods, Department::Clothing] {
                for (key, item) in self.side(audience, department).iter() {
                    if category.map_or(false, |c| item.category != c) {
                        continue;
                    }
                    if key.contains(query.as_str()) || item.title.to_lowercase().contains(query.as_str()) {
                        results.push(item);
                    }
                }
            }
        }

        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str, title: &str, price: f64) -> Item {
        Item {
            id: id.to_string(),
            title: title.to_string(),
            price,
            category: Category::PersonalCare,
            subcategory: "razors".to_string(),
            brand: Some("Gillette".to_string()),
            ingredients: vec![],
            attributes: None,
            size_chart: None,
            available_sizes: vec![],
            retailers: vec![],
            image_url: None,
        }
    }

    fn razors() -> ItemCollection {
        let mut collection = ItemCollection::new();
        collection.insert("gillette venus", item("w001", "Gillette Venus Original Razor", 15.99)).unwrap();
        collection.insert("schick intuition", item("w002", "Schick Intuition Sensitive Care Razor", 12.49)).unwrap();
        collection
    }

    #[test]
    fn test_get_ignores_key_case() {
        let collection = razors();
        assert_eq!(collection.get("Gillette Venus ").map(|i| i.id.as_str()), Some("w001"));
        assert_eq!(collection.get("SCHICK INTUITION").map(|i| i.id.as_str()), Some("w002"));
        assert!(collection.get("gillette").is_none());
    }

    #[test]
    fn test_resolve_key_inside_query() {
        let collection = razors();
        assert_eq!(collection.resolve("Gillette Venus Original Razor"), Some("gillette venus"));
    }

    #[test]
    fn test_resolve_query_inside_key() {
        let collection = razors();
        assert_eq!(collection.resolve("schick"), Some("schick intuition"));
    }

    #[test]
    fn test_resolve_long_listing_title() {
        let collection = razors();
        assert_eq!(
            collection.resolve("Schick Intuition Sensitive Care Razor, 1 ct"),
            Some("schick intuition")
        );
    }

    #[test]
    fn test_resolve_word_overlap() {
        let collection = razors();
        // "sensitive care" shares two words with the Schick title only
        assert_eq!(collection.resolve("sensitive care shaver"), Some("schick intuition"));
        // a single shared word is not enough
        assert_eq!(collection.resolve("razor blades"), None);
    }

    #[test]
    fn test_resolve_empty_query() {
        assert_eq!(razors().resolve("   "), None);
    }

    #[test]
    fn test_insertion_order_and_duplicates() {
        let mut collection = razors();
        let keys: Vec<&str> = collection.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["gillette venus", "schick intuition"]);

        assert!(matches!(
            collection.insert("Gillette Venus", item("w009", "Other", 1.0)),
            Err(Error::DuplicateKey(_))
        ));
        assert!(matches!(
            collection.insert("other", item("w001", "Other", 1.0)),
            Err(Error::ItemExists(_))
        ));
        assert!(matches!(
            collection.insert("free", item("w010", "Free", 0.0)),
            Err(Error::InvalidPrice(_))
        ));
    }

    #[test]
    fn test_catalog_sides_and_search() {
        let mut catalog = Catalog::new();
        catalog.insert(Audience::Womens, "gillette venus", item("w001", "Gillette Venus Original Razor", 15.99)).unwrap();
        catalog.insert(Audience::Mens, "gillette mach3", item("m001", "Gillette Mach3 Razor", 9.99)).unwrap();

        assert_eq!(catalog.side(Audience::Mens, Department::Goods).len(), 1);
        assert!(catalog.side(Audience::Mens, Department::Clothing).is_empty());
        assert_eq!(catalog.search("gillette", None).len(), 2);
        assert_eq!(catalog.search("gillette", Some(Category::Clothing)).len(), 0);
        assert_eq!(catalog.count(Audience::Womens), 1);
    }
}
