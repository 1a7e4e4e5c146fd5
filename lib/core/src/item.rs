use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

/// Product category as supplied by callers and stored on items
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    PersonalCare,
    Clothing,
    Accessories,
}

impl Category {
    /// Catalog partition this category is matched within
    pub fn department(self) -> Department {
        match self {
            Category::Clothing => Department::Clothing,
            Category::PersonalCare | Category::Accessories => Department::Goods,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Category::PersonalCare => "personal_care",
            Category::Clothing => "clothing",
            Category::Accessories => "accessories",
        }
    }
}

impl std::str::FromStr for Category {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "personal_care" => Ok(Category::PersonalCare),
            "clothing" => Ok(Category::Clothing),
            "accessories" => Ok(Category::Accessories),
            other => Err(crate::Error::UnknownCategory(other.to_string())),
        }
    }
}

/// Which side of the catalog an item belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Audience {
    /// Source side: items a shopper starts from
    Womens,
    /// Target side: candidate equivalents
    Mens,
}

/// Catalog partition. Clothing is matched against clothing, everything else
/// against general goods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Department {
    Goods,
    Clothing,
}

/// Attribute value: a closed set of the scalar kinds catalogs carry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Bool(bool),
    Number(f64),
    Text(String),
}

impl AttributeValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            AttributeValue::Number(n) => Some(*n),
            _ => None,
        }
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::Bool(b) => write!(f, "{}", b),
            AttributeValue::Number(n) => write!(f, "{}", n),
            AttributeValue::Text(s) => write!(f, "{}", s),
        }
    }
}

/// Attribute map. Ordered so that aggregation over keys is reproducible.
pub type Attributes = BTreeMap<String, AttributeValue>;

/// A catalog record
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Item {
    pub id: String,
    pub title: String,
    pub price: f64,
    pub category: Category,
    pub subcategory: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    /// Ingredients for goods, materials for clothing. Order is significant.
    #[serde(default, alias = "materials", skip_serializing_if = "Vec::is_empty")]
    pub ingredients: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attributes: Option<Attributes>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size_chart: Option<SizeChart>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub available_sizes: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub retailers: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl Item {
    /// Attribute map, if present and non-empty
    pub fn attribute_map(&self) -> Option<&Attributes> {
        self.attributes.as_ref().filter(|a| !a.is_empty())
    }

    pub fn attribute(&self, name: &str) -> Option<&AttributeValue> {
        self.attributes.as_ref().and_then(|a| a.get(name))
    }
}

/// Measurements of one size, in inches, keyed by measurement name
pub type Measurements = BTreeMap<String, f64>;

/// One labeled row of a size chart
#[derive(Debug, Clone, PartialEq)]
pub struct SizeBucket {
    pub label: String,
    pub measurements: Measurements,
}

impl SizeBucket {
    pub fn get(&self, measurement: &str) -> Option<f64> {
        self.measurements.get(measurement).copied()
    }
}

/// Size label → measurements, kept in document order.
///
/// Serialized as a JSON object; the order of keys in the source document is
/// the iteration order, which callers rely on for tie-breaking.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SizeChart {
    buckets: Vec<SizeBucket>,
}

impl SizeChart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a size. A replaced size keeps its original position.
    pub fn insert(&mut self, label: impl Into<String>, measurements: Measurements) {
        let label = label.into();
        match self.buckets.iter_mut().find(|b| b.label == label) {
            Some(bucket) => bucket.measurements = measurements,
            None => self.buckets.push(SizeBucket { label, measurements }),
        }
    }

    /// Builder-style insert from `(name, inches)` pairs
    pub fn with_size(mut self, label: &str, measurements: &[(&str, f64)]) -> Self {
        let measurements = measurements
            .iter()
            .map(|(name, value)| (name.to_string(), *value))
            .collect();
        self.insert(label, measurements);
        self
    }

    pub fn get(&self, label: &str) -> Option<&SizeBucket> {
        self.buckets.iter().find(|b| b.label == label)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SizeBucket> {
        self.buckets.iter()
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    pub fn labels(&self) -> Vec<&str> {
        self.buckets.iter().map(|b| b.label.as_str()).collect()
    }
}

impl Serialize for SizeChart {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.buckets.len()))?;
        for bucket in &self.buckets {
            map.serialize_entry(&bucket.label, &bucket.measurements)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for SizeChart {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ChartVisitor;

        impl<'de> Visitor<'de> for ChartVisitor {
            type Value = SizeChart;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of size labels to measurement maps")
            }

            fn visit_map<M: MapAccess<'de>>(self, mut access: M) -> Result<SizeChart, M::Error> {
                let mut chart = SizeChart::new();
                while let Some((label, measurements)) =
                    access.next_entry::<String, Measurements>()?
                {
                    chart.insert(label, measurements);
                }
                Ok(chart)
            }
        }

        deserializer.deserialize_map(ChartVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_size_chart_keeps_document_order() {
        let chart: SizeChart = serde_json::from_value(json!({
            "XS": {"chest": 34, "waist": 28},
            "S": {"chest": 36, "waist": 30},
            "M": {"chest": 38, "waist": 32}
        }))
        .unwrap();

        assert_eq!(chart.labels(), vec!["XS", "S", "M"]);
        assert_eq!(chart.get("S").unwrap().get("waist"), Some(30.0));
    }

    #[test]
    fn test_size_chart_serializes_as_object() {
        let chart = SizeChart::new()
            .with_size("28x30", &[("waist", 28.0), ("hip", 36.0)])
            .with_size("29x30", &[("waist", 29.0), ("hip", 37.0)]);

        let value = serde_json::to_value(&chart).unwrap();
        assert_eq!(value["28x30"]["hip"], json!(36.0));
        assert_eq!(value.as_object().unwrap().len(), 2);
    }

    #[test]
    fn test_attribute_value_untagged() {
        let attrs: Attributes = serde_json::from_value(json!({
            "blade_count": 5,
            "pivoting_head": true,
            "skin_type": "sensitive"
        }))
        .unwrap();

        assert_eq!(attrs["blade_count"], AttributeValue::Number(5.0));
        assert_eq!(attrs["pivoting_head"], AttributeValue::Bool(true));
        assert_eq!(attrs["skin_type"], AttributeValue::Text("sensitive".into()));
    }

    #[test]
    fn test_item_accepts_materials_alias() {
        let item: Item = serde_json::from_value(json!({
            "id": "mc001",
            "title": "Regular Fit Hoodie",
            "price": 24.99,
            "category": "clothing",
            "subcategory": "hoodies",
            "materials": ["80% cotton", "20% polyester"]
        }))
        .unwrap();

        assert_eq!(item.ingredients.len(), 2);
        assert_eq!(item.category.department(), Department::Clothing);
        assert!(item.attribute_map().is_none());
    }

    #[test]
    fn test_category_parse() {
        assert_eq!("Clothing".parse::<Category>().unwrap(), Category::Clothing);
        assert!("shoes".parse::<Category>().is_err());
    }
}
