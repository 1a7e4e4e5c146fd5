//! Similarity functions for the individual matching features
//!
//! Provides the set-overlap primitive and the per-feature scorers used in
//! equivalence matching. All scorers return a similarity in [0.0, 1.0] where
//! 1.0 means identical.

use crate::config::IngredientWeights;
use fairshelf_core::{AttributeValue, Attributes};
use std::collections::HashSet;
use std::hash::{BuildHasher, Hash};

/// Score returned when two attribute maps share no keys
pub const NEUTRAL_ATTRIBUTE_SCORE: f64 = 0.5;

/// Number of leading ingredients that dominate a formulation
pub const LEADING_INGREDIENTS: usize = 3;

/// Words ignored when comparing titles
pub const STOP_WORDS: [&str; 10] = ["the", "a", "an", "and", "or", "for", "with", "in", "of", "to"];

/// Jaccard index of two sets: |A ∩ B| / |A ∪ B|
///
/// Returns 0.0 when either set is empty.
pub fn jaccard<T, S>(a: &HashSet<T, S>, b: &HashSet<T, S>) -> f64
where
    T: Eq + Hash,
    S: BuildHasher,
{
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    let intersection = a.intersection(b).count();
    let union = a.len() + b.len() - intersection;

    intersection as f64 / union as f64
}

/// Canonicalize an ingredient or material label for comparison
///
/// Lower-cases, drops numeric quantities together with a trailing `%` and the
/// whitespace after them, collapses whitespace runs and trims.
/// `"5% Glycerin"` becomes `"glycerin"`.
pub fn normalize_ingredient(text: &str) -> String {
    let lowered = text.to_lowercase();
    let mut stripped = String::with_capacity(lowered.len());
    let mut chars = lowered.chars().peekable();

    while let Some(c) = chars.next() {
        if c.is_ascii_digit() {
            while chars.next_if(|c| c.is_ascii_digit()).is_some() {}
            chars.next_if_eq(&'%');
            while chars.next_if(|c| c.is_whitespace()).is_some() {}
            continue;
        }
        stripped.push(c);
    }

    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn normalized_set<S: AsRef<str>>(items: &[S]) -> HashSet<String> {
    items.iter().map(|i| normalize_ingredient(i.as_ref())).collect()
}

fn leading<S: AsRef<str>>(items: &[S]) -> Vec<String> {
    items
        .iter()
        .take(LEADING_INGREDIENTS)
        .map(|i| normalize_ingredient(i.as_ref()))
        .collect()
}

/// Similarity between two ordered ingredient lists
///
/// Blends three signals:
/// - Jaccard over the full normalized lists
/// - Jaccard over the first three entries as sets
/// - fraction of the first three positions that match exactly
pub fn ingredient_similarity<S: AsRef<str>>(a: &[S], b: &[S], weights: &IngredientWeights) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    let overall = jaccard(&normalized_set(a), &normalized_set(b));

    let leading_a = leading(a);
    let leading_b = leading(b);

    let positional = leading_a
        .iter()
        .zip(&leading_b)
        .filter(|(x, y)| x == y)
        .count() as f64
        / LEADING_INGREDIENTS as f64;

    let set_a: HashSet<String> = leading_a.into_iter().collect();
    let set_b: HashSet<String> = leading_b.into_iter().collect();
    let first_three_overlap = jaccard(&set_a, &set_b);

    let score = weights.overall * overall
        + weights.first_three_overlap * first_three_overlap
        + weights.positional * positional;

    score.clamp(0.0, 1.0)
}

/// Similarity of two numeric attribute values
///
/// Values within `tolerance` relative difference count as identical; beyond
/// that, credit decays linearly with the relative difference.
pub fn number_similarity(a: f64, b: f64, tolerance: f64) -> f64 {
    if a == b {
        return 1.0;
    }

    let relative_diff = (a - b).abs() / a.abs().max(b.abs());
    if relative_diff <= tolerance {
        1.0
    } else {
        (1.0 - relative_diff).max(0.0)
    }
}

/// Similarity of two attribute values of any kind
pub fn value_similarity(a: &AttributeValue, b: &AttributeValue, tolerance: f64) -> f64 {
    match (a, b) {
        (AttributeValue::Bool(x), AttributeValue::Bool(y)) => boolean_similarity(*x, *y),
        (AttributeValue::Number(x), AttributeValue::Number(y)) => number_similarity(*x, *y, tolerance),
        (AttributeValue::Text(x), AttributeValue::Text(y)) => {
            if x == y { 1.0 } else { 0.0 }
        }
        _ => 0.0,
    }
}

/// 1.0 if both values are the same, 0.0 otherwise
pub fn boolean_similarity(a: bool, b: bool) -> f64 {
    if a == b { 1.0 } else { 0.0 }
}

/// Mean value similarity across the attribute keys both maps carry
///
/// Maps with no key in common score [`NEUTRAL_ATTRIBUTE_SCORE`].
pub fn attribute_similarity(a: &Attributes, b: &Attributes, tolerance: f64) -> f64 {
    let scores: Vec<f64> = a
        .iter()
        .filter_map(|(key, value_a)| {
            b.get(key).map(|value_b| value_similarity(value_a, value_b, tolerance))
        })
        .collect();

    if scores.is_empty() {
        return NEUTRAL_ATTRIBUTE_SCORE;
    }

    scores.iter().sum::<f64>() / scores.len() as f64
}

/// Lower-cased word set of a title, stop words removed
pub fn title_words(title: &str) -> HashSet<String> {
    title
        .split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|w| !w.is_empty())
        .map(|w| w.to_lowercase())
        .filter(|w| !STOP_WORDS.contains(&w.as_str()))
        .collect()
}

/// Word-overlap similarity of two product titles
pub fn title_similarity(a: &str, b: &str) -> f64 {
    jaccard(&title_words(a), &title_words(b))
}
