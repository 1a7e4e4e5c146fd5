//! First-three rule
//!
//! In personal-care formulations the first three listed ingredients make up
//! most of the product. Two products whose leading three ingredients line up
//! position by position are treated as functionally equivalent.

use crate::config::DEFAULT_SHARED_WORDING_OVERLAP;
use crate::distance::{jaccard, normalize_ingredient, LEADING_INGREDIENTS};
use serde::Serialize;
use std::collections::HashSet;

/// Positions that must match for the rule to hold
pub const FIRST_THREE_THRESHOLD: usize = 2;

/// How a leading position matched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PositionMatchKind {
    /// Normalized forms are identical
    Exact,
    /// One normalized form contains the other
    Contained,
    /// Normalized forms share most of their words
    SharedWording,
}

/// A matched leading position
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PositionMatch {
    /// 1-based position in the list
    pub position: usize,
    pub source: String,
    pub target: String,
    pub kind: PositionMatchKind,
}

/// Outcome of the first-three check
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FirstThreeReport {
    pub is_match: bool,
    pub matched_count: usize,
    pub threshold: usize,
    pub details: Vec<PositionMatch>,
    pub verdict: &'static str,
}

impl FirstThreeReport {
    fn empty() -> Self {
        Self::from_details(Vec::new())
    }

    fn from_details(details: Vec<PositionMatch>) -> Self {
        let matched_count = details.len();
        let is_match = matched_count >= FIRST_THREE_THRESHOLD;
        Self {
            is_match,
            matched_count,
            threshold: FIRST_THREE_THRESHOLD,
            details,
            verdict: if is_match { "Functionally equivalent" } else { "Different formulation" },
        }
    }
}

/// Check whether the leading three ingredients of two lists match
pub fn check_first_three<S: AsRef<str>>(source: &[S], target: &[S]) -> FirstThreeReport {
    check_first_three_with(source, target, DEFAULT_SHARED_WORDING_OVERLAP)
}

/// [`check_first_three`] with an explicit word-overlap level for the
/// shared-wording match
pub fn check_first_three_with<S: AsRef<str>>(
    source: &[S],
    target: &[S],
    shared_wording_overlap: f64,
) -> FirstThreeReport {
    if source.is_empty() || target.is_empty() {
        return FirstThreeReport::empty();
    }

    let details = source
        .iter()
        .zip(target)
        .take(LEADING_INGREDIENTS)
        .enumerate()
        .filter_map(|(idx, (s, t))| {
            let kind = compare_leading(
                &normalize_ingredient(s.as_ref()),
                &normalize_ingredient(t.as_ref()),
                shared_wording_overlap,
            )?;
            Some(PositionMatch {
                position: idx + 1,
                source: s.as_ref().to_string(),
                target: t.as_ref().to_string(),
                kind,
            })
        })
        .collect();

    FirstThreeReport::from_details(details)
}

fn compare_leading(a: &str, b: &str, shared_wording_overlap: f64) -> Option<PositionMatchKind> {
    // an entry that normalizes to nothing carries no information
    if a.is_empty() || b.is_empty() {
        return None;
    }
    if a == b {
        return Some(PositionMatchKind::Exact);
    }
    if a.contains(b) || b.contains(a) {
        return Some(PositionMatchKind::Contained);
    }

    let words_a: HashSet<&str> = a.split_whitespace().collect();
    let words_b: HashSet<&str> = b.split_whitespace().collect();
    if jaccard(&words_a, &words_b) >= shared_wording_overlap {
        return Some(PositionMatchKind::SharedWording);
    }

    None
}
