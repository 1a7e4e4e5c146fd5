//! Savings ledger
//!
//! Per-user record of money saved by following recommendations. This is the
//! only mutable state in the service.

use ahash::AHashMap;
use chrono::{DateTime, Utc};
use fairshelf_core::round_to;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

/// Number of categories reported in [`SavingsStats::top_categories`]
pub const TOP_CATEGORIES: usize = 5;

/// One recorded saving
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavingsEntry {
    pub amount: f64,
    pub category: String,
    pub product_title: String,
    /// Markup avoided, when the caller knows it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub savings_percent: Option<f64>,
    pub recorded_at: DateTime<Utc>,
}

impl SavingsEntry {
    pub fn new(amount: f64, category: impl Into<String>, product_title: impl Into<String>) -> Self {
        Self {
            amount,
            category: category.into(),
            product_title: product_title.into(),
            savings_percent: None,
            recorded_at: Utc::now(),
        }
    }

    pub fn with_savings_percent(mut self, percent: f64) -> Self {
        self.savings_percent = Some(percent);
        self
    }
}

/// Result of recording a saving
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordReceipt {
    pub recorded: bool,
    pub transaction_amount: f64,
    pub lifetime_total: f64,
    pub transaction_count: usize,
}

/// Total saved in one category
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTotal {
    pub category: String,
    pub amount: f64,
}

/// Lifetime savings of one user
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SavingsStats {
    pub total_saved: f64,
    pub total_transactions: usize,
    /// Mean of the percentages supplied with entries; 0 when none were
    pub avg_savings_percent: f64,
    pub top_categories: Vec<CategoryTotal>,
}

impl SavingsStats {
    fn empty() -> Self {
        Self {
            total_saved: 0.0,
            total_transactions: 0,
            avg_savings_percent: 0.0,
            top_categories: Vec::new(),
        }
    }

    fn from_entries(entries: &[SavingsEntry]) -> Self {
        if entries.is_empty() {
            return Self::empty();
        }

        let total: f64 = entries.iter().map(|e| e.amount).sum();

        let percents: Vec<f64> = entries.iter().filter_map(|e| e.savings_percent).collect();
        let avg_savings_percent = if percents.is_empty() {
            0.0
        } else {
            percents.iter().sum::<f64>() / percents.len() as f64
        };

        // first-seen order, so equal totals keep the order they were recorded in
        let mut categories: Vec<CategoryTotal> = Vec::new();
        for entry in entries {
            match categories.iter_mut().find(|c| c.category == entry.category) {
                Some(c) => c.amount += entry.amount,
                None => categories.push(CategoryTotal {
                    category: entry.category.clone(),
                    amount: entry.amount,
                }),
            }
        }
        categories.sort_by(|a, b| b.amount.total_cmp(&a.amount));
        categories.truncate(TOP_CATEGORIES);
        for c in &mut categories {
            c.amount = round_to(c.amount, 2);
        }

        Self {
            total_saved: round_to(total, 2),
            total_transactions: entries.len(),
            avg_savings_percent: round_to(avg_savings_percent, 1),
            top_categories: categories,
        }
    }
}

/// Append-only per-user savings store
pub trait SavingsStore: Send + Sync {
    /// Append an entry and report the user's new running totals
    fn record(&self, user_id: &str, entry: SavingsEntry) -> RecordReceipt;

    /// Aggregate a user's entries; unknown users get zeroed stats
    fn stats(&self, user_id: &str) -> SavingsStats;

    /// A user's entries in recording order
    fn history(&self, user_id: &str) -> Vec<SavingsEntry>;
}

/// [`SavingsStore`] kept in process memory
#[derive(Debug, Default)]
pub struct InMemorySavingsStore {
    ledgers: RwLock<AHashMap<String, Vec<SavingsEntry>>>,
}

impl InMemorySavingsStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of users with at least one entry
    pub fn user_count(&self) -> usize {
        self.ledgers.read().len()
    }
}

impl SavingsStore for InMemorySavingsStore {
    fn record(&self, user_id: &str, entry: SavingsEntry) -> RecordReceipt {
        let transaction_amount = entry.amount;
        let mut ledgers = self.ledgers.write();
        let ledger = ledgers.entry(user_id.to_string()).or_default();
        ledger.push(entry);

        RecordReceipt {
            recorded: true,
            transaction_amount,
            lifetime_total: round_to(ledger.iter().map(|e| e.amount).sum(), 2),
            transaction_count: ledger.len(),
        }
    }

    fn stats(&self, user_id: &str) -> SavingsStats {
        self.ledgers
            .read()
            .get(user_id)
            .map(|entries| SavingsStats::from_entries(entries))
            .unwrap_or_else(SavingsStats::empty)
    }

    fn history(&self, user_id: &str) -> Vec<SavingsEntry> {
        self.ledgers.read().get(user_id).cloned().unwrap_or_default()
    }
}
