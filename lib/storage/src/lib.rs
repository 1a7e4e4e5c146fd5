pub mod catalog;
pub mod savings;

pub use catalog::{builtin_catalog, load_catalog, parse_catalog, CatalogDocument, CatalogEntry, BUILTIN_CATALOG};
pub use savings::{
    CategoryTotal, InMemorySavingsStore, RecordReceipt, SavingsEntry, SavingsStats, SavingsStore,
};
