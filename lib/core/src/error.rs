use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Item already exists: {0}")]
    ItemExists(String),

    #[error("Duplicate catalog key: {0}")]
    DuplicateKey(String),

    #[error("Curated override already exists for source item: {0}")]
    OverrideExists(String),

    #[error("Invalid override score for {source_id}: {score} is outside [0, 1]")]
    InvalidOverrideScore { source_id: String, score: f64 },

    #[error("Invalid price for {0}: prices must be positive")]
    InvalidPrice(String),

    #[error("Unknown category: {0}")]
    UnknownCategory(String),
}
