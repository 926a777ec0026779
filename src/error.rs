// src/error.rs
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StockSearchError {
    #[error("Catalog unavailable: {0}")]
    CatalogUnavailable(String),

    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Price fetch failed: {0}")]
    PriceFetch(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
