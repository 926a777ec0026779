// src/types.rs
use serde::{Deserialize, Serialize};

/// The `{symbol, name}` pair every search and popularity query returns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockMatch {
    pub symbol: String,
    pub name: String,
}

impl StockMatch {
    pub fn new(symbol: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            name: name.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockPrice {
    pub symbol: String,
    pub price: Option<f64>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SearchResponse {
    pub stocks: Vec<StockMatch>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PopularResponse {
    pub stocks: Vec<StockMatch>,
    pub source: String,
    pub total: usize,
}
