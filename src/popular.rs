// src/popular.rs
use crate::catalog::Catalog;
use crate::types::StockMatch;

pub const POPULAR_LIMIT: usize = 25;

/// Hand-curated large caps served when no catalog can be loaded.
pub const DEFAULT_STOCKS: [(&str, &str); POPULAR_LIMIT] = [
    ("RELIANCE", "Reliance Industries Limited"),
    ("TCS", "Tata Consultancy Services Limited"),
    ("HDFCBANK", "HDFC Bank Limited"),
    ("INFY", "Infosys Limited"),
    ("ICICIBANK", "ICICI Bank Limited"),
    ("HINDUNILVR", "Hindustan Unilever Limited"),
    ("SBIN", "State Bank of India"),
    ("BHARTIARTL", "Bharti Airtel Limited"),
    ("ITC", "ITC Limited"),
    ("LT", "Larsen & Toubro Limited"),
    ("WIPRO", "Wipro Limited"),
    ("TITAN", "Titan Company Limited"),
    ("HCLTECH", "HCL Technologies Limited"),
    ("TECHM", "Tech Mahindra Limited"),
    ("AXISBANK", "Axis Bank Limited"),
    ("ULTRACEMCO", "Ultratech Cement Limited"),
    ("ASIANPAINT", "Asian Paints Limited"),
    ("MARUTI", "Maruti Suzuki India Limited"),
    ("BAJAJ-AUTO", "Bajaj Auto Limited"),
    ("DRREDDY", "Dr. Reddy's Laboratories Limited"),
    ("COALINDIA", "Coal India Limited"),
    ("POWERGRID", "Power Grid Corporation of India Limited"),
    ("JSWSTEEL", "JSW Steel Limited"),
    ("TATASTEEL", "Tata Steel Limited"),
    ("DIVISLAB", "Divi's Laboratories Limited"),
];

pub fn default_stocks() -> Vec<StockMatch> {
    DEFAULT_STOCKS
        .iter()
        .map(|(symbol, name)| StockMatch::new(*symbol, *name))
        .collect()
}

/// First 25 tickers of the catalog, or the default set when there is no usable catalog.
pub fn popular_stocks(catalog: Option<&Catalog>) -> Vec<StockMatch> {
    match catalog {
        Some(catalog) if !catalog.is_empty() => catalog
            .tickers()
            .iter()
            .take(POPULAR_LIMIT)
            .map(|t| t.to_match())
            .collect(),
        _ => default_stocks(),
    }
}
