// src/lib.rs
pub mod config;
pub mod error;
pub mod types;
pub mod catalog;
pub mod search;
pub mod popular;
pub mod price;
pub mod server;

// Optional re-exports
pub use catalog::{Catalog, CatalogProvider, Ticker};
pub use config::StockSearchConfig;
pub use error::StockSearchError;
pub use popular::{default_stocks, popular_stocks};
pub use search::{indexed_search, linear_search, search};
pub use server::{configure, AppState};
pub use types::StockMatch;
