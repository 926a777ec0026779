// src/config.rs
use std::env;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_CATALOG_FILE: &str = "nse_tickers_search.json";
pub const DEFAULT_TICKERS_CSV: &str = "nse_tickers.csv";
pub const DEFAULT_PRICE_BASE_URL: &str = "https://www.google.com/finance/quote";

#[derive(Clone, Debug)]
pub struct StockSearchConfig {
    pub catalog_paths: Vec<PathBuf>,
    pub tickers_csv: PathBuf,
    /// Fall back to an unindexed catalog of the default stocks when no file loads.
    pub builtin_catalog: bool,
    /// `None` disables expiry: the catalog is kept until an explicit reload.
    pub catalog_ttl: Option<Duration>,
    pub price_timeout: Duration,
    pub price_base_url: String,
    pub host: String,
    pub port: u16,
}

impl Default for StockSearchConfig {
    fn default() -> Self {
        Self {
            catalog_paths: default_catalog_paths(),
            tickers_csv: PathBuf::from(DEFAULT_TICKERS_CSV),
            builtin_catalog: false,
            catalog_ttl: Some(Duration::from_secs(43200)),
            price_timeout: Duration::from_secs(10),
            price_base_url: DEFAULT_PRICE_BASE_URL.to_string(),
            host: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

impl StockSearchConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let mut catalog_paths = Vec::new();
        if let Ok(path) = env::var("NSE_CATALOG_PATH") {
            if !path.trim().is_empty() {
                catalog_paths.push(PathBuf::from(path));
            }
        }
        catalog_paths.extend(defaults.catalog_paths);

        let tickers_csv = env::var("NSE_TICKERS_CSV")
            .map(PathBuf::from)
            .unwrap_or(defaults.tickers_csv);

        let catalog_ttl = match parse_env::<u64>("CATALOG_TTL_SECONDS") {
            Some(0) => None,
            Some(secs) => Some(Duration::from_secs(secs)),
            None => defaults.catalog_ttl,
        };

        Self {
            catalog_paths,
            tickers_csv,
            builtin_catalog: env::var("NSE_BUILTIN_CATALOG")
                .map(|v| v.to_lowercase() == "true")
                .unwrap_or(defaults.builtin_catalog),
            catalog_ttl,
            price_timeout: parse_env::<u64>("PRICE_TIMEOUT_SECONDS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.price_timeout),
            price_base_url: env::var("PRICE_BASE_URL").unwrap_or(defaults.price_base_url),
            host: env::var("HOST").unwrap_or(defaults.host),
            port: parse_env::<u16>("PORT").unwrap_or(defaults.port),
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn default_catalog_paths() -> Vec<PathBuf> {
    vec![
        PathBuf::from(DEFAULT_CATALOG_FILE),
        PathBuf::from("..").join(DEFAULT_CATALOG_FILE),
        PathBuf::from("../..").join(DEFAULT_CATALOG_FILE),
    ]
}

fn parse_env<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|v| v.trim().parse::<T>().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_service_conventions() {
        let config = StockSearchConfig::default();
        assert_eq!(config.catalog_paths[0], PathBuf::from("nse_tickers_search.json"));
        assert_eq!(config.catalog_paths.len(), 3);
        assert_eq!(config.catalog_ttl, Some(Duration::from_secs(43200)));
        assert_eq!(config.bind_address(), "0.0.0.0:8000");
    }
}
