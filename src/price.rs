// src/price.rs
use async_trait::async_trait;
use log::{debug, info, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Client;
use scraper::{Html, Selector};

use crate::config::StockSearchConfig;
use crate::error::StockSearchError;

pub const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0 Safari/537.36";

// Tried in order; the first selector matching any element wins.
static PRICE_SELECTORS: Lazy<Vec<Selector>> = Lazy::new(|| {
    ["div[data-last-price]", "div.YMlKec", "div[data-attrid='Price'] span"]
        .iter()
        .filter_map(|s| Selector::parse(s).ok())
        .collect()
});

// Indian price format: 1,525.30 or 1525 or 152.50
static PRICE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\d,]+(?:\.\d{2})?").expect("price pattern compiles"));

/// Best-effort quote lookup. `None` covers every failure.
#[async_trait]
pub trait PriceFetcher: Send + Sync {
    async fn fetch_price(&self, symbol: &str, debug: bool) -> Option<f64>;
}

/// Scrapes the displayed price from a Google Finance quote page, e.g. `RELIANCE:NSE`.
pub struct GoogleFinanceFetcher {
    client: Client,
    base_url: String,
}

impl GoogleFinanceFetcher {
    pub fn new(config: &StockSearchConfig) -> Result<Self, StockSearchError> {
        let client = Client::builder()
            .timeout(config.price_timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client,
            base_url: config.price_base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Quote page for `SYMBOL:EXCHANGE`. The exchange separator stays literal.
    pub fn quote_url(&self, symbol: &str) -> String {
        let encoded = urlencoding::encode(symbol.trim()).replace("%3A", ":");
        format!("{}/{}", self.base_url, encoded)
    }

    async fn fetch_page(&self, symbol: &str) -> Result<String, StockSearchError> {
        let url = self.quote_url(symbol);
        let response = self.client.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(StockSearchError::PriceFetch(format!("{} returned {}", url, status)));
        }

        Ok(response.text().await?)
    }
}

#[async_trait]
impl PriceFetcher for GoogleFinanceFetcher {
    async fn fetch_price(&self, symbol: &str, debug: bool) -> Option<f64> {
        let html = match self.fetch_page(symbol).await {
            Ok(html) => html,
            Err(e) => {
                if debug {
                    info!("Error fetching price for {}: {}", symbol, e);
                } else {
                    warn!("Error fetching price for {}: {}", symbol, e);
                }
                return None;
            }
        };

        let price = parse_price_html(&html);
        if price.is_none() {
            if debug {
                info!("Price element not found for {}", symbol);
            } else {
                debug!("Price element not found for {}", symbol);
            }
        }
        price
    }
}

/// Extracts the first price-like number from the first matching price element.
pub fn parse_price_html(html: &str) -> Option<f64> {
    let document = Html::parse_document(html);
    let element = PRICE_SELECTORS
        .iter()
        .find_map(|selector| document.select(selector).next())?;

    let text: String = element.text().collect();
    debug!("Price element text: {}", text.trim().chars().take(120).collect::<String>());

    parse_price_text(&text)
}

pub fn parse_price_text(text: &str) -> Option<f64> {
    let token = PRICE_PATTERN.find(text)?;
    token.as_str().replace(',', "").parse::<f64>().ok()
}
