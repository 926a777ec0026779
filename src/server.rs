// src/server.rs
use actix_web::{web, HttpResponse, Resource, Result};
use chrono::{DateTime, Utc};
use log::{debug, error};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::catalog::{Catalog, CatalogProvider};
use crate::config::StockSearchConfig;
use crate::error::StockSearchError;
use crate::popular::popular_stocks;
use crate::price::{GoogleFinanceFetcher, PriceFetcher};
use crate::search::search;
use crate::types::{PopularResponse, SearchResponse, StockPrice};

/// Popular stocks shown for an empty search box.
pub const EMPTY_QUERY_SUGGESTIONS: usize = 6;

pub struct AppState {
    pub config: StockSearchConfig,
    pub session_id: Uuid,
    pub catalogs: Arc<CatalogProvider>,
    pub prices: Arc<dyn PriceFetcher>,
    pub start_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(
        config: StockSearchConfig,
        catalogs: Arc<CatalogProvider>,
        prices: Arc<dyn PriceFetcher>,
    ) -> Self {
        Self {
            config,
            session_id: Uuid::new_v4(),
            catalogs,
            prices,
            start_time: Utc::now(),
        }
    }

    pub fn from_config(config: StockSearchConfig) -> Result<Self, StockSearchError> {
        let catalogs = Arc::new(CatalogProvider::from_config(&config));
        let prices = Arc::new(GoogleFinanceFetcher::new(&config)?);
        Ok(Self::new(config, catalogs, prices))
    }

    /// Live catalog snapshot. Loading touches the filesystem, so it runs off the async workers.
    pub async fn catalog(&self) -> Option<Arc<Catalog>> {
        let catalogs = self.catalogs.clone();
        match web::block(move || catalogs.current_catalog()).await {
            Ok(catalog) => catalog,
            Err(e) => {
                error!("Catalog lookup failed: {}", e);
                None
            }
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub query: String,
}

#[derive(Debug, Deserialize)]
pub struct PriceQuery {
    #[serde(default)]
    pub debug: bool,
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(cors_resource("/health").route(web::get().to(health_check)))
        .service(cors_resource("/stocks").route(web::get().to(list_popular_stocks)))
        .service(cors_resource("/stocks/search").route(web::get().to(search_stocks)))
        .service(cors_resource("/price/{symbol}").route(web::get().to(get_stock_price)))
        .default_service(web::to(cors_handler));
}

// Non-GET requests on a known path (preflight included) get the CORS answer instead of a 405.
fn cors_resource(path: &str) -> Resource {
    web::resource(path).default_service(web::to(cors_handler))
}

pub async fn health_check(state: web::Data<AppState>) -> Result<HttpResponse> {
    let catalog_loaded = state.catalogs.snapshot().is_some();
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "session_id": state.session_id,
        "uptime_seconds": (Utc::now() - state.start_time).num_seconds(),
        "catalog_loaded": catalog_loaded,
        "version": env!("CARGO_PKG_VERSION"),
    })))
}

pub async fn list_popular_stocks(state: web::Data<AppState>) -> Result<HttpResponse> {
    let catalog = state.catalog().await;
    let stocks = popular_stocks(catalog.as_deref());
    let source = match catalog.as_deref() {
        Some(catalog) if !catalog.is_empty() => "local JSON file",
        _ => "default list",
    };

    Ok(HttpResponse::Ok().json(PopularResponse {
        total: stocks.len(),
        stocks,
        source: source.to_string(),
    }))
}

pub async fn search_stocks(
    query: web::Query<SearchQuery>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let catalog = state.catalog().await;

    let stocks = if query.query.trim().is_empty() {
        let mut popular = popular_stocks(catalog.as_deref());
        popular.truncate(EMPTY_QUERY_SUGGESTIONS);
        popular
    } else {
        search(&query.query, catalog.as_deref())
    };
    debug!("Search '{}' returned {} stocks", query.query, stocks.len());

    Ok(HttpResponse::Ok().json(SearchResponse { stocks }))
}

pub async fn get_stock_price(
    path: web::Path<String>,
    query: web::Query<PriceQuery>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let symbol = path.into_inner();
    let price = state.prices.fetch_price(&symbol, query.debug).await;
    Ok(HttpResponse::Ok().json(StockPrice { symbol, price }))
}

pub async fn cors_handler() -> HttpResponse {
    HttpResponse::Ok()
        .insert_header(("Access-Control-Allow-Origin", "*"))
        .insert_header(("Access-Control-Allow-Methods", "GET, OPTIONS"))
        .insert_header(("Access-Control-Allow-Headers", "*"))
        .finish()
}
