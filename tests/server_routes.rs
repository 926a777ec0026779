// tests/server_routes.rs
use actix_web::{test, web, App};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

use nse_stock_search::catalog::CatalogLoader;
use nse_stock_search::price::PriceFetcher;
use nse_stock_search::{configure, AppState, Catalog, CatalogProvider, StockSearchConfig, StockSearchError};

struct FixedPrice(Option<f64>);

#[async_trait]
impl PriceFetcher for FixedPrice {
    async fn fetch_price(&self, _symbol: &str, _debug: bool) -> Option<f64> {
        self.0
    }
}

struct MissingCatalog;

impl CatalogLoader for MissingCatalog {
    fn name(&self) -> &str {
        "missing"
    }

    fn load(&self) -> Result<Catalog, StockSearchError> {
        Err(StockSearchError::CatalogUnavailable("no source".into()))
    }
}

fn sample_catalog() -> Catalog {
    Catalog::from_records(vec![
        ("TCS", "Tata Consultancy Services Limited"),
        ("RELIANCE", "Reliance Industries Limited"),
        ("INFY", "Infosys Limited"),
        ("WIPRO", "Wipro Limited"),
        ("ITC", "ITC Limited"),
        ("SBIN", "State Bank of India"),
        ("LT", "Larsen & Toubro Limited"),
    ])
}

fn state_with(provider: CatalogProvider, price: Option<f64>) -> web::Data<AppState> {
    web::Data::new(AppState::new(
        StockSearchConfig::default(),
        Arc::new(provider),
        Arc::new(FixedPrice(price)),
    ))
}

#[actix_web::test]
async fn health_reports_healthy() {
    let app = test::init_service(
        App::new()
            .app_data(state_with(CatalogProvider::with_catalog(sample_catalog()), None))
            .configure(configure),
    )
    .await;

    let req = test::TestRequest::get().uri("/health").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["catalog_loaded"], true);
}

#[actix_web::test]
async fn search_route_returns_matches() {
    let app = test::init_service(
        App::new()
            .app_data(state_with(CatalogProvider::with_catalog(sample_catalog()), None))
            .configure(configure),
    )
    .await;

    let req = test::TestRequest::get().uri("/stocks/search?query=tcs").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["stocks"][0]["symbol"], "TCS");
    assert_eq!(body["stocks"].as_array().unwrap().len(), 1);
}

#[actix_web::test]
async fn blank_search_suggests_six_popular_stocks() {
    let app = test::init_service(
        App::new()
            .app_data(state_with(CatalogProvider::with_catalog(sample_catalog()), None))
            .configure(configure),
    )
    .await;

    let req = test::TestRequest::get().uri("/stocks/search?query=%20").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let stocks = body["stocks"].as_array().unwrap();
    assert_eq!(stocks.len(), 6);
    assert_eq!(stocks[0]["symbol"], "TCS");
}

#[actix_web::test]
async fn popular_route_falls_back_to_defaults() {
    let app = test::init_service(
        App::new()
            .app_data(state_with(CatalogProvider::new(Box::new(MissingCatalog), None), None))
            .configure(configure),
    )
    .await;

    let req = test::TestRequest::get().uri("/stocks").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["total"], 25);
    assert_eq!(body["source"], "default list");
    assert_eq!(body["stocks"][0]["symbol"], "RELIANCE");

    let req = test::TestRequest::get().uri("/stocks/search?query=tcs").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert!(body["stocks"].as_array().unwrap().is_empty());
}

#[actix_web::test]
async fn price_route_reports_missing_price_as_null() {
    let app = test::init_service(
        App::new()
            .app_data(state_with(CatalogProvider::with_catalog(sample_catalog()), None))
            .configure(configure),
    )
    .await;

    let req = test::TestRequest::get().uri("/price/RELIANCE:NSE").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["symbol"], "RELIANCE:NSE");
    assert!(body["price"].is_null());
}

#[actix_web::test]
async fn price_route_returns_fetched_price() {
    let app = test::init_service(
        App::new()
            .app_data(state_with(CatalogProvider::with_catalog(sample_catalog()), Some(2876.45)))
            .configure(configure),
    )
    .await;

    let req = test::TestRequest::get().uri("/price/RELIANCE:NSE?debug=true").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["price"], 2876.45);
}

#[actix_web::test]
async fn preflight_gets_cors_headers() {
    let app = test::init_service(
        App::new()
            .app_data(state_with(CatalogProvider::with_catalog(sample_catalog()), None))
            .configure(configure),
    )
    .await;

    let req = test::TestRequest::default()
        .method(actix_web::http::Method::OPTIONS)
        .uri("/stocks/search")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());
    assert_eq!(
        resp.headers().get("Access-Control-Allow-Origin").unwrap(),
        "*"
    );
}
