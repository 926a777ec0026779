// src/bin/nse_server.rs
use actix_web::{middleware, web, App, HttpServer};
use dotenv::dotenv;
use log::{info, warn};

use nse_stock_search::{configure, AppState, StockSearchConfig};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::init();

    let config = StockSearchConfig::from_env();
    let bind_address = config.bind_address();
    let state = AppState::from_config(config)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;

    // Warm the catalog so the first search does not pay for the load.
    let catalogs = state.catalogs.clone();
    match web::block(move || catalogs.reload()).await {
        Ok(Ok(catalog)) => info!("Catalog ready with {} tickers", catalog.len()),
        Ok(Err(e)) => warn!("Catalog unavailable at startup, serving defaults: {}", e),
        Err(e) => warn!("Catalog warmup did not run: {}", e),
    }

    let state = web::Data::new(state);

    println!("🚀 NSE Stock Search server running on http://{}", bind_address);
    println!("📋 Available endpoints:");
    println!("  • GET  /health              - Health check");
    println!("  • GET  /stocks              - Popular NSE stocks");
    println!("  • GET  /stocks/search?query - Search by symbol or company name");
    println!("  • GET  /price/{{symbol}}       - Best-effort price (e.g. RELIANCE:NSE)");

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(middleware::Logger::default())
            .wrap(middleware::DefaultHeaders::new().add(("Access-Control-Allow-Origin", "*")))
            .configure(configure)
    })
    .bind(&bind_address)?
    .run()
    .await
}
