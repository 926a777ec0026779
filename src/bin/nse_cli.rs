// src/bin/nse_cli.rs
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use dotenv::dotenv;
use std::fs;
use std::path::PathBuf;

use nse_stock_search::catalog::{CatalogFile, CatalogLoader, CsvCatalogLoader};
use nse_stock_search::price::{GoogleFinanceFetcher, PriceFetcher};
use nse_stock_search::{popular_stocks, search, CatalogProvider, StockMatch, StockSearchConfig};

#[derive(Parser)]
#[command(name = "nse-cli")]
#[command(about = "NSE stock search and price lookup", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search tickers by symbol or company name
    Search { query: String },
    /// List popular stocks
    Popular,
    /// Fetch the displayed price for a symbol such as RELIANCE:NSE
    Price {
        symbol: String,
        #[arg(long)]
        debug: bool,
    },
    /// Convert a symbol,name CSV into the search JSON file
    BuildIndex {
        #[arg(short, long, default_value = "nse_tickers.csv")]
        input: PathBuf,
        #[arg(short, long, default_value = "nse_tickers_search.json")]
        output: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    env_logger::init();

    let cli = Cli::parse();
    let config = StockSearchConfig::from_env();

    match cli.command {
        Commands::Search { query } => {
            let provider = CatalogProvider::from_config(&config);
            let catalog = provider.current_catalog();
            print_matches(&search(&query, catalog.as_deref()));
        }
        Commands::Popular => {
            let provider = CatalogProvider::from_config(&config);
            let catalog = provider.current_catalog();
            print_matches(&popular_stocks(catalog.as_deref()));
        }
        Commands::Price { symbol, debug } => {
            let fetcher = GoogleFinanceFetcher::new(&config)?;
            match fetcher.fetch_price(&symbol, debug).await {
                Some(price) => println!("{}: {:.2}", symbol, price),
                None => println!("{}: price unavailable", symbol),
            }
        }
        Commands::BuildIndex { input, output } => {
            let catalog = CsvCatalogLoader::new(&input)
                .load()
                .with_context(|| format!("failed to read {}", input.display()))?;
            let file = CatalogFile::from_catalog(&catalog);
            let json = serde_json::to_string_pretty(&file)?;
            fs::write(&output, json).with_context(|| format!("failed to write {}", output.display()))?;

            println!("✓ Search JSON created: '{}'", output.display());
            println!("✓ Total tickers: {}", catalog.len());
            println!("\nSample search data:");
            for ticker in catalog.tickers().iter().take(3) {
                println!("  {} {} {}", ticker.id, ticker.symbol, ticker.name);
            }
        }
    }

    Ok(())
}

fn print_matches(matches: &[StockMatch]) {
    if matches.is_empty() {
        println!("No stocks found");
        return;
    }
    for m in matches {
        println!("{:<12} {}", m.symbol, m.name);
    }
}
