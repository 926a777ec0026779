// src/search.rs
//
// Ticker search. Indexed catalogs go through three tiers (exact symbol,
// partial symbol, partial name) whose hits are deduplicated by ticker id and
// returned in ascending id order. Catalogs without indexes are scanned linearly
// and keep their stored order.
//
// The partial tiers stop once MATCH_CAP ids are collected. Which ids survive
// that cut depends on index iteration order; both indexes iterate in insertion
// (file) order, so results are stable for a given catalog but change if the
// index file is reordered.

use log::debug;
use std::collections::BTreeSet;

use crate::catalog::{Catalog, NameIndex, SymbolIndex, Ticker};
use crate::types::StockMatch;

/// Ids gathered across the partial tiers before the scan stops.
pub const MATCH_CAP: usize = 20;
/// Entries returned to the caller.
pub const RESULT_LIMIT: usize = 10;

/// Searches an available catalog, picking the indexed engine when both indexes
/// exist. A missing catalog yields no results.
pub fn search(query: &str, catalog: Option<&Catalog>) -> Vec<StockMatch> {
    let Some(catalog) = catalog else {
        debug!("No catalog available for query: {}", query);
        return Vec::new();
    };

    match catalog.indexes() {
        Some((symbols, names)) => indexed_search(query, catalog.tickers(), symbols, names),
        None => {
            debug!("Catalog has no indexes, using linear search");
            linear_search(query, catalog.tickers())
        }
    }
}

/// Three-tier indexed search. Ids outside `tickers` are dropped silently.
pub fn indexed_search(
    query: &str,
    tickers: &[Ticker],
    symbol_index: &SymbolIndex,
    name_index: &NameIndex,
) -> Vec<StockMatch> {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }
    let query_lower = trimmed.to_lowercase();

    let mut ids = BTreeSet::new();

    if let Some(id) = symbol_index.get(&trimmed.to_uppercase()) {
        ids.insert(id);
    }

    for (symbol, id) in symbol_index.iter() {
        if ids.len() >= MATCH_CAP {
            break;
        }
        if symbol.to_lowercase().contains(&query_lower) {
            ids.insert(id);
        }
    }

    'names: for (name, name_ids) in name_index.iter() {
        if !name.contains(&query_lower) {
            continue;
        }
        for &id in name_ids {
            if ids.len() >= MATCH_CAP {
                break 'names;
            }
            ids.insert(id);
        }
    }

    let results: Vec<StockMatch> = ids
        .into_iter()
        .filter_map(|id| tickers.get(id))
        .take(RESULT_LIMIT)
        .map(Ticker::to_match)
        .collect();

    debug!("Found {} results for query: {}", results.len(), query);
    results
}

/// Brute-force scan in stored order, stopping at the tenth hit.
pub fn linear_search(query: &str, tickers: &[Ticker]) -> Vec<StockMatch> {
    let query_lower = query.trim().to_lowercase();
    if query_lower.is_empty() {
        return Vec::new();
    }

    let mut results = Vec::new();
    for ticker in tickers {
        if ticker.symbol.to_lowercase().contains(&query_lower)
            || ticker.name.to_lowercase().contains(&query_lower)
        {
            results.push(ticker.to_match());
            if results.len() >= RESULT_LIMIT {
                break;
            }
        }
    }
    results
}
