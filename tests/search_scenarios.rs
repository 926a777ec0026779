// tests/search_scenarios.rs
use std::io::Write;

use nse_stock_search::catalog::{CatalogFile, CatalogLoader, JsonCatalogLoader};
use nse_stock_search::{linear_search, popular_stocks, search, Catalog, CatalogProvider, StockMatch};

const SEARCH_JSON: &str = r#"{
  "total": 2,
  "tickers": [
    {"id": 0, "symbol": "TCS", "name": "Tata Consultancy Services Limited", "searchTerm": "tcs tata consultancy services limited"},
    {"id": 1, "symbol": "RELIANCE", "name": "Reliance Industries Limited", "searchTerm": "reliance reliance industries limited"}
  ],
  "symbolIndex": {"TCS": 0, "RELIANCE": 1},
  "nameIndex": {"tata consultancy services limited": [0], "reliance industries limited": [1]}
}"#;

fn write_temp(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    file.write_all(contents.as_bytes()).expect("write temp file");
    file
}

fn load(contents: &str) -> Catalog {
    let file = write_temp(contents);
    JsonCatalogLoader::new(vec![file.path().to_path_buf()])
        .load()
        .expect("catalog loads")
}

#[test]
fn indexed_catalog_scenarios() {
    let catalog = load(SEARCH_JSON);
    assert!(catalog.is_indexed());

    assert_eq!(
        search("tcs", Some(&catalog)),
        vec![StockMatch::new("TCS", "Tata Consultancy Services Limited")]
    );
    assert_eq!(
        search("reliance", Some(&catalog)),
        vec![StockMatch::new("RELIANCE", "Reliance Industries Limited")]
    );
    assert!(search("xyz", Some(&catalog)).is_empty());
}

#[test]
fn negative_index_id_does_not_lose_the_catalog() {
    let json = r#"{"tickers": [
        {"id": 0, "symbol": "TCS", "name": "Tata Consultancy Services Limited"},
        {"id": 1, "symbol": "RELIANCE", "name": "Reliance Industries Limited"}
    ],
    "symbolIndex": {"TCS": 0, "GHOST": -1, "RELIANCE": 1},
    "nameIndex": {"tata consultancy services limited": [0], "ghost holdings": [-1]}}"#;
    let catalog = load(json);
    assert!(catalog.is_indexed());

    assert_eq!(
        search("tcs", Some(&catalog)),
        vec![StockMatch::new("TCS", "Tata Consultancy Services Limited")]
    );
    assert!(search("ghost", Some(&catalog)).is_empty());
}

#[test]
fn catalog_without_indexes_falls_back_to_linear_scan() {
    let json = r#"{"tickers": [
        {"id": 0, "symbol": "TCS", "name": "Tata Consultancy Services Limited"},
        {"id": 1, "symbol": "RELIANCE", "name": "Reliance Industries Limited"}
    ], "symbolIndex": {"TCS": 0, "RELIANCE": 1}}"#;
    let catalog = load(json);
    assert!(!catalog.is_indexed());

    assert_eq!(
        search("tata", Some(&catalog)),
        vec![StockMatch::new("TCS", "Tata Consultancy Services Limited")]
    );
    assert_eq!(
        linear_search("tata", catalog.tickers()),
        vec![StockMatch::new("TCS", "Tata Consultancy Services Limited")]
    );
}

#[test]
fn empty_query_is_empty_for_either_engine() {
    let catalog = load(SEARCH_JSON);
    assert!(search("", Some(&catalog)).is_empty());
    assert!(linear_search("", catalog.tickers()).is_empty());
}

#[test]
fn corrupt_file_is_unavailable_and_popular_uses_defaults() {
    let file = write_temp("{ not json");
    let provider = CatalogProvider::new(
        Box::new(JsonCatalogLoader::new(vec![file.path().to_path_buf()])),
        None,
    );

    let catalog = provider.current_catalog();
    assert!(catalog.is_none());
    assert!(search("tcs", catalog.as_deref()).is_empty());

    let popular = popular_stocks(catalog.as_deref());
    assert_eq!(popular.len(), 25);
    assert_eq!(popular, popular_stocks(None));
}

#[test]
fn written_search_file_loads_back_identically() {
    let source = Catalog::from_records(vec![
        ("INFY", "Infosys Limited"),
        ("WIPRO", "Wipro Limited"),
        ("HCLTECH", "HCL Technologies Limited"),
    ]);
    let json = serde_json::to_string_pretty(&CatalogFile::from_catalog(&source)).unwrap();
    let loaded = load(&json);

    assert_eq!(loaded.tickers(), source.tickers());
    assert_eq!(
        search("limited", Some(&loaded)),
        search("limited", Some(&source))
    );
}

#[test]
fn search_results_never_exceed_ten_and_ascend_by_id() {
    let catalog = Catalog::from_records(
        (0..200).map(|i| (format!("SYM{:03}", 199 - i), format!("Company {} Limited", i))),
    );
    for query in ["sym", "company", "limited", "1", "sym1"] {
        let results = search(query, Some(&catalog));
        assert!(results.len() <= 10, "query {} returned {}", query, results.len());

        let ids: Vec<usize> = results
            .iter()
            .map(|m| catalog.tickers().iter().position(|t| t.symbol == m.symbol).unwrap())
            .collect();
        assert!(ids.windows(2).all(|w| w[0] < w[1]), "query {} not ascending: {:?}", query, ids);
    }
}
