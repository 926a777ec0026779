// src/catalog/loader.rs
use chrono::{DateTime, Utc};
use log::{debug, error, info, warn};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, RwLock};
use std::time::{Duration, Instant};

use super::{Catalog, CatalogFile, Ticker};
use crate::config::StockSearchConfig;
use crate::error::StockSearchError;
use crate::popular::DEFAULT_STOCKS;

/// Produces a complete catalog from some data source.
pub trait CatalogLoader: Send + Sync {
    fn name(&self) -> &str;
    fn load(&self) -> Result<Catalog, StockSearchError>;
}

/// Reads the first existing search JSON file among candidate paths.
pub struct JsonCatalogLoader {
    paths: Vec<PathBuf>,
}

impl JsonCatalogLoader {
    pub fn new(paths: Vec<PathBuf>) -> Self {
        Self { paths }
    }

    pub fn read_file(path: &Path) -> Result<Catalog, StockSearchError> {
        let raw = fs::read_to_string(path)?;
        let file: CatalogFile = serde_json::from_str(&raw).map_err(|e| {
            error!("Failed to parse catalog {}: {}", path.display(), e);
            e
        })?;
        Ok(Catalog::from_file(file))
    }
}

impl CatalogLoader for JsonCatalogLoader {
    fn name(&self) -> &str {
        "json"
    }

    fn load(&self) -> Result<Catalog, StockSearchError> {
        let path = self
            .paths
            .iter()
            .find(|p| p.exists())
            .ok_or_else(|| {
                warn!("Search JSON not found in expected locations: {:?}", self.paths);
                StockSearchError::CatalogUnavailable("search JSON not found".into())
            })?;

        debug!("Loading catalog from {}", path.display());
        Self::read_file(path)
    }
}

#[derive(Debug, Deserialize)]
struct CsvTickerRow {
    symbol: String,
    name: String,
}

/// Builds an indexed catalog from a `symbol,name` CSV.
pub struct CsvCatalogLoader {
    path: PathBuf,
}

impl CsvCatalogLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn read<R: std::io::Read>(reader: R) -> Result<Catalog, StockSearchError> {
        let mut csv_reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
        let mut records = Vec::new();
        for row in csv_reader.deserialize::<CsvTickerRow>() {
            let row = row?;
            if row.symbol.is_empty() || row.name.is_empty() {
                continue;
            }
            records.push((row.symbol, row.name));
        }
        Ok(Catalog::from_records(records))
    }
}

impl CatalogLoader for CsvCatalogLoader {
    fn name(&self) -> &str {
        "csv"
    }

    fn load(&self) -> Result<Catalog, StockSearchError> {
        if !self.path.exists() {
            return Err(StockSearchError::CatalogUnavailable(format!(
                "{} not found",
                self.path.display()
            )));
        }
        let file = fs::File::open(&self.path)?;
        Self::read(file)
    }
}

/// Unindexed catalog of the hand-curated default stocks.
pub struct BuiltinCatalogLoader;

impl CatalogLoader for BuiltinCatalogLoader {
    fn name(&self) -> &str {
        "builtin"
    }

    fn load(&self) -> Result<Catalog, StockSearchError> {
        let tickers = DEFAULT_STOCKS
            .iter()
            .enumerate()
            .map(|(id, (symbol, name))| Ticker {
                id,
                symbol: symbol.to_string(),
                name: name.to_string(),
            })
            .collect();
        Ok(Catalog::unindexed(tickers))
    }
}

/// Tries each loader in turn. Empty catalogs count as failures.
pub struct ChainLoader {
    loaders: Vec<Box<dyn CatalogLoader>>,
}

impl ChainLoader {
    pub fn new(loaders: Vec<Box<dyn CatalogLoader>>) -> Self {
        Self { loaders }
    }

    pub fn from_config(config: &StockSearchConfig) -> Self {
        let mut loaders: Vec<Box<dyn CatalogLoader>> = vec![
            Box::new(JsonCatalogLoader::new(config.catalog_paths.clone())),
            Box::new(CsvCatalogLoader::new(config.tickers_csv.clone())),
        ];
        if config.builtin_catalog {
            loaders.push(Box::new(BuiltinCatalogLoader));
        }
        Self::new(loaders)
    }
}

impl CatalogLoader for ChainLoader {
    fn name(&self) -> &str {
        "chain"
    }

    fn load(&self) -> Result<Catalog, StockSearchError> {
        for loader in &self.loaders {
            match loader.load() {
                Ok(catalog) if !catalog.is_empty() => return Ok(catalog),
                Ok(_) => warn!("Catalog source '{}' is empty", loader.name()),
                Err(e) => warn!("Catalog source '{}' failed: {}", loader.name(), e),
            }
        }
        Err(StockSearchError::CatalogUnavailable(
            "no catalog source produced any tickers".into(),
        ))
    }
}

#[derive(Debug)]
pub struct CatalogSnapshot {
    pub catalog: Arc<Catalog>,
    pub loaded_at: DateTime<Utc>,
    /// Last load attempt, successful or not. Expiry counts from here.
    checked: Instant,
}

impl CatalogSnapshot {
    fn new(catalog: Catalog) -> Self {
        Self {
            catalog: Arc::new(catalog),
            loaded_at: Utc::now(),
            checked: Instant::now(),
        }
    }

    /// Same catalog, with the expiry window restarted after a failed refresh.
    fn rechecked(&self) -> Self {
        Self {
            catalog: self.catalog.clone(),
            loaded_at: self.loaded_at,
            checked: Instant::now(),
        }
    }

    fn is_fresh(&self, ttl: Option<Duration>) -> bool {
        ttl.map_or(true, |ttl| self.checked.elapsed() < ttl)
    }
}

/// Owns the live catalog. Queries clone an `Arc` out of the provider and keep
/// that snapshot for their whole run; reloads build a new catalog off to the
/// side and swap it in.
pub struct CatalogProvider {
    loader: Box<dyn CatalogLoader>,
    ttl: Option<Duration>,
    current: RwLock<Option<Arc<CatalogSnapshot>>>,
    reloading: Mutex<()>,
}

impl CatalogProvider {
    pub fn new(loader: Box<dyn CatalogLoader>, ttl: Option<Duration>) -> Self {
        Self {
            loader,
            ttl,
            current: RwLock::new(None),
            reloading: Mutex::new(()),
        }
    }

    pub fn from_config(config: &StockSearchConfig) -> Self {
        Self::new(Box::new(ChainLoader::from_config(config)), config.catalog_ttl)
    }

    /// Provider serving a fixed catalog that never expires.
    pub fn with_catalog(catalog: Catalog) -> Self {
        let provider = Self::new(Box::new(FixedLoader(catalog.clone())), None);
        provider.publish(catalog);
        provider
    }

    /// Loads a fresh catalog and publishes it. On failure the previous catalog stays live.
    pub fn reload(&self) -> Result<Arc<Catalog>, StockSearchError> {
        let _guard = self.reloading.lock().unwrap_or_else(|e| e.into_inner());
        self.reload_locked()
    }

    fn reload_locked(&self) -> Result<Arc<Catalog>, StockSearchError> {
        let catalog = self.loader.load()?;
        info!(
            "✅ Loaded NSE catalog from '{}': {} tickers (indexed: {})",
            self.loader.name(),
            catalog.len(),
            catalog.is_indexed()
        );
        Ok(self.publish(catalog))
    }

    fn publish(&self, catalog: Catalog) -> Arc<Catalog> {
        let snapshot = Arc::new(CatalogSnapshot::new(catalog));
        let published = snapshot.catalog.clone();
        *self.current.write().unwrap_or_else(|e| e.into_inner()) = Some(snapshot);
        published
    }

    pub fn snapshot(&self) -> Option<Arc<CatalogSnapshot>> {
        self.current.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Live catalog, loading it on first use and refreshing it once it outlives the TTL.
    /// A failed refresh keeps serving the stale catalog and waits a full TTL before
    /// trying again; `None` means no catalog was ever loaded.
    pub fn current_catalog(&self) -> Option<Arc<Catalog>> {
        if let Some(snapshot) = self.snapshot() {
            if snapshot.is_fresh(self.ttl) {
                return Some(snapshot.catalog.clone());
            }
        }

        let _guard = self.reloading.lock().unwrap_or_else(|e| e.into_inner());
        // another caller may have refreshed while we waited
        if let Some(snapshot) = self.snapshot() {
            if snapshot.is_fresh(self.ttl) {
                return Some(snapshot.catalog.clone());
            }
        }

        match self.reload_locked() {
            Ok(catalog) => Some(catalog),
            Err(e) => {
                warn!("Catalog reload failed: {}", e);
                let stale = self.snapshot()?;
                let retry = Arc::new(stale.rechecked());
                *self.current.write().unwrap_or_else(|e| e.into_inner()) = Some(retry);
                Some(stale.catalog.clone())
            }
        }
    }
}

struct FixedLoader(Catalog);

impl CatalogLoader for FixedLoader {
    fn name(&self) -> &str {
        "fixed"
    }

    fn load(&self) -> Result<Catalog, StockSearchError> {
        Ok(self.0.clone())
    }
}
