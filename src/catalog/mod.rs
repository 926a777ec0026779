// src/catalog/mod.rs
//
// In-memory ticker catalog: the ordered ticker list plus the exact-symbol and
// lowercased-name indexes derived from it. Nothing here is mutated after a
// catalog has been built, so readers share it through an `Arc` without locking.

pub mod loader;

use indexmap::IndexMap;
use log::warn;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value as JsonValue;
use std::fmt;

use crate::types::StockMatch;

pub use loader::{
    BuiltinCatalogLoader, CatalogLoader, CatalogProvider, CatalogSnapshot, ChainLoader, CsvCatalogLoader,
    JsonCatalogLoader,
};

/// One tradable security. `id` equals the ticker's position in its catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticker {
    pub id: usize,
    pub symbol: String,
    pub name: String,
}

impl Ticker {
    pub fn to_match(&self) -> StockMatch {
        StockMatch::new(self.symbol.clone(), self.name.clone())
    }
}

/// Uppercase symbol -> ticker id, iterated in insertion order.
///
/// Re-inserting a symbol replaces its id but keeps its original position, so
/// "last seen wins" without disturbing the scan order of the partial-symbol tier.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SymbolIndex(IndexMap<String, usize>);

impl SymbolIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, symbol: &str, id: usize) {
        self.0.insert(symbol.to_uppercase(), id);
    }

    pub fn get(&self, symbol: &str) -> Option<usize> {
        self.0.get(symbol).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> + '_ {
        self.0.iter().map(|(symbol, id)| (symbol.as_str(), *id))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Lowercased company name -> every ticker id carrying that name, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameIndex(IndexMap<String, Vec<usize>>);

impl NameIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: &str, id: usize) {
        self.extend(name, std::iter::once(id));
    }

    pub fn extend(&mut self, name: &str, ids: impl IntoIterator<Item = usize>) {
        self.0.entry(name.to_lowercase()).or_default().extend(ids);
    }

    pub fn get(&self, name: &str) -> Option<&[usize]> {
        self.0.get(name).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[usize])> + '_ {
        self.0.iter().map(|(name, ids)| (name.as_str(), ids.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Ticker id from an index file value. Negative, fractional or non-numeric ids are `None`.
fn index_id(value: &JsonValue) -> Option<usize> {
    value.as_u64().and_then(|id| usize::try_from(id).ok())
}

fn lenient_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<usize>, D::Error> {
    Ok(Option::<JsonValue>::deserialize(deserializer)?.as_ref().and_then(index_id))
}

// Both indexes are JSON objects on disk. A hand-written visitor keeps the
// object's key order, which the capped partial-match tiers depend on, and drops
// ids that cannot address a ticker instead of rejecting the whole file.

impl Serialize for SymbolIndex {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (symbol, id) in &self.0 {
            map.serialize_entry(symbol, id)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for SymbolIndex {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct SymbolIndexVisitor;

        impl<'de> Visitor<'de> for SymbolIndexVisitor {
            type Value = SymbolIndex;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of symbol to ticker id")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut index = SymbolIndex::new();
                while let Some((symbol, raw)) = access.next_entry::<String, JsonValue>()? {
                    match index_id(&raw) {
                        Some(id) => index.insert(&symbol, id),
                        None => warn!("Skipping symbol index entry {} with invalid id {}", symbol, raw),
                    }
                }
                Ok(index)
            }
        }

        deserializer.deserialize_map(SymbolIndexVisitor)
    }
}

impl Serialize for NameIndex {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, ids) in &self.0 {
            map.serialize_entry(name, ids)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for NameIndex {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct NameIndexVisitor;

        impl<'de> Visitor<'de> for NameIndexVisitor {
            type Value = NameIndex;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of lowercased name to a list of ticker ids")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut index = NameIndex::new();
                while let Some((name, raw)) = access.next_entry::<String, JsonValue>()? {
                    let raw_ids = match raw {
                        JsonValue::Array(items) => items,
                        single => vec![single],
                    };
                    let mut ids = Vec::with_capacity(raw_ids.len());
                    for raw_id in &raw_ids {
                        match index_id(raw_id) {
                            Some(id) => ids.push(id),
                            None => warn!("Skipping name index id {} for '{}'", raw_id, name),
                        }
                    }
                    if !ids.is_empty() {
                        index.extend(&name, ids);
                    }
                }
                Ok(index)
            }
        }

        deserializer.deserialize_map(NameIndexVisitor)
    }
}

/// Read-only catalog. Indexes are optional: a catalog built from a bare ticker
/// list is searched linearly.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    tickers: Vec<Ticker>,
    symbol_index: Option<SymbolIndex>,
    name_index: Option<NameIndex>,
}

impl Catalog {
    /// Builds a catalog from a ticker list, renumbering ids to match positions.
    pub fn new(
        tickers: Vec<Ticker>,
        symbol_index: Option<SymbolIndex>,
        name_index: Option<NameIndex>,
    ) -> Self {
        let tickers = tickers
            .into_iter()
            .enumerate()
            .map(|(pos, mut ticker)| {
                if ticker.id != pos {
                    warn!("Ticker {} has id {} at position {}, using position", ticker.symbol, ticker.id, pos);
                    ticker.id = pos;
                }
                ticker
            })
            .collect();

        Self {
            tickers,
            symbol_index,
            name_index,
        }
    }

    /// Flat catalog with no indexes.
    pub fn unindexed(tickers: Vec<Ticker>) -> Self {
        Self::new(tickers, None, None)
    }

    /// Assigns dense ids in record order and derives both indexes.
    pub fn from_records<I, S, N>(records: I) -> Self
    where
        I: IntoIterator<Item = (S, N)>,
        S: AsRef<str>,
        N: Into<String>,
    {
        let mut tickers = Vec::new();
        let mut symbol_index = SymbolIndex::new();
        let mut name_index = NameIndex::new();

        for (id, (symbol, name)) in records.into_iter().enumerate() {
            let symbol = symbol.as_ref().trim().to_uppercase();
            let name: String = name.into();
            symbol_index.insert(&symbol, id);
            name_index.insert(&name, id);
            tickers.push(Ticker { id, symbol, name });
        }

        Self {
            tickers,
            symbol_index: Some(symbol_index),
            name_index: Some(name_index),
        }
    }

    pub fn from_file(file: CatalogFile) -> Self {
        let tickers = file
            .tickers
            .into_iter()
            .enumerate()
            .map(|(pos, record)| Ticker {
                id: record.id.unwrap_or(pos),
                symbol: record.symbol,
                name: record.name,
            })
            .collect();
        Self::new(tickers, file.symbol_index, file.name_index)
    }

    pub fn tickers(&self) -> &[Ticker] {
        &self.tickers
    }

    pub fn ticker(&self, id: usize) -> Option<&Ticker> {
        self.tickers.get(id)
    }

    /// Both indexes, or `None` when either is missing.
    pub fn indexes(&self) -> Option<(&SymbolIndex, &NameIndex)> {
        match (&self.symbol_index, &self.name_index) {
            (Some(symbols), Some(names)) => Some((symbols, names)),
            _ => None,
        }
    }

    pub fn is_indexed(&self) -> bool {
        self.indexes().is_some()
    }

    pub fn len(&self) -> usize {
        self.tickers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tickers.is_empty()
    }
}

/// On-disk search file. Only `tickers` is required.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<usize>,
    pub tickers: Vec<TickerRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol_index: Option<SymbolIndex>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name_index: Option<NameIndex>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TickerRecord {
    #[serde(default, deserialize_with = "lenient_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<usize>,
    #[serde(default)]
    pub symbol: String,
    #[serde(default)]
    pub name: String,
    /// Precomputed `"symbol name"` in lowercase. Written for other consumers, never read.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_term: Option<String>,
}

impl CatalogFile {
    /// Full search file for a catalog, deriving indexes if the catalog has none.
    pub fn from_catalog(catalog: &Catalog) -> Self {
        let tickers: Vec<TickerRecord> = catalog
            .tickers()
            .iter()
            .map(|t| TickerRecord {
                id: Some(t.id),
                symbol: t.symbol.clone(),
                name: t.name.clone(),
                search_term: Some(format!("{} {}", t.symbol, t.name).to_lowercase()),
            })
            .collect();

        let (symbol_index, name_index) = match catalog.indexes() {
            Some((symbols, names)) => (symbols.clone(), names.clone()),
            None => {
                let rebuilt = Catalog::from_records(
                    catalog.tickers().iter().map(|t| (t.symbol.as_str(), t.name.clone())),
                );
                (
                    rebuilt.symbol_index.unwrap_or_default(),
                    rebuilt.name_index.unwrap_or_default(),
                )
            }
        };

        Self {
            total: Some(tickers.len()),
            tickers,
            symbol_index: Some(symbol_index),
            name_index: Some(name_index),
        }
    }
}
