use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One directed exchange rate, as stored in the rate snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateEntry {
    /// Units of the quote currency per one unit of the base currency.
    pub rate: f64,

    /// When the rate was last refreshed by whatever produced the snapshot.
    /// Kept opaque: only echoed back to the user, never interpreted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl RateEntry {
    pub fn new(rate: f64) -> Self {
        Self {
            rate,
            updated_at: None,
        }
    }
}

/// A snapshot of exchange rates, keyed by `"{FROM}_{TO}"` pair keys.
///
/// Loaded wholesale from `rates.json` before each command; this core only
/// reads it, never creates or mutates entries. The on-disk shape matches the
/// snapshot producer: pair entries at the top level plus optional `source`
/// and `last_refresh` metadata fields.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RateTable {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_refresh: Option<String>,

    #[serde(flatten)]
    entries: HashMap<String, RateEntry>,
}

impl RateTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// The hardcoded fallback snapshot used when `rates.json` is missing
    /// or corrupt. Enough to value the common portfolio against USD.
    pub fn fallback() -> Self {
        let mut table = Self {
            source: Some("fallback".to_string()),
            ..Self::default()
        };
        table.insert("EUR", "USD", RateEntry::new(1.08));
        table.insert("BTC", "USD", RateEntry::new(50_000.0));
        table.insert("ETH", "USD", RateEntry::new(3_000.0));
        table
    }

    /// Build the directed pair key for a (from, to) currency pair.
    pub fn pair_key(from: &str, to: &str) -> String {
        format!("{from}_{to}")
    }

    pub fn get(&self, pair_key: &str) -> Option<&RateEntry> {
        self.entries.get(pair_key)
    }

    pub fn get_pair(&self, from: &str, to: &str) -> Option<&RateEntry> {
        self.entries.get(&Self::pair_key(from, to))
    }

    pub fn insert(&mut self, from: &str, to: &str, entry: RateEntry) {
        self.entries.insert(Self::pair_key(from, to), entry);
    }

    /// All pair keys present in the snapshot, sorted for stable diagnostics.
    pub fn pair_keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.entries.keys().cloned().collect();
        keys.sort();
        keys
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
