use std::collections::HashMap;

use crate::errors::CoreError;
use crate::models::currency::{Currency, CurrencyKind};

/// Tally of registry contents by currency variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CurrencyCounts {
    pub fiat: usize,
    pub crypto: usize,
}

/// The static catalog of known currencies, keyed by code.
///
/// Built explicitly at startup (no hidden lazy initialization) and treated
/// as immutable for the process lifetime, which keeps test setup
/// deterministic: tests construct their own instances instead of sharing
/// global state.
pub struct CurrencyRegistry {
    entries: HashMap<String, Currency>,
}

impl CurrencyRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Create a registry seeded with the reference catalog:
    /// five fiat currencies and four cryptocurrencies.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();

        let fiats = [
            ("USD", "US Dollar", "United States"),
            ("EUR", "Euro", "Eurozone"),
            ("RUB", "Russian Ruble", "Russia"),
            ("GBP", "British Pound", "United Kingdom"),
            ("JPY", "Japanese Yen", "Japan"),
        ];
        for (code, name, region) in fiats {
            registry.register(Currency {
                code: code.to_string(),
                name: name.to_string(),
                kind: CurrencyKind::Fiat {
                    issuing_region: region.to_string(),
                },
            });
        }

        let cryptos = [
            ("BTC", "Bitcoin", "SHA-256", 1.12e12),
            ("ETH", "Ethereum", "Ethash", 3.5e11),
            ("LTC", "Litecoin", "Scrypt", 5.8e9),
            ("ADA", "Cardano", "Ouroboros", 1.2e10),
        ];
        for (code, name, algorithm, market_cap) in cryptos {
            registry.register(Currency {
                code: code.to_string(),
                name: name.to_string(),
                kind: CurrencyKind::Crypto {
                    algorithm: algorithm.to_string(),
                    market_cap,
                },
            });
        }

        registry
    }

    /// Add a currency to the catalog, replacing any entry with the same code.
    pub fn register(&mut self, currency: Currency) {
        self.entries.insert(currency.code.clone(), currency);
    }

    /// Look up a currency by code. The code is normalized (trimmed,
    /// uppercased) before the lookup, so `lookup(" btc ")` finds BTC.
    pub fn lookup(&self, code: &str) -> Result<&Currency, CoreError> {
        let normalized = code.trim().to_uppercase();
        self.entries
            .get(&normalized)
            .ok_or(CoreError::CurrencyNotFound { code: normalized })
    }

    /// A defensive copy of the full catalog, sorted by code.
    pub fn all(&self) -> Vec<Currency> {
        let mut currencies: Vec<Currency> = self.entries.values().cloned().collect();
        currencies.sort_by(|a, b| a.code.cmp(&b.code));
        currencies
    }

    /// Count catalog entries per variant.
    pub fn counts(&self) -> CurrencyCounts {
        let mut counts = CurrencyCounts::default();
        for currency in self.entries.values() {
            match currency.kind {
                CurrencyKind::Fiat { .. } => counts.fiat += 1,
                CurrencyKind::Crypto { .. } => counts.crypto += 1,
            }
        }
        counts
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for CurrencyRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
