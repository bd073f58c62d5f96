use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

/// The variant of a currency. A closed set: every currency in the system
/// is either state-issued fiat or a cryptocurrency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CurrencyKind {
    /// Fiat currencies (USD, EUR, RUB, ...) with their issuing country/zone.
    Fiat { issuing_region: String },
    /// Cryptocurrencies (BTC, ETH, ...) with consensus algorithm and
    /// market capitalization (non-negative, 0.0 when unknown).
    Crypto { algorithm: String, market_cap: f64 },
}

/// An immutable currency description.
///
/// Constructed once at startup into the [`CurrencyRegistry`](crate::registry::CurrencyRegistry);
/// never mutated afterwards. Construction validates the code and name and
/// fails with [`CoreError::InvalidCurrency`] on malformed input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Currency {
    /// ISO code or common ticker, 2–5 uppercase ASCII characters ("USD", "BTC").
    pub code: String,
    /// Human-readable name ("US Dollar", "Bitcoin").
    pub name: String,
    pub kind: CurrencyKind,
}

impl Currency {
    /// Create a fiat currency.
    pub fn fiat(
        code: impl Into<String>,
        name: impl Into<String>,
        issuing_region: impl Into<String>,
    ) -> Result<Self, CoreError> {
        let code = code.into();
        let name = name.into();
        validate_code(&code)?;
        validate_name(&name)?;
        Ok(Self {
            code,
            name,
            kind: CurrencyKind::Fiat {
                issuing_region: issuing_region.into(),
            },
        })
    }

    /// Create a cryptocurrency. `market_cap` must be non-negative.
    pub fn crypto(
        code: impl Into<String>,
        name: impl Into<String>,
        algorithm: impl Into<String>,
        market_cap: f64,
    ) -> Result<Self, CoreError> {
        let code = code.into();
        let name = name.into();
        validate_code(&code)?;
        validate_name(&name)?;
        if market_cap < 0.0 {
            return Err(CoreError::InvalidCurrency(format!(
                "market cap must be non-negative, got {market_cap}"
            )));
        }
        Ok(Self {
            code,
            name,
            kind: CurrencyKind::Crypto {
                algorithm: algorithm.into(),
                market_cap,
            },
        })
    }

    pub fn is_fiat(&self) -> bool {
        matches!(self.kind, CurrencyKind::Fiat { .. })
    }

    pub fn is_crypto(&self) -> bool {
        matches!(self.kind, CurrencyKind::Crypto { .. })
    }

    /// Variant-specific one-line representation for UI and logs.
    ///
    /// Fiat:   `[FIAT] USD — US Dollar (Issuing: United States)`
    /// Crypto: `[CRYPTO] BTC — Bitcoin (Algo: SHA-256, MCAP: 1.12e12)`
    ///
    /// The market cap uses scientific notation above 1e9, otherwise a
    /// thousands-grouped decimal with two fraction digits. Downstream
    /// display code depends on these exact shapes.
    pub fn display_info(&self) -> String {
        match &self.kind {
            CurrencyKind::Fiat { issuing_region } => {
                format!("[FIAT] {} — {} (Issuing: {})", self.code, self.name, issuing_region)
            }
            CurrencyKind::Crypto {
                algorithm,
                market_cap,
            } => {
                let mcap = if *market_cap > 1e9 {
                    format!("{market_cap:.2e}")
                } else {
                    format_grouped(*market_cap)
                };
                format!(
                    "[CRYPTO] {} — {} (Algo: {}, MCAP: {})",
                    self.code, self.name, algorithm, mcap
                )
            }
        }
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} - {}", self.code, self.name)
    }
}

fn validate_code(code: &str) -> Result<(), CoreError> {
    if !(2..=5).contains(&code.len()) {
        return Err(CoreError::InvalidCurrency(format!(
            "code '{code}' must be 2–5 characters"
        )));
    }
    if code.contains(' ') {
        return Err(CoreError::InvalidCurrency(format!(
            "code '{code}' must not contain spaces"
        )));
    }
    if !code.chars().all(|c| c.is_ascii_uppercase()) {
        return Err(CoreError::InvalidCurrency(format!(
            "code '{code}' must be uppercase ASCII"
        )));
    }
    Ok(())
}

fn validate_name(name: &str) -> Result<(), CoreError> {
    if name.trim().is_empty() {
        return Err(CoreError::InvalidCurrency("name must not be empty".into()));
    }
    Ok(())
}

/// Format a non-negative value as a thousands-grouped decimal with two
/// fraction digits, e.g. `1234567.5` → `"1,234,567.50"`.
pub fn format_grouped(value: f64) -> String {
    let formatted = format!("{value:.2}");
    let (int_part, frac_part) = formatted
        .split_once('.')
        .unwrap_or((formatted.as_str(), "00"));
    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("{grouped}.{frac_part}")
}
