use crate::errors::CoreError;
use crate::models::rate::RateTable;

/// How a resolved rate was derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provenance {
    /// The requested pair key was present in the table.
    Direct,
    /// Only the opposite direction was present; the rate is `1/reverse`.
    InvertedReverse,
    /// Triangulated through USD: `rate(FROM_USD) * rate(USD_TO)`.
    Bridged,
}

impl std::fmt::Display for Provenance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Provenance::Direct => write!(f, "direct"),
            Provenance::InvertedReverse => write!(f, "inverted-reverse"),
            Provenance::Bridged => write!(f, "bridged"),
        }
    }
}

/// A successfully resolved conversion rate.
#[derive(Debug, Clone, PartialEq)]
pub struct RateQuote {
    pub from: String,
    pub to: String,
    /// Units of `to` per one unit of `from`.
    pub rate: f64,
    pub provenance: Provenance,
    /// The opposite-direction quote, when mathematically defined.
    /// `None` when the forward rate is exactly 0 (never inverted).
    pub reverse_rate: Option<f64>,
    /// Refresh timestamp of the entry the quote came from.
    /// `None` for bridged quotes, which combine two entries.
    pub updated_at: Option<String>,
}

/// Resolves a conversion rate for a (from, to) pair against a rate snapshot.
///
/// Pure lookup logic — no I/O. Resolution order, first match wins:
/// direct entry, inverted reverse entry, USD bridge, unavailable.
pub struct RateService;

impl RateService {
    pub fn new() -> Self {
        Self
    }

    /// Resolve the conversion rate from `from` to `to`.
    ///
    /// Codes are normalized (trimmed, uppercased) before lookup. A stored
    /// rate of exactly 0 is never inverted: the reverse quote is omitted on
    /// the direct branch, and the reverse/bridge branches skip zero entries
    /// entirely rather than divide by zero.
    pub fn resolve(
        &self,
        table: &RateTable,
        from: &str,
        to: &str,
    ) -> Result<RateQuote, CoreError> {
        let from = from.trim().to_uppercase();
        let to = to.trim().to_uppercase();

        // 1. Direct lookup
        if let Some(entry) = table.get_pair(&from, &to) {
            let reverse_rate = (entry.rate != 0.0).then(|| 1.0 / entry.rate);
            tracing::debug!(%from, %to, rate = entry.rate, "resolved direct rate");
            return Ok(RateQuote {
                from,
                to,
                rate: entry.rate,
                provenance: Provenance::Direct,
                reverse_rate,
                updated_at: entry.updated_at.clone(),
            });
        }

        // 2. Reverse entry, inverted
        if let Some(entry) = table.get_pair(&to, &from) {
            if entry.rate != 0.0 {
                tracing::debug!(%from, %to, reverse = entry.rate, "resolved inverted rate");
                return Ok(RateQuote {
                    from,
                    to,
                    rate: 1.0 / entry.rate,
                    provenance: Provenance::InvertedReverse,
                    reverse_rate: Some(entry.rate),
                    updated_at: entry.updated_at.clone(),
                });
            }
        }

        // 3. Triangulate through USD
        if from != "USD" && to != "USD" {
            if let (Some(from_usd), Some(usd_to)) =
                (table.get_pair(&from, "USD"), table.get_pair("USD", &to))
            {
                if from_usd.rate != 0.0 && usd_to.rate != 0.0 {
                    let rate = from_usd.rate * usd_to.rate;
                    tracing::debug!(%from, %to, rate, "resolved bridged rate via USD");
                    return Ok(RateQuote {
                        from,
                        to,
                        rate,
                        provenance: Provenance::Bridged,
                        reverse_rate: Some(1.0 / rate),
                        updated_at: None,
                    });
                }
            }
        }

        Err(CoreError::RateUnavailable {
            from,
            to,
            known_pairs: table.pair_keys(),
        })
    }
}

impl Default for RateService {
    fn default() -> Self {
        Self::new()
    }
}
