use crate::errors::CoreError;
use crate::models::portfolio::Portfolio;
use crate::models::rate::RateTable;

use super::rate_service::RateService;

/// One wallet's contribution to a valuation report.
#[derive(Debug, Clone, PartialEq)]
pub struct WalletValuation {
    pub code: String,
    pub balance: f64,
    /// Balance converted to the base currency, or `None` when no rate
    /// could be resolved ("rate not found" in reports).
    pub value_in_base: Option<f64>,
}

/// A full portfolio valuation: per-wallet breakdown plus aggregate total.
///
/// Wallets whose rate could not be resolved still appear in the breakdown
/// but contribute 0 to the total — one missing rate must not abort
/// valuation of the rest of the portfolio.
#[derive(Debug, Clone, PartialEq)]
pub struct PortfolioValuation {
    /// Currency the totals are expressed in.
    pub base: String,
    /// Per-wallet lines, in portfolio insertion order.
    pub lines: Vec<WalletValuation>,
    /// Sum of the resolved `value_in_base` contributions.
    pub total: f64,
}

impl PortfolioValuation {
    /// True when the portfolio had no wallets at all. Distinct from a
    /// portfolio whose every wallet failed to resolve a rate.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// The outcome of a buy or sell.
///
/// The USD estimate is advisory: when no `{code}_USD` rate resolves, the
/// cost is reported as unknown and the trade still executes — uniformly
/// for both buys and sells.
#[derive(Debug, Clone, PartialEq)]
pub struct TradeReceipt {
    pub code: String,
    pub amount: f64,
    /// USD per unit at trade time, when a positive rate resolved.
    pub unit_rate_usd: Option<f64>,
    /// `amount * unit_rate_usd`, when known.
    pub estimated_usd: Option<f64>,
    pub old_balance: f64,
    pub new_balance: f64,
}

/// Portfolio valuation and trade execution.
///
/// Pure business logic — no I/O, no registry access. Currency codes are
/// validated by the caller; rate snapshots are passed in.
pub struct PortfolioService;

impl PortfolioService {
    pub fn new() -> Self {
        Self
    }

    /// Value every wallet in `base` currency using the rate snapshot.
    ///
    /// A wallet already denominated in `base` converts 1:1 without touching
    /// the resolver. Iteration follows portfolio insertion order.
    pub fn value_in_base(
        &self,
        portfolio: &Portfolio,
        base: &str,
        rates: &RateTable,
        rate_service: &RateService,
    ) -> PortfolioValuation {
        let base = base.trim().to_uppercase();
        let mut lines = Vec::with_capacity(portfolio.wallet_count());
        let mut total = 0.0;

        for wallet in &portfolio.wallets {
            let value_in_base = if wallet.code == base {
                Some(wallet.balance)
            } else {
                match rate_service.resolve(rates, &wallet.code, &base) {
                    Ok(quote) => Some(wallet.balance * quote.rate),
                    Err(_) => {
                        tracing::debug!(code = %wallet.code, %base, "no rate for wallet, reporting as not found");
                        None
                    }
                }
            };
            if let Some(value) = value_in_base {
                total += value;
            }
            lines.push(WalletValuation {
                code: wallet.code.clone(),
                balance: wallet.balance,
                value_in_base,
            });
        }

        PortfolioValuation { base, lines, total }
    }

    /// Deposit `amount` of `code` into the portfolio, creating the wallet
    /// on first buy. Fails with `InvalidAmount` on non-positive amounts.
    pub fn buy(
        &self,
        portfolio: &mut Portfolio,
        code: &str,
        amount: f64,
        rates: &RateTable,
        rate_service: &RateService,
    ) -> Result<TradeReceipt, CoreError> {
        let code = code.trim().to_uppercase();
        let unit_rate_usd = self.usd_rate(&code, rates, rate_service);

        let wallet = portfolio.get_or_create_wallet(&code);
        let old_balance = wallet.balance;
        wallet.deposit(amount)?;

        Ok(TradeReceipt {
            code,
            amount,
            unit_rate_usd,
            estimated_usd: unit_rate_usd.map(|r| r * amount),
            old_balance,
            new_balance: wallet.balance,
        })
    }

    /// Withdraw `amount` of `code` from the portfolio. The wallet must
    /// already exist (wallets are created on first buy), and the balance
    /// must cover the amount.
    pub fn sell(
        &self,
        portfolio: &mut Portfolio,
        code: &str,
        amount: f64,
        rates: &RateTable,
        rate_service: &RateService,
    ) -> Result<TradeReceipt, CoreError> {
        let code = code.trim().to_uppercase();
        let unit_rate_usd = self.usd_rate(&code, rates, rate_service);

        let wallet = portfolio
            .wallet_mut(&code)
            .ok_or_else(|| CoreError::WalletNotFound { code: code.clone() })?;
        let old_balance = wallet.balance;
        wallet.withdraw(amount)?;

        Ok(TradeReceipt {
            code,
            amount,
            unit_rate_usd,
            estimated_usd: unit_rate_usd.map(|r| r * amount),
            old_balance,
            new_balance: wallet.balance,
        })
    }

    /// USD rate for trade estimates. USD itself is 1:1; otherwise any
    /// resolvable positive rate counts, and everything else means
    /// "unknown cost" rather than an error.
    fn usd_rate(&self, code: &str, rates: &RateTable, rate_service: &RateService) -> Option<f64> {
        if code == "USD" {
            return Some(1.0);
        }
        rate_service
            .resolve(rates, code, "USD")
            .ok()
            .map(|quote| quote.rate)
            .filter(|rate| *rate > 0.0)
    }
}

impl Default for PortfolioService {
    fn default() -> Self {
        Self::new()
    }
}
