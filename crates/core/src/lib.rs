pub mod errors;
pub mod models;
pub mod registry;
pub mod services;
pub mod storage;

use std::path::PathBuf;

use errors::CoreError;
use models::currency::Currency;
use models::portfolio::Portfolio;
use models::rate::RateTable;
use models::user::User;
use registry::{CurrencyCounts, CurrencyRegistry};
use services::portfolio_service::{PortfolioService, PortfolioValuation, TradeReceipt};
use services::rate_service::{RateQuote, RateService};
use storage::store::JsonStore;

/// Minimum password length accepted at registration.
const MIN_PASSWORD_LEN: usize = 4;

/// A valuation report as returned to the CLI, with the context needed to
/// render it: whose portfolio, and whether the hardcoded fallback rates had
/// to stand in for a missing/corrupt snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct PortfolioReport {
    pub username: String,
    pub valuation: PortfolioValuation,
    pub used_fallback_rates: bool,
}

/// Main entry point for the ValutaTrade Hub core library.
///
/// Holds the currency registry, the JSON store, the services, and the
/// current login session. Every command is a single logical transaction:
/// load full state from disk, compute, write full state back.
#[must_use]
pub struct TradeHub {
    registry: CurrencyRegistry,
    store: JsonStore,
    rate_service: RateService,
    portfolio_service: PortfolioService,
    current_user: Option<User>,
}

impl std::fmt::Debug for TradeHub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TradeHub")
            .field("data_dir", &self.store.data_dir())
            .field("currencies", &self.registry.len())
            .field(
                "current_user",
                &self.current_user.as_ref().map(|u| u.username.as_str()),
            )
            .finish()
    }
}

impl TradeHub {
    /// Create a hub over a data directory, with the reference currency
    /// catalog. The directory is created lazily on first write.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self::with_registry(data_dir, CurrencyRegistry::with_defaults())
    }

    /// Create a hub with an explicit registry (test setups use this).
    pub fn with_registry(data_dir: impl Into<PathBuf>, registry: CurrencyRegistry) -> Self {
        Self {
            registry,
            store: JsonStore::new(data_dir),
            rate_service: RateService::new(),
            portfolio_service: PortfolioService::new(),
            current_user: None,
        }
    }

    // ── Session ─────────────────────────────────────────────────────

    /// Register a new user and create their empty portfolio.
    /// Does not log the user in.
    pub fn register(&mut self, username: &str, password: &str) -> Result<User, CoreError> {
        let username = username.trim();
        if password.len() < MIN_PASSWORD_LEN {
            return Err(CoreError::WeakPassword {
                min: MIN_PASSWORD_LEN,
            });
        }

        let mut users = self.store.load_users()?;
        if users.iter().any(|u| u.username == username) {
            return Err(CoreError::UsernameTaken(username.to_string()));
        }

        let user_id = users.iter().map(|u| u.user_id).max().unwrap_or(0) + 1;
        let user = User::new(user_id, username, password)?;
        users.push(user.clone());
        self.store.save_users(&users)?;
        self.store.upsert_portfolio(&Portfolio::new(user_id))?;

        tracing::info!(%username, user_id, "registered new user");
        Ok(user)
    }

    /// Log in. The session lives only as long as this `TradeHub` value.
    pub fn login(&mut self, username: &str, password: &str) -> Result<&User, CoreError> {
        let username = username.trim();
        let users = self.store.load_users()?;
        let user = users
            .into_iter()
            .find(|u| u.username == username)
            .ok_or_else(|| CoreError::UserNotFound(username.to_string()))?;

        if !user.verify_password(password) {
            return Err(CoreError::InvalidCredentials);
        }

        tracing::info!(%username, "logged in");
        Ok(&*self.current_user.insert(user))
    }

    /// End the session, returning the user that was logged in.
    pub fn logout(&mut self) -> Option<User> {
        self.current_user.take()
    }

    pub fn current_user(&self) -> Option<&User> {
        self.current_user.as_ref()
    }

    // ── Portfolio ───────────────────────────────────────────────────

    /// Value the logged-in user's portfolio in `base` currency.
    ///
    /// Degrades to [`RateTable::fallback`] when the rate snapshot is
    /// missing or corrupt; the report says when it did.
    pub fn show_portfolio(&self, base: &str) -> Result<PortfolioReport, CoreError> {
        let user = self.require_login()?;
        self.registry.lookup(base)?;

        let portfolio = self
            .store
            .find_portfolio(user.user_id)?
            .ok_or(CoreError::PortfolioNotFound(user.user_id))?;

        let (rates, used_fallback_rates) = self.rates_or_fallback()?;
        let valuation =
            self.portfolio_service
                .value_in_base(&portfolio, base, &rates, &self.rate_service);

        Ok(PortfolioReport {
            username: user.username.clone(),
            valuation,
            used_fallback_rates,
        })
    }

    /// Buy `amount` of `code` for the logged-in user. The wallet is created
    /// on first buy. A missing USD rate means the receipt reports an
    /// unknown cost; the trade still executes.
    pub fn buy(&mut self, code: &str, amount: f64) -> Result<TradeReceipt, CoreError> {
        self.trade(code, amount, Trade::Buy)
    }

    /// Sell `amount` of `code` for the logged-in user. Requires an existing
    /// wallet with sufficient balance. Missing USD rates are handled the
    /// same way as for buys: unknown proceeds, trade executes.
    pub fn sell(&mut self, code: &str, amount: f64) -> Result<TradeReceipt, CoreError> {
        self.trade(code, amount, Trade::Sell)
    }

    // ── Rates & Currencies ──────────────────────────────────────────

    /// Resolve the conversion rate between two registered currencies.
    ///
    /// Unlike valuation, a missing rate snapshot is a hard failure here:
    /// answering a rate query from the hardcoded fallback would be
    /// misleading.
    pub fn get_rate(&self, from: &str, to: &str) -> Result<RateQuote, CoreError> {
        self.registry.lookup(from)?;
        self.registry.lookup(to)?;
        let rates = self.store.load_rates()?;
        self.rate_service.resolve(&rates, from, to)
    }

    /// The full currency catalog, sorted by code.
    pub fn list_currencies(&self) -> Vec<Currency> {
        self.registry.all()
    }

    pub fn currency_counts(&self) -> CurrencyCounts {
        self.registry.counts()
    }

    pub fn registry(&self) -> &CurrencyRegistry {
        &self.registry
    }

    // ── Internal ────────────────────────────────────────────────────

    fn require_login(&self) -> Result<&User, CoreError> {
        self.current_user.as_ref().ok_or(CoreError::NotLoggedIn)
    }

    fn rates_or_fallback(&self) -> Result<(RateTable, bool), CoreError> {
        match self.store.load_rates() {
            Ok(rates) => Ok((rates, false)),
            Err(CoreError::RatesUnavailable(reason)) => {
                tracing::warn!(%reason, "rate snapshot unavailable, using fallback table");
                Ok((RateTable::fallback(), true))
            }
            Err(e) => Err(e),
        }
    }

    fn trade(&mut self, code: &str, amount: f64, side: Trade) -> Result<TradeReceipt, CoreError> {
        let user_id = self.require_login()?.user_id;
        self.registry.lookup(code)?;

        let mut portfolio = self
            .store
            .find_portfolio(user_id)?
            .ok_or(CoreError::PortfolioNotFound(user_id))?;

        let (rates, _) = self.rates_or_fallback()?;
        let receipt = match side {
            Trade::Buy => self.portfolio_service.buy(
                &mut portfolio,
                code,
                amount,
                &rates,
                &self.rate_service,
            )?,
            Trade::Sell => self.portfolio_service.sell(
                &mut portfolio,
                code,
                amount,
                &rates,
                &self.rate_service,
            )?,
        };

        self.store.upsert_portfolio(&portfolio)?;
        tracing::info!(
            user_id,
            code = %receipt.code,
            amount,
            side = ?side,
            "trade executed"
        );
        Ok(receipt)
    }
}

#[derive(Debug, Clone, Copy)]
enum Trade {
    Buy,
    Sell,
}
