use std::path::{Path, PathBuf};

use crate::errors::CoreError;
use crate::models::portfolio::Portfolio;
use crate::models::rate::RateTable;
use crate::models::user::User;

/// Flat-file JSON persistence for users, portfolios, and the rate snapshot.
///
/// Each file is read and written wholesale: a command loads full state,
/// computes, and writes full state back. No partial writes are visible
/// mid-command. Single-process use only — concurrent access would need
/// file locking or a real transactional store.
pub struct JsonStore {
    data_dir: PathBuf,
}

impl JsonStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn users_path(&self) -> PathBuf {
        self.data_dir.join("users.json")
    }

    fn portfolios_path(&self) -> PathBuf {
        self.data_dir.join("portfolios.json")
    }

    fn rates_path(&self) -> PathBuf {
        self.data_dir.join("rates.json")
    }

    // ── Users ───────────────────────────────────────────────────────

    /// Load all users. A missing file means no one has registered yet.
    pub fn load_users(&self) -> Result<Vec<User>, CoreError> {
        let path = self.users_path();
        if !path.exists() {
            return Ok(Vec::new());
        }
        let contents = std::fs::read_to_string(&path)?;
        let users = serde_json::from_str(&contents)?;
        Ok(users)
    }

    pub fn save_users(&self, users: &[User]) -> Result<(), CoreError> {
        let json = serde_json::to_string_pretty(users)
            .map_err(|e| CoreError::Serialization(format!("failed to serialize users: {e}")))?;
        self.write_file(&self.users_path(), &json)
    }

    // ── Portfolios ──────────────────────────────────────────────────

    /// Load all portfolios. A missing file means no portfolios exist yet.
    pub fn load_portfolios(&self) -> Result<Vec<Portfolio>, CoreError> {
        let path = self.portfolios_path();
        if !path.exists() {
            return Ok(Vec::new());
        }
        let contents = std::fs::read_to_string(&path)?;
        let portfolios = serde_json::from_str(&contents)?;
        Ok(portfolios)
    }

    pub fn save_portfolios(&self, portfolios: &[Portfolio]) -> Result<(), CoreError> {
        let json = serde_json::to_string_pretty(portfolios).map_err(|e| {
            CoreError::Serialization(format!("failed to serialize portfolios: {e}"))
        })?;
        self.write_file(&self.portfolios_path(), &json)
    }

    /// Find a portfolio by owner.
    pub fn find_portfolio(&self, user_id: u64) -> Result<Option<Portfolio>, CoreError> {
        let portfolios = self.load_portfolios()?;
        Ok(portfolios.into_iter().find(|p| p.user_id == user_id))
    }

    /// Replace the portfolio with the same `user_id`, or append it.
    pub fn upsert_portfolio(&self, portfolio: &Portfolio) -> Result<(), CoreError> {
        let mut portfolios = self.load_portfolios()?;
        match portfolios.iter_mut().find(|p| p.user_id == portfolio.user_id) {
            Some(existing) => *existing = portfolio.clone(),
            None => portfolios.push(portfolio.clone()),
        }
        self.save_portfolios(&portfolios)
    }

    // ── Rates ───────────────────────────────────────────────────────

    /// Load the rate snapshot. Missing or corrupt files fail with
    /// [`CoreError::RatesUnavailable`]; callers may substitute
    /// [`RateTable::fallback`].
    pub fn load_rates(&self) -> Result<RateTable, CoreError> {
        let path = self.rates_path();
        if !path.exists() {
            return Err(CoreError::RatesUnavailable(format!(
                "rates file not found: {}",
                path.display()
            )));
        }
        let contents = std::fs::read_to_string(&path)
            .map_err(|e| CoreError::RatesUnavailable(format!("failed to read rates: {e}")))?;
        serde_json::from_str(&contents)
            .map_err(|e| CoreError::RatesUnavailable(format!("failed to parse rates: {e}")))
    }

    // ── Internal ────────────────────────────────────────────────────

    fn write_file(&self, path: &Path, json: &str) -> Result<(), CoreError> {
        std::fs::create_dir_all(&self.data_dir)?;
        std::fs::write(path, json)?;
        tracing::debug!(path = %path.display(), "wrote state file");
        Ok(())
    }
}
