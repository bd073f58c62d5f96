use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

/// A single-currency balance inside a portfolio.
///
/// Balance is never negative: deposits require a positive amount, and
/// withdrawals fail with [`CoreError::InsufficientFunds`] rather than
/// overdraw. There is no upper bound.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wallet {
    /// Currency code this wallet holds, uppercased ("USD", "BTC").
    pub code: String,
    pub balance: f64,
}

impl Wallet {
    /// Create an empty wallet for a currency code.
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into().to_uppercase(),
            balance: 0.0,
        }
    }

    /// Add funds. Fails with [`CoreError::InvalidAmount`] if `amount <= 0`
    /// or is not a finite number.
    pub fn deposit(&mut self, amount: f64) -> Result<(), CoreError> {
        if !amount.is_finite() || amount <= 0.0 {
            return Err(CoreError::InvalidAmount { amount });
        }
        self.balance += amount;
        Ok(())
    }

    /// Remove funds. Fails with [`CoreError::InvalidAmount`] if `amount <= 0`,
    /// or [`CoreError::InsufficientFunds`] if `amount` exceeds the balance.
    pub fn withdraw(&mut self, amount: f64) -> Result<(), CoreError> {
        if !amount.is_finite() || amount <= 0.0 {
            return Err(CoreError::InvalidAmount { amount });
        }
        if amount > self.balance {
            return Err(CoreError::InsufficientFunds {
                code: self.code.clone(),
                requested: amount,
                available: self.balance,
            });
        }
        self.balance -= amount;
        Ok(())
    }
}
