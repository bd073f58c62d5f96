use serde::{Deserialize, Serialize};

use super::wallet::Wallet;

/// A user's holdings: one wallet per currency code, owned 1:1 by `user_id`.
///
/// Wallets are kept in a `Vec` rather than a map so that valuation reports
/// iterate in insertion order (the order currencies were first bought),
/// and so the JSON on disk round-trips deterministically.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Portfolio {
    pub user_id: u64,
    pub wallets: Vec<Wallet>,
}

impl Portfolio {
    /// Create an empty portfolio for a user.
    pub fn new(user_id: u64) -> Self {
        Self {
            user_id,
            wallets: Vec::new(),
        }
    }

    /// Look up a wallet by currency code (case-insensitive).
    pub fn wallet(&self, code: &str) -> Option<&Wallet> {
        let code = code.trim().to_uppercase();
        self.wallets.iter().find(|w| w.code == code)
    }

    pub fn wallet_mut(&mut self, code: &str) -> Option<&mut Wallet> {
        let code = code.trim().to_uppercase();
        self.wallets.iter_mut().find(|w| w.code == code)
    }

    /// Return the wallet for `code`, creating an empty one if absent.
    /// Wallet existence implies it was bought into at least once — callers
    /// only reach for this on the deposit path.
    pub fn get_or_create_wallet(&mut self, code: &str) -> &mut Wallet {
        let code = code.trim().to_uppercase();
        let idx = match self.wallets.iter().position(|w| w.code == code) {
            Some(idx) => idx,
            None => {
                self.wallets.push(Wallet::new(code));
                self.wallets.len() - 1
            }
        };
        &mut self.wallets[idx]
    }

    pub fn is_empty(&self) -> bool {
        self.wallets.is_empty()
    }

    pub fn wallet_count(&self) -> usize {
        self.wallets.len()
    }
}
