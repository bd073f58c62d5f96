use thiserror::Error;

/// Unified error type for the entire valutatrade-core library.
/// Every fallible public function returns `Result<T, CoreError>`.
///
/// All variants are recoverable at the command boundary: they carry enough
/// context (offending code, requested pair, attempted amount) for the caller
/// to render a user-facing message.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Currencies ──────────────────────────────────────────────────
    #[error("Invalid currency: {0}")]
    InvalidCurrency(String),

    #[error("Currency '{code}' is not in the registry")]
    CurrencyNotFound { code: String },

    // ── Rates ───────────────────────────────────────────────────────
    #[error("No rate available for {from}→{to} (known pairs: {known_pairs:?})")]
    RateUnavailable {
        from: String,
        to: String,
        /// Pair keys actually present in the rate table, for diagnostics.
        known_pairs: Vec<String>,
    },

    #[error("Rate source unavailable: {0}")]
    RatesUnavailable(String),

    // ── Wallets ─────────────────────────────────────────────────────
    #[error("Amount must be positive, got {amount}")]
    InvalidAmount { amount: f64 },

    #[error("Insufficient funds in '{code}' wallet: requested {requested}, available {available}")]
    InsufficientFunds {
        code: String,
        requested: f64,
        available: f64,
    },

    #[error("No '{code}' wallet in this portfolio — wallets are created on first buy")]
    WalletNotFound { code: String },

    // ── Users / Auth ────────────────────────────────────────────────
    #[error("Username '{0}' is already taken")]
    UsernameTaken(String),

    #[error("User '{0}' not found")]
    UserNotFound(String),

    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Password must be at least {min} characters")]
    WeakPassword { min: usize },

    #[error("Password hashing failed: {0}")]
    PasswordHash(String),

    #[error("No user is logged in")]
    NotLoggedIn,

    #[error("No portfolio found for user id {0}")]
    PortfolioNotFound(u64),

    // ── Storage ─────────────────────────────────────────────────────
    #[error("File I/O error: {0}")]
    FileIo(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),
}

// ── Conversion helpers (From impls) ─────────────────────────────────

impl From<std::io::Error> for CoreError {
    fn from(e: std::io::Error) -> Self {
        CoreError::FileIo(e.to_string())
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(e: serde_json::Error) -> Self {
        CoreError::Deserialization(e.to_string())
    }
}

impl From<argon2::password_hash::Error> for CoreError {
    fn from(e: argon2::password_hash::Error) -> Self {
        CoreError::PasswordHash(e.to_string())
    }
}
