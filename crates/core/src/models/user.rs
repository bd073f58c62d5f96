use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

/// A registered user. Only the Argon2id password hash is stored; the
/// cleartext password never touches disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub user_id: u64,
    pub username: String,
    pub password_hash: String,
    pub registered_at: DateTime<Utc>,
}

impl User {
    /// Create a new user, hashing the password with a fresh random salt.
    pub fn new(
        user_id: u64,
        username: impl Into<String>,
        password: &str,
    ) -> Result<Self, CoreError> {
        let salt = SaltString::generate(&mut OsRng);
        let password_hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)?
            .to_string();
        Ok(Self {
            user_id,
            username: username.into(),
            password_hash,
            registered_at: Utc::now(),
        })
    }

    /// Check a cleartext password against the stored hash.
    /// Returns `false` for both a wrong password and an unparseable hash.
    pub fn verify_password(&self, password: &str) -> bool {
        PasswordHash::new(&self.password_hash)
            .and_then(|parsed| Argon2::default().verify_password(password.as_bytes(), &parsed))
            .is_ok()
    }
}
