//! Password value object and strength policy.
//!
//! Hashing uses Argon2 with a random salt per hash. Strength rules live in
//! [`PasswordPolicy`] so they can be configured per deployment.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::config::DEFAULT_PASSWORD_MIN_LENGTH;
use crate::errors::{AppError, AppResult};

/// Hashed password value object.
#[derive(Clone)]
pub struct Password {
    hash: String,
}

impl std::fmt::Debug for Password {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Password")
            .field("hash", &"[REDACTED]")
            .finish()
    }
}

impl Password {
    /// Hash a plain text password.
    ///
    /// Strength is not checked here; run [`PasswordPolicy::check`] first.
    pub fn hash(plain_text: &str) -> AppResult<Self> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Self::argon2()
            .hash_password(plain_text.as_bytes(), &salt)
            .map_err(|e| AppError::internal(format!("Password hash failed: {}", e)))?;
        Ok(Self {
            hash: hash.to_string(),
        })
    }

    /// Wrap a PHC string read back from the `users` table.
    pub fn from_hash(hash: String) -> Self {
        Self { hash }
    }

    pub fn as_str(&self) -> &str {
        &self.hash
    }

    /// PHC string for the `password_hash` column.
    pub fn into_string(self) -> String {
        self.hash
    }

    /// `false` for a wrong password and for an unparsable hash alike.
    pub fn verify(&self, plain_text: &str) -> bool {
        PasswordHash::new(&self.hash)
            .map(|parsed| {
                Self::argon2()
                    .verify_password(plain_text.as_bytes(), &parsed)
                    .is_ok()
            })
            .unwrap_or(false)
    }

    #[inline]
    fn argon2() -> Argon2<'static> {
        Argon2::default()
    }
}

/// Configurable password strength rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordPolicy {
    /// Minimum number of characters
    pub min_length: usize,
    /// Require at least one uppercase and one lowercase letter
    pub require_mixed_case: bool,
    /// Require at least one digit
    pub require_numbers: bool,
    /// Require at least one character that is neither a letter nor a digit
    pub require_symbols: bool,
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self {
            min_length: DEFAULT_PASSWORD_MIN_LENGTH,
            require_mixed_case: false,
            require_numbers: false,
            require_symbols: false,
        }
    }
}

impl PasswordPolicy {
    /// Check a candidate password; returns one message per violated rule.
    pub fn check(&self, candidate: &str) -> Vec<String> {
        let mut violations = Vec::new();

        if candidate.chars().count() < self.min_length {
            violations.push(format!(
                "The password field must be at least {} characters.",
                self.min_length
            ));
        }

        if self.require_mixed_case
            && !(candidate.chars().any(char::is_uppercase)
                && candidate.chars().any(char::is_lowercase))
        {
            violations.push(
                "The password field must contain at least one uppercase and one lowercase letter."
                    .to_string(),
            );
        }

        if self.require_numbers && !candidate.chars().any(|c| c.is_numeric()) {
            violations.push("The password field must contain at least one number.".to_string());
        }

        if self.require_symbols
            && !candidate
                .chars()
                .any(|c| !c.is_alphanumeric() && !c.is_whitespace())
        {
            violations.push("The password field must contain at least one symbol.".to_string());
        }

        violations
    }
}
