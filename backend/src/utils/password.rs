//! Password hashing and verification using bcrypt.

use bcrypt::{hash, verify};

use crate::errors::ServiceError;

/// Salted one-way password hasher with a fixed work factor.
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    cost: u32,
}

impl PasswordHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    /// Hashes a password before it is stored.
    ///
    /// # Errors
    /// Returns `ServiceError::Hashing` if bcrypt fails (bad cost, RNG failure).
    pub fn hash_password(&self, password: &str) -> Result<String, ServiceError> {
        hash(password, self.cost).map_err(|e| ServiceError::hashing(e.to_string()))
    }

    /// Checks a password against a stored hash.
    ///
    /// A malformed hash counts as a mismatch.
    pub fn verify_password(&self, password: &str, password_hash: &str) -> bool {
        verify(password, password_hash).unwrap_or(false)
    }
}
