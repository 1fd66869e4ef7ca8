//! Port for one-way password hashing.

use async_trait::async_trait;

use crate::domain::{Error, Password, PasswordHash};

use super::define_port_error;

define_port_error! {
    /// Errors raised by password hashing adapters.
    pub enum PasswordHasherError {
        /// The hashing backend failed.
        Hash { message: String } => "password hashing failed: {message}",
    }
}

impl From<PasswordHasherError> for Error {
    fn from(error: PasswordHasherError) -> Self {
        Error::internal(error.to_string())
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PasswordHasher: Send + Sync {
    /// Hash a validated password.
    async fn hash(&self, password: &Password) -> Result<PasswordHash, PasswordHasherError>;

    /// Check a candidate plaintext against a stored hash.
    async fn verify(
        &self,
        candidate: &str,
        hash: &PasswordHash,
    ) -> Result<bool, PasswordHasherError>;
}
