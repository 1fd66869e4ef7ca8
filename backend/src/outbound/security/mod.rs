//! bcrypt-backed password hashing.
//!
//! Every hash and verification runs on Tokio's blocking pool.

use async_trait::async_trait;
use bcrypt::BcryptError;
use tokio::task;
use tracing::warn;
use zeroize::Zeroizing;

use crate::domain::ports::{PasswordHasher, PasswordHasherError};
use crate::domain::{Password, PasswordHash};

/// bcrypt cost used when no explicit cost is configured.
pub const DEFAULT_BCRYPT_COST: u32 = bcrypt::DEFAULT_COST;

/// Cheapest cost bcrypt accepts.
pub const MIN_BCRYPT_COST: u32 = 4;

/// Most expensive cost bcrypt accepts.
pub const MAX_BCRYPT_COST: u32 = 31;

/// [`PasswordHasher`] adapter using the `bcrypt` crate.
#[derive(Debug, Clone, Copy)]
pub struct BcryptPasswordHasher {
    cost: u32,
}

impl BcryptPasswordHasher {
    /// Create a hasher using `cost` rounds (4 to 31).
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    /// The configured cost factor.
    pub fn cost(&self) -> u32 {
        self.cost
    }
}

impl Default for BcryptPasswordHasher {
    fn default() -> Self {
        Self::new(DEFAULT_BCRYPT_COST)
    }
}

async fn run_blocking<T, F>(job: F) -> Result<Result<T, BcryptError>, PasswordHasherError>
where
    F: FnOnce() -> Result<T, BcryptError> + Send + 'static,
    T: Send + 'static,
{
    task::spawn_blocking(job)
        .await
        .map_err(|err| PasswordHasherError::hash(err.to_string()))
}

#[async_trait]
impl PasswordHasher for BcryptPasswordHasher {
    async fn hash(&self, password: &Password) -> Result<PasswordHash, PasswordHasherError> {
        let plaintext = Zeroizing::new(password.expose().to_owned());
        let cost = self.cost;
        let hashed = run_blocking(move || bcrypt::hash(plaintext.as_str(), cost))
            .await?
            .map_err(|err| PasswordHasherError::hash(err.to_string()))?;
        Ok(PasswordHash::new(hashed))
    }

    async fn verify(
        &self,
        candidate: &str,
        hash: &PasswordHash,
    ) -> Result<bool, PasswordHasherError> {
        let plaintext = Zeroizing::new(candidate.to_owned());
        let stored = hash.as_str().to_owned();
        match run_blocking(move || bcrypt::verify(plaintext.as_str(), &stored)).await? {
            Ok(matches) => Ok(matches),
            // A malformed stored hash cannot match anything.
            Err(
                err @ (BcryptError::InvalidHash(_)
                | BcryptError::InvalidPrefix(_)
                | BcryptError::InvalidCost(_)),
            ) => {
                warn!(error = %err, "stored password hash is malformed");
                Ok(false)
            }
            Err(err) => Err(PasswordHasherError::hash(err.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn hasher() -> BcryptPasswordHasher {
        BcryptPasswordHasher::new(MIN_BCRYPT_COST)
    }

    #[rstest]
    #[tokio::test]
    async fn hashes_verify_against_their_password(hasher: BcryptPasswordHasher) {
        let password = Password::new("correct horse").expect("valid password");
        let hash = hasher.hash(&password).await.expect("hash");

        assert_ne!(hash.as_str(), "correct horse");
        assert!(hasher.verify("correct horse", &hash).await.expect("verify"));
        assert!(!hasher.verify("wrong horse", &hash).await.expect("verify"));
    }

    #[rstest]
    #[tokio::test]
    async fn malformed_hashes_never_match(hasher: BcryptPasswordHasher) {
        let verdict = hasher
            .verify("anything", &PasswordHash::new("not-a-bcrypt-hash"))
            .await
            .expect("verify");
        assert!(!verdict);
    }

    #[rstest]
    fn default_uses_library_cost() {
        assert_eq!(BcryptPasswordHasher::default().cost(), bcrypt::DEFAULT_COST);
    }
}
