//! Driving port for account mutations.

use async_trait::async_trait;

use crate::domain::{Error, PasswordChange, Registration, User, UserId};

/// Domain use-case port for sign-up and password changes.
#[async_trait]
pub trait UsersCommand: Send + Sync {
    /// Create an account. Duplicate e-mails or usernames are rejected.
    async fn register(&self, registration: Registration) -> Result<User, Error>;

    /// Replace the caller's password after checking the current one.
    async fn set_password(&self, user: UserId, change: &PasswordChange) -> Result<(), Error>;
}
