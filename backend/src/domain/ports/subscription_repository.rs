//! Port for user-to-author subscriptions.

use std::collections::HashSet;

use async_trait::async_trait;
use pagination::{Page, PageRequest};

use crate::domain::{Error, User, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by subscription repository adapters.
    pub enum SubscriptionRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "subscription repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "subscription repository query failed: {message}",
        /// The user tried to follow themselves.
        SelfSubscription => "users cannot subscribe to themselves",
    }
}

impl From<SubscriptionRepositoryError> for Error {
    fn from(error: SubscriptionRepositoryError) -> Self {
        match error {
            SubscriptionRepositoryError::Connection { message } => Error::service_unavailable(
                format!("subscription repository unavailable: {message}"),
            ),
            SubscriptionRepositoryError::Query { message } => {
                Error::internal(format!("subscription repository error: {message}"))
            }
            SubscriptionRepositoryError::SelfSubscription => {
                Error::invalid_request(error.to_string())
            }
        }
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SubscriptionRepository: Send + Sync {
    /// Follow an author. Returns `false` when already following.
    async fn subscribe(
        &self,
        user: UserId,
        author: UserId,
    ) -> Result<bool, SubscriptionRepositoryError>;

    /// Stop following an author. Returns `false` when not following.
    async fn unsubscribe(
        &self,
        user: UserId,
        author: UserId,
    ) -> Result<bool, SubscriptionRepositoryError>;

    /// Which of `authors` the user follows.
    async fn followed_among(
        &self,
        user: UserId,
        authors: &[UserId],
    ) -> Result<HashSet<UserId>, SubscriptionRepositoryError>;

    /// Authors the user follows, ordered by id.
    async fn list_authors(
        &self,
        user: UserId,
        page: PageRequest,
    ) -> Result<Page<User>, SubscriptionRepositoryError>;
}
