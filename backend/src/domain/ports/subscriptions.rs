//! Driving ports for following authors.

use async_trait::async_trait;
use pagination::{Page, PageRequest};

use crate::domain::{AuthorWithRecipes, Error, RecipesLimit, UserId};

/// Domain use-case port for changing subscriptions.
#[async_trait]
pub trait SubscriptionsCommand: Send + Sync {
    /// Follow `author`, returning the author with a recipe preview.
    ///
    /// Following oneself or an already followed author is rejected.
    async fn subscribe(
        &self,
        user: UserId,
        author: UserId,
        limit: RecipesLimit,
    ) -> Result<AuthorWithRecipes, Error>;

    /// Stop following `author`.
    async fn unsubscribe(&self, user: UserId, author: UserId) -> Result<(), Error>;
}

/// Domain use-case port for listing followed authors.
#[async_trait]
pub trait SubscriptionsQuery: Send + Sync {
    /// Page through the authors `user` follows.
    async fn subscriptions(
        &self,
        user: UserId,
        page: PageRequest,
        limit: RecipesLimit,
    ) -> Result<Page<AuthorWithRecipes>, Error>;
}
