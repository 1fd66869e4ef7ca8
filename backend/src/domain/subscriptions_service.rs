//! Subscription services: follow and unfollow authors, list followed authors.

use std::sync::Arc;

use async_trait::async_trait;
use pagination::{Page, PageRequest};
use serde_json::json;

use crate::domain::ports::{
    RecipeRepository, SubscriptionRepository, SubscriptionRepositoryError, SubscriptionsCommand,
    SubscriptionsQuery, UserRepository,
};
use crate::domain::{AuthorWithRecipes, Error, RecipesLimit, User, UserId, UserProfile};

/// Service implementing the subscription driving ports.
#[derive(Clone)]
pub struct SubscriptionsService {
    users: Arc<dyn UserRepository>,
    subscriptions: Arc<dyn SubscriptionRepository>,
    recipes: Arc<dyn RecipeRepository>,
}

impl SubscriptionsService {
    /// Create a new service with the given adapters.
    pub fn new(
        users: Arc<dyn UserRepository>,
        subscriptions: Arc<dyn SubscriptionRepository>,
        recipes: Arc<dyn RecipeRepository>,
    ) -> Self {
        Self {
            users,
            subscriptions,
            recipes,
        }
    }

    async fn author(&self, id: UserId) -> Result<User, Error> {
        self.users
            .find_by_id(id)
            .await?
            .ok_or_else(|| Error::not_found(format!("user {id} not found")))
    }

    async fn with_recipes(
        &self,
        author: User,
        limit: RecipesLimit,
    ) -> Result<AuthorWithRecipes, Error> {
        let (recipes, recipes_count) = self.recipes.summaries_by_author(author.id(), limit).await?;
        Ok(AuthorWithRecipes {
            profile: UserProfile {
                user: author,
                is_subscribed: true,
            },
            recipes,
            recipes_count,
        })
    }
}

fn self_subscription_error() -> Error {
    Error::invalid_request(SubscriptionRepositoryError::SelfSubscription.to_string()).with_details(
        json!({
            "field": "id",
            "code": "self_subscription",
        }),
    )
}

#[async_trait]
impl SubscriptionsCommand for SubscriptionsService {
    async fn subscribe(
        &self,
        user: UserId,
        author: UserId,
        limit: RecipesLimit,
    ) -> Result<AuthorWithRecipes, Error> {
        if user == author {
            return Err(self_subscription_error());
        }
        let author = self.author(author).await?;
        let created = self
            .subscriptions
            .subscribe(user, author.id())
            .await
            .map_err(|err| match err {
                SubscriptionRepositoryError::SelfSubscription => self_subscription_error(),
                other => other.into(),
            })?;
        if !created {
            return Err(Error::invalid_request(format!(
                "already subscribed to {}",
                author.username()
            ))
            .with_details(json!({
                "field": "id",
                "code": "duplicate",
            })));
        }
        self.with_recipes(author, limit).await
    }

    async fn unsubscribe(&self, user: UserId, author: UserId) -> Result<(), Error> {
        let author = self.author(author).await?;
        if self.subscriptions.unsubscribe(user, author.id()).await? {
            Ok(())
        } else {
            Err(Error::not_found(format!(
                "not subscribed to {}",
                author.username()
            )))
        }
    }
}

#[async_trait]
impl SubscriptionsQuery for SubscriptionsService {
    async fn subscriptions(
        &self,
        user: UserId,
        page: PageRequest,
        limit: RecipesLimit,
    ) -> Result<Page<AuthorWithRecipes>, Error> {
        let Page { items, total } = self.subscriptions.list_authors(user, page).await?;
        let mut authors = Vec::with_capacity(items.len());
        for author in items {
            authors.push(self.with_recipes(author, limit).await?);
        }
        Ok(Page::new(authors, total))
    }
}
