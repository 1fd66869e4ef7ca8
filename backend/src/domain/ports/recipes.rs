//! Driving ports for recipes, favorites and the shopping cart.

use async_trait::async_trait;
use pagination::{Page, PageRequest};

use crate::domain::{
    Error, RecipeDraft, RecipeFilter, RecipeId, RecipeList, RecipePatch, RecipeSummary,
    RecipeView, ShoppingList, UserId,
};

/// Domain use-case port for recipe mutations.
#[async_trait]
pub trait RecipesCommand: Send + Sync {
    /// Publish a recipe authored by `author`.
    async fn create(&self, author: UserId, draft: RecipeDraft) -> Result<RecipeView, Error>;

    /// Apply a partial update. Only the author or an admin may do this.
    async fn update(
        &self,
        actor: UserId,
        id: RecipeId,
        patch: RecipePatch,
    ) -> Result<RecipeView, Error>;

    /// Delete a recipe. Only the author or an admin may do this.
    async fn delete(&self, actor: UserId, id: RecipeId) -> Result<(), Error>;

    /// Add a recipe to one of the user's lists.
    ///
    /// Adding a recipe twice is rejected so the list never holds duplicates.
    async fn add_to_list(
        &self,
        user: UserId,
        list: RecipeList,
        id: RecipeId,
    ) -> Result<RecipeSummary, Error>;

    /// Remove a recipe from one of the user's lists.
    async fn remove_from_list(
        &self,
        user: UserId,
        list: RecipeList,
        id: RecipeId,
    ) -> Result<(), Error>;
}

/// Domain use-case port for reading recipes.
#[async_trait]
pub trait RecipesQuery: Send + Sync {
    /// Page through recipes matching `filter`, newest first.
    async fn list(
        &self,
        viewer: Option<UserId>,
        filter: RecipeFilter,
        page: PageRequest,
    ) -> Result<Page<RecipeView>, Error>;

    /// Fetch one recipe as seen by `viewer`.
    async fn get(&self, viewer: Option<UserId>, id: RecipeId) -> Result<RecipeView, Error>;

    /// Aggregate the ingredients of every recipe in the user's cart.
    async fn shopping_list(&self, user: UserId) -> Result<ShoppingList, Error>;
}
