//! Port for recipe persistence.
//!
//! Multi-row writes (the recipe row plus its ingredient lines and tag links)
//! must be atomic: adapters either apply all of them or none.

use async_trait::async_trait;
use pagination::{Page, PageRequest};

use crate::domain::{
    Error, NewRecipe, Recipe, RecipeChanges, RecipeFilter, RecipeId, RecipeSummary, RecipesLimit,
    ShoppingListLine, UserId,
};

use super::define_port_error;

define_port_error! {
    /// Errors raised by recipe repository adapters.
    pub enum RecipeRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "recipe repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "recipe repository query failed: {message}",
        /// A referenced ingredient, tag or author does not exist.
        UnknownReference { message: String } => "recipe references a missing row: {message}",
    }
}

impl From<RecipeRepositoryError> for Error {
    fn from(error: RecipeRepositoryError) -> Self {
        match error {
            RecipeRepositoryError::Connection { message } => {
                Error::service_unavailable(format!("recipe repository unavailable: {message}"))
            }
            RecipeRepositoryError::Query { message } => {
                Error::internal(format!("recipe repository error: {message}"))
            }
            RecipeRepositoryError::UnknownReference { message } => Error::invalid_request(message),
        }
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecipeRepository: Send + Sync {
    /// Insert a recipe with its ingredient lines and tags.
    async fn create(&self, recipe: &NewRecipe) -> Result<RecipeId, RecipeRepositoryError>;

    /// Apply a partial update. Returns `false` when the recipe is unknown.
    async fn update(
        &self,
        id: RecipeId,
        changes: &RecipeChanges,
    ) -> Result<bool, RecipeRepositoryError>;

    /// Delete a recipe and everything that references it. Returns `false`
    /// when the recipe is unknown.
    async fn delete(&self, id: RecipeId) -> Result<bool, RecipeRepositoryError>;

    /// Fetch one recipe with tags and ingredient lines resolved.
    async fn find_by_id(&self, id: RecipeId) -> Result<Option<Recipe>, RecipeRepositoryError>;

    /// List recipes matching `filter`, newest first.
    async fn list(
        &self,
        filter: &RecipeFilter,
        page: PageRequest,
    ) -> Result<Page<Recipe>, RecipeRepositoryError>;

    /// Newest recipes of an author plus the author's total recipe count.
    async fn summaries_by_author(
        &self,
        author: UserId,
        limit: RecipesLimit,
    ) -> Result<(Vec<RecipeSummary>, u64), RecipeRepositoryError>;

    /// Ingredient lines of every recipe in the user's shopping cart.
    async fn shopping_list_lines(
        &self,
        user: UserId,
    ) -> Result<Vec<ShoppingListLine>, RecipeRepositoryError>;
}
