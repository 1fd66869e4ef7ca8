//! Port for favorites and shopping cart membership.

use std::collections::HashSet;

use async_trait::async_trait;

use crate::domain::{Error, RecipeId, RecipeList, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by recipe list adapters.
    pub enum RecipeListRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "recipe list repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "recipe list repository query failed: {message}",
        /// The recipe was deleted before it could be added.
        MissingRecipe { recipe: RecipeId } => "recipe {recipe} not found",
    }
}

impl From<RecipeListRepositoryError> for Error {
    fn from(error: RecipeListRepositoryError) -> Self {
        match error {
            RecipeListRepositoryError::Connection { message } => {
                Error::service_unavailable(format!("recipe list repository unavailable: {message}"))
            }
            RecipeListRepositoryError::Query { message } => {
                Error::internal(format!("recipe list repository error: {message}"))
            }
            RecipeListRepositoryError::MissingRecipe { recipe } => {
                Error::not_found(format!("recipe {recipe} not found"))
            }
        }
    }
}

/// User x recipe sets. Each pair appears at most once per list.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecipeListRepository: Send + Sync {
    /// Add a recipe. Returns `false` when it was already present.
    async fn add(
        &self,
        list: RecipeList,
        user: UserId,
        recipe: RecipeId,
    ) -> Result<bool, RecipeListRepositoryError>;

    /// Remove a recipe. Returns `false` when it was not present.
    async fn remove(
        &self,
        list: RecipeList,
        user: UserId,
        recipe: RecipeId,
    ) -> Result<bool, RecipeListRepositoryError>;

    /// Which of `recipes` are in the user's list.
    async fn contained(
        &self,
        list: RecipeList,
        user: UserId,
        recipes: &[RecipeId],
    ) -> Result<HashSet<RecipeId>, RecipeListRepositoryError>;
}
