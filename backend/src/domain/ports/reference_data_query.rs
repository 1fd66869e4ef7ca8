//! Driving ports for tags and ingredients, which clients only read.

use async_trait::async_trait;

use crate::domain::{Error, Ingredient, IngredientId, Tag, TagId};

/// Tag lookups.
#[async_trait]
pub trait TagsQuery: Send + Sync {
    /// Every tag ordered by id.
    async fn list_tags(&self) -> Result<Vec<Tag>, Error>;

    /// One tag, or a not-found error.
    async fn tag(&self, id: TagId) -> Result<Tag, Error>;
}

/// Ingredient lookups.
#[async_trait]
pub trait IngredientsQuery: Send + Sync {
    /// Ingredients whose name contains `name`, ignoring case.
    async fn search_ingredients(&self, name: Option<String>) -> Result<Vec<Ingredient>, Error>;

    /// One ingredient, or a not-found error.
    async fn ingredient(&self, id: IngredientId) -> Result<Ingredient, Error>;
}
