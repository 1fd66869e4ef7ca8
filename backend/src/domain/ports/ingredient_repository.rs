//! Port for ingredient lookups and bulk import.

use async_trait::async_trait;

use crate::domain::{Error, ImportSummary, Ingredient, IngredientId, NewIngredient};

use super::define_port_error;

define_port_error! {
    /// Errors raised by ingredient repository adapters.
    pub enum IngredientRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "ingredient repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "ingredient repository query failed: {message}",
    }
}

impl From<IngredientRepositoryError> for Error {
    fn from(error: IngredientRepositoryError) -> Self {
        match error {
            IngredientRepositoryError::Connection { message } => {
                Error::service_unavailable(format!("ingredient repository unavailable: {message}"))
            }
            IngredientRepositoryError::Query { message } => {
                Error::internal(format!("ingredient repository error: {message}"))
            }
        }
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IngredientRepository: Send + Sync {
    /// Ingredients whose name contains `name` (case-insensitive), ordered by
    /// name. `None` returns every ingredient.
    async fn search(
        &self,
        name: Option<String>,
    ) -> Result<Vec<Ingredient>, IngredientRepositoryError>;

    /// Fetch one ingredient.
    async fn find_by_id(
        &self,
        id: IngredientId,
    ) -> Result<Option<Ingredient>, IngredientRepositoryError>;

    /// Fetch several ingredients. Unknown ids are skipped.
    async fn find_by_ids(
        &self,
        ids: &[IngredientId],
    ) -> Result<Vec<Ingredient>, IngredientRepositoryError>;

    /// Insert ingredients, skipping `(name, measurement_unit)` pairs that
    /// already exist.
    async fn import(
        &self,
        ingredients: &[NewIngredient],
    ) -> Result<ImportSummary, IngredientRepositoryError>;
}
