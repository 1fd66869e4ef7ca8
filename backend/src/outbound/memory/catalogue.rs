//! In-memory tag and ingredient repositories.

use async_trait::async_trait;

use crate::domain::ports::{
    IngredientRepository, IngredientRepositoryError, TagRepository, TagRepositoryError,
};
use crate::domain::{ImportSummary, Ingredient, IngredientId, NewIngredient, Tag, TagId};

use super::{MemoryStore, next_id};

#[async_trait]
impl TagRepository for MemoryStore {
    async fn list_all(&self) -> Result<Vec<Tag>, TagRepositoryError> {
        let state = self.lock().map_err(TagRepositoryError::query)?;
        Ok(state.tags.values().cloned().collect())
    }

    async fn find_by_id(&self, id: TagId) -> Result<Option<Tag>, TagRepositoryError> {
        let state = self.lock().map_err(TagRepositoryError::query)?;
        Ok(state.tags.get(&id).cloned())
    }

    async fn find_by_ids(&self, ids: &[TagId]) -> Result<Vec<Tag>, TagRepositoryError> {
        let state = self.lock().map_err(TagRepositoryError::query)?;
        Ok(ids.iter().filter_map(|id| state.tags.get(id)).cloned().collect())
    }
}

#[async_trait]
impl IngredientRepository for MemoryStore {
    async fn search(
        &self,
        name: Option<String>,
    ) -> Result<Vec<Ingredient>, IngredientRepositoryError> {
        let state = self.lock().map_err(IngredientRepositoryError::query)?;
        let needle = name.map(|name| name.to_lowercase());
        let mut found: Vec<Ingredient> = state
            .ingredients
            .values()
            .filter(|ingredient| {
                needle
                    .as_deref()
                    .is_none_or(|needle| ingredient.name.to_lowercase().contains(needle))
            })
            .cloned()
            .collect();
        found.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(found)
    }

    async fn find_by_id(
        &self,
        id: IngredientId,
    ) -> Result<Option<Ingredient>, IngredientRepositoryError> {
        let state = self.lock().map_err(IngredientRepositoryError::query)?;
        Ok(state.ingredients.get(&id).cloned())
    }

    async fn find_by_ids(
        &self,
        ids: &[IngredientId],
    ) -> Result<Vec<Ingredient>, IngredientRepositoryError> {
        let state = self.lock().map_err(IngredientRepositoryError::query)?;
        Ok(ids
            .iter()
            .filter_map(|id| state.ingredients.get(id))
            .cloned()
            .collect())
    }

    async fn import(
        &self,
        ingredients: &[NewIngredient],
    ) -> Result<ImportSummary, IngredientRepositoryError> {
        let mut state = self.lock().map_err(IngredientRepositoryError::query)?;
        let mut summary = ImportSummary::default();
        for candidate in ingredients {
            let exists = state.ingredients.values().any(|stored| {
                stored.name == candidate.name()
                    && stored.measurement_unit == candidate.measurement_unit()
            });
            if exists {
                summary.skipped += 1;
                continue;
            }
            let id = IngredientId::from_row(next_id(&mut state.last_ingredient_id));
            state.ingredients.insert(
                id,
                Ingredient {
                    id,
                    name: candidate.name().to_owned(),
                    measurement_unit: candidate.measurement_unit().to_owned(),
                },
            );
            summary.inserted += 1;
        }
        Ok(summary)
    }
}
