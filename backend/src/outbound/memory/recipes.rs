//! In-memory recipe, favorites and shopping cart repositories.

use std::cmp::Reverse;
use std::collections::{BTreeSet, HashSet};

use async_trait::async_trait;
use chrono::Utc;
use pagination::{Page, PageRequest};

use crate::domain::ports::{
    RecipeListRepository, RecipeListRepositoryError, RecipeRepository, RecipeRepositoryError,
};
use crate::domain::{
    IngredientAmount, NewRecipe, Recipe, RecipeChanges, RecipeFilter, RecipeId, RecipeIngredient,
    RecipeList, RecipeSummary, RecipesLimit, ShoppingListLine, TagId, UserId,
};

use super::{MemoryStore, State, StoredRecipe, next_id};

impl State {
    fn list(&self, list: RecipeList) -> &BTreeSet<(UserId, RecipeId)> {
        match list {
            RecipeList::Favorites => &self.favorites,
            RecipeList::ShoppingCart => &self.shopping_cart,
        }
    }

    fn list_mut(&mut self, list: RecipeList) -> &mut BTreeSet<(UserId, RecipeId)> {
        match list {
            RecipeList::Favorites => &mut self.favorites,
            RecipeList::ShoppingCart => &mut self.shopping_cart,
        }
    }

    fn check_references(
        &self,
        ingredients: Option<&[IngredientAmount]>,
        tags: Option<&[TagId]>,
    ) -> Result<(), RecipeRepositoryError> {
        if let Some(missing) = ingredients
            .unwrap_or_default()
            .iter()
            .find(|line| !self.ingredients.contains_key(&line.ingredient))
        {
            return Err(RecipeRepositoryError::unknown_reference(format!(
                "ingredient {} does not exist",
                missing.ingredient
            )));
        }
        if let Some(missing) = tags
            .unwrap_or_default()
            .iter()
            .find(|tag| !self.tags.contains_key(*tag))
        {
            return Err(RecipeRepositoryError::unknown_reference(format!(
                "tag {missing} does not exist"
            )));
        }
        Ok(())
    }

    fn resolve(&self, id: RecipeId, stored: &StoredRecipe) -> Result<Recipe, RecipeRepositoryError> {
        let tags = stored
            .tags
            .iter()
            .map(|tag| {
                self.tags
                    .get(tag)
                    .cloned()
                    .ok_or_else(|| RecipeRepositoryError::query(format!("tag {tag} vanished")))
            })
            .collect::<Result<_, _>>()?;
        let ingredients = stored
            .ingredients
            .iter()
            .map(|line| {
                self.ingredients
                    .get(&line.ingredient)
                    .map(|ingredient| RecipeIngredient {
                        ingredient: ingredient.clone(),
                        amount: line.amount,
                    })
                    .ok_or_else(|| {
                        RecipeRepositoryError::query(format!(
                            "ingredient {} vanished",
                            line.ingredient
                        ))
                    })
            })
            .collect::<Result<_, _>>()?;
        Ok(Recipe {
            id,
            author: stored.author,
            name: stored.name.clone(),
            text: stored.text.clone(),
            cooking_time: stored.cooking_time,
            image_path: stored.image_path.clone(),
            published_at: stored.published_at,
            tags,
            ingredients,
        })
    }

    /// Matching recipes, newest first.
    fn newest_first<'a>(
        &'a self,
        keep: impl Fn(RecipeId, &StoredRecipe) -> bool,
    ) -> Vec<(RecipeId, &'a StoredRecipe)> {
        let mut matching: Vec<_> = self
            .recipes
            .iter()
            .filter(|(id, stored)| keep(**id, *stored))
            .map(|(id, stored)| (*id, stored))
            .collect();
        matching.sort_by_key(|(id, stored)| Reverse((stored.published_at, *id)));
        matching
    }
}

#[async_trait]
impl RecipeRepository for MemoryStore {
    async fn create(&self, recipe: &NewRecipe) -> Result<RecipeId, RecipeRepositoryError> {
        let mut state = self.lock().map_err(RecipeRepositoryError::query)?;
        if !state.users.contains_key(&recipe.author) {
            return Err(RecipeRepositoryError::unknown_reference(format!(
                "author {} does not exist",
                recipe.author
            )));
        }
        state.check_references(Some(recipe.ingredients.as_slice()), Some(recipe.tags.as_slice()))?;
        let id = RecipeId::from_row(next_id(&mut state.last_recipe_id));
        state.recipes.insert(
            id,
            StoredRecipe {
                author: recipe.author,
                name: recipe.name.to_string(),
                text: recipe.text.clone(),
                cooking_time: recipe.cooking_time,
                image_path: recipe.image_path.clone(),
                published_at: Utc::now(),
                ingredients: recipe.ingredients.clone(),
                tags: recipe.tags.clone(),
            },
        );
        Ok(id)
    }

    async fn update(
        &self,
        id: RecipeId,
        changes: &RecipeChanges,
    ) -> Result<bool, RecipeRepositoryError> {
        let mut state = self.lock().map_err(RecipeRepositoryError::query)?;
        if !state.recipes.contains_key(&id) {
            return Ok(false);
        }
        state.check_references(changes.ingredients.as_deref(), changes.tags.as_deref())?;
        let Some(stored) = state.recipes.get_mut(&id) else {
            return Ok(false);
        };
        if let Some(name) = &changes.name {
            stored.name = name.to_string();
        }
        if let Some(text) = &changes.text {
            stored.text.clone_from(text);
        }
        if let Some(cooking_time) = changes.cooking_time {
            stored.cooking_time = cooking_time;
        }
        if let Some(image_path) = &changes.image_path {
            stored.image_path.clone_from(image_path);
        }
        if let Some(ingredients) = &changes.ingredients {
            stored.ingredients.clone_from(ingredients);
        }
        if let Some(tags) = &changes.tags {
            stored.tags.clone_from(tags);
        }
        Ok(true)
    }

    async fn delete(&self, id: RecipeId) -> Result<bool, RecipeRepositoryError> {
        let mut state = self.lock().map_err(RecipeRepositoryError::query)?;
        if state.recipes.remove(&id).is_none() {
            return Ok(false);
        }
        state.favorites.retain(|(_, recipe)| *recipe != id);
        state.shopping_cart.retain(|(_, recipe)| *recipe != id);
        Ok(true)
    }

    async fn find_by_id(&self, id: RecipeId) -> Result<Option<Recipe>, RecipeRepositoryError> {
        let state = self.lock().map_err(RecipeRepositoryError::query)?;
        state
            .recipes
            .get(&id)
            .map(|stored| state.resolve(id, stored))
            .transpose()
    }

    async fn list(
        &self,
        filter: &RecipeFilter,
        page: PageRequest,
    ) -> Result<Page<Recipe>, RecipeRepositoryError> {
        let state = self.lock().map_err(RecipeRepositoryError::query)?;
        let wanted_tags: HashSet<TagId> = state
            .tags
            .values()
            .filter(|tag| filter.tags.contains(&tag.slug))
            .map(|tag| tag.id)
            .collect();
        let matching = state.newest_first(|id, stored| {
            filter.author.is_none_or(|author| stored.author == author)
                && (filter.tags.is_empty()
                    || stored.tags.iter().any(|tag| wanted_tags.contains(tag)))
                && filter
                    .favorited_by
                    .is_none_or(|user| state.favorites.contains(&(user, id)))
                && filter
                    .in_cart_of
                    .is_none_or(|user| state.shopping_cart.contains(&(user, id)))
        });
        let total = matching.len() as u64;
        let offset = usize::try_from(page.offset()).unwrap_or(usize::MAX);
        let items = matching
            .into_iter()
            .skip(offset)
            .take(page.limit() as usize)
            .map(|(id, stored)| state.resolve(id, stored))
            .collect::<Result<_, _>>()?;
        Ok(Page::new(items, total))
    }

    async fn summaries_by_author(
        &self,
        author: UserId,
        limit: RecipesLimit,
    ) -> Result<(Vec<RecipeSummary>, u64), RecipeRepositoryError> {
        let state = self.lock().map_err(RecipeRepositoryError::query)?;
        let recipes = state.newest_first(|_, stored| stored.author == author);
        let total = recipes.len() as u64;
        let take = limit.get().map_or(usize::MAX, |limit| limit as usize);
        let summaries = recipes
            .into_iter()
            .take(take)
            .map(|(id, stored)| RecipeSummary {
                id,
                name: stored.name.clone(),
                image_path: stored.image_path.clone(),
                cooking_time: stored.cooking_time,
            })
            .collect();
        Ok((summaries, total))
    }

    async fn shopping_list_lines(
        &self,
        user: UserId,
    ) -> Result<Vec<ShoppingListLine>, RecipeRepositoryError> {
        let state = self.lock().map_err(RecipeRepositoryError::query)?;
        let mut lines = Vec::new();
        for (_, recipe) in state.shopping_cart.iter().filter(|(owner, _)| *owner == user) {
            let Some(stored) = state.recipes.get(recipe) else {
                continue;
            };
            for line in &stored.ingredients {
                let ingredient = state.ingredients.get(&line.ingredient).ok_or_else(|| {
                    RecipeRepositoryError::query(format!(
                        "ingredient {} vanished",
                        line.ingredient
                    ))
                })?;
                lines.push(ShoppingListLine {
                    ingredient: ingredient.id,
                    name: ingredient.name.clone(),
                    measurement_unit: ingredient.measurement_unit.clone(),
                    amount: line.amount.get(),
                });
            }
        }
        Ok(lines)
    }
}

#[async_trait]
impl RecipeListRepository for MemoryStore {
    async fn add(
        &self,
        list: RecipeList,
        user: UserId,
        recipe: RecipeId,
    ) -> Result<bool, RecipeListRepositoryError> {
        let mut state = self.lock().map_err(RecipeListRepositoryError::query)?;
        if !state.recipes.contains_key(&recipe) {
            return Err(RecipeListRepositoryError::missing_recipe(recipe));
        }
        Ok(state.list_mut(list).insert((user, recipe)))
    }

    async fn remove(
        &self,
        list: RecipeList,
        user: UserId,
        recipe: RecipeId,
    ) -> Result<bool, RecipeListRepositoryError> {
        let mut state = self.lock().map_err(RecipeListRepositoryError::query)?;
        Ok(state.list_mut(list).remove(&(user, recipe)))
    }

    async fn contained(
        &self,
        list: RecipeList,
        user: UserId,
        recipes: &[RecipeId],
    ) -> Result<HashSet<RecipeId>, RecipeListRepositoryError> {
        let state = self.lock().map_err(RecipeListRepositoryError::query)?;
        let entries = state.list(list);
        Ok(recipes
            .iter()
            .copied()
            .filter(|recipe| entries.contains(&(user, *recipe)))
            .collect())
    }
}

#[cfg(test)]
#[path = "recipes_tests.rs"]
mod tests;
