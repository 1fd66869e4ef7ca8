//! Recipe services: publishing, editing, favorites, the cart and the
//! shopping list.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use pagination::{Page, PageRequest};
use serde_json::json;
use tracing::warn;

use crate::domain::ports::{
    ImageStore, IngredientRepository, RecipeListRepository, RecipeRepository, RecipesCommand,
    RecipesQuery, SubscriptionRepository, TagRepository, UserRepository,
};
use crate::domain::users_service::profiles_for;
use crate::domain::{
    Error, IngredientAmount, NewRecipe, Recipe, RecipeChanges, RecipeDraft, RecipeFilter,
    RecipeId, RecipeList, RecipePatch, RecipeSummary, RecipeView, ShoppingList, TagId, UserId,
};

/// Driven ports the recipe service depends on.
#[derive(Clone)]
pub struct RecipeAdapters {
    pub recipes: Arc<dyn RecipeRepository>,
    pub lists: Arc<dyn RecipeListRepository>,
    pub users: Arc<dyn UserRepository>,
    pub subscriptions: Arc<dyn SubscriptionRepository>,
    pub tags: Arc<dyn TagRepository>,
    pub ingredients: Arc<dyn IngredientRepository>,
    pub images: Arc<dyn ImageStore>,
}

/// Service implementing [`RecipesCommand`] and [`RecipesQuery`].
#[derive(Clone)]
pub struct RecipesService {
    adapters: RecipeAdapters,
}

impl RecipesService {
    /// Create a new service over the given adapters.
    pub fn new(adapters: RecipeAdapters) -> Self {
        Self { adapters }
    }

    async fn load(&self, id: RecipeId) -> Result<Recipe, Error> {
        self.adapters
            .recipes
            .find_by_id(id)
            .await?
            .ok_or_else(|| Error::not_found(format!("recipe {id} not found")))
    }

    async fn ensure_can_modify(&self, actor: UserId, recipe: &Recipe) -> Result<(), Error> {
        if recipe.author == actor {
            return Ok(());
        }
        let is_admin = self
            .adapters
            .users
            .find_by_id(actor)
            .await?
            .is_some_and(|user| user.is_admin());
        if is_admin {
            Ok(())
        } else {
            Err(Error::forbidden(
                "only the author or an administrator may modify this recipe",
            ))
        }
    }

    async fn check_references(
        &self,
        ingredients: Option<&[IngredientAmount]>,
        tags: Option<&[TagId]>,
    ) -> Result<(), Error> {
        if let Some(lines) = ingredients {
            let ids: Vec<_> = lines.iter().map(|line| line.ingredient).collect();
            let found: HashSet<_> = self
                .adapters
                .ingredients
                .find_by_ids(&ids)
                .await?
                .into_iter()
                .map(|ingredient| ingredient.id)
                .collect();
            if let Some((index, id)) = ids.iter().enumerate().find(|(_, id)| !found.contains(*id)) {
                return Err(unknown_reference("ingredients", index, id.get()));
            }
        }
        if let Some(ids) = tags {
            let found: HashSet<_> = self
                .adapters
                .tags
                .find_by_ids(ids)
                .await?
                .into_iter()
                .map(|tag| tag.id)
                .collect();
            if let Some((index, id)) = ids.iter().enumerate().find(|(_, id)| !found.contains(*id)) {
                return Err(unknown_reference("tags", index, id.get()));
            }
        }
        Ok(())
    }

    async fn remove_image(&self, path: &str) {
        if let Err(error) = self.adapters.images.remove(path).await {
            warn!(%error, path, "failed to remove recipe image");
        }
    }

    async fn views(&self, viewer: Option<UserId>, recipes: Vec<Recipe>) -> Result<Vec<RecipeView>, Error> {
        if recipes.is_empty() {
            return Ok(Vec::new());
        }
        let mut author_ids: Vec<UserId> = recipes.iter().map(|recipe| recipe.author).collect();
        author_ids.sort_unstable();
        author_ids.dedup();
        let authors = self.adapters.users.find_by_ids(&author_ids).await?;
        let profiles: HashMap<UserId, _> =
            profiles_for(self.adapters.subscriptions.as_ref(), viewer, authors)
                .await?
                .into_iter()
                .map(|profile| (profile.user.id(), profile))
                .collect();

        let recipe_ids: Vec<RecipeId> = recipes.iter().map(|recipe| recipe.id).collect();
        let (favorites, cart) = match viewer {
            Some(user) => (
                self.adapters
                    .lists
                    .contained(RecipeList::Favorites, user, &recipe_ids)
                    .await?,
                self.adapters
                    .lists
                    .contained(RecipeList::ShoppingCart, user, &recipe_ids)
                    .await?,
            ),
            None => (HashSet::new(), HashSet::new()),
        };

        recipes
            .into_iter()
            .map(|recipe| {
                let author = match profiles.get(&recipe.author) {
                    Some(profile) => profile.clone(),
                    None => {
                        return Err(Error::internal(format!(
                            "author {} of recipe {} is missing",
                            recipe.author, recipe.id
                        )));
                    }
                };
                Ok(RecipeView {
                    is_favorited: favorites.contains(&recipe.id),
                    is_in_shopping_cart: cart.contains(&recipe.id),
                    author,
                    recipe,
                })
            })
            .collect()
    }

    async fn view(&self, viewer: Option<UserId>, recipe: Recipe) -> Result<RecipeView, Error> {
        self.views(viewer, vec![recipe])
            .await?
            .pop()
            .ok_or_else(|| Error::internal("recipe view lookup returned no rows"))
    }
}

fn unknown_reference(field: &str, index: usize, id: i64) -> Error {
    let noun = if field == "tags" { "tag" } else { "ingredient" };
    Error::invalid_request(format!("{noun} {id} does not exist")).with_details(json!({
        "field": field,
        "code": "unknown",
        "index": index,
        "value": id,
    }))
}

#[async_trait]
impl RecipesCommand for RecipesService {
    async fn create(&self, author: UserId, draft: RecipeDraft) -> Result<RecipeView, Error> {
        self.check_references(Some(draft.ingredients.as_slice()), Some(draft.tags.as_slice()))
            .await?;
        let RecipeDraft {
            name,
            text,
            cooking_time,
            image,
            ingredients,
            tags,
        } = draft;
        let image_path = self.adapters.images.store(&image).await?;
        let new_recipe = NewRecipe {
            author,
            name,
            text,
            cooking_time,
            image_path,
            ingredients,
            tags,
        };
        let id = match self.adapters.recipes.create(&new_recipe).await {
            Ok(id) => id,
            Err(error) => {
                self.remove_image(&new_recipe.image_path).await;
                return Err(error.into());
            }
        };
        let recipe = self.load(id).await?;
        self.view(Some(author), recipe).await
    }

    async fn update(
        &self,
        actor: UserId,
        id: RecipeId,
        patch: RecipePatch,
    ) -> Result<RecipeView, Error> {
        let existing = self.load(id).await?;
        self.ensure_can_modify(actor, &existing).await?;
        self.check_references(patch.ingredients.as_deref(), patch.tags.as_deref())
            .await?;

        let RecipePatch {
            name,
            text,
            cooking_time,
            image,
            ingredients,
            tags,
        } = patch;
        let image_path = match image {
            Some(upload) => Some(self.adapters.images.store(&upload).await?),
            None => None,
        };
        let changes = RecipeChanges {
            name,
            text,
            cooking_time,
            image_path,
            ingredients,
            tags,
        };
        let updated = match self.adapters.recipes.update(id, &changes).await {
            Ok(updated) => updated,
            Err(error) => {
                if let Some(path) = &changes.image_path {
                    self.remove_image(path).await;
                }
                return Err(error.into());
            }
        };
        if !updated {
            return Err(Error::not_found(format!("recipe {id} not found")));
        }
        if changes.image_path.is_some() {
            self.remove_image(&existing.image_path).await;
        }
        let recipe = self.load(id).await?;
        self.view(Some(actor), recipe).await
    }

    async fn delete(&self, actor: UserId, id: RecipeId) -> Result<(), Error> {
        let existing = self.load(id).await?;
        self.ensure_can_modify(actor, &existing).await?;
        if !self.adapters.recipes.delete(id).await? {
            return Err(Error::not_found(format!("recipe {id} not found")));
        }
        self.remove_image(&existing.image_path).await;
        Ok(())
    }

    async fn add_to_list(
        &self,
        user: UserId,
        list: RecipeList,
        id: RecipeId,
    ) -> Result<RecipeSummary, Error> {
        let recipe = self.load(id).await?;
        if self.adapters.lists.add(list, user, id).await? {
            Ok(recipe.summary())
        } else {
            Err(
                Error::invalid_request(format!("recipe {id} is already in the {list}"))
                    .with_details(json!({ "field": "id", "code": "duplicate" })),
            )
        }
    }

    async fn remove_from_list(
        &self,
        user: UserId,
        list: RecipeList,
        id: RecipeId,
    ) -> Result<(), Error> {
        self.load(id).await?;
        if self.adapters.lists.remove(list, user, id).await? {
            Ok(())
        } else {
            Err(Error::not_found(format!("recipe {id} is not in the {list}")))
        }
    }
}

#[async_trait]
impl RecipesQuery for RecipesService {
    async fn list(
        &self,
        viewer: Option<UserId>,
        filter: RecipeFilter,
        page: PageRequest,
    ) -> Result<Page<RecipeView>, Error> {
        let Page { items, total } = self.adapters.recipes.list(&filter, page).await?;
        let views = self.views(viewer, items).await?;
        Ok(Page::new(views, total))
    }

    async fn get(&self, viewer: Option<UserId>, id: RecipeId) -> Result<RecipeView, Error> {
        let recipe = self.load(id).await?;
        self.view(viewer, recipe).await
    }

    async fn shopping_list(&self, user: UserId) -> Result<ShoppingList, Error> {
        let lines = self.adapters.recipes.shopping_list_lines(user).await?;
        Ok(ShoppingList::aggregate(lines))
    }
}

#[cfg(test)]
#[path = "recipes_service_tests.rs"]
mod tests;
