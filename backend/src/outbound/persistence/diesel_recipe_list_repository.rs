//! PostgreSQL-backed favorites and shopping cart adapter.
//!
//! Both lists share a shape (`user_id`, `recipe_id`, `created_at`) with the
//! pair as primary key, so inserts use `ON CONFLICT DO NOTHING` and report
//! whether a row was actually added.

use std::collections::HashSet;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::result::Error as DieselError;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{RecipeListRepository, RecipeListRepositoryError};
use crate::domain::{RecipeId, RecipeList, UserId};

use super::diesel_helpers::{ViolationKind, map_diesel_error, map_pool_error, violated_constraint};
use super::pool::DbPool;
use super::schema::{favorites, shopping_cart_items};

/// Run `$body` with `$table` bound to the schema module backing `$list`.
macro_rules! for_list {
    ($list:expr, $table:ident => $body:expr) => {
        match $list {
            RecipeList::Favorites => {
                use favorites as $table;
                $body
            }
            RecipeList::ShoppingCart => {
                use shopping_cart_items as $table;
                $body
            }
        }
    };
}

/// Diesel-backed implementation of the [`RecipeListRepository`] port.
#[derive(Clone)]
pub struct DieselRecipeListRepository {
    pool: DbPool,
}

impl DieselRecipeListRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_add_error(error: DieselError, recipe: RecipeId) -> RecipeListRepositoryError {
    if violated_constraint(&error, ViolationKind::ForeignKey).is_some() {
        return RecipeListRepositoryError::missing_recipe(recipe);
    }
    map_diesel_error(error)
}

#[async_trait]
impl RecipeListRepository for DieselRecipeListRepository {
    async fn add(
        &self,
        list: RecipeList,
        user: UserId,
        recipe: RecipeId,
    ) -> Result<bool, RecipeListRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let inserted = for_list!(list, entries => {
            diesel::insert_into(entries::table)
                .values((
                    entries::user_id.eq(user.get()),
                    entries::recipe_id.eq(recipe.get()),
                ))
                .on_conflict_do_nothing()
                .execute(&mut conn)
                .await
        })
        .map_err(|err| map_add_error(err, recipe))?;
        Ok(inserted > 0)
    }

    async fn remove(
        &self,
        list: RecipeList,
        user: UserId,
        recipe: RecipeId,
    ) -> Result<bool, RecipeListRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let removed = for_list!(list, entries => {
            diesel::delete(entries::table.find((user.get(), recipe.get())))
                .execute(&mut conn)
                .await
        })
        .map_err(map_diesel_error)?;
        Ok(removed > 0)
    }

    async fn contained(
        &self,
        list: RecipeList,
        user: UserId,
        recipes: &[RecipeId],
    ) -> Result<HashSet<RecipeId>, RecipeListRepositoryError> {
        if recipes.is_empty() {
            return Ok(HashSet::new());
        }
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let keys: Vec<i64> = recipes.iter().map(|id| id.get()).collect();
        let found: Vec<i64> = for_list!(list, entries => {
            entries::table
                .filter(entries::user_id.eq(user.get()))
                .filter(entries::recipe_id.eq_any(&keys))
                .select(entries::recipe_id)
                .load(&mut conn)
                .await
        })
        .map_err(map_diesel_error)?;
        Ok(found.into_iter().map(RecipeId::from_row).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outbound::persistence::diesel_helpers::stub_database_error;
    use diesel::result::DatabaseErrorKind;
    use rstest::rstest;

    #[rstest]
    fn vanished_recipes_are_reported_as_missing() {
        let recipe = RecipeId::from_row(42);
        let error = stub_database_error(
            DatabaseErrorKind::ForeignKeyViolation,
            Some("favorites_recipe_id_fkey"),
        );
        assert_eq!(
            map_add_error(error, recipe),
            RecipeListRepositoryError::missing_recipe(recipe)
        );
    }

    #[rstest]
    fn other_failures_keep_the_generic_mapping() {
        let error = stub_database_error(DatabaseErrorKind::ClosedConnection, None);
        assert_eq!(
            map_add_error(error, RecipeId::from_row(1)),
            RecipeListRepositoryError::connection("database connection error")
        );
    }
}
