//! PostgreSQL-backed `RecipeRepository` implementation using Diesel ORM.
//!
//! A recipe spans three tables: the `recipes` row, its ordered
//! `recipe_ingredients` lines and its ordered `recipe_tags` links. Writes
//! touching more than one of them run inside a single transaction, and reads
//! load the child rows for a whole page in two batched queries.

use std::collections::HashMap;

use async_trait::async_trait;
use diesel::dsl::exists;
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel::result::Error as DieselError;
use diesel_async::AsyncConnection as _;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use pagination::{Page, PageRequest};
use tracing::warn;

use crate::domain::ports::{RecipeRepository, RecipeRepositoryError};
use crate::domain::{
    Amount, IngredientAmount, IngredientId, NewRecipe, Recipe, RecipeChanges, RecipeFilter,
    RecipeId, RecipeIngredient, RecipeSummary, RecipesLimit, ShoppingListLine, Tag, TagId, UserId,
};

use super::diesel_helpers::{
    ViolationKind, count_to_u64, map_diesel_error, map_pool_error, page_offset,
    violated_constraint,
};
use super::models::{
    IngredientRow, NewRecipeIngredientRow, NewRecipeRow, NewRecipeTagRow, RecipeChangeset,
    RecipeRow, RecipeSummaryRow, TagRow, to_db_int,
};
use super::pool::DbPool;
use super::schema::{
    favorites, ingredients, recipe_ingredients, recipe_tags, recipes, shopping_cart_items, tags,
};

/// Diesel-backed implementation of the [`RecipeRepository`] port.
#[derive(Clone)]
pub struct DieselRecipeRepository {
    pool: DbPool,
}

impl DieselRecipeRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Map write failures, surfacing foreign-key violations as unknown references.
fn map_write_error(error: DieselError) -> RecipeRepositoryError {
    match violated_constraint(&error, ViolationKind::ForeignKey) {
        Some(constraint) => {
            warn!(constraint, "recipe write referenced a missing row");
            RecipeRepositoryError::unknown_reference(describe_reference(constraint))
        }
        None => map_diesel_error(error),
    }
}

fn describe_reference(constraint: &str) -> &'static str {
    if constraint.contains("ingredient") {
        "an ingredient does not exist"
    } else if constraint.contains("tag") {
        "a tag does not exist"
    } else if constraint.contains("author") {
        "the author does not exist"
    } else {
        "a referenced row does not exist"
    }
}

async fn insert_lines(
    conn: &mut AsyncPgConnection,
    recipe_id: i64,
    lines: &[IngredientAmount],
) -> QueryResult<()> {
    let rows: Vec<NewRecipeIngredientRow> = (0_i32..)
        .zip(lines)
        .map(|(position, line)| NewRecipeIngredientRow {
            recipe_id,
            ingredient_id: line.ingredient.get(),
            amount: to_db_int(line.amount.get()),
            position,
        })
        .collect();
    diesel::insert_into(recipe_ingredients::table)
        .values(&rows)
        .execute(conn)
        .await?;
    Ok(())
}

async fn insert_tags(
    conn: &mut AsyncPgConnection,
    recipe_id: i64,
    tag_ids: &[TagId],
) -> QueryResult<()> {
    let rows: Vec<NewRecipeTagRow> = (0_i32..)
        .zip(tag_ids)
        .map(|(position, tag)| NewRecipeTagRow {
            recipe_id,
            tag_id: tag.get(),
            position,
        })
        .collect();
    diesel::insert_into(recipe_tags::table)
        .values(&rows)
        .execute(conn)
        .await?;
    Ok(())
}

/// Recipes matching `filter`. Built twice per listing: once to count and
/// once to fetch the page.
fn filtered(filter: &RecipeFilter) -> recipes::BoxedQuery<'static, Pg> {
    let mut query = recipes::table.into_boxed();
    if let Some(author) = filter.author {
        query = query.filter(recipes::author_id.eq(author.get()));
    }
    if !filter.tags.is_empty() {
        let slugs: Vec<String> = filter.tags.iter().map(ToString::to_string).collect();
        query = query.filter(
            recipes::id.eq_any(
                recipe_tags::table
                    .inner_join(tags::table)
                    .filter(tags::slug.eq_any(slugs))
                    .select(recipe_tags::recipe_id),
            ),
        );
    }
    if let Some(user) = filter.favorited_by {
        query = query.filter(
            recipes::id.eq_any(
                favorites::table
                    .filter(favorites::user_id.eq(user.get()))
                    .select(favorites::recipe_id),
            ),
        );
    }
    if let Some(user) = filter.in_cart_of {
        query = query.filter(
            recipes::id.eq_any(
                shopping_cart_items::table
                    .filter(shopping_cart_items::user_id.eq(user.get()))
                    .select(shopping_cart_items::recipe_id),
            ),
        );
    }
    query
}

/// Load tags and ingredient lines for `rows` and assemble domain recipes,
/// preserving the order of `rows`.
async fn assemble(
    conn: &mut AsyncPgConnection,
    rows: Vec<RecipeRow>,
) -> Result<Vec<Recipe>, RecipeRepositoryError> {
    if rows.is_empty() {
        return Ok(Vec::new());
    }
    let ids: Vec<i64> = rows.iter().map(|row| row.id).collect();

    let tag_rows: Vec<(i64, TagRow)> = recipe_tags::table
        .inner_join(tags::table)
        .filter(recipe_tags::recipe_id.eq_any(&ids))
        .order_by((recipe_tags::recipe_id, recipe_tags::position))
        .select((recipe_tags::recipe_id, TagRow::as_select()))
        .load(conn)
        .await
        .map_err(map_diesel_error)?;
    let line_rows: Vec<(i64, i32, IngredientRow)> = recipe_ingredients::table
        .inner_join(ingredients::table)
        .filter(recipe_ingredients::recipe_id.eq_any(&ids))
        .order_by((recipe_ingredients::recipe_id, recipe_ingredients::position))
        .select((
            recipe_ingredients::recipe_id,
            recipe_ingredients::amount,
            IngredientRow::as_select(),
        ))
        .load(conn)
        .await
        .map_err(map_diesel_error)?;

    let mut tags_by_recipe: HashMap<i64, Vec<Tag>> = HashMap::new();
    for (recipe_id, row) in tag_rows {
        let tag = Tag::try_from(row).map_err(RecipeRepositoryError::query)?;
        tags_by_recipe.entry(recipe_id).or_default().push(tag);
    }
    let mut lines_by_recipe: HashMap<i64, Vec<RecipeIngredient>> = HashMap::new();
    for (recipe_id, amount, row) in line_rows {
        let amount = Amount::new(i64::from(amount)).ok_or_else(|| {
            RecipeRepositoryError::query(format!(
                "stored recipe {recipe_id} has invalid amount {amount}"
            ))
        })?;
        lines_by_recipe
            .entry(recipe_id)
            .or_default()
            .push(RecipeIngredient {
                ingredient: row.into(),
                amount,
            });
    }

    rows.into_iter()
        .map(|row| {
            let cooking_time = row.cooking_time().map_err(RecipeRepositoryError::query)?;
            Ok(Recipe {
                id: RecipeId::from_row(row.id),
                author: UserId::from_row(row.author_id),
                name: row.name,
                text: row.text,
                cooking_time,
                image_path: row.image_path,
                published_at: row.published_at,
                tags: tags_by_recipe.remove(&row.id).unwrap_or_default(),
                ingredients: lines_by_recipe.remove(&row.id).unwrap_or_default(),
            })
        })
        .collect()
}

#[async_trait]
impl RecipeRepository for DieselRecipeRepository {
    async fn create(&self, recipe: &NewRecipe) -> Result<RecipeId, RecipeRepositoryError> {
        let row = NewRecipeRow {
            author_id: recipe.author.get(),
            name: recipe.name.as_ref(),
            text: recipe.text.as_str(),
            cooking_time: to_db_int(recipe.cooking_time.minutes()),
            image_path: recipe.image_path.as_str(),
        };
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let id = conn
            .transaction(|conn| {
                async move {
                    let id: i64 = diesel::insert_into(recipes::table)
                        .values(&row)
                        .returning(recipes::id)
                        .get_result(conn)
                        .await?;
                    insert_lines(conn, id, &recipe.ingredients).await?;
                    insert_tags(conn, id, &recipe.tags).await?;
                    Ok::<_, DieselError>(id)
                }
                .scope_boxed()
            })
            .await
            .map_err(map_write_error)?;
        Ok(RecipeId::from_row(id))
    }

    async fn update(
        &self,
        id: RecipeId,
        changes: &RecipeChanges,
    ) -> Result<bool, RecipeRepositoryError> {
        let changeset = RecipeChangeset {
            name: changes.name.as_ref().map(|name| name.as_ref()),
            text: changes.text.as_deref(),
            cooking_time: changes
                .cooking_time
                .map(|time| to_db_int(time.minutes())),
            image_path: changes.image_path.as_deref(),
        };
        let key = id.get();
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        conn.transaction(|conn| {
            async move {
                let found: bool = diesel::select(exists(recipes::table.find(key)))
                    .get_result(conn)
                    .await?;
                if !found {
                    return Ok(false);
                }
                if !changeset.is_empty() {
                    diesel::update(recipes::table.find(key))
                        .set(&changeset)
                        .execute(conn)
                        .await?;
                }
                if let Some(lines) = &changes.ingredients {
                    diesel::delete(
                        recipe_ingredients::table.filter(recipe_ingredients::recipe_id.eq(key)),
                    )
                    .execute(conn)
                    .await?;
                    insert_lines(conn, key, lines).await?;
                }
                if let Some(tag_ids) = &changes.tags {
                    diesel::delete(recipe_tags::table.filter(recipe_tags::recipe_id.eq(key)))
                        .execute(conn)
                        .await?;
                    insert_tags(conn, key, tag_ids).await?;
                }
                Ok::<_, DieselError>(true)
            }
            .scope_boxed()
        })
        .await
        .map_err(map_write_error)
    }

    async fn delete(&self, id: RecipeId) -> Result<bool, RecipeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        // Ingredient lines, tag links, favorites and cart entries cascade.
        let deleted = diesel::delete(recipes::table.find(id.get()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(deleted > 0)
    }

    async fn find_by_id(&self, id: RecipeId) -> Result<Option<Recipe>, RecipeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<RecipeRow> = recipes::table
            .find(id.get())
            .select(RecipeRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        let Some(row) = row else {
            return Ok(None);
        };
        Ok(assemble(&mut conn, vec![row]).await?.pop())
    }

    async fn list(
        &self,
        filter: &RecipeFilter,
        page: PageRequest,
    ) -> Result<Page<Recipe>, RecipeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let total: i64 = filtered(filter)
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let rows: Vec<RecipeRow> = filtered(filter)
            .select(RecipeRow::as_select())
            .order_by((recipes::published_at.desc(), recipes::id.desc()))
            .limit(i64::from(page.limit()))
            .offset(page_offset(page))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let items = assemble(&mut conn, rows).await?;
        Ok(Page::new(items, count_to_u64(total)))
    }

    async fn summaries_by_author(
        &self,
        author: UserId,
        limit: RecipesLimit,
    ) -> Result<(Vec<RecipeSummary>, u64), RecipeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let total: i64 = recipes::table
            .filter(recipes::author_id.eq(author.get()))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let mut query = recipes::table
            .filter(recipes::author_id.eq(author.get()))
            .select(RecipeSummaryRow::as_select())
            .order_by((recipes::published_at.desc(), recipes::id.desc()))
            .into_boxed();
        if let Some(limit) = limit.get() {
            query = query.limit(i64::from(limit));
        }
        let rows: Vec<RecipeSummaryRow> = query
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let summaries = rows
            .into_iter()
            .map(|row| RecipeSummary::try_from(row).map_err(RecipeRepositoryError::query))
            .collect::<Result<_, _>>()?;
        Ok((summaries, count_to_u64(total)))
    }

    async fn shopping_list_lines(
        &self,
        user: UserId,
    ) -> Result<Vec<ShoppingListLine>, RecipeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<(i32, IngredientRow)> = recipe_ingredients::table
            .inner_join(ingredients::table)
            .filter(
                recipe_ingredients::recipe_id.eq_any(
                    shopping_cart_items::table
                        .filter(shopping_cart_items::user_id.eq(user.get()))
                        .select(shopping_cart_items::recipe_id),
                ),
            )
            .order_by((
                recipe_ingredients::recipe_id,
                recipe_ingredients::position,
            ))
            .select((recipe_ingredients::amount, IngredientRow::as_select()))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter()
            .map(|(amount, row)| shopping_list_line(amount, row))
            .collect()
    }
}

fn shopping_list_line(
    amount: i32,
    row: IngredientRow,
) -> Result<ShoppingListLine, RecipeRepositoryError> {
    let amount = u32::try_from(amount).map_err(|_| {
        RecipeRepositoryError::query(format!(
            "stored ingredient {} has invalid amount {amount}",
            row.id
        ))
    })?;
    Ok(ShoppingListLine {
        ingredient: IngredientId::from_row(row.id),
        name: row.name,
        measurement_unit: row.measurement_unit,
        amount,
    })
}
