//! PostgreSQL-backed tag and ingredient adapters.
//!
//! Tags are read-only at runtime. Ingredients are searched by name and
//! bulk-imported by the `load-ingredients` tool.

use async_trait::async_trait;
use diesel::expression_methods::PgTextExpressionMethods;
use diesel::prelude::*;
use diesel_async::AsyncConnection as _;
use diesel_async::RunQueryDsl;
use diesel_async::scoped_futures::ScopedFutureExt as _;

use crate::domain::ports::{
    IngredientRepository, IngredientRepositoryError, TagRepository, TagRepositoryError,
};
use crate::domain::{ImportSummary, Ingredient, IngredientId, NewIngredient, Tag, TagId};

use super::diesel_helpers::{map_diesel_error, map_pool_error};
use super::models::{IngredientRow, NewIngredientRow, TagRow};
use super::pool::DbPool;
use super::schema::{ingredients, tags};

/// Rows per `INSERT` during imports, well below PostgreSQL's bind limit.
const IMPORT_CHUNK: usize = 1000;

/// Diesel-backed implementation of the [`TagRepository`] port.
#[derive(Clone)]
pub struct DieselTagRepository {
    pool: DbPool,
}

impl DieselTagRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn rows_to_tags(rows: Vec<TagRow>) -> Result<Vec<Tag>, TagRepositoryError> {
    rows.into_iter()
        .map(|row| Tag::try_from(row).map_err(TagRepositoryError::query))
        .collect()
}

#[async_trait]
impl TagRepository for DieselTagRepository {
    async fn list_all(&self) -> Result<Vec<Tag>, TagRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<TagRow> = tags::table
            .select(TagRow::as_select())
            .order_by(tags::id)
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows_to_tags(rows)
    }

    async fn find_by_id(&self, id: TagId) -> Result<Option<Tag>, TagRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<TagRow> = tags::table
            .find(id.get())
            .select(TagRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(|row| Tag::try_from(row).map_err(TagRepositoryError::query))
            .transpose()
    }

    async fn find_by_ids(&self, ids: &[TagId]) -> Result<Vec<Tag>, TagRepositoryError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let keys: Vec<i64> = ids.iter().map(|id| id.get()).collect();
        let rows: Vec<TagRow> = tags::table
            .filter(tags::id.eq_any(&keys))
            .select(TagRow::as_select())
            .order_by(tags::id)
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows_to_tags(rows)
    }
}

/// Diesel-backed implementation of the [`IngredientRepository`] port.
#[derive(Clone)]
pub struct DieselIngredientRepository {
    pool: DbPool,
}

impl DieselIngredientRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Escape `LIKE` wildcards so user input matches literally.
fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

#[async_trait]
impl IngredientRepository for DieselIngredientRepository {
    async fn search(
        &self,
        name: Option<String>,
    ) -> Result<Vec<Ingredient>, IngredientRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let mut query = ingredients::table
            .select(IngredientRow::as_select())
            .order_by((ingredients::name, ingredients::id))
            .into_boxed();
        if let Some(name) = name {
            query = query.filter(ingredients::name.ilike(format!("%{}%", escape_like(&name))));
        }
        let rows: Vec<IngredientRow> = query
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(Ingredient::from).collect())
    }

    async fn find_by_id(
        &self,
        id: IngredientId,
    ) -> Result<Option<Ingredient>, IngredientRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<IngredientRow> = ingredients::table
            .find(id.get())
            .select(IngredientRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(Ingredient::from))
    }

    async fn find_by_ids(
        &self,
        ids: &[IngredientId],
    ) -> Result<Vec<Ingredient>, IngredientRepositoryError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let keys: Vec<i64> = ids.iter().map(|id| id.get()).collect();
        let rows: Vec<IngredientRow> = ingredients::table
            .filter(ingredients::id.eq_any(&keys))
            .select(IngredientRow::as_select())
            .order_by(ingredients::id)
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(Ingredient::from).collect())
    }

    async fn import(
        &self,
        candidates: &[NewIngredient],
    ) -> Result<ImportSummary, IngredientRepositoryError> {
        let rows: Vec<NewIngredientRow<'_>> = candidates
            .iter()
            .map(|candidate| NewIngredientRow {
                name: candidate.name(),
                measurement_unit: candidate.measurement_unit(),
            })
            .collect();
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let inserted = conn
            .transaction(|conn| {
                async move {
                    let mut inserted = 0;
                    for chunk in rows.chunks(IMPORT_CHUNK) {
                        inserted += diesel::insert_into(ingredients::table)
                            .values(chunk)
                            .on_conflict((ingredients::name, ingredients::measurement_unit))
                            .do_nothing()
                            .execute(conn)
                            .await?;
                    }
                    Ok::<_, diesel::result::Error>(inserted)
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;

        Ok(ImportSummary {
            inserted,
            skipped: candidates.len().saturating_sub(inserted),
        })
    }
}
