//! PostgreSQL-backed `SubscriptionRepository` implementation.
//!
//! `subscriptions` has two foreign keys into `users`, so author lookups use
//! sub-selects instead of a Diesel join.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::result::Error as DieselError;
use diesel_async::RunQueryDsl;
use pagination::{Page, PageRequest};

use crate::domain::ports::{SubscriptionRepository, SubscriptionRepositoryError};
use crate::domain::{User, UserId};

use super::diesel_helpers::{
    ViolationKind, count_to_u64, map_diesel_error, map_pool_error, page_offset,
    violated_constraint,
};
use super::models::UserRow;
use super::pool::DbPool;
use super::schema::{subscriptions, users};

/// Diesel-backed implementation of the [`SubscriptionRepository`] port.
#[derive(Clone)]
pub struct DieselSubscriptionRepository {
    pool: DbPool,
}

impl DieselSubscriptionRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_subscribe_error(error: DieselError) -> SubscriptionRepositoryError {
    if violated_constraint(&error, ViolationKind::Check).is_some() {
        return SubscriptionRepositoryError::self_subscription();
    }
    if violated_constraint(&error, ViolationKind::ForeignKey).is_some() {
        return SubscriptionRepositoryError::query("subscription references a missing user");
    }
    map_diesel_error(error)
}

#[async_trait]
impl SubscriptionRepository for DieselSubscriptionRepository {
    async fn subscribe(
        &self,
        user: UserId,
        author: UserId,
    ) -> Result<bool, SubscriptionRepositoryError> {
        if user == author {
            return Err(SubscriptionRepositoryError::self_subscription());
        }
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let inserted = diesel::insert_into(subscriptions::table)
            .values((
                subscriptions::user_id.eq(user.get()),
                subscriptions::author_id.eq(author.get()),
            ))
            .on_conflict_do_nothing()
            .execute(&mut conn)
            .await
            .map_err(map_subscribe_error)?;
        Ok(inserted > 0)
    }

    async fn unsubscribe(
        &self,
        user: UserId,
        author: UserId,
    ) -> Result<bool, SubscriptionRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let removed = diesel::delete(subscriptions::table.find((user.get(), author.get())))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(removed > 0)
    }

    async fn followed_among(
        &self,
        user: UserId,
        authors: &[UserId],
    ) -> Result<HashSet<UserId>, SubscriptionRepositoryError> {
        if authors.is_empty() {
            return Ok(HashSet::new());
        }
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let keys: Vec<i64> = authors.iter().map(|id| id.get()).collect();
        let followed: Vec<i64> = subscriptions::table
            .filter(subscriptions::user_id.eq(user.get()))
            .filter(subscriptions::author_id.eq_any(&keys))
            .select(subscriptions::author_id)
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(followed.into_iter().map(UserId::from_row).collect())
    }

    async fn list_authors(
        &self,
        user: UserId,
        page: PageRequest,
    ) -> Result<Page<User>, SubscriptionRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let total: i64 = subscriptions::table
            .filter(subscriptions::user_id.eq(user.get()))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let edges: Vec<i64> = subscriptions::table
            .filter(subscriptions::user_id.eq(user.get()))
            .order_by(subscriptions::author_id)
            .select(subscriptions::author_id)
            .limit(i64::from(page.limit()))
            .offset(page_offset(page))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let rows: Vec<UserRow> = users::table
            .filter(users::id.eq_any(&edges))
            .select(UserRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        let mut by_id: HashMap<i64, UserRow> = rows.into_iter().map(|row| (row.id, row)).collect();
        let items = edges
            .iter()
            .filter_map(|id| by_id.remove(id))
            .map(|row| User::try_from(row).map_err(SubscriptionRepositoryError::query))
            .collect::<Result<_, _>>()?;
        Ok(Page::new(items, count_to_u64(total)))
    }
}
