//! In-memory user and subscription repositories.

use std::collections::HashSet;

use async_trait::async_trait;
use pagination::{Page, PageRequest};

use crate::domain::ports::{
    SubscriptionRepository, SubscriptionRepositoryError, UserPersistenceError, UserRepository,
};
use crate::domain::{Email, NewUser, PasswordHash, User, UserId};

use super::{MemoryStore, StoredUser, next_id};

#[async_trait]
impl UserRepository for MemoryStore {
    async fn create(&self, user: &NewUser) -> Result<User, UserPersistenceError> {
        let mut state = self.lock().map_err(UserPersistenceError::query)?;
        let profile = &user.profile;
        if state
            .users
            .values()
            .any(|stored| stored.user.email() == &profile.email)
        {
            return Err(UserPersistenceError::duplicate_email());
        }
        if state
            .users
            .values()
            .any(|stored| stored.user.username() == &profile.username)
        {
            return Err(UserPersistenceError::duplicate_username());
        }
        let id = UserId::from_row(next_id(&mut state.last_user_id));
        let created = User::new(id, profile.clone(), false);
        state.users.insert(
            id,
            StoredUser {
                user: created.clone(),
                password_hash: user.password_hash.clone(),
            },
        );
        Ok(created)
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserPersistenceError> {
        let state = self.lock().map_err(UserPersistenceError::query)?;
        Ok(state.users.get(&id).map(|stored| stored.user.clone()))
    }

    async fn find_by_ids(&self, ids: &[UserId]) -> Result<Vec<User>, UserPersistenceError> {
        let state = self.lock().map_err(UserPersistenceError::query)?;
        Ok(ids
            .iter()
            .filter_map(|id| state.users.get(id))
            .map(|stored| stored.user.clone())
            .collect())
    }

    async fn find_credentials(
        &self,
        email: &Email,
    ) -> Result<Option<(User, PasswordHash)>, UserPersistenceError> {
        let state = self.lock().map_err(UserPersistenceError::query)?;
        Ok(state
            .users
            .values()
            .find(|stored| stored.user.email() == email)
            .map(|stored| (stored.user.clone(), stored.password_hash.clone())))
    }

    async fn password_hash(&self, id: UserId) -> Result<Option<PasswordHash>, UserPersistenceError> {
        let state = self.lock().map_err(UserPersistenceError::query)?;
        Ok(state
            .users
            .get(&id)
            .map(|stored| stored.password_hash.clone()))
    }

    async fn update_password(
        &self,
        id: UserId,
        hash: &PasswordHash,
    ) -> Result<bool, UserPersistenceError> {
        let mut state = self.lock().map_err(UserPersistenceError::query)?;
        let Some(stored) = state.users.get_mut(&id) else {
            return Ok(false);
        };
        stored.password_hash = hash.clone();
        Ok(true)
    }

    async fn list(&self, page: PageRequest) -> Result<Page<User>, UserPersistenceError> {
        let state = self.lock().map_err(UserPersistenceError::query)?;
        let all = state.users.values().map(|stored| stored.user.clone()).collect();
        Ok(Page::from_slice(all, page))
    }
}

#[async_trait]
impl SubscriptionRepository for MemoryStore {
    async fn subscribe(
        &self,
        user: UserId,
        author: UserId,
    ) -> Result<bool, SubscriptionRepositoryError> {
        if user == author {
            return Err(SubscriptionRepositoryError::self_subscription());
        }
        let mut state = self.lock().map_err(SubscriptionRepositoryError::query)?;
        if !state.users.contains_key(&user) || !state.users.contains_key(&author) {
            return Err(SubscriptionRepositoryError::query(
                "subscription references an unknown user",
            ));
        }
        Ok(state.subscriptions.insert((user, author)))
    }

    async fn unsubscribe(
        &self,
        user: UserId,
        author: UserId,
    ) -> Result<bool, SubscriptionRepositoryError> {
        let mut state = self.lock().map_err(SubscriptionRepositoryError::query)?;
        Ok(state.subscriptions.remove(&(user, author)))
    }

    async fn followed_among(
        &self,
        user: UserId,
        authors: &[UserId],
    ) -> Result<HashSet<UserId>, SubscriptionRepositoryError> {
        let state = self.lock().map_err(SubscriptionRepositoryError::query)?;
        Ok(authors
            .iter()
            .copied()
            .filter(|author| state.subscriptions.contains(&(user, *author)))
            .collect())
    }

    async fn list_authors(
        &self,
        user: UserId,
        page: PageRequest,
    ) -> Result<Page<User>, SubscriptionRepositoryError> {
        let state = self.lock().map_err(SubscriptionRepositoryError::query)?;
        let authors = state
            .subscriptions
            .iter()
            .filter(|(follower, _)| *follower == user)
            .filter_map(|(_, author)| state.users.get(author))
            .map(|stored| stored.user.clone())
            .collect();
        Ok(Page::from_slice(authors, page))
    }
}
