//! Account services: login, sign-up, password changes and profile reads.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use pagination::{Page, PageRequest};
use serde_json::json;

use crate::domain::auth::lookup_email;
use crate::domain::ports::{
    LoginService, PasswordHasher, SubscriptionRepository, UserPersistenceError, UserRepository,
    UsersCommand, UsersQuery,
};
use crate::domain::{
    Error, LoginCredentials, NewUser, PasswordChange, Registration, User, UserId, UserProfile,
};

const INVALID_CREDENTIALS: &str = "invalid credentials";

/// Service implementing the account driving ports.
#[derive(Clone)]
pub struct UsersService {
    users: Arc<dyn UserRepository>,
    subscriptions: Arc<dyn SubscriptionRepository>,
    hasher: Arc<dyn PasswordHasher>,
}

impl UsersService {
    /// Create a new service with the given adapters.
    pub fn new(
        users: Arc<dyn UserRepository>,
        subscriptions: Arc<dyn SubscriptionRepository>,
        hasher: Arc<dyn PasswordHasher>,
    ) -> Self {
        Self {
            users,
            subscriptions,
            hasher,
        }
    }
}

fn map_create_error(error: UserPersistenceError) -> Error {
    let field = match &error {
        UserPersistenceError::DuplicateEmail => "email",
        UserPersistenceError::DuplicateUsername => "username",
        _ => return error.into(),
    };
    Error::invalid_request(error.to_string()).with_details(json!({
        "field": field,
        "code": "duplicate",
    }))
}

/// Pair users with the viewer's subscription flag in one repository call.
pub(crate) async fn profiles_for(
    subscriptions: &dyn SubscriptionRepository,
    viewer: Option<UserId>,
    users: Vec<User>,
) -> Result<Vec<UserProfile>, Error> {
    let followed = match viewer {
        Some(viewer) if !users.is_empty() => {
            let ids: Vec<UserId> = users.iter().map(User::id).collect();
            subscriptions.followed_among(viewer, &ids).await?
        }
        _ => HashSet::new(),
    };
    Ok(users
        .into_iter()
        .map(|user| {
            let is_subscribed = followed.contains(&user.id());
            UserProfile {
                user,
                is_subscribed,
            }
        })
        .collect())
}

#[async_trait]
impl LoginService for UsersService {
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<UserId, Error> {
        let Some(email) = lookup_email(credentials) else {
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        };
        let Some((user, hash)) = self.users.find_credentials(&email).await? else {
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        };
        if self.hasher.verify(credentials.password(), &hash).await? {
            Ok(user.id())
        } else {
            Err(Error::unauthorized(INVALID_CREDENTIALS))
        }
    }
}

#[async_trait]
impl UsersCommand for UsersService {
    async fn register(&self, registration: Registration) -> Result<User, Error> {
        let Registration { profile, password } = registration;
        let password_hash = self.hasher.hash(&password).await?;
        let new_user = NewUser {
            profile,
            password_hash,
        };
        self.users.create(&new_user).await.map_err(map_create_error)
    }

    async fn set_password(&self, user: UserId, change: &PasswordChange) -> Result<(), Error> {
        let current_hash = self
            .users
            .password_hash(user)
            .await?
            .ok_or_else(|| Error::not_found(format!("user {user} not found")))?;
        if !self.hasher.verify(change.current(), &current_hash).await? {
            return Err(
                Error::invalid_request("current password is incorrect").with_details(json!({
                    "field": "current_password",
                    "code": "incorrect",
                })),
            );
        }
        let new_hash = self.hasher.hash(change.new_password()).await?;
        if self.users.update_password(user, &new_hash).await? {
            Ok(())
        } else {
            Err(Error::not_found(format!("user {user} not found")))
        }
    }
}

#[async_trait]
impl UsersQuery for UsersService {
    async fn list_users(
        &self,
        viewer: Option<UserId>,
        page: PageRequest,
    ) -> Result<Page<UserProfile>, Error> {
        let Page { items, total } = self.users.list(page).await?;
        let profiles = profiles_for(self.subscriptions.as_ref(), viewer, items).await?;
        Ok(Page::new(profiles, total))
    }

    async fn user_profile(&self, viewer: Option<UserId>, id: UserId) -> Result<UserProfile, Error> {
        let user = self
            .users
            .find_by_id(id)
            .await?
            .ok_or_else(|| Error::not_found(format!("user {id} not found")))?;
        profiles_for(self.subscriptions.as_ref(), viewer, vec![user])
            .await?
            .pop()
            .ok_or_else(|| Error::internal("profile lookup returned no rows"))
    }
}

#[cfg(test)]
#[path = "users_service_tests.rs"]
mod tests;
