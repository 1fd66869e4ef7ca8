//! Driving port for user-facing profile queries.

use async_trait::async_trait;
use pagination::{Page, PageRequest};

use crate::domain::{Error, UserId, UserProfile};

/// Domain use-case port for reading user profiles.
///
/// `viewer` is the authenticated caller, if any; it drives the
/// `is_subscribed` flag of every returned profile.
#[async_trait]
pub trait UsersQuery: Send + Sync {
    /// Page through every user ordered by id.
    async fn list_users(
        &self,
        viewer: Option<UserId>,
        page: PageRequest,
    ) -> Result<Page<UserProfile>, Error>;

    /// Fetch one profile.
    async fn user_profile(&self, viewer: Option<UserId>, id: UserId) -> Result<UserProfile, Error>;
}
