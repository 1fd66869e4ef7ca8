//! Port for reading tags.

use async_trait::async_trait;

use crate::domain::{Error, Tag, TagId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by tag repository adapters.
    pub enum TagRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "tag repository connection failed: {message}",
        /// Query failed during execution.
        Query { message: String } => "tag repository query failed: {message}",
    }
}

impl From<TagRepositoryError> for Error {
    fn from(error: TagRepositoryError) -> Self {
        match error {
            TagRepositoryError::Connection { message } => {
                Error::service_unavailable(format!("tag repository unavailable: {message}"))
            }
            TagRepositoryError::Query { message } => {
                Error::internal(format!("tag repository error: {message}"))
            }
        }
    }
}

/// Read access to tags. Tags are managed through migrations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TagRepository: Send + Sync {
    /// Every tag ordered by id.
    async fn list_all(&self) -> Result<Vec<Tag>, TagRepositoryError>;

    /// Fetch one tag.
    async fn find_by_id(&self, id: TagId) -> Result<Option<Tag>, TagRepositoryError>;

    /// Fetch several tags. Unknown ids are skipped.
    async fn find_by_ids(&self, ids: &[TagId]) -> Result<Vec<Tag>, TagRepositoryError>;
}
