//! Port for storing recipe images.

use async_trait::async_trait;

use crate::domain::{Error, ImageFormat, ImageUpload};

use super::define_port_error;

define_port_error! {
    /// Errors raised by image storage adapters.
    pub enum ImageStoreError {
        /// Reading or writing the backing storage failed.
        Io { message: String } => "image storage failed: {message}",
        /// The requested path escapes the storage root or is malformed.
        InvalidPath { path: String } => "invalid image path: {path}",
    }
}

impl From<ImageStoreError> for Error {
    fn from(error: ImageStoreError) -> Self {
        match error {
            ImageStoreError::Io { message } => {
                Error::internal(format!("image storage error: {message}"))
            }
            ImageStoreError::InvalidPath { path } => {
                Error::not_found(format!("image {path} not found"))
            }
        }
    }
}

/// A stored image read back for serving.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredImage {
    pub format: ImageFormat,
    pub bytes: Vec<u8>,
}

/// Recipe image storage addressed by relative paths such as
/// `recipes/images/<uuid>.png`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Persist an upload and return its relative path.
    async fn store(&self, image: &ImageUpload) -> Result<String, ImageStoreError>;

    /// Read an image back. Returns `None` when nothing is stored at `path`.
    async fn load(&self, path: &str) -> Result<Option<StoredImage>, ImageStoreError>;

    /// Delete an image. Missing files are not an error.
    async fn remove(&self, path: &str) -> Result<(), ImageStoreError>;
}
