//! Filesystem image storage rooted in a capability directory.
//!
//! Images live under `recipes/images/` inside the media root and are named
//! `<uuid>.<extension>`. Paths handed back by callers are validated against
//! that shape before touching the filesystem, and `cap_std` confines every
//! operation to the root directory.

use std::io;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use cap_std::{ambient_authority, fs::Dir};
use tokio::task;
use uuid::Uuid;

use crate::domain::ports::{ImageStore, ImageStoreError, StoredImage};
use crate::domain::{ImageFormat, ImageUpload};

/// Directory, relative to the media root, holding recipe images.
pub const IMAGE_DIR: &str = "recipes/images";

/// [`ImageStore`] writing files below a media root directory.
#[derive(Clone)]
pub struct CapStdImageStore {
    root: Arc<Dir>,
}

impl CapStdImageStore {
    /// Open (creating when missing) the media root at `path`.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error when the directory cannot be created
    /// or opened.
    pub fn open(path: &Path) -> io::Result<Self> {
        Dir::create_ambient_dir_all(path, ambient_authority())?;
        let root = Dir::open_ambient_dir(path, ambient_authority())?;
        root.create_dir_all(IMAGE_DIR)?;
        Ok(Self {
            root: Arc::new(root),
        })
    }

    async fn with_root<T, F>(&self, job: F) -> Result<T, ImageStoreError>
    where
        F: FnOnce(&Dir) -> io::Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let root = Arc::clone(&self.root);
        task::spawn_blocking(move || job(&root))
            .await
            .map_err(|err| ImageStoreError::io(err.to_string()))?
            .map_err(|err| ImageStoreError::io(err.to_string()))
    }
}

/// Validate a stored image path, returning its format.
fn parse_path(path: &str) -> Result<ImageFormat, ImageStoreError> {
    let invalid = || ImageStoreError::invalid_path(path);
    let file_name = path
        .strip_prefix(IMAGE_DIR)
        .and_then(|rest| rest.strip_prefix('/'))
        .ok_or_else(invalid)?;
    let (stem, extension) = file_name.rsplit_once('.').ok_or_else(invalid)?;
    Uuid::parse_str(stem).map_err(|_| invalid())?;
    ImageFormat::from_extension(extension).ok_or_else(invalid)
}

#[async_trait]
impl ImageStore for CapStdImageStore {
    async fn store(&self, image: &ImageUpload) -> Result<String, ImageStoreError> {
        let path = format!(
            "{IMAGE_DIR}/{}.{}",
            Uuid::new_v4(),
            image.format().extension()
        );
        let bytes = image.bytes().to_vec();
        let target = path.clone();
        self.with_root(move |root| root.write(&target, bytes)).await?;
        Ok(path)
    }

    async fn load(&self, path: &str) -> Result<Option<StoredImage>, ImageStoreError> {
        let format = parse_path(path)?;
        let target = path.to_owned();
        let bytes = self
            .with_root(move |root| match root.read(&target) {
                Ok(bytes) => Ok(Some(bytes)),
                Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
                Err(err) => Err(err),
            })
            .await?;
        Ok(bytes.map(|bytes| StoredImage { format, bytes }))
    }

    async fn remove(&self, path: &str) -> Result<(), ImageStoreError> {
        parse_path(path)?;
        let target = path.to_owned();
        self.with_root(move |root| match root.remove_file(&target) {
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            other => other,
        })
        .await
    }
}
