//! Filesystem-backed object storage.

use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;

use crate::{object_key, ObjectStorage, StorageError};

/// Stores objects as files below `root`.
pub struct LocalStorage {
    root: PathBuf,
    public_base_url: String,
}

impl LocalStorage {
    pub fn new(root: PathBuf, public_base_url: String) -> Self {
        Self {
            root,
            public_base_url,
        }
    }

    /// Resolve a key to a path, refusing anything that could escape `root`.
    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        let relative = Path::new(key);
        let safe = relative
            .components()
            .all(|c| matches!(c, Component::Normal(_)));
        if !safe {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl ObjectStorage for LocalStorage {
    fn backend_tag(&self) -> &'static str {
        "local"
    }

    async fn delete(&self, url: &str) -> Result<(), StorageError> {
        let key = object_key(url, &self.public_base_url)
            .ok_or_else(|| StorageError::ForeignUrl(url.to_string()))?;
        let path = self.path_for(&key)?;

        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                tracing::debug!(path = %path.display(), "Deleted local object");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
