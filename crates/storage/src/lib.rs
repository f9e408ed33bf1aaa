//! Object storage for uploaded recipe images.
//!
//! Recipes only hold public URLs. When a thumbnail is replaced the old
//! object is removed through an [`ObjectStorage`] backend, resolved from
//! [`StorageConfig`] at startup.

pub mod config;
pub mod error;
pub mod local;
pub mod s3;

use std::sync::Arc;

use async_trait::async_trait;

pub use config::{StorageBackend, StorageConfig};
pub use error::StorageError;
pub use local::LocalStorage;
pub use s3::S3Storage;

/// A store of uploaded objects addressed by their public URL.
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Short backend name for logs.
    fn backend_tag(&self) -> &'static str;

    /// Delete the object served at `url`.
    ///
    /// Deleting an object that no longer exists succeeds. URLs outside this
    /// store's public base fail with [`StorageError::ForeignUrl`].
    async fn delete(&self, url: &str) -> Result<(), StorageError>;
}

/// Build the backend selected by `config`.
pub async fn build_storage(config: &StorageConfig) -> Arc<dyn ObjectStorage> {
    match &config.backend {
        StorageBackend::Local { root } => Arc::new(LocalStorage::new(
            root.clone(),
            config.public_base_url.clone(),
        )),
        StorageBackend::S3 { bucket } => {
            let sdk_config = aws_config::load_from_env().await;
            let client = aws_sdk_s3::Client::new(&sdk_config);
            Arc::new(S3Storage::new(
                client,
                bucket.clone(),
                config.public_base_url.clone(),
            ))
        }
    }
}

/// Map a public URL to the object key below `public_base_url`.
///
/// Returns `None` when the URL is not served from that base or names no
/// object. Query strings and fragments are ignored.
pub fn object_key(url: &str, public_base_url: &str) -> Option<String> {
    let base = public_base_url.trim_end_matches('/');
    let rest = url.strip_prefix(base)?.strip_prefix('/')?;
    let key = rest.split(['?', '#']).next().unwrap_or_default();
    if key.is_empty() || key.ends_with('/') {
        return None;
    }
    Some(key.to_string())
}
