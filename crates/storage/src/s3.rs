//! S3-backed object storage.

use async_trait::async_trait;
use aws_sdk_s3::Client;

use crate::{object_key, ObjectStorage, StorageError};

/// Stores objects in a single S3 bucket. The object key is the URL path
/// below the public base.
pub struct S3Storage {
    client: Client,
    bucket: String,
    public_base_url: String,
}

impl S3Storage {
    pub fn new(client: Client, bucket: String, public_base_url: String) -> Self {
        Self {
            client,
            bucket,
            public_base_url,
        }
    }
}

#[async_trait]
impl ObjectStorage for S3Storage {
    fn backend_tag(&self) -> &'static str {
        "s3"
    }

    async fn delete(&self, url: &str) -> Result<(), StorageError> {
        let key = object_key(url, &self.public_base_url)
            .ok_or_else(|| StorageError::ForeignUrl(url.to_string()))?;

        // S3 reports success for keys that do not exist.
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(&key)
            .send()
            .await
            .map_err(|e| StorageError::Backend(e.to_string()))?;

        tracing::debug!(bucket = %self.bucket, key = %key, "Deleted S3 object");
        Ok(())
    }
}
