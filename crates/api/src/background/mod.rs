//! Fire-and-forget side effects.
//!
//! Each helper spawns a detached task on the tokio runtime and returns its
//! handle. Handlers drop the handle; the primary response never waits on
//! these tasks and never sees their failures, which are logged here.

use std::sync::Arc;

use cookiejar_core::types::DbId;
use cookiejar_db::repositories::SearchHistoryRepo;
use cookiejar_storage::ObjectStorage;
use sqlx::PgPool;
use tokio::task::JoinHandle;

/// Record a search in the viewer's history.
pub fn spawn_record_search(pool: PgPool, user_id: DbId, query: String) -> JoinHandle<()> {
    tokio::spawn(async move {
        if let Err(e) = SearchHistoryRepo::record(&pool, user_id, &query).await {
            tracing::warn!(user_id, error = %e, "Failed to record search history");
        }
    })
}

/// Delete an object that a committed save no longer references.
pub fn spawn_delete_object(storage: Arc<dyn ObjectStorage>, url: String) -> JoinHandle<()> {
    tokio::spawn(async move {
        match storage.delete(&url).await {
            Ok(()) => {
                tracing::info!(url = %url, backend = storage.backend_tag(), "Deleted stale image");
            }
            Err(e) if e.is_foreign() => {
                tracing::debug!(url = %url, "Stale image is not managed by this store, skipping");
            }
            Err(e) => {
                tracing::warn!(
                    url = %url,
                    backend = storage.backend_tag(),
                    error = %e,
                    "Failed to delete stale image"
                );
            }
        }
    })
}
