use std::sync::Arc;

use cookiejar_storage::ObjectStorage;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheap to clone; everything inside is a pool handle or behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: cookiejar_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Backend that owns uploaded images.
    pub storage: Arc<dyn ObjectStorage>,
}
