//! Route definitions for the caller's search history.
//!
//! Mounted at `/search-history` in the API route tree.

use axum::routing::{delete, get};
use axum::Router;

use crate::handlers::search_history;
use crate::state::AppState;

/// Search history routes mounted at `/search-history`.
///
/// ```text
/// GET    /          -> list
/// DELETE /          -> clear
/// DELETE /{id}      -> delete_item
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(search_history::list).delete(search_history::clear))
        .route("/{id}", delete(search_history::delete_item))
}
