//! Route definitions for recipes, search and suggestions.
//!
//! Mounted at `/recipes` in the API route tree.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{recipe, search};
use crate::state::AppState;

/// Recipe routes mounted at `/recipes`.
///
/// ```text
/// POST   /                 -> create
/// GET    /search           -> search
/// GET    /suggest          -> suggest
/// GET    /{id}             -> get_by_id
/// PUT    /{id}             -> update
/// DELETE /{id}             -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(recipe::create))
        .route("/search", get(search::search))
        .route("/suggest", get(search::suggest))
        .route(
            "/{id}",
            get(recipe::get_by_id)
                .put(recipe::update)
                .delete(recipe::delete),
        )
}
