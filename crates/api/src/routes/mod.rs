pub mod health;
pub mod recipe;
pub mod search_history;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /recipes                     create (POST)
/// /recipes/search              search (GET, viewer optional)
/// /recipes/suggest             title suggestions (GET)
/// /recipes/{id}                get, update, soft delete
///
/// /search-history              list, clear (auth required)
/// /search-history/{id}         delete one entry (auth required)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/recipes", recipe::router())
        .nest("/search-history", search_history::router())
}
