//! Handlers for recipe search and title suggestions.

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::Json;
use cookiejar_db::models::search::{RecipeSearchParams, SearchPage, SuggestParams};
use cookiejar_db::repositories::SearchRepo;

use crate::background;
use crate::error::AppResult;
use crate::middleware::auth::MaybeAuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/recipes/search
///
/// Anonymous callers get `is_liked` / `is_saved` as false. Authenticated
/// callers with a non-empty title also get the query added to their history.
pub async fn search(
    viewer: MaybeAuthUser,
    State(state): State<AppState>,
    params: Result<Query<RecipeSearchParams>, QueryRejection>,
) -> AppResult<Json<DataResponse<SearchPage>>> {
    let Query(params) = params?;
    let query = params.into_query(viewer.user_id())?;
    let page = SearchRepo::search(&state.pool, &query).await?;

    tracing::debug!(
        title = %query.title,
        total = page.total,
        page = page.page,
        viewer_id = ?query.viewer_id,
        "Search executed",
    );

    if let Some(user_id) = query.viewer_id {
        if !query.title.is_empty() {
            background::spawn_record_search(state.pool.clone(), user_id, query.title.clone());
        }
    }

    Ok(Json(DataResponse { data: page }))
}

/// GET /api/v1/recipes/suggest?q=
pub async fn suggest(
    State(state): State<AppState>,
    params: Result<Query<SuggestParams>, QueryRejection>,
) -> AppResult<Json<DataResponse<Vec<String>>>> {
    let Query(params) = params?;
    let titles = SearchRepo::suggest_titles(&state.pool, &params.q).await?;
    Ok(Json(DataResponse { data: titles }))
}
