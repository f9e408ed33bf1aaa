//! Handlers for the caller's own search history.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use cookiejar_core::error::CoreError;
use cookiejar_core::types::DbId;
use cookiejar_db::models::search::SearchHistoryEntry;
use cookiejar_db::repositories::SearchHistoryRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/search-history
pub async fn list(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<SearchHistoryEntry>>>> {
    let entries = SearchHistoryRepo::list(&state.pool, auth.user_id).await?;
    Ok(Json(DataResponse { data: entries }))
}

/// DELETE /api/v1/search-history
pub async fn clear(auth: AuthUser, State(state): State<AppState>) -> AppResult<StatusCode> {
    let removed = SearchHistoryRepo::clear(&state.pool, auth.user_id).await?;
    tracing::debug!(user_id = auth.user_id, removed, "Search history cleared");
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/v1/search-history/{id}
pub async fn delete_item(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if SearchHistoryRepo::delete_item(&state.pool, auth.user_id, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "SearchHistoryEntry",
            id,
        }))
    }
}
