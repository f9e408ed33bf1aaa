//! Handlers for the `/recipes` resource.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use cookiejar_core::error::CoreError;
use cookiejar_core::recipe::STATUS_DRAFT;
use cookiejar_core::types::DbId;
use cookiejar_db::models::recipe::{RecipeDetail, SaveRecipe, SavedRecipe};
use cookiejar_db::repositories::RecipeRepo;
use validator::Validate;

use crate::background;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::{AuthUser, MaybeAuthUser};
use crate::response::DataResponse;
use crate::state::AppState;

/// Run the save and schedule cleanup of a replaced thumbnail.
async fn save(
    state: &AppState,
    user_id: DbId,
    recipe_id: Option<DbId>,
    input: &SaveRecipe,
) -> AppResult<SavedRecipe> {
    input.validate()?;

    let outcome = RecipeRepo::save(&state.pool, user_id, recipe_id, input).await?;

    tracing::info!(
        recipe_id = outcome.recipe.id,
        user_id,
        created = recipe_id.is_none(),
        "Recipe saved"
    );

    // The transaction is committed; the old image is no longer referenced.
    if let Some(stale) = outcome.stale_thumbnail_url {
        background::spawn_delete_object(state.storage.clone(), stale);
    }

    Ok(outcome.recipe)
}

/// POST /api/v1/recipes
pub async fn create(
    auth: AuthUser,
    State(state): State<AppState>,
    input: Result<Json<SaveRecipe>, JsonRejection>,
) -> AppResult<(StatusCode, Json<DataResponse<SavedRecipe>>)> {
    let Json(input) = input?;
    let recipe = save(&state, auth.user_id, None, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: recipe })))
}

/// PUT /api/v1/recipes/{id}
pub async fn update(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    input: Result<Json<SaveRecipe>, JsonRejection>,
) -> AppResult<Json<DataResponse<SavedRecipe>>> {
    let Json(input) = input?;
    let recipe = save(&state, auth.user_id, Some(id), &input).await?;
    Ok(Json(DataResponse { data: recipe }))
}

/// GET /api/v1/recipes/{id}
///
/// Drafts are only visible to their author.
pub async fn get_by_id(
    viewer: MaybeAuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<RecipeDetail>>> {
    let not_found = || {
        AppError::Core(CoreError::NotFound {
            entity: "Recipe",
            id,
        })
    };

    let recipe = RecipeRepo::find_detail(&state.pool, id)
        .await?
        .ok_or_else(not_found)?;

    if recipe.recipe.status == STATUS_DRAFT && viewer.user_id() != Some(recipe.recipe.user_id) {
        return Err(not_found());
    }
    Ok(Json(DataResponse { data: recipe }))
}

/// DELETE /api/v1/recipes/{id}
pub async fn delete(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    RecipeRepo::soft_delete(&state.pool, auth.user_id, id).await?;
    tracing::info!(recipe_id = id, user_id = auth.user_id, "Recipe deleted");
    Ok(StatusCode::NO_CONTENT)
}
