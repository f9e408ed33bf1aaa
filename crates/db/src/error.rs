//! Errors surfaced by the recipe write path.
//!
//! Storage constraint violations that callers must render differently from a
//! generic failure are lifted into their own variants here, so the HTTP layer
//! never has to inspect PostgreSQL error codes for recipe writes.

use cookiejar_core::error::CoreError;
use cookiejar_core::types::DbId;

/// PostgreSQL SQLSTATE for `unique_violation`.
const PG_UNIQUE_VIOLATION: &str = "23505";

/// PostgreSQL SQLSTATE for `foreign_key_violation`.
const PG_FOREIGN_KEY_VIOLATION: &str = "23503";

/// Unique constraint guarding recipe slugs (derived from titles).
const RECIPE_SLUG_CONSTRAINT: &str = "uq_recipes_slug";

/// Foreign key from a recipe to its owning user.
const RECIPE_USER_CONSTRAINT: &str = "fk_recipes_user";

#[derive(Debug, thiserror::Error)]
pub enum SaveRecipeError {
    /// Input rejected before any statement ran.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Target recipe is missing, deleted, or owned by someone else.
    #[error("Recipe {recipe_id} not found or not owned by the current user")]
    NotOwned { recipe_id: DbId },

    #[error("A recipe with this title already exists")]
    DuplicateTitle,

    #[error("User {user_id} does not exist")]
    UnknownUser { user_id: DbId },

    /// Any other storage failure. The transaction was rolled back.
    #[error("Database error: {0}")]
    Database(sqlx::Error),
}

impl SaveRecipeError {
    /// Classify a sqlx error raised while writing a recipe owned by `user_id`.
    pub fn from_sqlx(err: sqlx::Error, user_id: DbId) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            let code = db_err.code();
            let constraint = db_err.constraint();
            match (code.as_deref(), constraint) {
                (Some(PG_UNIQUE_VIOLATION), Some(RECIPE_SLUG_CONSTRAINT)) => {
                    return Self::DuplicateTitle;
                }
                (Some(PG_FOREIGN_KEY_VIOLATION), Some(RECIPE_USER_CONSTRAINT)) => {
                    return Self::UnknownUser { user_id };
                }
                _ => {}
            }
        }
        Self::Database(err)
    }
}

impl From<CoreError> for SaveRecipeError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation(msg) => Self::Validation(msg),
            other => Self::Validation(other.to_string()),
        }
    }
}

impl From<SaveRecipeError> for CoreError {
    fn from(err: SaveRecipeError) -> Self {
        match err {
            SaveRecipeError::Validation(msg) => CoreError::Validation(msg),
            SaveRecipeError::NotOwned { recipe_id } => CoreError::Forbidden(format!(
                "Recipe {recipe_id} not found or not owned by the current user"
            )),
            SaveRecipeError::DuplicateTitle => {
                CoreError::Conflict("A recipe with this title already exists".into())
            }
            SaveRecipeError::UnknownUser { user_id } => {
                CoreError::Conflict(format!("User {user_id} does not exist"))
            }
            SaveRecipeError::Database(e) => CoreError::Internal(e.to_string()),
        }
    }
}
