//! Repository for the global `ingredients` catalog.

use cookiejar_core::types::DbId;
use sqlx::{PgPool, Postgres, Transaction};

use crate::models::ingredient::Ingredient;

/// Provides lookups and lazy creation of catalog ingredients.
pub struct IngredientRepo;

impl IngredientRepo {
    /// Resolve an ingredient id by case-insensitive name, inserting the name
    /// when it is not in the catalog yet.
    ///
    /// Runs inside the caller's transaction. A concurrent insert of the same
    /// name is absorbed by `ON CONFLICT` and the existing row is re-read.
    pub async fn resolve_or_create(
        tx: &mut Transaction<'_, Postgres>,
        name: &str,
    ) -> Result<DbId, sqlx::Error> {
        let name = name.trim();

        let existing: Option<DbId> =
            sqlx::query_scalar("SELECT id FROM ingredients WHERE LOWER(name) = LOWER($1)")
                .bind(name)
                .fetch_optional(&mut **tx)
                .await?;
        if let Some(id) = existing {
            return Ok(id);
        }

        let inserted: Option<DbId> = sqlx::query_scalar(
            "INSERT INTO ingredients (name) VALUES ($1) \
             ON CONFLICT ((LOWER(name))) DO NOTHING \
             RETURNING id",
        )
        .bind(name)
        .fetch_optional(&mut **tx)
        .await?;
        if let Some(id) = inserted {
            tracing::debug!(ingredient_id = id, name, "Ingredient added to catalog");
            return Ok(id);
        }

        sqlx::query_scalar("SELECT id FROM ingredients WHERE LOWER(name) = LOWER($1)")
            .bind(name)
            .fetch_one(&mut **tx)
            .await
    }

    /// Find a catalog ingredient by case-insensitive name.
    pub async fn find_by_name(
        pool: &PgPool,
        name: &str,
    ) -> Result<Option<Ingredient>, sqlx::Error> {
        sqlx::query_as::<_, Ingredient>(
            "SELECT id, name, created_at FROM ingredients WHERE LOWER(name) = LOWER($1)",
        )
        .bind(name.trim())
        .fetch_optional(pool)
        .await
    }
}
