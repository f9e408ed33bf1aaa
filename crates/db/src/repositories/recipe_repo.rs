//! Repository for the recipe aggregate (`recipes`, `recipe_ingredients`,
//! `steps`, `step_images`).
//!
//! Saves use wipe-and-rewrite: every save deletes the recipe's ingredient
//! links and steps and reinserts the submitted set, so the stored children
//! always mirror the last submission exactly.

use cookiejar_core::recipe::{generate_slug, STATUS_DELETED};
use cookiejar_core::search::CategoryFilter;
use cookiejar_core::types::DbId;
use sqlx::{PgPool, Postgres, Transaction};

use crate::error::SaveRecipeError;
use crate::models::ingredient::RecipeIngredient;
use crate::models::recipe::{
    Recipe, RecipeDetail, SaveOutcome, SaveRecipe, SavedRecipe, Step, StepImage, StepWithImages,
};
use crate::repositories::IngredientRepo;

/// Column list for `recipes` queries.
const COLUMNS: &str = "id, user_id, category_id, title, slug, description, difficulty, \
    servings, cook_time_min, thumbnail_url, status, likes_count, created_at, updated_at";

/// Columns returned after a save.
const SAVED_COLUMNS: &str = "id, title, slug, status, thumbnail_url, created_at, updated_at";

/// Provides the transactional write path and reads for recipes.
pub struct RecipeRepo;

impl RecipeRepo {
    // -----------------------------------------------------------------------
    // Save (create or update)
    // -----------------------------------------------------------------------

    /// Create (`recipe_id = None`) or fully replace (`Some`) a recipe owned
    /// by `user_id`, atomically.
    ///
    /// All statements run in one transaction; any failure rolls the whole
    /// save back. On update the existing row is locked and its owner checked
    /// before anything is written. The returned outcome carries the previous
    /// thumbnail URL when a different one replaced it, so the caller can
    /// delete it after commit.
    pub async fn save(
        pool: &PgPool,
        user_id: DbId,
        recipe_id: Option<DbId>,
        input: &SaveRecipe,
    ) -> Result<SaveOutcome, SaveRecipeError> {
        input.check()?;

        let slug = generate_slug(&input.title);
        let category = input.category_filter()?;

        let mut tx = pool
            .begin()
            .await
            .map_err(|e| SaveRecipeError::from_sqlx(e, user_id))?;

        // Dropping `tx` on any early return rolls it back.
        let outcome = Self::save_inner(&mut tx, user_id, recipe_id, &slug, category.as_ref(), input)
            .await
            .map_err(|e| e.classify(user_id))?;

        tx.commit()
            .await
            .map_err(|e| SaveRecipeError::from_sqlx(e, user_id))?;

        Ok(outcome)
    }

    async fn save_inner(
        tx: &mut Transaction<'_, Postgres>,
        user_id: DbId,
        recipe_id: Option<DbId>,
        slug: &str,
        category: Option<&CategoryFilter>,
        input: &SaveRecipe,
    ) -> Result<SaveOutcome, SaveInnerError> {
        let (recipe, stale_thumbnail_url) = match recipe_id {
            Some(id) => {
                let previous_thumbnail = Self::lock_owned(tx, id, user_id).await?;
                let category_id = Self::resolve_category(tx, category).await?;
                let recipe = Self::update_row(tx, id, slug, category_id, input).await?;
                Self::wipe_children(tx, id).await?;

                let stale = match (previous_thumbnail, input.thumbnail_url.as_deref()) {
                    (Some(old), Some(new)) if old != new => Some(old),
                    _ => None,
                };
                (recipe, stale)
            }
            None => {
                let category_id = Self::resolve_category(tx, category).await?;
                let recipe = Self::insert_row(tx, user_id, slug, category_id, input).await?;
                (recipe, None)
            }
        };

        Self::insert_ingredients(tx, recipe.id, input).await?;
        Self::insert_steps(tx, recipe.id, input).await?;

        Ok(SaveOutcome {
            recipe,
            stale_thumbnail_url,
        })
    }

    /// Lock a live recipe row and confirm `user_id` owns it. Returns the
    /// thumbnail stored before this save.
    async fn lock_owned(
        tx: &mut Transaction<'_, Postgres>,
        recipe_id: DbId,
        user_id: DbId,
    ) -> Result<Option<String>, SaveInnerError> {
        let row: Option<(DbId, Option<String>)> = sqlx::query_as(
            "SELECT user_id, thumbnail_url FROM recipes \
             WHERE id = $1 AND status <> $2 \
             FOR UPDATE",
        )
        .bind(recipe_id)
        .bind(STATUS_DELETED)
        .fetch_optional(&mut **tx)
        .await?;

        match row {
            Some((owner_id, thumbnail)) if owner_id == user_id => Ok(thumbnail),
            _ => Err(SaveInnerError::NotOwned(recipe_id)),
        }
    }

    /// Map a submitted category to an existing category id. Names match
    /// case-insensitively.
    async fn resolve_category(
        tx: &mut Transaction<'_, Postgres>,
        category: Option<&CategoryFilter>,
    ) -> Result<Option<DbId>, SaveInnerError> {
        let Some(category) = category else {
            return Ok(None);
        };

        let (found, label): (Option<DbId>, String) = match category {
            CategoryFilter::Id(id) => {
                let found = sqlx::query_scalar("SELECT id FROM categories WHERE id = $1")
                    .bind(*id)
                    .fetch_optional(&mut **tx)
                    .await?;
                (found, id.to_string())
            }
            CategoryFilter::Name(name) => {
                let found =
                    sqlx::query_scalar("SELECT id FROM categories WHERE LOWER(name) = LOWER($1)")
                        .bind(name)
                        .fetch_optional(&mut **tx)
                        .await?;
                (found, name.clone())
            }
        };

        match found {
            Some(id) => Ok(Some(id)),
            None => Err(SaveInnerError::Invalid(format!("Unknown category '{label}'"))),
        }
    }

    async fn insert_row(
        tx: &mut Transaction<'_, Postgres>,
        user_id: DbId,
        slug: &str,
        category_id: Option<DbId>,
        input: &SaveRecipe,
    ) -> Result<SavedRecipe, sqlx::Error> {
        let query = format!(
            "INSERT INTO recipes \
                (user_id, category_id, title, slug, description, difficulty, \
                 servings, cook_time_min, thumbnail_url, status) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
             RETURNING {SAVED_COLUMNS}"
        );
        sqlx::query_as::<_, SavedRecipe>(&query)
            .bind(user_id)
            .bind(category_id)
            .bind(input.title.trim())
            .bind(slug)
            .bind(&input.description)
            .bind(&input.difficulty)
            .bind(input.servings)
            .bind(input.cook_time_min)
            .bind(&input.thumbnail_url)
            .bind(input.effective_status())
            .fetch_one(&mut **tx)
            .await
    }

    /// Overwrite the mutable fields. The thumbnail is only replaced when a
    /// new one is supplied.
    async fn update_row(
        tx: &mut Transaction<'_, Postgres>,
        recipe_id: DbId,
        slug: &str,
        category_id: Option<DbId>,
        input: &SaveRecipe,
    ) -> Result<SavedRecipe, sqlx::Error> {
        let query = format!(
            "UPDATE recipes SET \
                category_id = $2, \
                title = $3, \
                slug = $4, \
                description = $5, \
                difficulty = $6, \
                servings = $7, \
                cook_time_min = $8, \
                thumbnail_url = COALESCE($9, thumbnail_url), \
                status = $10 \
             WHERE id = $1 \
             RETURNING {SAVED_COLUMNS}"
        );
        sqlx::query_as::<_, SavedRecipe>(&query)
            .bind(recipe_id)
            .bind(category_id)
            .bind(input.title.trim())
            .bind(slug)
            .bind(&input.description)
            .bind(&input.difficulty)
            .bind(input.servings)
            .bind(input.cook_time_min)
            .bind(&input.thumbnail_url)
            .bind(input.effective_status())
            .fetch_one(&mut **tx)
            .await
    }

    /// Delete every ingredient link and step (step images cascade).
    async fn wipe_children(
        tx: &mut Transaction<'_, Postgres>,
        recipe_id: DbId,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM recipe_ingredients WHERE recipe_id = $1")
            .bind(recipe_id)
            .execute(&mut **tx)
            .await?;
        sqlx::query("DELETE FROM steps WHERE recipe_id = $1")
            .bind(recipe_id)
            .execute(&mut **tx)
            .await?;
        Ok(())
    }

    async fn insert_ingredients(
        tx: &mut Transaction<'_, Postgres>,
        recipe_id: DbId,
        input: &SaveRecipe,
    ) -> Result<(), sqlx::Error> {
        for ingredient in &input.ingredients {
            let ingredient_id = IngredientRepo::resolve_or_create(tx, &ingredient.name).await?;
            sqlx::query(
                "INSERT INTO recipe_ingredients (recipe_id, ingredient_id, amount, unit) \
                 VALUES ($1, $2, $3, $4)",
            )
            .bind(recipe_id)
            .bind(ingredient_id)
            .bind(ingredient.amount)
            .bind(&ingredient.unit)
            .execute(&mut **tx)
            .await?;
        }
        Ok(())
    }

    /// Insert steps numbered 1..N in submission order, each followed by its
    /// images in submission order.
    async fn insert_steps(
        tx: &mut Transaction<'_, Postgres>,
        recipe_id: DbId,
        input: &SaveRecipe,
    ) -> Result<(), sqlx::Error> {
        for (index, step) in input.steps.iter().enumerate() {
            let step_number = index as i32 + 1;
            let step_id: DbId = sqlx::query_scalar(
                "INSERT INTO steps (recipe_id, step_number, description) \
                 VALUES ($1, $2, $3) \
                 RETURNING id",
            )
            .bind(recipe_id)
            .bind(step_number)
            .bind(step.description.trim())
            .fetch_one(&mut **tx)
            .await?;

            for (position, image_url) in step.image_urls.iter().enumerate() {
                sqlx::query(
                    "INSERT INTO step_images (step_id, image_url, position) \
                     VALUES ($1, $2, $3)",
                )
                .bind(step_id)
                .bind(image_url)
                .bind(position as i32)
                .execute(&mut **tx)
                .await?;
            }
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Soft delete
    // -----------------------------------------------------------------------

    /// Flip a recipe owned by `user_id` to `deleted` and drop it from every
    /// collection. The row and its children are retained.
    pub async fn soft_delete(
        pool: &PgPool,
        user_id: DbId,
        recipe_id: DbId,
    ) -> Result<(), SaveRecipeError> {
        let mut tx = pool
            .begin()
            .await
            .map_err(|e| SaveRecipeError::from_sqlx(e, user_id))?;

        Self::soft_delete_inner(&mut tx, user_id, recipe_id)
            .await
            .map_err(|e| e.classify(user_id))?;

        tx.commit()
            .await
            .map_err(|e| SaveRecipeError::from_sqlx(e, user_id))
    }

    async fn soft_delete_inner(
        tx: &mut Transaction<'_, Postgres>,
        user_id: DbId,
        recipe_id: DbId,
    ) -> Result<(), SaveInnerError> {
        Self::lock_owned(tx, recipe_id, user_id).await?;

        sqlx::query("UPDATE recipes SET status = $2 WHERE id = $1")
            .bind(recipe_id)
            .bind(STATUS_DELETED)
            .execute(&mut **tx)
            .await?;
        sqlx::query("DELETE FROM collection_recipes WHERE recipe_id = $1")
            .bind(recipe_id)
            .execute(&mut **tx)
            .await?;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Reads
    // -----------------------------------------------------------------------

    /// Find a recipe row by id, including drafts and deleted rows.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Recipe>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM recipes WHERE id = $1");
        sqlx::query_as::<_, Recipe>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Load a live recipe with its category, author, ingredients and steps.
    ///
    /// Returns `None` for missing or deleted recipes.
    pub async fn find_detail(pool: &PgPool, id: DbId) -> Result<Option<RecipeDetail>, sqlx::Error> {
        let recipe = match Self::find_by_id(pool, id).await? {
            Some(r) if r.status != STATUS_DELETED => r,
            _ => return Ok(None),
        };

        let category: Option<String> = match recipe.category_id {
            Some(category_id) => {
                sqlx::query_scalar("SELECT name FROM categories WHERE id = $1")
                    .bind(category_id)
                    .fetch_optional(pool)
                    .await?
            }
            None => None,
        };

        let author_username: String =
            sqlx::query_scalar("SELECT username FROM users WHERE id = $1")
                .bind(recipe.user_id)
                .fetch_one(pool)
                .await?;

        let ingredients = Self::list_ingredients(pool, id).await?;
        let steps = Self::list_steps(pool, id).await?;

        Ok(Some(RecipeDetail {
            recipe,
            category,
            author_username,
            ingredients,
            steps,
        }))
    }

    /// Ingredients linked to a recipe, ordered by name.
    pub async fn list_ingredients(
        pool: &PgPool,
        recipe_id: DbId,
    ) -> Result<Vec<RecipeIngredient>, sqlx::Error> {
        sqlx::query_as::<_, RecipeIngredient>(
            "SELECT ri.ingredient_id, i.name, ri.amount, ri.unit \
             FROM recipe_ingredients ri \
             JOIN ingredients i ON i.id = ri.ingredient_id \
             WHERE ri.recipe_id = $1 \
             ORDER BY i.name",
        )
        .bind(recipe_id)
        .fetch_all(pool)
        .await
    }

    /// Steps of a recipe in order, each with its image URLs.
    pub async fn list_steps(
        pool: &PgPool,
        recipe_id: DbId,
    ) -> Result<Vec<StepWithImages>, sqlx::Error> {
        let steps = sqlx::query_as::<_, Step>(
            "SELECT id, recipe_id, step_number, description FROM steps \
             WHERE recipe_id = $1 \
             ORDER BY step_number",
        )
        .bind(recipe_id)
        .fetch_all(pool)
        .await?;

        let images = sqlx::query_as::<_, StepImage>(
            "SELECT si.id, si.step_id, si.image_url, si.position \
             FROM step_images si \
             JOIN steps s ON s.id = si.step_id \
             WHERE s.recipe_id = $1 \
             ORDER BY si.step_id, si.position, si.id",
        )
        .bind(recipe_id)
        .fetch_all(pool)
        .await?;

        Ok(steps
            .into_iter()
            .map(|step| {
                let image_urls = images
                    .iter()
                    .filter(|img| img.step_id == step.id)
                    .map(|img| img.image_url.clone())
                    .collect();
                StepWithImages { step, image_urls }
            })
            .collect())
    }
}

/// Failure inside the save transaction, before classification.
enum SaveInnerError {
    NotOwned(DbId),
    Invalid(String),
    Sqlx(sqlx::Error),
}

impl SaveInnerError {
    fn classify(self, user_id: DbId) -> SaveRecipeError {
        match self {
            Self::NotOwned(recipe_id) => SaveRecipeError::NotOwned { recipe_id },
            Self::Invalid(msg) => SaveRecipeError::Validation(msg),
            Self::Sqlx(e) => SaveRecipeError::from_sqlx(e, user_id),
        }
    }
}

impl From<sqlx::Error> for SaveInnerError {
    fn from(err: sqlx::Error) -> Self {
        Self::Sqlx(err)
    }
}
