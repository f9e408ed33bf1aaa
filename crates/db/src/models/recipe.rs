//! Recipe aggregate: the recipe row, its ingredient links, and its ordered
//! steps with step images.

use cookiejar_core::error::CoreError;
use cookiejar_core::recipe::{
    normalize_ingredient_name, validate_cook_time, validate_difficulty, validate_save_status,
    validate_servings, validate_title, DIFFICULTY_EASY, STATUS_PUBLISHED,
};
use cookiejar_core::search::CategoryFilter;
use cookiejar_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use super::ingredient::RecipeIngredient;

/// A row from the `recipes` table (without the generated search vector).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Recipe {
    pub id: DbId,
    pub user_id: DbId,
    pub category_id: Option<DbId>,
    pub title: String,
    pub slug: String,
    pub description: Option<String>,
    pub difficulty: String,
    pub servings: Option<i32>,
    pub cook_time_min: Option<i32>,
    pub thumbnail_url: Option<String>,
    pub status: String,
    pub likes_count: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from the `steps` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Step {
    pub id: DbId,
    pub recipe_id: DbId,
    pub step_number: i32,
    pub description: String,
}

/// A row from the `step_images` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct StepImage {
    pub id: DbId,
    pub step_id: DbId,
    pub image_url: String,
    pub position: i32,
}

/// A step together with its image URLs in insertion order.
#[derive(Debug, Clone, Serialize)]
pub struct StepWithImages {
    #[serde(flatten)]
    pub step: Step,
    pub image_urls: Vec<String>,
}

/// Full read model of a recipe.
#[derive(Debug, Clone, Serialize)]
pub struct RecipeDetail {
    #[serde(flatten)]
    pub recipe: Recipe,
    pub category: Option<String>,
    pub author_username: String,
    pub ingredients: Vec<RecipeIngredient>,
    pub steps: Vec<StepWithImages>,
}

// ---------------------------------------------------------------------------
// Save input
// ---------------------------------------------------------------------------

fn default_difficulty() -> String {
    DIFFICULTY_EASY.to_string()
}

/// Category as submitted: a numeric id, or a name (or digit string).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum CategoryRef {
    Id(DbId),
    Text(String),
}

impl CategoryRef {
    /// Interpret the submitted value. Digit-only text is an id; blank text
    /// means no category.
    pub fn to_filter(&self) -> Result<Option<CategoryFilter>, CoreError> {
        match self {
            Self::Id(id) => Ok(Some(CategoryFilter::Id(*id))),
            Self::Text(text) => CategoryFilter::parse(Some(text)),
        }
    }
}

/// One submitted ingredient line.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct IngredientInput {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    pub amount: Option<f64>,
    #[validate(length(max = 32))]
    pub unit: Option<String>,
}

/// One submitted step. Any client-side `step_number` is ignored; steps are
/// renumbered 1..N in submission order.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct StepInput {
    #[serde(default)]
    pub step_number: Option<i32>,
    #[validate(length(min = 1))]
    pub description: String,
    /// URLs of images already uploaded to object storage.
    #[serde(default)]
    pub image_urls: Vec<String>,
}

/// DTO for creating or fully replacing a recipe.
///
/// On update, `thumbnail_url: None` keeps the stored thumbnail.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SaveRecipe {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    pub description: Option<String>,
    /// Category id or name; names resolve case-insensitively at save time.
    #[serde(default, alias = "category_id")]
    pub category: Option<CategoryRef>,
    #[serde(default = "default_difficulty")]
    pub difficulty: String,
    #[validate(range(min = 1))]
    pub servings: Option<i32>,
    #[validate(range(min = 0))]
    pub cook_time_min: Option<i32>,
    pub thumbnail_url: Option<String>,
    /// `published` (default) or `draft`.
    pub status: Option<String>,
    #[serde(default)]
    #[validate(nested)]
    pub ingredients: Vec<IngredientInput>,
    #[serde(default)]
    #[validate(nested)]
    pub steps: Vec<StepInput>,
}

impl SaveRecipe {
    /// Status to persist, falling back to `published`.
    pub fn effective_status(&self) -> &str {
        self.status.as_deref().unwrap_or(STATUS_PUBLISHED)
    }

    /// Parsed category, if one was submitted.
    pub fn category_filter(&self) -> Result<Option<CategoryFilter>, CoreError> {
        match &self.category {
            Some(category) => category.to_filter(),
            None => Ok(None),
        }
    }

    /// Check domain rules that the derive-based shape validation cannot
    /// express. Runs before any statement is issued.
    pub fn check(&self) -> Result<(), CoreError> {
        validate_title(&self.title)?;
        self.category_filter()?;
        validate_difficulty(&self.difficulty)?;
        validate_save_status(self.effective_status())?;
        validate_servings(self.servings)?;
        validate_cook_time(self.cook_time_min)?;

        let mut seen: Vec<String> = Vec::with_capacity(self.ingredients.len());
        for ingredient in &self.ingredients {
            let folded = normalize_ingredient_name(&ingredient.name)?.to_lowercase();
            if seen.contains(&folded) {
                return Err(CoreError::Validation(format!(
                    "Ingredient '{}' is listed more than once",
                    ingredient.name.trim()
                )));
            }
            seen.push(folded);
        }

        if self.steps.iter().any(|s| s.description.trim().is_empty()) {
            return Err(CoreError::Validation(
                "Step description must not be empty".into(),
            ));
        }
        Ok(())
    }
}

/// Core fields returned after a successful save.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SavedRecipe {
    pub id: DbId,
    pub title: String,
    pub slug: String,
    pub status: String,
    pub thumbnail_url: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Result of a committed save.
#[derive(Debug, Clone)]
pub struct SaveOutcome {
    pub recipe: SavedRecipe,
    /// Previous thumbnail that was replaced by a different URL; the caller
    /// schedules its deletion after commit.
    pub stale_thumbnail_url: Option<String>,
}
