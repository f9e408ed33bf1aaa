//! Global ingredient catalog.

use cookiejar_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `ingredients` table. Names are unique case-insensitively.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Ingredient {
    pub id: DbId,
    pub name: String,
    pub created_at: Timestamp,
}

/// An ingredient as linked to a recipe, with its quantity.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct RecipeIngredient {
    pub ingredient_id: DbId,
    pub name: String,
    pub amount: Option<f64>,
    pub unit: Option<String>,
}
