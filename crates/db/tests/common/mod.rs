//! Shared fixtures for repository integration tests.

#![allow(dead_code)]

use cookiejar_core::types::DbId;
use cookiejar_db::models::recipe::{IngredientInput, SaveRecipe, StepInput};
use cookiejar_db::models::user::CreateUser;
use cookiejar_db::repositories::{RecipeRepo, UserRepo};
use sqlx::PgPool;

pub async fn create_user(pool: &PgPool, username: &str) -> DbId {
    UserRepo::create(
        pool,
        &CreateUser {
            username: username.to_string(),
            email: format!("{username}@example.com"),
        },
    )
    .await
    .unwrap()
    .id
}

/// Id of one of the seeded categories.
pub async fn category_id(pool: &PgPool, name: &str) -> DbId {
    sqlx::query_scalar("SELECT id FROM categories WHERE name = $1")
        .bind(name)
        .fetch_one(pool)
        .await
        .unwrap()
}

pub fn ingredient(name: &str, amount: Option<f64>, unit: Option<&str>) -> IngredientInput {
    IngredientInput {
        name: name.to_string(),
        amount,
        unit: unit.map(str::to_string),
    }
}

pub fn step(description: &str, image_urls: &[&str]) -> StepInput {
    StepInput {
        step_number: None,
        description: description.to_string(),
        image_urls: image_urls.iter().map(|s| s.to_string()).collect(),
    }
}

/// A minimal published recipe with the given ingredient names.
pub fn recipe_input(title: &str, ingredients: &[&str]) -> SaveRecipe {
    SaveRecipe {
        title: title.to_string(),
        description: None,
        category: None,
        difficulty: "easy".to_string(),
        servings: None,
        cook_time_min: None,
        thumbnail_url: None,
        status: None,
        ingredients: ingredients
            .iter()
            .map(|n| ingredient(n, None, None))
            .collect(),
        steps: vec![step("Mix and bake.", &[])],
    }
}

/// Create a recipe and return its id.
pub async fn create_recipe(pool: &PgPool, user_id: DbId, input: &SaveRecipe) -> DbId {
    RecipeRepo::save(pool, user_id, None, input)
        .await
        .unwrap()
        .recipe
        .id
}

pub async fn like(pool: &PgPool, user_id: DbId, recipe_id: DbId) {
    sqlx::query("INSERT INTO likes (user_id, recipe_id) VALUES ($1, $2)")
        .bind(user_id)
        .bind(recipe_id)
        .execute(pool)
        .await
        .unwrap();
    sqlx::query("UPDATE recipes SET likes_count = likes_count + 1 WHERE id = $1")
        .bind(recipe_id)
        .execute(pool)
        .await
        .unwrap();
}

/// Put a recipe into a new collection owned by `user_id`.
pub async fn save_to_jar(pool: &PgPool, user_id: DbId, recipe_id: DbId) -> DbId {
    let collection_id: DbId = sqlx::query_scalar(
        "INSERT INTO collections (user_id, name) VALUES ($1, 'Jar') RETURNING id",
    )
    .bind(user_id)
    .fetch_one(pool)
    .await
    .unwrap();
    sqlx::query("INSERT INTO collection_recipes (collection_id, recipe_id) VALUES ($1, $2)")
        .bind(collection_id)
        .bind(recipe_id)
        .execute(pool)
        .await
        .unwrap();
    collection_id
}
