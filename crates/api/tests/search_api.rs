//! HTTP-level integration tests for search, suggestions and search history.
//!
//! Recipes are created through the repository layer; behaviour is verified
//! through the HTTP API.

mod common;

use axum::body::Body;
use axum::http::{HeaderValue, Request, StatusCode};
use common::{
    body_json, build_test_app, create_user, delete, eventually, get, get_auth, token_for,
};
use cookiejar_core::types::DbId;
use cookiejar_db::models::recipe::{IngredientInput, SaveRecipe, StepInput};
use cookiejar_db::repositories::{RecipeRepo, SearchHistoryRepo};
use serde_json::Value;
use sqlx::PgPool;
use tower::ServiceExt;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_recipe(title: &str, ingredients: &[&str]) -> SaveRecipe {
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
            .map(|name| IngredientInput {
                name: name.to_string(),
                amount: None,
                unit: None,
            })
            .collect(),
        steps: vec![StepInput {
            step_number: None,
            description: "Bake.".to_string(),
            image_urls: vec![],
        }],
    }
}

async fn seed(pool: &PgPool, user_id: DbId, title: &str, ingredients: &[&str]) -> DbId {
    RecipeRepo::save(pool, user_id, None, &new_recipe(title, ingredients))
        .await
        .unwrap()
        .recipe
        .id
}

fn result_ids(json: &Value) -> Vec<i64> {
    json["data"]["results"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["id"].as_i64().unwrap())
        .collect()
}

// ---------------------------------------------------------------------------
// Search
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn anonymous_search_returns_envelope(pool: PgPool) {
    let user = create_user(&pool, "alice").await;
    let cake = seed(&pool, user, "Choco Cake", &["Flour", "Cocoa"]).await;
    seed(&pool, user, "Lemon Tart", &["Flour", "Lemon"]).await;

    let response = get(build_test_app(pool), "/api/v1/recipes/search?title=choco").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(result_ids(&json), vec![cake]);
    assert_eq!(json["data"]["total"], 1);
    assert_eq!(json["data"]["page"], 1);
    assert_eq!(json["data"]["limit"], 20);

    let row = &json["data"]["results"][0];
    assert_eq!(row["author_username"], "alice");
    assert_eq!(row["is_liked"], false);
    assert_eq!(row["is_saved"], false);
    assert!(row["rank"].as_f64().unwrap() > 0.0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn ingredient_lists_are_comma_separated(pool: PgPool) {
    let user = create_user(&pool, "alice").await;
    let a = seed(&pool, user, "Shortbread", &["Flour", "Sugar"]).await;
    seed(&pool, user, "Pasta", &["Flour", "Eggs"]).await;

    let json = body_json(
        get(
            build_test_app(pool.clone()),
            "/api/v1/recipes/search?include=flour,%20sugar",
        )
        .await,
    )
    .await;
    assert_eq!(result_ids(&json), vec![a]);

    let response = get(build_test_app(pool), "/api/v1/recipes/search?exclude=Eggs").await;
    let json = body_json(response).await;
    assert_eq!(result_ids(&json), vec![a]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn pagination_parameters_are_clamped(pool: PgPool) {
    let user = create_user(&pool, "alice").await;
    for n in 1..=3 {
        seed(&pool, user, &format!("Cookie {n}"), &[]).await;
    }

    let json = body_json(
        get(
            build_test_app(pool.clone()),
            "/api/v1/recipes/search?page=0&limit=1000&sort=newest",
        )
        .await,
    )
    .await;
    assert_eq!(json["data"]["page"], 1);
    assert_eq!(json["data"]["limit"], 100);
    assert_eq!(json["data"]["total"], 3);

    let json = body_json(
        get(build_test_app(pool), "/api/v1/recipes/search?page=2&limit=2&sort=oldest").await,
    )
    .await;
    assert_eq!(json["data"]["results"].as_array().unwrap().len(), 1);
    assert_eq!(json["data"]["results"][0]["title"], "Cookie 3");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn bad_parameters_return_400(pool: PgPool) {
    for uri in [
        "/api/v1/recipes/search?sort=sideways",
        "/api/v1/recipes/search?difficulty=brutal",
    ] {
        let response = get(build_test_app(pool.clone()), uri).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn malformed_query_string_returns_400(pool: PgPool) {
    for uri in [
        "/api/v1/recipes/search?page=abc",
        "/api/v1/recipes/search?limit=9223372036854775808",
    ] {
        let response = get(build_test_app(pool.clone()), uri).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(body_json(response).await["code"], "BAD_REQUEST");
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn page_far_past_the_end_is_empty(pool: PgPool) {
    let user = create_user(&pool, "alice").await;
    seed(&pool, user, "Cookie", &[]).await;

    let response = get(
        build_test_app(pool),
        "/api/v1/recipes/search?page=9223372036854775807",
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["total"], 1);
    assert!(json["data"]["results"].as_array().unwrap().is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn present_but_invalid_authorization_is_rejected(pool: PgPool) {
    let response = get_auth(
        build_test_app(pool.clone()),
        "/api/v1/recipes/search?title=cake",
        "not-a-jwt",
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // Bytes outside visible ASCII cannot be decoded as a header string.
    let request = Request::builder()
        .uri("/api/v1/recipes/search?title=cake")
        .header("Authorization", HeaderValue::from_bytes(b"Bearer \xff\xfe").unwrap())
        .body(Body::empty())
        .unwrap();
    let response = build_test_app(pool).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["code"], "UNAUTHORIZED");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn viewer_sees_own_like_flags(pool: PgPool) {
    let author = create_user(&pool, "alice").await;
    let viewer = create_user(&pool, "bob").await;
    let cake = seed(&pool, author, "Choco Cake", &[]).await;

    sqlx::query("INSERT INTO likes (user_id, recipe_id) VALUES ($1, $2)")
        .bind(viewer)
        .bind(cake)
        .execute(&pool)
        .await
        .unwrap();

    let json = body_json(
        get_auth(
            build_test_app(pool),
            "/api/v1/recipes/search?title=cake",
            &token_for(viewer),
        )
        .await,
    )
    .await;
    assert_eq!(json["data"]["results"][0]["is_liked"], true);
    assert_eq!(json["data"]["results"][0]["is_saved"], false);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn authenticated_search_is_recorded_in_history(pool: PgPool) {
    let user = create_user(&pool, "alice").await;
    let token = token_for(user);

    let response = get_auth(
        build_test_app(pool.clone()),
        "/api/v1/recipes/search?title=%20choco%20",
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let recorded = eventually(|| {
        let pool = pool.clone();
        async move {
            SearchHistoryRepo::list(&pool, user)
                .await
                .map(|entries| entries.iter().any(|e| e.query == "choco"))
                .unwrap_or(false)
        }
    })
    .await;
    assert!(recorded, "search should be recorded in the background");

    // Browsing without a title records nothing.
    get_auth(build_test_app(pool.clone()), "/api/v1/recipes/search", &token).await;
    tokio::time::sleep(std::time::Duration::from_millis(100)).await;
    assert_eq!(SearchHistoryRepo::list(&pool, user).await.unwrap().len(), 1);
}

// ---------------------------------------------------------------------------
// Suggestions
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn suggest_returns_matching_titles(pool: PgPool) {
    let user = create_user(&pool, "alice").await;
    seed(&pool, user, "Choco Cake", &[]).await;
    seed(&pool, user, "Lemon Tart", &[]).await;

    let response = get(build_test_app(pool.clone()), "/api/v1/recipes/suggest?q=cho").await;
    let json = body_json(response).await;
    assert_eq!(json["data"], serde_json::json!(["Choco Cake"]));

    let json = body_json(get(build_test_app(pool), "/api/v1/recipes/suggest").await).await;
    assert_eq!(json["data"], serde_json::json!([]));
}

// ---------------------------------------------------------------------------
// Search history
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn history_requires_auth(pool: PgPool) {
    let response = get(build_test_app(pool), "/api/v1/search-history").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn history_list_delete_and_clear(pool: PgPool) {
    let user = create_user(&pool, "alice").await;
    let other = create_user(&pool, "bob").await;
    let token = token_for(user);
    for q in ["cake", "bread", "soup"] {
        SearchHistoryRepo::record(&pool, user, q).await.unwrap();
    }

    let response = get_auth(build_test_app(pool.clone()), "/api/v1/search-history", &token).await;
    let json = body_json(response).await;
    let entries = json["data"].as_array().unwrap();
    let queries: Vec<&str> = entries.iter().map(|e| e["query"].as_str().unwrap()).collect();
    assert_eq!(queries, vec!["soup", "bread", "cake"]);
    let soup_id = entries[0]["id"].as_i64().unwrap();

    // Another user cannot delete it.
    let response = delete(
        build_test_app(pool.clone()),
        &format!("/api/v1/search-history/{soup_id}"),
        &token_for(other),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = delete(
        build_test_app(pool.clone()),
        &format!("/api/v1/search-history/{soup_id}"),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert_eq!(SearchHistoryRepo::list(&pool, user).await.unwrap().len(), 2);

    let response = delete(build_test_app(pool.clone()), "/api/v1/search-history", &token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert!(SearchHistoryRepo::list(&pool, user).await.unwrap().is_empty());
}
