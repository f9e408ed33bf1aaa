//! Recipe search models: the parsed query, result rows, the paginated
//! response, and search-history entries.

use cookiejar_core::error::CoreError;
use cookiejar_core::recipe::validate_difficulty;
use cookiejar_core::search::{
    clamp_limit, clamp_page, parse_name_list, CategoryFilter, SortMode, DEFAULT_SEARCH_LIMIT,
    MAX_SEARCH_LIMIT,
};
use cookiejar_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

// ---------------------------------------------------------------------------
// Query
// ---------------------------------------------------------------------------

/// A fully parsed recipe search.
///
/// Ingredient names are matched case-insensitively against the catalog.
#[derive(Debug, Clone)]
pub struct RecipeSearchQuery {
    pub title: String,
    pub include_ingredients: Vec<String>,
    pub exclude_ingredients: Vec<String>,
    pub difficulty: Option<String>,
    pub category: Option<CategoryFilter>,
    pub sort: SortMode,
    /// 1-based page number.
    pub page: i64,
    pub limit: i64,
    /// When set, `is_liked` / `is_saved` are computed for this user.
    pub viewer_id: Option<DbId>,
}

impl Default for RecipeSearchQuery {
    fn default() -> Self {
        Self {
            title: String::new(),
            include_ingredients: Vec::new(),
            exclude_ingredients: Vec::new(),
            difficulty: None,
            category: None,
            sort: SortMode::default(),
            page: 1,
            limit: DEFAULT_SEARCH_LIMIT,
            viewer_id: None,
        }
    }
}

/// Query parameters for the recipe search endpoint.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RecipeSearchParams {
    /// Free-text title query.
    pub title: Option<String>,
    /// Comma-separated ingredient names that must all be present.
    pub include: Option<String>,
    /// Comma-separated ingredient names that must all be absent.
    pub exclude: Option<String>,
    pub difficulty: Option<String>,
    /// Category id or name.
    pub category: Option<String>,
    pub sort: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl RecipeSearchParams {
    /// Parse raw parameters into a query, applying defaults for anything
    /// missing.
    pub fn into_query(self, viewer_id: Option<DbId>) -> Result<RecipeSearchQuery, CoreError> {
        let difficulty = match self.difficulty.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(d) => {
                let d = d.to_ascii_lowercase();
                validate_difficulty(&d)?;
                Some(d)
            }
        };

        Ok(RecipeSearchQuery {
            title: self.title.unwrap_or_default().trim().to_string(),
            include_ingredients: parse_name_list(self.include.as_deref()),
            exclude_ingredients: parse_name_list(self.exclude.as_deref()),
            difficulty,
            category: CategoryFilter::parse(self.category.as_deref())?,
            sort: SortMode::parse(self.sort.as_deref())?,
            page: clamp_page(self.page),
            limit: clamp_limit(self.limit, DEFAULT_SEARCH_LIMIT, MAX_SEARCH_LIMIT),
            viewer_id,
        })
    }
}

// ---------------------------------------------------------------------------
// Results
// ---------------------------------------------------------------------------

/// One published recipe in a search result page.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct RecipeSummary {
    pub id: DbId,
    pub slug: String,
    pub title: String,
    pub description: Option<String>,
    pub category_id: Option<DbId>,
    pub category: Option<String>,
    pub difficulty: String,
    pub servings: Option<i32>,
    pub cook_time_min: Option<i32>,
    pub thumbnail_url: Option<String>,
    pub likes_count: i32,
    pub author_id: DbId,
    pub author_username: String,
    pub created_at: Timestamp,
    /// Full-text relevance; 0 when no title was searched.
    pub rank: f32,
    pub is_liked: bool,
    pub is_saved: bool,
}

/// A page of search results plus the unpaginated match count.
#[derive(Debug, Clone, Serialize)]
pub struct SearchPage {
    pub results: Vec<RecipeSummary>,
    pub total: i64,
    pub page: i64,
    pub limit: i64,
}

/// Query parameters for title suggestions.
#[derive(Debug, Clone, Deserialize)]
pub struct SuggestParams {
    #[serde(default)]
    pub q: String,
}

// ---------------------------------------------------------------------------
// Search history
// ---------------------------------------------------------------------------

/// A row from the `search_history` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SearchHistoryEntry {
    pub id: DbId,
    pub query: String,
    pub searched_at: Timestamp,
}
