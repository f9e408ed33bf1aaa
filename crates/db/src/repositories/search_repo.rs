//! Repository for recipe search and title suggestions.
//!
//! The count query and the page query are assembled from the same
//! [`push_filters`] call, so both always see identical predicates and
//! parameter bindings; only the projection and the bounds differ.

use cookiejar_core::recipe::STATUS_PUBLISHED;
use cookiejar_core::search::{
    build_prefix_tsquery, dedupe_names, escape_like, page_offset, CategoryFilter, SUGGESTION_LIMIT,
    TS_CONFIG,
};
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::models::search::{RecipeSearchQuery, RecipeSummary, SearchPage};

/// Projection shared by every search result row. Expects `r`, `u`, `c`.
const SUMMARY_COLUMNS: &str = "\
    r.id, r.slug, r.title, r.description, r.category_id, c.name AS category, \
    r.difficulty, r.servings, r.cook_time_min, r.thumbnail_url, r.likes_count, \
    r.user_id AS author_id, u.username AS author_username, r.created_at";

/// Join tree shared by the count and page queries.
const FROM_CLAUSE: &str = " FROM recipes r \
    JOIN users u ON u.id = r.user_id \
    LEFT JOIN categories c ON c.id = r.category_id";

/// Provides recipe search operations.
pub struct SearchRepo;

impl SearchRepo {
    // -----------------------------------------------------------------------
    // Search
    // -----------------------------------------------------------------------

    /// Search published recipes.
    ///
    /// Title terms are prefix-matched and all must hit. Included ingredients
    /// must all be linked to a recipe; excluded ingredients must not be
    /// linked at all. `total` counts every match, ignoring pagination.
    pub async fn search(
        pool: &PgPool,
        query: &RecipeSearchQuery,
    ) -> Result<SearchPage, sqlx::Error> {
        let filters = SearchFilters::from_query(query);
        let page = query.page.max(1);
        let limit = query.limit.max(1);
        let offset = page_offset(page, limit);

        let mut count_qb = QueryBuilder::<Postgres>::new("SELECT COUNT(*)");
        count_qb.push(FROM_CLAUSE);
        push_filters(&mut count_qb, &filters);
        let total: i64 = count_qb.build_query_scalar().fetch_one(pool).await?;

        if total == 0 || offset >= total {
            return Ok(SearchPage {
                results: Vec::new(),
                total,
                page,
                limit,
            });
        }

        let mut page_qb = QueryBuilder::<Postgres>::new("SELECT ");
        page_qb.push(SUMMARY_COLUMNS);

        page_qb.push(", ");
        match &filters.tsquery {
            Some(tsquery) => {
                page_qb.push(format!(
                    "ts_rank(r.search_vector, to_tsquery('{TS_CONFIG}', "
                ));
                page_qb.push_bind(tsquery.clone());
                page_qb.push("))");
            }
            None => {
                page_qb.push("0::REAL");
            }
        }
        page_qb.push(" AS rank");

        match query.viewer_id {
            Some(viewer_id) => {
                page_qb.push(
                    ", EXISTS (SELECT 1 FROM likes l \
                     WHERE l.recipe_id = r.id AND l.user_id = ",
                );
                page_qb.push_bind(viewer_id);
                page_qb.push(
                    ") AS is_liked, EXISTS (SELECT 1 FROM collection_recipes cr \
                     JOIN collections col ON col.id = cr.collection_id \
                     WHERE cr.recipe_id = r.id AND col.user_id = ",
                );
                page_qb.push_bind(viewer_id);
                page_qb.push(") AS is_saved");
            }
            None => {
                page_qb.push(", FALSE AS is_liked, FALSE AS is_saved");
            }
        }

        page_qb.push(FROM_CLAUSE);
        push_filters(&mut page_qb, &filters);
        page_qb.push(" ORDER BY ");
        page_qb.push(query.sort.order_by());
        page_qb.push(" LIMIT ");
        page_qb.push_bind(limit);
        page_qb.push(" OFFSET ");
        page_qb.push_bind(offset);

        let results = page_qb
            .build_query_as::<RecipeSummary>()
            .fetch_all(pool)
            .await?;

        Ok(SearchPage {
            results,
            total,
            page,
            limit,
        })
    }

    // -----------------------------------------------------------------------
    // Suggestions
    // -----------------------------------------------------------------------

    /// Up to five published titles containing `partial` (case-insensitive),
    /// most liked first. Blank input returns nothing without querying.
    pub async fn suggest_titles(pool: &PgPool, partial: &str) -> Result<Vec<String>, sqlx::Error> {
        let partial = partial.trim();
        if partial.is_empty() {
            return Ok(Vec::new());
        }

        let pattern = format!("%{}%", escape_like(partial));
        sqlx::query_scalar(
            "SELECT title FROM recipes \
             WHERE status = $1 AND title ILIKE $2 ESCAPE '\\' \
             ORDER BY likes_count DESC, created_at DESC, id DESC \
             LIMIT $3",
        )
        .bind(STATUS_PUBLISHED)
        .bind(pattern)
        .bind(SUGGESTION_LIMIT)
        .fetch_all(pool)
        .await
    }
}

// ---------------------------------------------------------------------------
// Predicate composition
// ---------------------------------------------------------------------------

/// Normalised filter values, computed once per search.
struct SearchFilters {
    tsquery: Option<String>,
    /// Case-folded, de-duplicated names.
    include: Vec<String>,
    exclude: Vec<String>,
    difficulty: Option<String>,
    category: Option<CategoryFilter>,
}

impl SearchFilters {
    fn from_query(query: &RecipeSearchQuery) -> Self {
        let fold = |names: &[String]| {
            dedupe_names(names.iter().map(|n| n.trim().to_lowercase()))
        };
        Self {
            tsquery: build_prefix_tsquery(&query.title),
            include: fold(&query.include_ingredients),
            exclude: fold(&query.exclude_ingredients),
            difficulty: query.difficulty.clone(),
            category: query.category.clone(),
        }
    }
}

/// Append the `WHERE` clause for `filters`. Only supplied filters add a
/// predicate; `status = published` is always present.
fn push_filters(qb: &mut QueryBuilder<'_, Postgres>, filters: &SearchFilters) {
    qb.push(" WHERE r.status = ");
    qb.push_bind(STATUS_PUBLISHED);

    if let Some(tsquery) = &filters.tsquery {
        qb.push(format!(
            " AND r.search_vector @@ to_tsquery('{TS_CONFIG}', "
        ));
        qb.push_bind(tsquery.clone());
        qb.push(")");
    }

    // All-of: the recipe must match as many distinct names as were asked for.
    if !filters.include.is_empty() {
        qb.push(
            " AND r.id IN (SELECT ri.recipe_id FROM recipe_ingredients ri \
             JOIN ingredients i ON i.id = ri.ingredient_id \
             WHERE LOWER(i.name) = ANY(",
        );
        qb.push_bind(filters.include.clone());
        qb.push(") GROUP BY ri.recipe_id HAVING COUNT(DISTINCT LOWER(i.name)) = ");
        qb.push_bind(filters.include.len() as i64);
        qb.push(")");
    }

    // None-of.
    if !filters.exclude.is_empty() {
        qb.push(
            " AND NOT EXISTS (SELECT 1 FROM recipe_ingredients ri \
             JOIN ingredients i ON i.id = ri.ingredient_id \
             WHERE ri.recipe_id = r.id AND LOWER(i.name) = ANY(",
        );
        qb.push_bind(filters.exclude.clone());
        qb.push("))");
    }

    if let Some(difficulty) = &filters.difficulty {
        qb.push(" AND r.difficulty = ");
        qb.push_bind(difficulty.clone());
    }

    match &filters.category {
        Some(CategoryFilter::Id(id)) => {
            qb.push(" AND r.category_id = ");
            qb.push_bind(*id);
        }
        Some(CategoryFilter::Name(name)) => {
            qb.push(" AND r.category_id IN (SELECT id FROM categories WHERE LOWER(name) = LOWER(");
            qb.push_bind(name.clone());
            qb.push("))");
        }
        None => {}
    }
}
