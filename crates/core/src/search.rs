//! Recipe search constants and query-building helpers.
//!
//! This module lives in `core` (zero internal deps) so the repository layer
//! and the HTTP layer agree on how raw request values are interpreted.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Pagination / limits
// ---------------------------------------------------------------------------

/// Default number of search results per page.
pub const DEFAULT_SEARCH_LIMIT: i64 = 20;

/// Maximum number of search results per page.
pub const MAX_SEARCH_LIMIT: i64 = 100;

/// Number of title suggestions returned for search-as-you-type.
pub const SUGGESTION_LIMIT: i64 = 5;

/// Number of distinct queries retained per viewer in search history.
pub const HISTORY_LIMIT: i64 = 10;

/// Text search configuration used for both the stored vector and queries.
///
/// `simple` does no stemming and has no stop words, so every query term is a
/// plain lowercase prefix of a title word.
pub const TS_CONFIG: &str = "simple";

// ---------------------------------------------------------------------------
// Sort mode
// ---------------------------------------------------------------------------

/// Result ordering requested by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortMode {
    /// Relevance rank, then recency. Rank is 0 without a title, so this is
    /// plain recency when browsing.
    #[default]
    Relevance,
    Newest,
    Oldest,
    /// Relevance rank, then like count, then recency.
    Popular,
}

impl SortMode {
    /// Parse a `sort` request value. Missing or blank values use the default.
    pub fn parse(value: Option<&str>) -> Result<Self, CoreError> {
        let value = match value.map(str::trim) {
            None | Some("") => return Ok(Self::default()),
            Some(v) => v,
        };
        match value.to_ascii_lowercase().as_str() {
            "relevance" | "default" => Ok(Self::Relevance),
            "newest" => Ok(Self::Newest),
            "oldest" => Ok(Self::Oldest),
            "popular" | "likes" => Ok(Self::Popular),
            other => Err(CoreError::Validation(format!(
                "Invalid sort '{other}'. Valid sorts: relevance, newest, oldest, popular, likes"
            ))),
        }
    }

    /// SQL `ORDER BY` body for this mode. Expects the projection to expose
    /// `rank` and the recipe table aliased as `r`.
    ///
    /// Every ordering ends on `r.id` so pages never overlap on ties.
    pub fn order_by(self) -> &'static str {
        match self {
            Self::Relevance => "rank DESC, r.created_at DESC, r.id DESC",
            Self::Newest => "r.created_at DESC, r.id DESC",
            Self::Oldest => "r.created_at ASC, r.id ASC",
            Self::Popular => "rank DESC, r.likes_count DESC, r.created_at DESC, r.id DESC",
        }
    }
}

// ---------------------------------------------------------------------------
// Category filter
// ---------------------------------------------------------------------------

/// A category filter supplied either as a numeric id or as a free-text name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryFilter {
    Id(DbId),
    Name(String),
}

impl CategoryFilter {
    /// Detect whether a raw category value is an id or a name.
    ///
    /// All-digit values are ids; anything else is matched by name. Blank
    /// input means no category filter.
    pub fn parse(value: Option<&str>) -> Result<Option<Self>, CoreError> {
        let value = match value.map(str::trim) {
            None | Some("") => return Ok(None),
            Some(v) => v,
        };
        if value.chars().all(|c| c.is_ascii_digit()) {
            let id = value.parse::<DbId>().map_err(|_| {
                CoreError::Validation(format!("Category id '{value}' is out of range"))
            })?;
            Ok(Some(Self::Id(id)))
        } else {
            Ok(Some(Self::Name(value.to_string())))
        }
    }
}

// ---------------------------------------------------------------------------
// Query builder helpers
// ---------------------------------------------------------------------------

/// Split user input into tsquery-safe terms.
///
/// Keeps only alphanumeric characters of each whitespace-separated word and
/// drops words that end up empty. Returns `None` when nothing usable remains.
fn sanitize_terms(query: &str) -> Option<Vec<String>> {
    let terms: Vec<String> = query
        .split_whitespace()
        .map(|t| t.chars().filter(|c| c.is_alphanumeric()).collect::<String>())
        .filter(|t| !t.is_empty())
        .map(|t| t.to_lowercase())
        .collect();

    if terms.is_empty() {
        None
    } else {
        Some(terms)
    }
}

/// Build a prefix tsquery where every term is a "starts-with" match and all
/// terms must match.
///
/// # Examples
///
/// ```
/// use cookiejar_core::search::build_prefix_tsquery;
/// assert_eq!(build_prefix_tsquery("choco"), Some("choco:*".to_string()));
/// assert_eq!(build_prefix_tsquery("Choco Ca"), Some("choco:* & ca:*".to_string()));
/// assert_eq!(build_prefix_tsquery("  "), None);
/// ```
pub fn build_prefix_tsquery(query: &str) -> Option<String> {
    let terms = sanitize_terms(query)?;
    let prefixed: Vec<String> = terms.into_iter().map(|t| format!("{t}:*")).collect();
    Some(prefixed.join(" & "))
}

/// Clamp a user-provided limit to valid bounds.
pub fn clamp_limit(limit: Option<i64>, default: i64, max: i64) -> i64 {
    limit.unwrap_or(default).max(1).min(max)
}

/// Normalise a 1-based page number. Missing or non-positive pages are page 1.
pub fn clamp_page(page: Option<i64>) -> i64 {
    page.unwrap_or(1).max(1)
}

/// Row offset for a 1-based page. Saturates instead of overflowing, so an
/// absurd page number lands past the end of any result set.
pub fn page_offset(page: i64, limit: i64) -> i64 {
    (page.max(1) - 1).saturating_mul(limit.max(0))
}

/// Trim, drop blanks and collapse duplicates in a list of ingredient names,
/// keeping first-seen order.
pub fn dedupe_names<I, S>(names: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out: Vec<String> = Vec::new();
    for name in names {
        let name = name.as_ref().trim();
        if !name.is_empty() && !out.iter().any(|n| n == name) {
            out.push(name.to_string());
        }
    }
    out
}

/// Parse a comma-separated list of ingredient names.
pub fn parse_name_list(value: Option<&str>) -> Vec<String> {
    match value {
        Some(s) => dedupe_names(s.split(',')),
        None => Vec::new(),
    }
}

/// Escape `%`, `_` and `\` so user input is matched literally by `ILIKE`.
pub fn escape_like(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
