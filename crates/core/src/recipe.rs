//! Recipe field rules: slug derivation and validation of the values a save
//! is allowed to persist.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Difficulty
// ---------------------------------------------------------------------------

pub const DIFFICULTY_EASY: &str = "easy";
pub const DIFFICULTY_MEDIUM: &str = "medium";
pub const DIFFICULTY_HARD: &str = "hard";

/// All valid recipe difficulties.
pub const VALID_DIFFICULTIES: &[&str] = &[DIFFICULTY_EASY, DIFFICULTY_MEDIUM, DIFFICULTY_HARD];

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

pub const STATUS_PUBLISHED: &str = "published";
pub const STATUS_DRAFT: &str = "draft";
pub const STATUS_DELETED: &str = "deleted";

/// Statuses a caller may set through a save. `deleted` is only reachable
/// through the soft-delete path.
pub const SAVEABLE_STATUSES: &[&str] = &[STATUS_PUBLISHED, STATUS_DRAFT];

/// Maximum title length in characters.
pub const MAX_TITLE_LEN: usize = 200;

// ---------------------------------------------------------------------------
// Slug generation
// ---------------------------------------------------------------------------

static NON_SLUG_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9\s_-]").expect("valid regex"));

static SEPARATOR_RUNS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\s_-]+").expect("valid regex"));

/// Derive a URL-safe slug from a recipe title.
///
/// Lowercases, strips everything that is not an ASCII letter, digit,
/// whitespace, underscore or hyphen, collapses runs of whitespace/underscores/
/// hyphens into a single hyphen, and trims leading/trailing hyphens. The
/// result never needs percent-encoding.
pub fn generate_slug(title: &str) -> String {
    let lowered = title.trim().to_lowercase();
    let stripped = NON_SLUG_CHARS.replace_all(&lowered, "");
    let hyphenated = SEPARATOR_RUNS.replace_all(&stripped, "-");
    hyphenated.trim_matches('-').to_string()
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate a recipe title (non-empty, bounded, slug-able).
pub fn validate_title(title: &str) -> Result<(), CoreError> {
    if title.trim().is_empty() {
        return Err(CoreError::Validation("Title must not be empty".into()));
    }
    if title.chars().count() > MAX_TITLE_LEN {
        return Err(CoreError::Validation(format!(
            "Title must be at most {MAX_TITLE_LEN} characters"
        )));
    }
    if generate_slug(title).is_empty() {
        return Err(CoreError::Validation(
            "Title must contain at least one ASCII letter or digit".into(),
        ));
    }
    Ok(())
}

/// Validate a difficulty against the known set.
pub fn validate_difficulty(difficulty: &str) -> Result<(), CoreError> {
    if !VALID_DIFFICULTIES.contains(&difficulty) {
        return Err(CoreError::Validation(format!(
            "Invalid difficulty '{difficulty}'. Valid difficulties: {}",
            VALID_DIFFICULTIES.join(", ")
        )));
    }
    Ok(())
}

/// Validate a status supplied on save.
pub fn validate_save_status(status: &str) -> Result<(), CoreError> {
    if !SAVEABLE_STATUSES.contains(&status) {
        return Err(CoreError::Validation(format!(
            "Invalid status '{status}'. Valid statuses: {}",
            SAVEABLE_STATUSES.join(", ")
        )));
    }
    Ok(())
}

/// Servings must be positive when present.
pub fn validate_servings(servings: Option<i32>) -> Result<(), CoreError> {
    match servings {
        Some(n) if n < 1 => Err(CoreError::Validation(
            "Servings must be a positive integer".into(),
        )),
        _ => Ok(()),
    }
}

/// Cook time must be non-negative when present.
pub fn validate_cook_time(cook_time_min: Option<i32>) -> Result<(), CoreError> {
    match cook_time_min {
        Some(n) if n < 0 => Err(CoreError::Validation(
            "Cook time must not be negative".into(),
        )),
        _ => Ok(()),
    }
}

/// Trim an ingredient name, rejecting names that are blank.
pub fn normalize_ingredient_name(name: &str) -> Result<String, CoreError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation(
            "Ingredient name must not be empty".into(),
        ));
    }
    Ok(trimmed.to_string())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
