//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` (or the caller's transaction) as the first argument.

pub mod ingredient_repo;
pub mod recipe_repo;
pub mod search_history_repo;
pub mod search_repo;
pub mod user_repo;

pub use ingredient_repo::IngredientRepo;
pub use recipe_repo::RecipeRepo;
pub use search_history_repo::SearchHistoryRepo;
pub use search_repo::SearchRepo;
pub use user_repo::UserRepo;
