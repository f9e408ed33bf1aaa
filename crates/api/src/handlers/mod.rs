//! Request handlers.
//!
//! Handlers delegate to the repositories in `cookiejar_db`, map errors via
//! [`AppError`](crate::error::AppError), and dispatch detached side effects
//! through [`background`](crate::background).

pub mod recipe;
pub mod search;
pub mod search_history;
