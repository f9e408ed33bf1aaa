//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - `FromRow` + `Serialize` structs matching database rows
//! - `Deserialize` input DTOs consumed by repositories

pub mod ingredient;
pub mod recipe;
pub mod search;
pub mod user;
