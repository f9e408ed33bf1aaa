//! Domain rules shared by the database and API layers.
//!
//! This crate has no internal dependencies so it can be used from the
//! repository layer, the HTTP layer and any future CLI tooling alike.

pub mod error;
pub mod recipe;
pub mod search;
pub mod types;
