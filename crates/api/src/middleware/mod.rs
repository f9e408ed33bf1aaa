//! Request extractors.
//!
//! - [`auth::AuthUser`] -- requires a valid bearer token.
//! - [`auth::MaybeAuthUser`] -- accepts anonymous requests.

pub mod auth;
