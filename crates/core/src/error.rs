use crate::types::DbId;

/// Domain-level error shared by every layer above `core`.
///
/// The HTTP layer maps each variant onto a status code; lower layers only
/// decide which condition applies.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    /// A storage-level constraint rejected the write (duplicate slug,
    /// missing owning user).
    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// The caller is authenticated but does not own the target.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
