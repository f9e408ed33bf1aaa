/// Errors raised by object storage backends.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The URL is not served by this store.
    #[error("URL is not managed by this store: {0}")]
    ForeignUrl(String),

    /// The key would resolve outside the storage root.
    #[error("Invalid object key: {0}")]
    InvalidKey(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The remote backend rejected the request.
    #[error("Storage backend error: {0}")]
    Backend(String),
}

impl StorageError {
    /// Whether this failure only means the URL belongs to someone else.
    pub fn is_foreign(&self) -> bool {
        matches!(self, Self::ForeignUrl(_))
    }
}
