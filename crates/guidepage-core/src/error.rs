use thiserror::Error;

/// Errors raised while parsing markup into a [`crate::dom::Document`].
#[derive(Debug, Error)]
pub enum DomError {
    #[error("failed to parse HTML: {0}")]
    Parse(#[from] std::io::Error),
}

/// Errors raised by [`crate::storage::Storage`] backends.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O error at {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("storage file {path} is not valid JSON: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}
