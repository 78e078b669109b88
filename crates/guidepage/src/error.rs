use guidepage_core::DomError;
use thiserror::Error;

/// Why a single content source could not deliver.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} responded with HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("invalid content location {location:?}: {reason}")]
    InvalidLocation { location: String, reason: String },

    #[error("fetching {location} timed out after {seconds}s")]
    Timeout { location: String, seconds: u64 },
}

/// Why the guide content could not be shown.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("could not load the guide from any of {attempted} source(s)")]
    NoSourceAvailable { attempted: usize },

    #[error(transparent)]
    Inject(#[from] DomError),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Json(#[from] serde_json::Error),
}
