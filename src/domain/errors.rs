use thiserror::Error;

/// Failures while querying the price store.
///
/// These carry the underlying cause for logging; the API layer never leaks
/// them verbatim to callers.
#[derive(Debug, Error, Clone)]
pub enum StoreError {
    #[error("store request failed: {0}")]
    Request(String),

    #[error("store returned status {0}")]
    Status(u16),

    #[error("malformed store page: {0}")]
    MalformedPage(String),
}

impl From<reqwest::Error> for StoreError {
    fn from(e: reqwest::Error) -> Self {
        StoreError::Request(e.to_string())
    }
}

/// Caller-visible errors, each mapped to a distinct HTTP status.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Request body missing required fields or failing basic validation.
    /// Raised before any store query is issued.
    #[error("malformed request: {0}")]
    MalformedRequest(String),

    /// The store query failed. Deliberately generic: the original cause is
    /// logged server-side, not surfaced.
    #[error("price retrieval failed")]
    RetrievalFailed,
}
