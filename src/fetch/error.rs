use thiserror::Error;

/// Failure of a single partition request.
#[derive(Debug, Error)]
pub enum FetchError {
    /// HTTP client could not be built from configuration
    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    /// Configured base URL does not parse
    #[error("Invalid source URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    /// Transport failure (connect, timeout, reset)
    #[error("Request for partition '{partition}' failed: {source}")]
    Request {
        partition: String,
        #[source]
        source: reqwest::Error,
    },

    /// Source answered with a non-success status
    #[error("Partition '{partition}' returned HTTP {status}")]
    Status { partition: String, status: u16 },

    /// Body was not the expected JSON shape
    #[error("Partition '{partition}' returned malformed JSON: {source}")]
    Decode {
        partition: String,
        #[source]
        source: serde_json::Error,
    },
}

impl FetchError {
    /// Whether another attempt could plausibly succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            FetchError::Request { .. } => true,
            FetchError::Status { status, .. } => *status >= 500 || *status == 429,
            FetchError::Client(_)
            | FetchError::InvalidBaseUrl { .. }
            | FetchError::Decode { .. } => false,
        }
    }
}
