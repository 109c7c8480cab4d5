//! Error types for the bibliographic lookup service
//!
//! Per-entity gaps (no references, no cited-by, no authored papers) are NOT
//! errors: the lookup client reports them as empty sets and the pipeline
//! degrades locally. `LookupError` covers the genuinely fatal paths -
//! transport failure, authentication rejection, or a response the client
//! cannot interpret.

use thiserror::Error;

/// Result type alias using LookupError
pub type Result<T> = std::result::Result<T, LookupError>;

#[derive(Error, Debug)]
pub enum LookupError {
    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("Lookup service returned status {status}: {body}")]
    UpstreamStatus { status: u16, body: String },

    #[error("Unexpected response shape from {endpoint}: {message}")]
    MalformedResponse { endpoint: String, message: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Lookup service exhausted after retries: {message}")]
    Exhausted { message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    // Generic
    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl LookupError {
    /// Whether a retry can plausibly succeed. Client-side 4xx responses are
    /// permanent; transport failures and 5xx responses are transient.
    pub fn is_transient(&self) -> bool {
        match self {
            LookupError::HttpClient(_) => true,
            LookupError::UpstreamStatus { status, .. } => *status >= 500 || *status == 429,
            LookupError::MalformedResponse { .. } => false,
            LookupError::Serialization(_) => false,
            LookupError::Exhausted { .. } => false,
            LookupError::Configuration { .. } => false,
            LookupError::Other(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_classification() {
        let rate_limited = LookupError::UpstreamStatus {
            status: 429,
            body: "too many requests".into(),
        };
        assert!(rate_limited.is_transient());

        let server = LookupError::UpstreamStatus {
            status: 502,
            body: "bad gateway".into(),
        };
        assert!(server.is_transient());

        let auth = LookupError::UpstreamStatus {
            status: 401,
            body: "bad api key".into(),
        };
        assert!(!auth.is_transient());
    }

    #[test]
    fn test_malformed_is_permanent() {
        let err = LookupError::MalformedResponse {
            endpoint: "esearch".into(),
            message: "missing esearchresult".into(),
        };
        assert!(!err.is_transient());
    }
}
