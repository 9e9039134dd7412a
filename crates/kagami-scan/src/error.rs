use std::time::Duration;

use kagami_core::types::MediaId;
use kagami_core::KagamiError;
use thiserror::Error;

/// Errors raised by catalog and enrichment clients.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Transport-level failure.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success HTTP status.
    #[error("unexpected HTTP status {status} from {url}")]
    Status { status: u16, url: String },

    /// Response body did not have the expected shape.
    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    /// The service reported an error in a successful response.
    #[error("service error: {0}")]
    Api(String),

    #[error("media {0} not found")]
    NotFound(MediaId),

    /// The fetch deadline elapsed.
    #[error("request timed out after {0:?}")]
    Timeout(Duration),
}

/// Errors that abort a scan.
#[derive(Debug, Error)]
pub enum ScanError {
    /// The catalog could not be loaded; nothing was matched.
    #[error("catalog fetch failed: {0}")]
    Catalog(#[source] ClientError),

    /// Filename parser could not be built.
    #[error(transparent)]
    Parser(#[from] KagamiError),

    /// The blocking matcher task panicked or was cancelled.
    #[error("matching task failed: {0}")]
    Matcher(#[from] tokio::task::JoinError),
}

/// Result type alias for scan operations.
pub type Result<T, E = ScanError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_error_display() {
        let err = ClientError::Status {
            status: 429,
            url: "https://graphql.anilist.co".into(),
        };
        assert_eq!(
            err.to_string(),
            "unexpected HTTP status 429 from https://graphql.anilist.co"
        );
        assert_eq!(ClientError::NotFound(MediaId(21)).to_string(), "media 21 not found");
    }

    #[test]
    fn catalog_error_keeps_source() {
        use std::error::Error as _;
        let err = ScanError::Catalog(ClientError::Api("rate limited".into()));
        assert!(err.to_string().contains("rate limited"));
        assert!(err.source().is_some());
    }

    #[test]
    fn errors_are_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ClientError>();
        assert_send_sync::<ScanError>();
    }
}
