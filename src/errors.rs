use reqwest::StatusCode;
use thiserror::Error;

/// Everything that can abort a sync run. Configuration problems are caught
/// before any network call; the remaining kinds map to the stage that failed.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("{0}")]
    Config(String),

    /// The request never produced an HTTP response (DNS, connect, timeout).
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The API answered with a non-success status. The raw body is kept so
    /// the GitLab error message reaches the user unmodified.
    #[error("GitLab API request to {url} failed with status {status}: {body}")]
    Api {
        status: StatusCode,
        url: String,
        body: String,
    },

    #[error("failed to decode {context}: {source}")]
    Decode {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
