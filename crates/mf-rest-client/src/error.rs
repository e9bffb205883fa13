//! Error types for the REST API client

use reqwest::StatusCode;
use thiserror::Error;

/// Errors that can occur when using the workflow client
#[derive(Debug, Error)]
pub enum RestClientError {
    #[error("Not authenticated: login must succeed before calling this operation")]
    Unauthenticated,

    #[error("Request failed with status {status}: {status_text}")]
    RequestFailed {
        status: StatusCode,
        status_text: String,
    },

    #[error("Malformed response body: {0}")]
    MalformedResponse(#[source] serde_json::Error),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("URL parsing error: {0}")]
    Url(#[from] url::ParseError),

    #[error("Invalid base URL `{0}`: expected scheme, host and port only")]
    InvalidBaseUrl(String),

    #[error("Invalid request payload: {0}")]
    InvalidPayload(#[from] validator::ValidationErrors),

    #[error("Response is missing field `{0}`")]
    MissingField(String),

    #[error("Invalid header value: {0}")]
    InvalidHeader(String),
}

impl RestClientError {
    /// HTTP status of a rejected request, if the server answered at all
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            RestClientError::RequestFailed { status, .. } => Some(*status),
            RestClientError::Http(e) => e.status(),
            _ => None,
        }
    }
}

/// Result type alias for REST client operations
pub type RestClientResult<T> = Result<T, RestClientError>;
