//! Client error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP client error: {0}")]
    Http(String),

    #[error("Exchange rejected request: {0}")]
    Exchange(String),

    #[error("Unexpected response: {0}")]
    Decode(String),

    #[error("Credentials error: {0}")]
    Credentials(String),

    #[error("Invalid endpoint: {0}")]
    Endpoint(#[from] url::ParseError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type ClientResult<T> = Result<T, ClientError>;
