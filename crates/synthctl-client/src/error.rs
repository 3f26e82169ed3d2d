use thiserror::Error;

/// Errors surfaced by the backend client.
///
/// Transport failures (timeout, connection refused) are always hard
/// failures; HTTP error statuses are mapped to the variants the caller
/// branches on (403, 404, 429) or to `UnexpectedStatus`.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("connection to {host} timed out")]
    Timeout { host: String },

    #[error("connection to {host} failed: {source}")]
    Connect {
        host: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("insufficient access rights for resource")]
    Forbidden,

    #[error("{0} not found")]
    NotFound(String),

    #[error("Too Many Requests")]
    TooManyRequests,

    #[error("bad request: {message}")]
    BadRequest { message: String },

    #[error("{operation} failed, status code: {status}")]
    UnexpectedStatus {
        operation: String,
        status: u16,
        body: String,
    },

    #[error("invalid response payload: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("{0} for --window-size is not supported")]
    InvalidWindowSize(String),

    #[error("invalid filter: {0}")]
    InvalidFilter(String),

    #[error("{0}")]
    InvalidArgument(String),
}
