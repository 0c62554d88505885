use reqwest::StatusCode;
use thiserror::Error;

/// Everything that can go wrong while fetching a link set.
///
/// The panel renders every variant identically as its unavailable state; the
/// variants exist so logs can tell a refused endpoint from a slow one.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid endpoint URL: {0}")]
    Endpoint(#[from] url::ParseError),

    #[error("endpoint URL cannot serve as a base")]
    EndpointBase,

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("server answered {0}")]
    Status(StatusCode),

    #[error("malformed response body: {0}")]
    Decode(#[from] serde_json::Error),
}
