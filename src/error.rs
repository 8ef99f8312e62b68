use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

/// Failures while forwarding a request to the upstream photo API.
///
/// All of them answer `502 Bad Gateway`; the dashboard treats that like
/// any other failed fetch.
#[derive(Error, Debug)]
pub enum ProxyError {
    #[error("upstream request failed: {0}")]
    Transport(reqwest::Error),

    #[error("upstream returned {0}")]
    UpstreamStatus(StatusCode),

    #[error("unexpected upstream payload: {0}")]
    MalformedUpstream(String),
}

impl From<reqwest::Error> for ProxyError {
    // The request URL carries the API key in its query string.
    fn from(e: reqwest::Error) -> Self {
        ProxyError::Transport(e.without_url())
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        error!(error = %self, "proxy request failed");
        (StatusCode::BAD_GATEWAY, self.to_string()).into_response()
    }
}
