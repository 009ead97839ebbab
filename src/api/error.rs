use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// The server answered 401; the session cookie or token is no longer valid.
    #[error("not authenticated")]
    Unauthorized,
    #[error("server returned HTTP {0}")]
    Status(u16),
    #[error("request failed: {0}")]
    Transport(String),
    #[error("malformed response: {0}")]
    Malformed(String),
    #[error("server rejected the request: {}", .0.as_deref().unwrap_or("no detail"))]
    Rejected(Option<String>),
}

impl ApiError {
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized)
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::Malformed(err.to_string())
        } else if let Some(status) = err.status() {
            if status == reqwest::StatusCode::UNAUTHORIZED {
                ApiError::Unauthorized
            } else {
                ApiError::Status(status.as_u16())
            }
        } else {
            ApiError::Transport(err.to_string())
        }
    }
}
