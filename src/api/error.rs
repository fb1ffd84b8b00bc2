use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest_middleware::Error),

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid response body: {0}")]
    Decode(#[from] serde_json::Error),

    /// The CMS answered with a non-success status.
    #[error("backend rejected request ({status}): {message}")]
    Backend { status: u16, message: String },

    #[error("not logged in (tips: run `fanz login` or set FANZ_TOKEN)")]
    MissingToken,

    #[error("post not found: {0}")]
    PostNotFound(String),

    /// The signed-in user lacks the role an action needs.
    #[error("{0} may not publish posts")]
    Forbidden(String),
}

impl ApiError {
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Backend { status: 401 | 403, .. })
    }
}
