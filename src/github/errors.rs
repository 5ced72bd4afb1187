use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("User \"{0}\" not found")]
    NotFound(String),

    #[error("API rate limit exceeded. Try again later.")]
    RateLimited,

    #[error("Upstream error: {0}")]
    Upstream(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        FetchError::Upstream(err.to_string())
    }
}
