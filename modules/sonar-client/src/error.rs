use thiserror::Error;

pub type Result<T> = std::result::Result<T, SonarError>;

#[derive(Debug, Error)]
pub enum SonarError {
    #[error("PERPLEXITY_API_KEY is not set")]
    MissingApiKey,

    #[error("Network error: {0}")]
    Network(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Malformed response: {0}")]
    Malformed(String),
}

impl From<reqwest::Error> for SonarError {
    fn from(err: reqwest::Error) -> Self {
        SonarError::Network(err.to_string())
    }
}
