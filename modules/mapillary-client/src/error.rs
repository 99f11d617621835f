use thiserror::Error;

pub type Result<T> = std::result::Result<T, MapillaryError>;

#[derive(Debug, Error)]
pub enum MapillaryError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Parse error: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for MapillaryError {
    fn from(err: reqwest::Error) -> Self {
        MapillaryError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for MapillaryError {
    fn from(err: serde_json::Error) -> Self {
        MapillaryError::Parse(err.to_string())
    }
}
