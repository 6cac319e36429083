use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("TMDB API returned status {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Failed to decode response from {endpoint}: {source}")]
    Decode {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid request URL: {0}")]
    InvalidUrl(String),

    #[error("No TMDB API key configured")]
    MissingApiKey,
}

impl CatalogError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, CatalogError::NotFound(_) | CatalogError::Api { status: 404, .. })
    }
}

pub type CatalogResult<T> = Result<T, CatalogError>;
