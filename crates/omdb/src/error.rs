#[derive(Debug, thiserror::Error)]
pub enum OmdbError {
    #[error("OMDb API key is not set")]
    MissingApiKey,

    #[error("Invalid OMDb API key")]
    InvalidKey,

    #[error("No matching title found")]
    NotFound,

    #[error("OMDb API error: {0}")]
    Api(String),

    #[error("OMDb responded with status {status_code}: {message}")]
    Status { status_code: u16, message: String },

    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Failed to parse response at '{path}': {source}")]
    Json {
        path: String,
        source: serde_json::Error,
    },
}

impl OmdbError {
    /// Whether the upstream could not be reached or answered unusably,
    /// as opposed to answering with "no match" or an explicit API error.
    pub fn is_unavailable(&self) -> bool {
        !matches!(self, OmdbError::NotFound | OmdbError::Api(_))
    }

    /// Classify the `Error` field of a `"Response": "False"` body.
    pub(crate) fn from_api_message(message: Option<String>) -> Self {
        match message {
            None => OmdbError::NotFound,
            Some(msg) if msg.trim().is_empty() => OmdbError::NotFound,
            Some(msg) if msg.to_lowercase().contains("invalid api key") => OmdbError::InvalidKey,
            Some(msg) if msg.to_lowercase().contains("not found") => OmdbError::NotFound,
            Some(msg) => OmdbError::Api(msg),
        }
    }
}
