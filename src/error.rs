use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScraperError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid selector: {0}")]
    Selector(String),

    #[error("Page {url} never presented '{selector}'")]
    PageNotReady { url: String, selector: String },

    #[error("Store error: {message}")]
    Store { message: String },

    #[error("Store unreachable: {message}")]
    Connectivity { message: String },
}

impl ScraperError {
    pub fn store(message: impl Into<String>) -> Self {
        ScraperError::Store {
            message: message.into(),
        }
    }

    pub fn connectivity(message: impl Into<String>) -> Self {
        ScraperError::Connectivity {
            message: message.into(),
        }
    }

    /// Errors that end the whole run instead of a single record.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            ScraperError::Connectivity { .. } | ScraperError::Http(_) | ScraperError::PageNotReady { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, ScraperError>;
