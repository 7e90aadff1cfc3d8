//! Errors surfaced at the library boundary.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ForumError {
    #[error("invalid URL {url}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("no embed factory handles {url}")]
    NoMatchingFactory { url: String },

    #[error("invalid embed data: {0}")]
    InvalidEmbedData(String),

    #[error("provider {provider} has an invalid {field}: {message}")]
    InvalidProvider {
        provider: String,
        field: &'static str,
        message: String,
    },

    #[error("failed to read config at {path}: {source}")]
    ConfigRead {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config at {path}: {source}")]
    ConfigParse {
        path: std::path::PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid config value for {field}: {message}")]
    InvalidConfig { field: &'static str, message: String },

    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("storage error: {0}")]
    Storage(#[source] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, ForumError>;
