use thiserror::Error;

/// Errors that can occur while generating an appcast.
#[derive(Error, Debug)]
pub enum AppcastError {
    /// Error making HTTP request to GitHub API.
    #[error("Failed to fetch releases from GitHub: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Error parsing JSON response.
    #[error("Failed to parse GitHub API response: {0}")]
    JsonError(#[from] serde_json::Error),

    /// GitHub API returned an error status.
    #[error("GitHub API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    /// Invalid repository format.
    #[error("Invalid repository format: expected 'owner/repo', got '{0}'")]
    InvalidRepo(String),

    /// Invalid base URL.
    #[error("Invalid base URL: {0}")]
    InvalidBaseUrl(String),

    /// A release timestamp is not valid ISO-8601.
    #[error("Invalid timestamp '{value}': {source}")]
    InvalidTimestamp {
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    /// A release has neither a publish nor a creation timestamp.
    #[error("Release {0} has no publish or creation date")]
    MissingTimestamp(String),

    /// IO error (writing the appcast file).
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Result type alias for appcast operations.
pub type Result<T> = std::result::Result<T, AppcastError>;
