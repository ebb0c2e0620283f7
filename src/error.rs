//! Error types for profile lookups.

use thiserror::Error;

/// Reasons a submit is rejected before any request is made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SubmitError {
    /// The username field is empty or only whitespace.
    #[error("Username is required.")]
    EmptyUsername,

    /// A lookup is already waiting on the network.
    #[error("A lookup is already in progress.")]
    InFlight,
}

/// Failures while fetching or decoding a profile response.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The request could not be sent or the body could not be read.
    #[error("Could not reach GitHub: {0}")]
    Transport(#[from] reqwest::Error),

    /// The body was not a usable JSON profile.
    #[error("Unexpected response from GitHub: {0}")]
    Decode(#[from] serde_json::Error),

    /// The token contains characters not allowed in a header.
    #[error("GITHUB_TOKEN is not a valid header value")]
    InvalidToken,

    /// The configured API base cannot carry path segments.
    #[error("Invalid API base URL: {0}")]
    InvalidBaseUrl(String),

    /// The avatar bytes could not be decoded as an image.
    #[error("Could not decode avatar: {0}")]
    Image(#[from] image::ImageError),
}

/// Invalid configuration values.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// `GITHUB_API_URL` is not a usable base URL.
    #[error("GITHUB_API_URL is not a valid base URL: {0}")]
    ApiUrl(String),

    /// `LOOKUP_TIMEOUT_SECS` is not a positive integer.
    #[error("LOOKUP_TIMEOUT_SECS must be a positive integer, got {0:?}")]
    Timeout(String),
}
