//! Runtime configuration read from the environment and an optional `.env` file.

use std::env;
use std::time::Duration;

use reqwest::Url;

use crate::error::ConfigError;

/// Default GitHub REST endpoint.
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Settings for the GitHub client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Base URL that `/users/{username}` is appended to.
    pub api_base: Url,
    /// Personal access token sent as a bearer token.
    pub token: Option<String>,
    /// Per-request timeout. `None` waits indefinitely.
    pub timeout: Option<Duration>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            token: None,
            timeout: None,
        }
    }
}

impl Config {
    /// Loads `.env` (if present) and reads the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a config from an arbitrary key lookup.
    ///
    /// Empty values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_base = match get("GITHUB_API_URL") {
            Some(raw) => parse_api_base(raw.trim())?,
            None => default_api_base(),
        };

        let timeout = match get("LOOKUP_TIMEOUT_SECS") {
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => Some(Duration::from_secs(secs)),
                _ => return Err(ConfigError::Timeout(raw)),
            },
            None => None,
        };

        Ok(Self {
            api_base,
            token: get("GITHUB_TOKEN"),
            timeout,
        })
    }
}

fn parse_api_base(raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw).map_err(|e| ConfigError::ApiUrl(format!("{raw}: {e}")))?;
    if url.cannot_be_a_base() {
        return Err(ConfigError::ApiUrl(raw.to_owned()));
    }
    Ok(url)
}

fn default_api_base() -> Url {
    Url::parse(DEFAULT_API_URL).unwrap_or_else(|_| unreachable!("default API URL is valid"))
}
