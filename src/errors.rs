// src/errors.rs
//
// Typed errors for remote calls, inventory loading and configuration.

use thiserror::Error;

/// Failure of a single call to the remote platform.
#[derive(Debug, Error)]
pub enum SteamError {
    #[error("failed to build request: {0}")]
    Request(String),
    #[error("request failed: {0}")]
    Transport(String),
    #[error("unexpected HTTP status {0}")]
    Status(u16),
    #[error("failed to decode response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for SteamError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_builder() {
            SteamError::Request(err.to_string())
        } else if err.is_decode() {
            SteamError::Decode(err.to_string())
        } else {
            SteamError::Transport(err.to_string())
        }
    }
}

/// Aggregation failures. Every variant is fatal to the run.
#[derive(Debug, Error)]
pub enum InventoryError {
    #[error("failed to fetch inventory page {page}: {source}")]
    Fetch {
        page: usize,
        #[source]
        source: SteamError,
    },
    #[error("inventory page {page} reported more items but no cursor")]
    MissingCursor { page: usize },
}

/// Configuration could not be loaded or is unusable.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("missing or empty config field `{0}`")]
    Missing(&'static str),
    #[error("invalid config field `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}
