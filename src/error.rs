//! Error types for every layer of the dashboard.
//!
//! Each layer owns one enum. The session converts authorization and data
//! failures into an observable status, so none of these ever have to escape
//! a spawned task.

use std::fmt;

use thiserror::Error;

use crate::types::BundlePart;

/// Required configuration is absent or malformed.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),

    #[error("invalid value for {var}: {reason}")]
    Invalid { var: &'static str, reason: String },
}

/// Backing key-value storage could not be read or written.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("storage io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage file is not valid JSON: {0}")]
    Serde(#[from] serde_json::Error),
}

/// The authorization code could not be turned into an access token.
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("token request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("token endpoint answered with HTTP {status}")]
    Rejected { status: u16 },

    #[error("token response does not contain an access token")]
    MissingAccessToken,

    #[error("token response is not valid JSON: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("authorization code was already used")]
    CodeAlreadyUsed,

    #[error("already logged in")]
    AlreadyAuthenticated,

    #[error("another authorization code is being exchanged")]
    ExchangeInProgress,

    #[error("authorization was denied: {0}")]
    Denied(String),

    #[error("failed to persist access token: {0}")]
    Persist(#[from] StorageError),

    #[error("invalid url: {0}")]
    InvalidUrl(String),
}

/// A response body did not match the expected schema of its endpoint.
#[derive(Error, Debug)]
#[error("unexpected response from {endpoint}: {source}")]
pub struct DecodeError {
    pub endpoint: String,
    #[source]
    pub source: serde_json::Error,
}

/// A single data endpoint call failed.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Spotify API error: {0}")]
    Status(u16),

    #[error(transparent)]
    Decode(#[from] DecodeError),
}

/// At least one constituent of a data bundle failed.
///
/// Every failed part is listed, in bundle order; the parts that succeeded
/// are not kept.
#[derive(Error, Debug)]
pub struct AggregateError {
    pub failures: Vec<(BundlePart, ApiError)>,
}

impl AggregateError {
    pub fn failed_parts(&self) -> Vec<BundlePart> {
        self.failures.iter().map(|(part, _)| *part).collect()
    }
}

impl fmt::Display for AggregateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .failures
            .iter()
            .map(|(part, err)| format!("{}: {}", part, err))
            .collect();
        write!(f, "failed to load {}", parts.join("; "))
    }
}

/// Failures surfaced by the session controller to its callers.
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("can't log in: {0}")]
    Auth(#[from] AuthError),

    #[error("can't load data: {0}")]
    Data(#[from] AggregateError),

    #[error("can't load data: {0}")]
    Api(#[from] ApiError),

    #[error("not logged in")]
    NotAuthenticated,

    #[error("logged out while the request was in flight")]
    LoggedOut,
}
