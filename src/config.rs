//! Configuration management for the sporlstats dashboard.
//!
//! Values come from the process environment and from a `.env` file in the
//! local data directory. They are read once into a [`Config`] which is then
//! handed to the components that need it; nothing reads the environment
//! after startup.
//!
//! The configuration system follows a hierarchical approach:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the local data directory
//! 3. Application defaults (where applicable)

use std::{env, net::SocketAddr, path::PathBuf};

use reqwest::Url;

use crate::{error::ConfigError, warning};

pub const CLIENT_ID_VAR: &str = "SPOTIFY_API_AUTH_CLIENT_ID";
pub const CLIENT_SECRET_VAR: &str = "SPOTIFY_API_AUTH_CLIENT_SECRET";
pub const BROKER_URL_VAR: &str = "SPOTIFY_TOKEN_BROKER_URL";
pub const REDIRECT_URI_VAR: &str = "SPOTIFY_API_REDIRECT_URI";
pub const SCOPE_VAR: &str = "SPOTIFY_API_AUTH_SCOPE";
pub const AUTH_URL_VAR: &str = "SPOTIFY_API_AUTH_URL";
pub const TOKEN_URL_VAR: &str = "SPOTIFY_API_TOKEN_URL";
pub const API_URL_VAR: &str = "SPOTIFY_API_URL";
pub const SERVER_ADDRESS_VAR: &str = "SERVER_ADDRESS";
pub const LIMIT_VAR: &str = "SPORLSTATS_LIMIT";

pub const DEFAULT_REDIRECT_URI: &str = "http://127.0.0.1:5191/";
pub const DEFAULT_AUTH_URL: &str = "https://accounts.spotify.com/authorize";
pub const DEFAULT_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
pub const DEFAULT_API_URL: &str = "https://api.spotify.com/v1";
pub const DEFAULT_LIMIT: u32 = 10;
pub const DEFAULT_SCOPES: [&str; 5] = [
    "user-read-private",
    "user-read-email",
    "user-top-read",
    "user-read-recently-played",
    "user-read-currently-playing",
];

/// How an authorization code is turned into an access token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenExchange {
    /// Call the token endpoint directly, authenticated with the client secret.
    Direct { client_secret: String },
    /// Hand the code to a trusted intermediary that holds the secret.
    Broker { url: String },
}

/// Runtime configuration, built once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub client_id: String,
    pub exchange: TokenExchange,
    pub redirect_uri: String,
    pub scopes: Vec<String>,
    pub auth_url: String,
    pub token_url: String,
    pub api_url: String,
    pub server_addr: SocketAddr,
    pub limit: u32,
}

impl Config {
    /// Builds a configuration with Spotify defaults for everything except
    /// the credentials.
    pub fn new(client_id: impl Into<String>, exchange: TokenExchange) -> Self {
        Self {
            client_id: client_id.into(),
            exchange,
            redirect_uri: DEFAULT_REDIRECT_URI.to_string(),
            scopes: DEFAULT_SCOPES.iter().map(|s| s.to_string()).collect(),
            auth_url: DEFAULT_AUTH_URL.to_string(),
            token_url: DEFAULT_TOKEN_URL.to_string(),
            api_url: DEFAULT_API_URL.to_string(),
            server_addr: default_server_addr(),
            limit: DEFAULT_LIMIT,
        }
    }

    /// Reads the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::Missing`] if the client id is absent, or if neither a
    ///   client secret nor a token broker is configured
    /// - [`ConfigError::Invalid`] if a URL, the server address or the limit
    ///   cannot be parsed
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`Config::from_env`] with an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let client_id = var(CLIENT_ID_VAR).ok_or(ConfigError::Missing(CLIENT_ID_VAR))?;

        let exchange = match (var(BROKER_URL_VAR), var(CLIENT_SECRET_VAR)) {
            (Some(url), _) => TokenExchange::Broker {
                url: parse_url(BROKER_URL_VAR, url)?,
            },
            (None, Some(client_secret)) => TokenExchange::Direct { client_secret },
            (None, None) => return Err(ConfigError::Missing(CLIENT_SECRET_VAR)),
        };

        let mut config = Config::new(client_id, exchange);

        if let Some(uri) = var(REDIRECT_URI_VAR) {
            config.redirect_uri = parse_url(REDIRECT_URI_VAR, uri)?;
        }
        if let Some(scope) = var(SCOPE_VAR) {
            config.scopes = scope.split_whitespace().map(String::from).collect();
        }
        if let Some(url) = var(AUTH_URL_VAR) {
            config.auth_url = parse_url(AUTH_URL_VAR, url)?;
        }
        if let Some(url) = var(TOKEN_URL_VAR) {
            config.token_url = parse_url(TOKEN_URL_VAR, url)?;
        }
        if let Some(url) = var(API_URL_VAR) {
            config.api_url = parse_url(API_URL_VAR, url)?;
        }
        if let Some(addr) = var(SERVER_ADDRESS_VAR) {
            config.server_addr = addr.parse().map_err(|e| ConfigError::Invalid {
                var: SERVER_ADDRESS_VAR,
                reason: format!("{}", e),
            })?;
        }
        if let Some(limit) = var(LIMIT_VAR) {
            config.limit = parse_limit(&limit).ok_or_else(|| ConfigError::Invalid {
                var: LIMIT_VAR,
                reason: format!("expected a number between 1 and 50, got {:?}", limit),
            })?;
        }

        Ok(config)
    }

    pub fn uses_broker(&self) -> bool {
        matches!(self.exchange, TokenExchange::Broker { .. })
    }
}

/// Which credentials are present, for rendering a configuration error to the
/// operator without revealing the secret itself.
#[derive(Debug, Clone)]
pub struct CredentialStatus {
    pub client_id: Option<String>,
    pub client_secret_loaded: bool,
    pub broker_configured: bool,
}

impl CredentialStatus {
    pub fn from_env() -> Self {
        let present = |key: &str| env::var(key).ok().filter(|v| !v.trim().is_empty());
        Self {
            client_id: present(CLIENT_ID_VAR),
            client_secret_loaded: present(CLIENT_SECRET_VAR).is_some(),
            broker_configured: present(BROKER_URL_VAR).is_some(),
        }
    }
}

/// Loads environment variables from `<data_local_dir>/sporlstats/.env`.
///
/// Creates the directory if needed. A missing `.env` file is not an error:
/// the variables may come from the process environment instead.
///
/// # Directory Structure
///
/// - Linux: `~/.local/share/sporlstats/.env`
/// - macOS: `~/Library/Application Support/sporlstats/.env`
/// - Windows: `%LOCALAPPDATA%/sporlstats/.env`
pub async fn load_env() -> Result<(), String> {
    let path = data_dir().join(".env");
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent)
            .await
            .map_err(|e| e.to_string())?;
    }

    if path.is_file() {
        dotenv::from_path(&path).map_err(|e| e.to_string())?;
    } else {
        warning!(
            "No .env file at {}, using process environment only.",
            path.display()
        );
    }
    Ok(())
}

/// Directory holding the `.env` file and the persisted key-value storage.
pub fn data_dir() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("sporlstats");
    path
}

/// Server address used when the configuration itself could not be loaded.
pub fn fallback_server_addr() -> SocketAddr {
    env::var(SERVER_ADDRESS_VAR)
        .ok()
        .and_then(|a| a.parse().ok())
        .unwrap_or_else(default_server_addr)
}

fn default_server_addr() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 5191))
}

fn parse_url(var: &'static str, value: String) -> Result<String, ConfigError> {
    Url::parse(&value).map_err(|e| ConfigError::Invalid {
        var,
        reason: e.to_string(),
    })?;
    Ok(value)
}

fn parse_limit(value: &str) -> Option<u32> {
    value.trim().parse::<u32>().ok().filter(|l| (1..=50).contains(l))
}
