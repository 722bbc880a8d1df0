use reqwest::Client;
use serde::de::DeserializeOwned;

use crate::{
    config::Config,
    error::{ApiError, DecodeError},
    types::{Artist, Paging, PlayHistoryEntry, TimeRange, Track, UserProfile},
};

/// Authenticated access to the Spotify Web API data endpoints.
///
/// Every call is a single request: no retry and no backoff, a failure is
/// final for that call.
#[derive(Debug, Clone)]
pub struct SpotifyClient {
    http: Client,
    api_url: String,
}

impl SpotifyClient {
    pub fn new(config: &Config, http: Client) -> Self {
        Self {
            http,
            api_url: config.api_url.trim_end_matches('/').to_string(),
        }
    }

    /// `GET {api_url}{path}` with a bearer token, decoded into `T`.
    ///
    /// # Errors
    ///
    /// - [`ApiError::Request`] on transport failure
    /// - [`ApiError::Status`] on any non-success status
    /// - [`ApiError::Decode`] if the body does not match `T`
    pub async fn authed_fetch<T: DeserializeOwned>(
        &self,
        path: &str,
        token: &str,
    ) -> Result<T, ApiError> {
        let url = format!("{}{}", self.api_url, path);
        tracing::debug!(path, "api request started");

        let res = self.http.get(&url).bearer_auth(token).send().await?;

        let status = res.status();
        if !status.is_success() {
            tracing::warn!(path, status = status.as_u16(), "api request failed");
            return Err(ApiError::Status(status.as_u16()));
        }

        let body = res.bytes().await?;
        serde_json::from_slice(&body).map_err(|source| {
            ApiError::Decode(DecodeError {
                endpoint: endpoint_name(path),
                source,
            })
        })
    }

    pub async fn get_top_tracks(
        &self,
        token: &str,
        time_range: TimeRange,
        limit: u32,
    ) -> Result<Vec<Track>, ApiError> {
        let path = format!("/me/top/tracks?time_range={}&limit={}", time_range, limit);
        let page: Paging<Track> = self.authed_fetch(&path, token).await?;
        Ok(page.items)
    }

    pub async fn get_top_artists(
        &self,
        token: &str,
        time_range: TimeRange,
        limit: u32,
    ) -> Result<Vec<Artist>, ApiError> {
        let path = format!("/me/top/artists?time_range={}&limit={}", time_range, limit);
        let page: Paging<Artist> = self.authed_fetch(&path, token).await?;
        Ok(page.items)
    }

    pub async fn get_recently_played(
        &self,
        token: &str,
        limit: u32,
    ) -> Result<Vec<PlayHistoryEntry>, ApiError> {
        let path = format!("/me/player/recently-played?limit={}", limit);
        let page: Paging<PlayHistoryEntry> = self.authed_fetch(&path, token).await?;
        Ok(page.items)
    }

    pub async fn get_profile(&self, token: &str) -> Result<UserProfile, ApiError> {
        self.authed_fetch("/me", token).await
    }
}

fn endpoint_name(path: &str) -> String {
    path.split('?').next().unwrap_or(path).to_string()
}
