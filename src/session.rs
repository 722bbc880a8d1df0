//! Session lifecycle: from boot through authorization to loaded statistics.
//!
//! ```text
//! Booting ──cached token──────────────────────────► Authenticated
//!    │                                                   │ load_data
//!    ├──code in location──► ExchangingCode ──ok──────────┤
//!    │                            │ err                  ▼
//!    │                            ▼               DataLoading ◄── set_time_range
//!    │                        AuthError                │    │
//!    ▼                            │ retry          ok  │    │ err
//! Unauthenticated ◄───────────────┘                    ▼    ▼
//!        ▲                                      DataReady  DataError
//!        └──────────────── logout (from any state) ───────────┘
//! ```
//!
//! The session is the only writer of its state and, together with the code
//! exchange, the only writer of the token store. Locks are never held across
//! a network call, so a logout can happen while a request is in flight; the
//! epoch counter makes sure such a late response is dropped instead of
//! bringing the session back to life.

use std::collections::HashSet;

use reqwest::{Client, Url};
use serde::Serialize;
use tokio::sync::Mutex;

use crate::{
    config::Config,
    error::{AuthError, SessionError},
    spotify::{
        AuthorizationFlow, SpotifyClient,
        auth::{authorization_code, authorization_error, strip_code},
        load_bundle,
    },
    storage::{KeyValueStorage, TokenStore},
    types::{DataBundle, TimeRange, UserProfile},
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "reason", rename_all = "snake_case")]
pub enum Status {
    Booting,
    Unauthenticated,
    ExchangingCode,
    Authenticated,
    DataLoading,
    DataReady,
    AuthError(String),
    DataError(String),
}

impl Status {
    /// States in which the session holds an access token.
    pub fn has_token(&self) -> bool {
        matches!(
            self,
            Status::Authenticated | Status::DataLoading | Status::DataReady | Status::DataError(_)
        )
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Status::AuthError(reason) | Status::DataError(reason) => Some(reason),
            _ => None,
        }
    }
}

/// What the caller has to do after [`Session::retry`].
#[derive(Debug, Clone, PartialEq)]
pub enum RetryAction {
    /// Send the user to the provider's login page again.
    Login(Url),
    /// The data bundle was loaded again; see the session status for the result.
    Reloaded,
    /// Nothing failed, nothing to retry.
    Nothing,
}

/// Read-only snapshot handed to the presentation layer.
#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    pub status: Status,
    pub authenticated: bool,
    pub time_range: TimeRange,
    pub limit: u32,
    pub bundle: Option<DataBundle>,
    pub profile: Option<UserProfile>,
}

impl SessionView {
    pub fn error(&self) -> Option<&str> {
        self.status.error()
    }
}

struct SessionState {
    status: Status,
    token: Option<String>,
    bundle: Option<DataBundle>,
    profile: Option<UserProfile>,
    time_range: TimeRange,
    epoch: u64,
    consumed_codes: HashSet<String>,
    store: TokenStore,
}

pub struct Session {
    state: Mutex<SessionState>,
    auth: AuthorizationFlow,
    client: SpotifyClient,
    limit: u32,
}

impl Session {
    pub fn new(config: &Config, storage: impl KeyValueStorage + 'static) -> Self {
        let http = Client::new();
        Self {
            state: Mutex::new(SessionState {
                status: Status::Booting,
                token: None,
                bundle: None,
                profile: None,
                time_range: TimeRange::default(),
                epoch: 0,
                consumed_codes: HashSet::new(),
                store: TokenStore::new(storage),
            }),
            auth: AuthorizationFlow::new(config, http.clone()),
            client: SpotifyClient::new(config, http),
            limit: config.limit,
        }
    }

    /// Handles a page load at `location`.
    ///
    /// A persisted token authenticates immediately without any request. Else
    /// an authorization code in the location is exchanged, and a provider
    /// error is surfaced as an authorization error. Returns the location to
    /// show afterwards, with the OAuth parameters removed whenever they were
    /// acted upon.
    pub async fn boot(&self, location: &Url) -> Url {
        let mut state = self.state.lock().await;

        if state.token.is_some() || state.status == Status::ExchangingCode {
            return strip_code(location);
        }

        if let Some(token) = state.store.load() {
            tracing::info!("found persisted access token");
            state.token = Some(token);
            state.status = Status::Authenticated;
            return strip_code(location);
        }

        if let Some(reason) = authorization_error(location) {
            tracing::warn!(%reason, "authorization denied by provider");
            state.status = Status::AuthError(AuthError::Denied(reason).to_string());
            return strip_code(location);
        }

        let Some(code) = authorization_code(location) else {
            if state.status == Status::Booting {
                state.status = Status::Unauthenticated;
            }
            return location.clone();
        };
        drop(state);

        // the outcome is recorded in the status
        let _ = self.exchange_code(&code).await;
        strip_code(location)
    }

    /// Exchanges an authorization code and persists the resulting token.
    ///
    /// A code is sent to the provider at most once per session. Seeing it a
    /// second time fails with [`AuthError::CodeAlreadyUsed`] without any
    /// request; it only turns the status into an authorization error when no
    /// exchange is in flight and no token is held. A session that already
    /// holds a token, or is exchanging another code, rejects the code without
    /// touching its status.
    pub async fn exchange_code(&self, code: &str) -> Result<(), SessionError> {
        let epoch = {
            let mut state = self.state.lock().await;
            if state.token.is_some() {
                tracing::debug!("ignoring authorization code, already logged in");
                return Err(AuthError::AlreadyAuthenticated.into());
            }
            if !state.consumed_codes.insert(code.to_string()) {
                tracing::warn!("ignoring already consumed authorization code");
                if state.status != Status::ExchangingCode {
                    state.status = Status::AuthError(AuthError::CodeAlreadyUsed.to_string());
                }
                return Err(AuthError::CodeAlreadyUsed.into());
            }
            if state.status == Status::ExchangingCode {
                // not sent, so it stays usable
                state.consumed_codes.remove(code);
                return Err(AuthError::ExchangeInProgress.into());
            }
            state.status = Status::ExchangingCode;
            state.epoch
        };

        let result = self.auth.exchange_code(code).await;

        let mut state = self.state.lock().await;
        if state.epoch != epoch {
            tracing::debug!("discarding token exchange result after logout");
            return Err(SessionError::LoggedOut);
        }

        match result {
            Ok(token) => {
                if let Err(e) = state.store.save(&token) {
                    let err = AuthError::Persist(e);
                    state.status = Status::AuthError(err.to_string());
                    return Err(err.into());
                }
                tracing::info!("authorization code exchanged");
                state.token = Some(token);
                state.status = Status::Authenticated;
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, "authorization code exchange failed");
                state.status = Status::AuthError(e.to_string());
                Err(e.into())
            }
        }
    }

    /// Loads the data bundle for the current time range.
    ///
    /// Does nothing while a load is already pending. The previous bundle
    /// stays visible until the new one is ready or an error replaces it. If
    /// the time range changes while loading, the stale result is dropped and
    /// the load repeats for the new range.
    pub async fn load_data(&self) -> Result<(), SessionError> {
        let (token, mut time_range, epoch, mut need_profile) = {
            let mut state = self.state.lock().await;
            let Some(token) = state.token.clone().filter(|_| state.status.has_token()) else {
                return Err(SessionError::NotAuthenticated);
            };
            if state.status == Status::DataLoading {
                tracing::debug!("data load already pending");
                return Ok(());
            }
            state.status = Status::DataLoading;
            (token, state.time_range, state.epoch, state.profile.is_none())
        };

        loop {
            let profile_request = async {
                if need_profile {
                    Some(self.client.get_profile(&token).await)
                } else {
                    None
                }
            };
            let (bundle, profile) = tokio::join!(
                load_bundle(&self.client, &token, time_range, self.limit),
                profile_request,
            );

            let mut state = self.state.lock().await;
            if state.epoch != epoch {
                tracing::debug!("discarding data bundle after logout");
                return Err(SessionError::LoggedOut);
            }

            match profile {
                Some(Ok(profile)) => {
                    state.profile = Some(profile);
                    need_profile = false;
                }
                Some(Err(e)) => tracing::warn!(error = %e, "failed to load user profile"),
                None => {}
            }

            if state.time_range != time_range {
                tracing::debug!(
                    stale = %time_range,
                    current = %state.time_range,
                    "time range changed while loading"
                );
                time_range = state.time_range;
                continue;
            }

            return match bundle {
                Ok(bundle) => {
                    tracing::info!(
                        %time_range,
                        tracks = bundle.top_tracks.len(),
                        artists = bundle.top_artists.len(),
                        recent = bundle.recent.len(),
                        "data bundle ready"
                    );
                    state.bundle = Some(bundle);
                    state.status = Status::DataReady;
                    Ok(())
                }
                Err(e) => {
                    state.bundle = None;
                    state.status = Status::DataError(e.to_string());
                    Err(e.into())
                }
            };
        }
    }

    /// Fetches the user's profile on its own, outside of a bundle load.
    /// Failures do not change the session status.
    pub async fn load_profile(&self) -> Result<UserProfile, SessionError> {
        let (token, epoch) = {
            let state = self.state.lock().await;
            let Some(token) = state.token.clone().filter(|_| state.status.has_token()) else {
                return Err(SessionError::NotAuthenticated);
            };
            (token, state.epoch)
        };

        let profile = self.client.get_profile(&token).await?;

        let mut state = self.state.lock().await;
        if state.epoch == epoch {
            state.profile = Some(profile.clone());
        }
        Ok(profile)
    }

    /// Switches the time range. A session showing data (or a data error)
    /// reloads once for the new range; a pending load picks it up itself.
    pub async fn set_time_range(&self, time_range: TimeRange) -> Result<(), SessionError> {
        let reload = {
            let mut state = self.state.lock().await;
            if state.time_range == time_range {
                return Ok(());
            }
            state.time_range = time_range;
            matches!(state.status, Status::DataReady | Status::DataError(_))
        };

        if reload {
            self.load_data().await
        } else {
            Ok(())
        }
    }

    /// Re-runs the phase that failed.
    ///
    /// After an authorization error the consumed code is never sent again:
    /// the session goes back to `Unauthenticated` and the caller has to send
    /// the user through the login page. After a data error the bundle is
    /// loaded again. Any other state has nothing to retry.
    pub async fn retry(&self) -> Result<RetryAction, SessionError> {
        let status = {
            let mut state = self.state.lock().await;
            let status = state.status.clone();
            if let Status::AuthError(_) = status {
                state.token = None;
                state.bundle = None;
                state.profile = None;
                state.status = Status::Unauthenticated;
            }
            status
        };

        match status {
            Status::AuthError(_) => Ok(RetryAction::Login(self.auth.login_url()?)),
            Status::DataError(_) => {
                // the outcome is recorded in the status
                let _ = self.load_data().await;
                Ok(RetryAction::Reloaded)
            }
            _ => Ok(RetryAction::Nothing),
        }
    }

    /// Forgets the token, the bundle and the profile and resets the time
    /// range. Responses still in flight are discarded when they arrive.
    pub async fn logout(&self) {
        let mut state = self.state.lock().await;
        if let Err(e) = state.store.clear() {
            tracing::warn!(error = %e, "failed to remove persisted token");
        }
        state.token = None;
        state.bundle = None;
        state.profile = None;
        state.time_range = TimeRange::default();
        state.epoch += 1;
        state.status = Status::Unauthenticated;
        tracing::info!("logged out");
    }

    pub fn login_url(&self) -> Result<Url, AuthError> {
        self.auth.login_url()
    }

    pub async fn status(&self) -> Status {
        self.state.lock().await.status.clone()
    }

    pub async fn view(&self) -> SessionView {
        let state = self.state.lock().await;
        SessionView {
            status: state.status.clone(),
            authenticated: state.token.is_some(),
            time_range: state.time_range,
            limit: self.limit,
            bundle: state.bundle.clone(),
            profile: state.profile.clone(),
        }
    }
}
