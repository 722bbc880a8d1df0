//! # API Module
//!
//! HTTP handlers of the local dashboard. The dashboard plays the part of the
//! browser client: a page load on `/` is what boots the session, the OAuth
//! redirect comes back to the same page, and the buttons on the page post to
//! the action endpoints.
//!
//! ## Endpoints
//!
//! - [`page`] - `GET /` (and the redirect URI path) renders the session and
//!   consumes a returned authorization code
//! - [`login`] - `GET /login` redirects to the provider
//! - [`load`], [`range`], [`retry`], [`logout`] - `POST` actions
//! - [`session`] - `GET /api/session` JSON snapshot
//! - [`health`] - `GET /health`
//! - [`config_error`] - every route when the configuration is unusable

mod actions;
mod health;
mod page;

use std::sync::Arc;

use reqwest::Url;

use crate::{config::CredentialStatus, session::Session};

pub use actions::{load, login, logout, range, retry, session};
pub use health::health;
pub use page::{config_error, page};

/// Shared state of the dashboard routes.
#[derive(Clone)]
pub struct AppState {
    pub session: Arc<Session>,
    /// Redirect URI; the location of every page load is derived from it.
    pub base: Url,
}

/// Shared state when the configuration could not be loaded.
#[derive(Clone)]
pub struct ConfigErrorState {
    pub reason: String,
    pub credentials: CredentialStatus,
}
