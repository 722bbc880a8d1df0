//! # Spotify Integration Module
//!
//! Everything that talks to Spotify over HTTP.
//!
//! ```text
//! Session (state machine)
//!     ├── auth    login redirect + authorization code exchange
//!     ├── bundle  concurrent fan-out / fan-in of the three statistics calls
//!     └── client  bearer-authenticated GET + typed decoding
//!          ↓
//! reqwest → accounts.spotify.com / api.spotify.com
//! ```
//!
//! ## Endpoints
//!
//! - `GET  /authorize` (browser redirect, never called directly)
//! - `POST /api/token` (authorization code grant, HTTP Basic)
//! - `GET  /v1/me/top/tracks`, `GET /v1/me/top/artists`
//! - `GET  /v1/me/player/recently-played`
//! - `GET  /v1/me`
//!
//! No call is retried. Token refresh is not supported: once the access token
//! expires every data call fails with HTTP 401 and the user has to log in
//! again.

pub mod auth;
pub mod bundle;
pub mod client;

pub use auth::AuthorizationFlow;
pub use bundle::load_bundle;
pub use client::SpotifyClient;
