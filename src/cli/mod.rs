//! # CLI Module
//!
//! Terminal commands. Each command builds a [`Session`] backed by the
//! persisted token file, drives it, and prints the outcome with the
//! `info!`/`success!`/`warning!`/`error!` macros.
//!
//! ## Commands
//!
//! - [`serve`] - run the local dashboard (also renders configuration errors)
//! - [`login`] - run the dashboard, open the login page and wait for the token
//! - [`stats`] - print top tracks, top artists and recently played tracks
//! - [`profile`] - print the profile of the logged in user
//! - [`logout`] - forget the persisted token
//!
//! ```bash
//! sporlstats login
//! sporlstats stats --range short_term --limit 3
//! sporlstats logout
//! ```

mod auth;
mod profile;
mod serve;
mod stats;

use reqwest::Url;

use crate::{config::Config, error, session::Session, storage::FileStorage};

pub use auth::{login, logout};
pub use profile::profile;
pub use serve::serve;
pub use stats::stats;

fn open_session(config: &Config) -> Session {
    Session::new(config, FileStorage::default())
}

fn base_location(config: &Config) -> Url {
    match Url::parse(&config.redirect_uri) {
        Ok(url) => url,
        Err(e) => error!("Invalid redirect URI {}: {}", config.redirect_uri, e),
    }
}

/// Session booted from the persisted token; exits if there is none.
async fn authenticated_session(config: &Config) -> Session {
    let session = open_session(config);
    session.boot(&base_location(config)).await;
    if !session.status().await.has_token() {
        error!("Not logged in. Please run sporlstats login");
    }
    session
}
