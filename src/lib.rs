//! sporlstats library
//!
//! Logs a user into Spotify with the OAuth2 Authorization Code flow and
//! loads their listening statistics: top tracks, top artists and recently
//! played tracks. The library holds the session lifecycle and the data
//! aggregation; the local web dashboard and the terminal commands are thin
//! consumers of it.
//!
//! # Modules
//!
//! - `api` - HTTP handlers of the local dashboard
//! - `cli` - Command-line interface implementations
//! - `config` - Configuration from environment variables and `.env`
//! - `error` - Error types of every layer
//! - `logging` - Diagnostic logging setup
//! - `server` - Local HTTP server serving the dashboard and the OAuth redirect
//! - `session` - Session state machine
//! - `spotify` - Spotify Web API client, authorization flow and aggregation
//! - `storage` - Persisted key-value storage and the token store
//! - `types` - Data structures and type definitions
//! - `utils` - Formatting helpers for terminal output
//! - `view` - HTML rendering of a session snapshot
//!
//! # Example
//!
//! ```
//! use sporlstats::{config::Config, session::Session, storage::MemoryStorage};
//!
//! #[tokio::main]
//! async fn main() -> sporlstats::Res<()> {
//!     let config = Config::from_env()?;
//!     let session = Session::new(&config, MemoryStorage::new());
//!     session.boot(&config.redirect_uri.parse()?).await;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod server;
pub mod session;
pub mod spotify;
pub mod storage;
pub mod types;
pub mod utils;
pub mod view;

/// Result alias used by the server and command entry points, where any
/// error is only reported and never matched on.
pub type Res<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Terminal status line with a blue `o` marker.
///
/// ```
/// info!("Dashboard running at {}", addr);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Terminal status line with a green check mark.
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a red `!` line and exits with status 1.
///
/// Evaluates to `!`, so it can end a `match` arm or a `let ... else`:
///
/// ```
/// let Some(bundle) = view.bundle else {
///     error!("No data loaded.");
/// };
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Terminal status line with a yellow `!` marker, for problems the command
/// can carry on after.
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
