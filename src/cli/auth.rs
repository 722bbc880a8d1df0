use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use crate::{
    cli::{base_location, open_session},
    config::Config,
    error, info,
    server::start_api_server,
    session::{Session, Status},
    storage::{FileStorage, TokenStore},
    success, warning,
};

/// Logs in through the browser.
///
/// Starts the dashboard in the background so that the provider can redirect
/// back to it, opens the login page and waits up to 60 seconds for the
/// authorization code to be exchanged.
pub async fn login(config: Config) {
    let session = Arc::new(open_session(&config));
    session.boot(&base_location(&config)).await;

    if session.status().await.has_token() {
        success!("Already logged in. Run sporlstats logout to switch accounts.");
        return;
    }

    let server_session = Arc::clone(&session);
    let server_config = config.clone();
    tokio::spawn(async move {
        if let Err(e) = start_api_server(server_session, &server_config).await {
            warning!("Dashboard server stopped: {}", e);
        }
    });

    let login_url = match session.login_url() {
        Ok(url) => url,
        Err(e) => error!("Failed to build login URL: {}", e),
    };

    if webbrowser::open(login_url.as_str()).is_err() {
        warning!(
            "Failed to open browser. Please navigate to the following URL manually:\n{}",
            login_url
        )
    }
    info!("Waiting for Spotify to redirect back to {}", config.redirect_uri);

    match wait_for_session(&session).await {
        Some(Status::Authenticated) => success!("Authentication successful!"),
        Some(Status::AuthError(reason)) => error!("Can't log in: {}", reason),
        _ => error!("Authentication failed or timed out."),
    }
}

/// Polls the session until the code exchange settled, for at most 60 seconds.
async fn wait_for_session(session: &Session) -> Option<Status> {
    let max_wait = Duration::from_secs(60);
    let start = Instant::now();

    while start.elapsed() < max_wait {
        let status = session.status().await;
        if status.has_token() || matches!(status, Status::AuthError(_)) {
            return Some(status);
        }
        tokio::time::sleep(Duration::from_millis(500)).await;
    }

    None
}

/// Forgets the persisted access token. Works without any credentials
/// configured.
pub async fn logout() {
    let mut store = TokenStore::new(FileStorage::default());
    if store.load().is_none() {
        info!("Not logged in.");
        return;
    }
    match store.clear() {
        Ok(()) => success!("Logged out."),
        Err(e) => error!("Failed to remove token: {}", e),
    }
}
