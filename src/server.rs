use std::{net::SocketAddr, sync::Arc};

use axum::{
    Router,
    routing::{get, post},
};
use reqwest::Url;

use crate::{
    Res,
    api::{self, AppState, ConfigErrorState},
    config::{Config, CredentialStatus},
    session::Session,
};

/// Routes of the dashboard. The page is served at `/` and, if it differs, at
/// the path of the redirect URI.
pub fn router(session: Arc<Session>, config: &Config) -> Res<Router> {
    let base = Url::parse(&config.redirect_uri)?;
    let redirect_path = base.path().to_string();

    let mut app = Router::new()
        .route("/", get(api::page))
        .route("/login", get(api::login))
        .route("/load", post(api::load))
        .route("/range/{range}", post(api::range))
        .route("/retry", post(api::retry))
        .route("/logout", post(api::logout))
        .route("/api/session", get(api::session))
        .route("/health", get(api::health));

    if redirect_path != "/" {
        app = app.route(&redirect_path, get(api::page));
    }

    Ok(app.with_state(AppState { session, base }))
}

/// Serves the dashboard until the process ends.
pub async fn start_api_server(session: Arc<Session>, config: &Config) -> Res<()> {
    let app = router(session, config)?;
    serve(app, config.server_addr).await
}

/// Serves only the configuration error page, so that missing credentials
/// are visible in the browser and not just in a log.
pub async fn start_config_error_server(reason: String, addr: SocketAddr) -> Res<()> {
    let app = Router::new()
        .route("/health", get(api::health))
        .fallback(api::config_error)
        .with_state(ConfigErrorState {
            reason,
            credentials: CredentialStatus::from_env(),
        });
    serve(app, addr).await
}

async fn serve(app: Router, addr: SocketAddr) -> Res<()> {
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "dashboard listening");
    axum::serve(listener, app).await?;
    Ok(())
}
