use std::sync::Arc;

use crate::{
    cli::{base_location, open_session},
    config::{self, Config},
    error::ConfigError,
    info,
    server::{start_api_server, start_config_error_server},
    warning,
};

/// Runs the dashboard. With an unusable configuration the dashboard still
/// starts, but every page shows which credentials are missing.
pub async fn serve(config: Result<Config, ConfigError>, open: bool) {
    let config = match config {
        Ok(config) => config,
        Err(e) => {
            warning!("Configuration error: {}", e);
            let addr = config::fallback_server_addr();
            info!("Serving configuration error page at http://{}/", addr);
            if let Err(e) = start_config_error_server(e.to_string(), addr).await {
                crate::error!("Failed to start server: {}", e);
            }
            return;
        }
    };

    let session = Arc::new(open_session(&config));
    session.boot(&base_location(&config)).await;

    info!("Dashboard running at {}", config.redirect_uri);
    if open && webbrowser::open(&config.redirect_uri).is_err() {
        warning!("Failed to open browser. Please navigate to {}", config.redirect_uri);
    }

    if let Err(e) = start_api_server(session, &config).await {
        crate::error!("Failed to start server: {}", e);
    }
}
