use base64::{Engine, engine::general_purpose::STANDARD};
use reqwest::{Client, Url, header::AUTHORIZATION};

use crate::{
    config::{Config, TokenExchange},
    error::AuthError,
    types::TokenResponse,
};

/// Builds the provider's authorize URL.
///
/// The scope list is space-joined and `show_dialog=true` forces the consent
/// dialog, so a previous grant is never silently reused.
pub fn build_login_url(
    auth_url: &str,
    client_id: &str,
    redirect_uri: &str,
    scopes: &[String],
) -> Result<Url, AuthError> {
    let scope = scopes.join(" ");
    Url::parse_with_params(
        auth_url,
        &[
            ("client_id", client_id),
            ("response_type", "code"),
            ("redirect_uri", redirect_uri),
            ("scope", scope.as_str()),
            ("show_dialog", "true"),
        ],
    )
    .map_err(|e| AuthError::InvalidUrl(e.to_string()))
}

/// Value of the `Authorization` header for the direct token request.
pub fn basic_credentials(client_id: &str, client_secret: &str) -> String {
    format!(
        "Basic {}",
        STANDARD.encode(format!("{}:{}", client_id, client_secret))
    )
}

/// Authorization code carried by a redirect back from the provider.
pub fn authorization_code(location: &Url) -> Option<String> {
    query_param(location, "code")
}

/// Reason given by the provider when the user declined the consent dialog.
pub fn authorization_error(location: &Url) -> Option<String> {
    query_param(location, "error")
}

/// Removes the OAuth redirect parameters from a location so that reloading
/// it cannot submit the same code again.
pub fn strip_code(location: &Url) -> Url {
    let kept: Vec<(String, String)> = location
        .query_pairs()
        .filter(|(k, _)| !matches!(k.as_ref(), "code" | "state" | "error"))
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    let mut cleaned = location.clone();
    if kept.is_empty() {
        cleaned.set_query(None);
    } else {
        cleaned.query_pairs_mut().clear().extend_pairs(kept);
    }
    cleaned
}

fn query_param(location: &Url, name: &str) -> Option<String> {
    location
        .query_pairs()
        .find(|(k, _)| k == name)
        .map(|(_, v)| v.into_owned())
        .filter(|v| !v.is_empty())
}

/// Login redirect construction and authorization code exchange.
#[derive(Debug, Clone)]
pub struct AuthorizationFlow {
    http: Client,
    client_id: String,
    redirect_uri: String,
    scopes: Vec<String>,
    auth_url: String,
    token_url: String,
    exchange: TokenExchange,
}

impl AuthorizationFlow {
    pub fn new(config: &Config, http: Client) -> Self {
        Self {
            http,
            client_id: config.client_id.clone(),
            redirect_uri: config.redirect_uri.clone(),
            scopes: config.scopes.clone(),
            auth_url: config.auth_url.clone(),
            token_url: config.token_url.clone(),
            exchange: config.exchange.clone(),
        }
    }

    pub fn login_url(&self) -> Result<Url, AuthError> {
        build_login_url(
            &self.auth_url,
            &self.client_id,
            &self.redirect_uri,
            &self.scopes,
        )
    }

    /// Exchanges an authorization code for an access token.
    ///
    /// Issues exactly one POST. With [`TokenExchange::Direct`] the request goes
    /// to the token endpoint, authenticated with HTTP Basic built from the
    /// client id and secret. With [`TokenExchange::Broker`] the code goes to
    /// the intermediary instead and no secret is involved on this side.
    ///
    /// # Errors
    ///
    /// - [`AuthError::Request`] on transport failure
    /// - [`AuthError::Rejected`] on any non-success status
    /// - [`AuthError::Decode`] if the body is not JSON
    /// - [`AuthError::MissingAccessToken`] if the JSON lacks `access_token`
    pub async fn exchange_code(&self, code: &str) -> Result<String, AuthError> {
        let request = match &self.exchange {
            TokenExchange::Direct { client_secret } => self
                .http
                .post(&self.token_url)
                .header(
                    AUTHORIZATION,
                    basic_credentials(&self.client_id, client_secret),
                )
                .form(&[
                    ("grant_type", "authorization_code"),
                    ("code", code),
                    ("redirect_uri", self.redirect_uri.as_str()),
                ]),
            TokenExchange::Broker { url } => self.http.post(url).form(&[
                ("client_id", self.client_id.as_str()),
                ("code", code),
                ("redirect_uri", self.redirect_uri.as_str()),
            ]),
        };

        let broker = matches!(self.exchange, TokenExchange::Broker { .. });
        tracing::debug!(broker, "exchanging authorization code");
        let res = request.send().await?;

        let status = res.status();
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "token exchange rejected");
            return Err(AuthError::Rejected {
                status: status.as_u16(),
            });
        }

        let body = res.bytes().await?;
        let token: TokenResponse = serde_json::from_slice(&body).map_err(AuthError::Decode)?;

        token
            .access_token
            .filter(|t| !t.is_empty())
            .ok_or(AuthError::MissingAccessToken)
    }
}
