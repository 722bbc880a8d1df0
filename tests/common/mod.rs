#![allow(dead_code)]

use std::{
    collections::HashMap,
    net::SocketAddr,
    sync::{Arc, Mutex},
    time::Duration,
};

use axum::{
    Router,
    extract::State,
    http::{HeaderMap, Method, StatusCode, Uri, header::AUTHORIZATION},
    response::{IntoResponse, Response},
};
use serde_json::{Value, json};
use sporlstats::config::{Config, TokenExchange};

pub const CLIENT_ID: &str = "client-id";
pub const CLIENT_SECRET: &str = "client-secret";
pub const REDIRECT_URI: &str = "http://127.0.0.1:5191/";

pub const TOKEN_PATH: &str = "/api/token";
pub const TOP_TRACKS_PATH: &str = "/v1/me/top/tracks";
pub const TOP_ARTISTS_PATH: &str = "/v1/me/top/artists";
pub const RECENT_PATH: &str = "/v1/me/player/recently-played";
pub const PROFILE_PATH: &str = "/v1/me";

#[derive(Debug, Clone)]
pub struct Call {
    pub method: Method,
    pub path: String,
    pub query: HashMap<String, String>,
    pub authorization: Option<String>,
    pub body: String,
}

#[derive(Default)]
pub struct MockState {
    calls: Mutex<Vec<Call>>,
    token_response: Mutex<Option<(u16, String)>>,
    failures: Mutex<HashMap<String, u16>>,
    delay: Mutex<Duration>,
    token_delay: Mutex<Duration>,
}

/// In-process stand-in for accounts.spotify.com and api.spotify.com.
pub struct MockSpotify {
    pub addr: SocketAddr,
    state: Arc<MockState>,
}

impl MockSpotify {
    pub async fn start() -> Self {
        let state = Arc::new(MockState::default());
        let app = Router::new().fallback(handle).with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { addr, state }
    }

    pub fn config(&self) -> Config {
        let mut config = Config::new(
            CLIENT_ID,
            TokenExchange::Direct {
                client_secret: CLIENT_SECRET.to_string(),
            },
        );
        config.redirect_uri = REDIRECT_URI.to_string();
        config.auth_url = format!("http://{}/authorize", self.addr);
        config.token_url = format!("http://{}{}", self.addr, TOKEN_PATH);
        config.api_url = format!("http://{}/v1", self.addr);
        config.limit = 3;
        config
    }

    pub fn respond_to_token(&self, status: u16, body: Value) {
        *self.state.token_response.lock().unwrap() = Some((status, body.to_string()));
    }

    pub fn fail(&self, path: &str, status: u16) {
        self.state
            .failures
            .lock()
            .unwrap()
            .insert(path.to_string(), status);
    }

    pub fn recover(&self, path: &str) {
        self.state.failures.lock().unwrap().remove(path);
    }

    /// Delay applied to the data endpoints, after the call was recorded.
    pub fn delay(&self, delay: Duration) {
        *self.state.delay.lock().unwrap() = delay;
    }

    /// Delay applied to the token endpoint, after the call was recorded.
    pub fn delay_token(&self, delay: Duration) {
        *self.state.token_delay.lock().unwrap() = delay;
    }

    pub fn calls(&self, path: &str) -> Vec<Call> {
        self.state
            .calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.path == path)
            .cloned()
            .collect()
    }

    pub fn count(&self, path: &str) -> usize {
        self.calls(path).len()
    }

    pub fn total_calls(&self) -> usize {
        self.state.calls.lock().unwrap().len()
    }
}

async fn handle(
    State(state): State<Arc<MockState>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: String,
) -> Response {
    let path = uri.path().to_string();
    let query: HashMap<String, String> = uri
        .query()
        .map(|q| {
            q.split('&')
                .filter_map(|pair| pair.split_once('='))
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect()
        })
        .unwrap_or_default();

    state.calls.lock().unwrap().push(Call {
        method,
        path: path.clone(),
        query: query.clone(),
        authorization: headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(String::from),
        body,
    });

    if path == TOKEN_PATH {
        let delay = *state.token_delay.lock().unwrap();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        let (status, body) = state
            .token_response
            .lock()
            .unwrap()
            .clone()
            .unwrap_or((200, json!({ "access_token": "tok1" }).to_string()));
        return (StatusCode::from_u16(status).unwrap(), body).into_response();
    }

    let delay = *state.delay.lock().unwrap();
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }

    let failure = state.failures.lock().unwrap().get(&path).copied();
    if let Some(status) = failure {
        return (
            StatusCode::from_u16(status).unwrap(),
            json!({ "error": { "status": status, "message": "mock failure" } }).to_string(),
        )
            .into_response();
    }

    let limit: usize = query
        .get("limit")
        .and_then(|l| l.parse().ok())
        .unwrap_or(20);
    let range = query
        .get("time_range")
        .cloned()
        .unwrap_or_else(|| "medium_term".to_string());

    let body = match path.as_str() {
        TOP_TRACKS_PATH => json!({
            "items": (1..=limit).map(|i| track(&format!("t{}", i), &format!("{} track {}", range, i))).collect::<Vec<_>>()
        }),
        TOP_ARTISTS_PATH => json!({
            "items": (1..=limit).map(|i| artist(&format!("a{}", i), &format!("{} artist {}", range, i))).collect::<Vec<_>>()
        }),
        RECENT_PATH => json!({
            "items": (1..=limit).map(|i| json!({
                "track": track("t1", &format!("recent {}", i)),
                "played_at": format!("2024-05-01T12:0{}:00.000Z", i % 10),
            })).collect::<Vec<_>>()
        }),
        PROFILE_PATH => json!({
            "id": "listener",
            "display_name": "Listener",
            "email": "listener@example.com",
            "country": "DE",
            "product": "premium",
            "images": [],
            "followers": { "href": null, "total": 12 }
        }),
        _ => return StatusCode::NOT_FOUND.into_response(),
    };

    (StatusCode::OK, body.to_string()).into_response()
}

pub fn track(id: &str, name: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "artists": [{ "id": "a1", "name": "Some Artist" }],
        "album": {
            "id": "al1",
            "name": "Some Album",
            "images": [{ "url": "https://i.scdn.co/image/1", "height": 640, "width": 640 }]
        },
        "duration_ms": 215000,
        "external_urls": { "spotify": format!("https://open.spotify.com/track/{}", id) }
    })
}

pub fn artist(id: &str, name: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "images": [],
        "genres": ["indie", "pop"],
        "followers": { "href": null, "total": 1234567 },
        "external_urls": { "spotify": format!("https://open.spotify.com/artist/{}", id) }
    })
}
