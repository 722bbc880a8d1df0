use axum::response::Json;
use serde_json::{Value, json};

/// Liveness probe. Answers on the dashboard and on the configuration error
/// server alike, so it says nothing about the session.
pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "name": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
