use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Redirect, Response},
};

use crate::{
    api::AppState,
    session::{RetryAction, SessionView, Status},
    types::TimeRange,
};

pub async fn login(State(state): State<AppState>) -> Response {
    match state.session.login_url() {
        Ok(url) => Redirect::to(url.as_str()).into_response(),
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response(),
    }
}

/// Starts loading the data bundle in the background. The page shows the
/// loading state and refreshes until the session settles.
pub async fn load(State(state): State<AppState>) -> Redirect {
    let session = state.session.clone();
    tokio::spawn(async move {
        // failures are recorded in the session status
        let _ = session.load_data().await;
    });
    Redirect::to("/")
}

pub async fn range(State(state): State<AppState>, Path(range): Path<String>) -> Response {
    let Some(time_range) = TimeRange::parse(&range) else {
        return (
            StatusCode::BAD_REQUEST,
            format!("unknown time range {:?}", range),
        )
            .into_response();
    };

    let session = state.session.clone();
    tokio::spawn(async move {
        let _ = session.set_time_range(time_range).await;
    });
    Redirect::to("/").into_response()
}

pub async fn retry(State(state): State<AppState>) -> Response {
    if let Status::DataError(_) = state.session.status().await {
        let session = state.session.clone();
        tokio::spawn(async move {
            let _ = session.retry().await;
        });
        return Redirect::to("/").into_response();
    }

    match state.session.retry().await {
        Ok(RetryAction::Login(url)) => Redirect::to(url.as_str()).into_response(),
        Ok(_) => Redirect::to("/").into_response(),
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response(),
    }
}

pub async fn logout(State(state): State<AppState>) -> Redirect {
    state.session.logout().await;
    Redirect::to("/")
}

pub async fn session(State(state): State<AppState>) -> Json<SessionView> {
    Json(state.session.view().await)
}
