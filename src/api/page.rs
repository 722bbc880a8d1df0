use axum::{
    extract::{RawQuery, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};

use crate::{
    api::{AppState, ConfigErrorState},
    view,
};

/// Page load. When the provider redirected back with a code (or an error),
/// the session consumes it and the browser is sent to the same page without
/// the OAuth parameters, so a reload cannot submit the code again.
pub async fn page(State(state): State<AppState>, RawQuery(query): RawQuery) -> Response {
    let mut location = state.base.clone();
    location.set_query(query.as_deref());

    let cleaned = state.session.boot(&location).await;
    if cleaned != location {
        let target = match cleaned.query() {
            Some(q) => format!("{}?{}", cleaned.path(), q),
            None => cleaned.path().to_string(),
        };
        return Redirect::to(&target).into_response();
    }

    Html(view::render(&state.session.view().await)).into_response()
}

pub async fn config_error(State(state): State<ConfigErrorState>) -> Response {
    (
        StatusCode::SERVICE_UNAVAILABLE,
        Html(view::render_config_error(&state.reason, &state.credentials)),
    )
        .into_response()
}
