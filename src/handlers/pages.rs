use std::sync::Arc;

use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::{Html, IntoResponse, Redirect, Response};

use crate::services::auth;
use crate::state::AppState;

static INDEX_HTML: &str = include_str!("../web/index.html");
static CALENDARIO_HTML: &str = include_str!("../web/calendario.html");
static RESERVAS_HTML: &str = include_str!("../web/reservas.html");
static MENSAJES_HTML: &str = include_str!("../web/mensajes.html");

pub async fn index(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    page(&state, &headers, INDEX_HTML)
}

pub async fn calendario(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    page(&state, &headers, CALENDARIO_HTML)
}

pub async fn reservas(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    page(&state, &headers, RESERVAS_HTML)
}

pub async fn mensajes(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    page(&state, &headers, MENSAJES_HTML)
}

fn page(state: &Arc<AppState>, headers: &HeaderMap, html: &'static str) -> Response {
    match auth::require_user(state, headers) {
        Ok(_) => Html(html).into_response(),
        Err(_) => Redirect::to("/login").into_response(),
    }
}
