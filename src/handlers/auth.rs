use std::sync::Arc;

use axum::extract::State;
use axum::http::{header, HeaderMap, HeaderValue};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::Form;
use serde::Deserialize;

use crate::errors::AppError;
use crate::services::auth;
use crate::state::AppState;

static LOGIN_HTML: &str = include_str!("../web/login.html");
static REGISTER_HTML: &str = include_str!("../web/register.html");

pub async fn login_page() -> Html<&'static str> {
    Html(LOGIN_HTML)
}

#[derive(Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

pub async fn login_submit(
    State(state): State<Arc<AppState>>,
    Form(form): Form<LoginForm>,
) -> Response {
    let result = {
        let db = state.db.lock().unwrap();
        auth::login(&db, &form.username, &form.password)
    };

    match result {
        Ok((user, token)) => {
            tracing::info!(username = %user.username, "login correcto");
            with_session_cookie(Redirect::to("/").into_response(), &token)
        }
        Err(AppError::Unauthorized) => {
            tracing::warn!(username = %form.username, "credenciales incorrectas");
            Redirect::to("/login?error=credenciales").into_response()
        }
        Err(e) => e.into_response(),
    }
}

pub async fn logout(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    if let Some(token) = auth::session_token(&headers) {
        let db = state.db.lock().unwrap();
        if let Err(e) = auth::logout(&db, &token) {
            tracing::error!(error = %e, "failed to tear down session");
        }
    }

    let mut response = Redirect::to("/login").into_response();
    response.headers_mut().insert(
        header::SET_COOKIE,
        HeaderValue::from_static("session=; Path=/; HttpOnly; Max-Age=0"),
    );
    response
}

pub async fn register_page() -> Html<&'static str> {
    Html(REGISTER_HTML)
}

#[derive(Deserialize)]
pub struct RegisterForm {
    pub username: String,
    pub email: String,
    pub password: String,
}

pub async fn register_submit(
    State(state): State<Arc<AppState>>,
    Form(form): Form<RegisterForm>,
) -> Response {
    let result = {
        let db = state.db.lock().unwrap();
        auth::register(&db, &form.username, &form.email, &form.password)
    };

    match result {
        Ok(_) => Redirect::to("/login").into_response(),
        Err(AppError::Conflict(_)) | Err(AppError::Validation(_)) => {
            Redirect::to("/register?error=existe").into_response()
        }
        Err(e) => e.into_response(),
    }
}

fn with_session_cookie(mut response: Response, token: &str) -> Response {
    let cookie = format!("session={token}; Path=/; HttpOnly; SameSite=Lax");
    if let Ok(value) = HeaderValue::from_str(&cookie) {
        response.headers_mut().insert(header::SET_COOKIE, value);
    }
    response
}
