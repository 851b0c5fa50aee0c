use std::sync::Arc;

use anyhow::Context;
use axum::http::HeaderMap;
use rusqlite::Connection;
use uuid::Uuid;

use crate::config::AppConfig;
use crate::db::{self, queries};
use crate::errors::AppError;
use crate::models::User;
use crate::state::AppState;

pub fn register(
    conn: &Connection,
    username: &str,
    email: &str,
    password: &str,
) -> Result<i64, AppError> {
    if username.is_empty() || password.is_empty() {
        return Err(AppError::Validation(
            "usuario y contraseña son obligatorios".to_string(),
        ));
    }

    if queries::get_user_by_username(conn, username)?.is_some() {
        return Err(AppError::Conflict("El usuario ya existe".to_string()));
    }

    let hash = bcrypt::hash(password, bcrypt::DEFAULT_COST)
        .context("failed to hash password")?;

    match queries::insert_user(conn, username, email, &hash, false) {
        Ok(id) => Ok(id),
        // Unique email/username hit between check and insert.
        Err(e) if db::is_constraint_violation(&e) => {
            Err(AppError::Conflict("El usuario ya existe".to_string()))
        }
        Err(e) => Err(e.into()),
    }
}

/// Verify credentials and open a session. The token is the only thing the
/// browser holds; it maps back to the user on every request.
pub fn login(conn: &Connection, username: &str, password: &str) -> Result<(User, String), AppError> {
    let user = queries::get_user_by_username(conn, username)?.ok_or(AppError::Unauthorized)?;

    let valid = bcrypt::verify(password, &user.password_hash)
        .context("failed to verify password")?;
    if !valid {
        return Err(AppError::Unauthorized);
    }

    let token = Uuid::new_v4().to_string();
    queries::insert_session(conn, &token, user.id)?;

    Ok((user, token))
}

pub fn logout(conn: &Connection, token: &str) -> Result<(), AppError> {
    queries::delete_session(conn, token)?;
    Ok(())
}

/// Resolve the request's session to a user, from either a bearer token or
/// the `session` cookie set at login.
pub fn require_user(state: &Arc<AppState>, headers: &HeaderMap) -> Result<User, AppError> {
    let token = session_token(headers).ok_or(AppError::Unauthorized)?;

    let db = state.db.lock().unwrap();
    queries::get_session_user(&db, &token)?.ok_or(AppError::Unauthorized)
}

pub fn session_token(headers: &HeaderMap) -> Option<String> {
    if let Some(auth) = headers.get("authorization").and_then(|v| v.to_str().ok()) {
        if let Some(token) = auth.strip_prefix("Bearer ") {
            return Some(token.to_string());
        }
    }

    let cookies = headers.get("cookie").and_then(|v| v.to_str().ok())?;
    cookies
        .split(';')
        .map(str::trim)
        .find_map(|c| c.strip_prefix("session=").map(str::to_string))
}

/// One-time bootstrap: create the admin account when the user table is
/// empty and ADMIN_PASSWORD is configured.
pub fn seed_admin(conn: &Connection, config: &AppConfig) -> anyhow::Result<()> {
    if config.admin_password.is_empty() || queries::count_users(conn)? > 0 {
        return Ok(());
    }

    let hash = bcrypt::hash(&config.admin_password, bcrypt::DEFAULT_COST)
        .context("failed to hash admin password")?;
    queries::insert_user(conn, "admin", "admin@finca.com", &hash, true)?;

    tracing::info!("seeded initial admin user");
    Ok(())
}
