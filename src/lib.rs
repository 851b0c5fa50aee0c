pub mod config;
pub mod db;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod services;
pub mod state;

use std::sync::Arc;

use axum::routing::{delete, get, post, put};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// The full HTTP surface. Shared between `main` and the integration tests
/// so both exercise the same routing.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(handlers::health::health))
        .route(
            "/login",
            get(handlers::auth::login_page).post(handlers::auth::login_submit),
        )
        .route("/logout", get(handlers::auth::logout))
        .route(
            "/register",
            get(handlers::auth::register_page).post(handlers::auth::register_submit),
        )
        .route("/", get(handlers::pages::index))
        .route("/calendario", get(handlers::pages::calendario))
        .route("/reservas", get(handlers::pages::reservas))
        .route("/mensajes", get(handlers::pages::mensajes))
        .route(
            "/api/reservas",
            get(handlers::reservas::get_reservas).post(handlers::reservas::crear_reserva),
        )
        .route("/api/reservas/:id", delete(handlers::reservas::eliminar_reserva))
        .route(
            "/api/reservas/:id/estado",
            put(handlers::reservas::cambiar_estado),
        )
        .route(
            "/api/whatsapp/enviar",
            post(handlers::whatsapp::enviar_whatsapp),
        )
        .route("/api/whatsapp/webhook", post(handlers::whatsapp::webhook))
        .route(
            "/api/mensajes/agrupados",
            get(handlers::whatsapp::mensajes_agrupados),
        )
        .route(
            "/api/conversacion/:telefono",
            get(handlers::whatsapp::conversacion),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
