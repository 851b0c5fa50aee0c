use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use crate::errors::AppError;
use crate::services::auth;
use crate::services::reservas::{self, CalendarEvent, CrearReservaRequest};
use crate::state::AppState;

// GET /api/reservas
pub async fn get_reservas(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Vec<CalendarEvent>>, AppError> {
    auth::require_user(&state, &headers)?;

    let db = state.db.lock().unwrap();
    Ok(Json(reservas::calendar_events(&db)?))
}

// POST /api/reservas
pub async fn crear_reserva(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(req): Json<CrearReservaRequest>,
) -> Result<impl IntoResponse, AppError> {
    let user = auth::require_user(&state, &headers)?;

    let id = {
        let db = state.db.lock().unwrap();
        reservas::crear(&db, req, user.id)?
    };

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "message": "Reserva creada correctamente",
            "id": id,
        })),
    ))
}

// DELETE /api/reservas/:id
pub async fn eliminar_reserva(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, AppError> {
    auth::require_user(&state, &headers)?;

    {
        let db = state.db.lock().unwrap();
        reservas::eliminar(&db, id)?;
    }

    Ok(Json(serde_json::json!({
        "message": "Reserva eliminada correctamente",
    })))
}

// PUT /api/reservas/:id/estado
#[derive(Deserialize)]
pub struct CambiarEstadoRequest {
    pub estado: String,
}

pub async fn cambiar_estado(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(req): Json<CambiarEstadoRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    auth::require_user(&state, &headers)?;

    let estado = {
        let db = state.db.lock().unwrap();
        reservas::cambiar_estado(&db, id, &req.estado)?
    };

    Ok(Json(serde_json::json!({
        "message": format!("Estado cambiado a {}", estado.as_str()),
        "reserva_id": id,
        "nuevo_estado": estado.as_str(),
    })))
}
