use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::{Form, Json};
use serde::Deserialize;

use crate::errors::AppError;
use crate::models::{ConversationMessage, ConversationSummary};
use crate::services::auth;
use crate::services::mensajes::{self, SendOutcome};
use crate::state::AppState;

// POST /api/whatsapp/enviar
#[derive(Deserialize)]
pub struct EnviarRequest {
    pub telefono: String,
    pub mensaje: String,
    #[serde(default)]
    pub reserva_id: Option<i64>,
}

pub async fn enviar_whatsapp(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(req): Json<EnviarRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let user = auth::require_user(&state, &headers)?;

    match mensajes::enviar(&state, &req.telefono, &req.mensaje, req.reserva_id, user.id).await? {
        SendOutcome::Simulated => Ok(Json(serde_json::json!({
            "error": "Configuración de Twilio no disponible",
            "message": "Mensaje simulado (configura Twilio para enviar realmente)",
        }))),
        SendOutcome::Sent { sid } => Ok(Json(serde_json::json!({
            "message": "Mensaje enviado correctamente",
            "sid": sid,
        }))),
    }
}

// POST /api/whatsapp/webhook
//
// The provider retries on any non-success response, so this handler
// acknowledges unconditionally and only logs internal failures.
pub async fn webhook(
    State(state): State<Arc<AppState>>,
    Form(form): Form<HashMap<String, String>>,
) -> StatusCode {
    if let Err(e) = mensajes::record_inbound(&state, &form) {
        tracing::error!(error = %e, "error procesando webhook entrante");
    }
    StatusCode::OK
}

// GET /api/mensajes/agrupados
pub async fn mensajes_agrupados(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Vec<ConversationSummary>>, AppError> {
    auth::require_user(&state, &headers)?;

    let db = state.db.lock().unwrap();
    Ok(Json(mensajes::conversaciones(
        &db,
        &state.config.twilio_whatsapp_number,
    )?))
}

// GET /api/conversacion/:telefono
pub async fn conversacion(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(telefono): Path<String>,
) -> Result<Json<Vec<ConversationMessage>>, AppError> {
    auth::require_user(&state, &headers)?;

    let db = state.db.lock().unwrap();
    Ok(Json(mensajes::conversacion(&db, &telefono)?))
}
