use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::Utc;
use rusqlite::Connection;

use crate::db::queries;
use crate::errors::AppError;
use crate::models::{
    ConversationMessage, ConversationSummary, Direccion, EstadoMensaje, Mensaje, Reserva,
};
use crate::services::phone;
use crate::state::AppState;

const PREVIEW_CHARS: usize = 50;

pub enum SendOutcome {
    /// Credentials missing: nothing was sent and nothing was recorded.
    Simulated,
    Sent { sid: String },
}

/// Send a WhatsApp message and record the outcome. A provider failure is
/// still recorded (status `fallido`) before being surfaced.
pub async fn enviar(
    state: &Arc<AppState>,
    telefono: &str,
    mensaje: &str,
    reserva_id: Option<i64>,
    user_id: i64,
) -> Result<SendOutcome, AppError> {
    if !state.config.twilio_configured() {
        tracing::info!(to = %telefono, "Twilio no configurado, envío simulado");
        return Ok(SendOutcome::Simulated);
    }

    let destino = phone::to_whatsapp(telefono);

    match state.messaging.send_message(&destino, mensaje).await {
        Ok(sid) => {
            let row = outbound_row(
                state,
                &destino,
                mensaje,
                reserva_id,
                user_id,
                EstadoMensaje::Enviado,
                Some(sid.clone()),
            );
            let db = state.db.lock().unwrap();
            queries::insert_mensaje(&db, &row)?;
            Ok(SendOutcome::Sent { sid })
        }
        Err(e) => {
            tracing::error!(error = %e, to = %destino, "fallo al enviar WhatsApp");
            let row = outbound_row(
                state,
                &destino,
                mensaje,
                reserva_id,
                user_id,
                EstadoMensaje::Fallido,
                None,
            );
            {
                let db = state.db.lock().unwrap();
                queries::insert_mensaje(&db, &row)?;
            }
            Err(AppError::Provider(e.to_string()))
        }
    }
}

fn outbound_row(
    state: &Arc<AppState>,
    destino: &str,
    contenido: &str,
    reserva_id: Option<i64>,
    user_id: i64,
    estado: EstadoMensaje,
    twilio_sid: Option<String>,
) -> Mensaje {
    Mensaje {
        id: 0,
        reserva_id,
        telefono_destino: destino.to_string(),
        telefono_origen: state.config.twilio_whatsapp_number.clone(),
        contenido: contenido.to_string(),
        tipo: "whatsapp".to_string(),
        direccion: Direccion::Saliente,
        estado,
        twilio_sid,
        num_media: 0,
        media_urls: None,
        media_types: None,
        enviado_at: Utc::now().naive_utc(),
        user_id: Some(user_id),
    }
}

/// Record an inbound webhook delivery. Attachment URL/type pairs arrive as
/// indexed form fields (`MediaUrl0`, `MediaContentType0`, ...).
pub fn record_inbound(
    state: &Arc<AppState>,
    form: &HashMap<String, String>,
) -> anyhow::Result<i64> {
    let from = form.get("From").map(String::as_str).unwrap_or("").trim();
    let to = form.get("To").map(String::as_str).unwrap_or("").trim();
    anyhow::ensure!(!from.is_empty(), "webhook payload missing From");

    let message_sid = form.get("MessageSid").cloned();
    let num_media: usize = form
        .get("NumMedia")
        .and_then(|v| v.parse().ok())
        .unwrap_or(0);

    let mut media_urls = Vec::new();
    let mut media_types = Vec::new();
    for i in 0..num_media {
        if let Some(url) = form.get(&format!("MediaUrl{i}")) {
            media_urls.push(url.clone());
            media_types.push(
                form.get(&format!("MediaContentType{i}"))
                    .cloned()
                    .unwrap_or_else(|| "unknown".to_string()),
            );
        }
    }

    let mut contenido = form.get("Body").cloned().unwrap_or_default();
    if contenido.is_empty() && num_media > 0 {
        contenido = format!("[{num_media} archivo(s) multimedia]");
    }

    let db = state.db.lock().unwrap();
    let reserva = reserva_para_telefono(&db, from)?;

    let mensaje = Mensaje {
        id: 0,
        reserva_id: reserva.map(|r| r.id),
        telefono_destino: to.to_string(),
        telefono_origen: from.to_string(),
        contenido,
        tipo: "whatsapp".to_string(),
        direccion: Direccion::Entrante,
        estado: EstadoMensaje::Recibido,
        twilio_sid: message_sid,
        num_media: num_media as i64,
        media_urls: encode_list(&media_urls)?,
        media_types: encode_list(&media_types)?,
        enviado_at: Utc::now().naive_utc(),
        user_id: None,
    };

    let id = queries::insert_mensaje(&db, &mensaje)?;
    tracing::info!(from = %from, num_media, "mensaje entrante registrado");
    Ok(id)
}

fn encode_list(list: &[String]) -> anyhow::Result<Option<String>> {
    if list.is_empty() {
        Ok(None)
    } else {
        Ok(Some(serde_json::to_string(list)?))
    }
}

/// First booking whose client phone carries the same fingerprint. Both
/// sides go through [`phone::fingerprint`], so stored formatting
/// (spaces, country code, `+`) does not break the match.
fn reserva_para_telefono(
    conn: &Connection,
    telefono: &str,
) -> anyhow::Result<Option<Reserva>> {
    let huella = phone::fingerprint(telefono);
    if huella.is_empty() {
        return Ok(None);
    }

    let reservas = queries::get_reservas(conn)?;
    Ok(reservas
        .into_iter()
        .find(|r| phone::fingerprint(&r.cliente_telefono) == huella))
}

/// One summary per counterpart number, most recently active first. Walks
/// every message per number; fine at single-venue volumes.
pub fn conversaciones(
    conn: &Connection,
    venue_number: &str,
) -> Result<Vec<ConversationSummary>, AppError> {
    let mensajes = queries::get_mensajes_desc(conn)?;

    let mut vistos = HashSet::new();
    let mut resultado = Vec::new();

    // Newest-first order means the first sighting of a number carries its
    // most recent message, and the output is already sorted by activity.
    for mensaje in &mensajes {
        for telefono in [
            mensaje.telefono_origen.as_str(),
            mensaje.telefono_destino.as_str(),
        ] {
            if telefono.is_empty() || telefono == venue_number {
                continue;
            }
            if !vistos.insert(telefono.to_string()) {
                continue;
            }

            let limpio = phone::normalize(telefono);
            let nombre = reserva_para_telefono(conn, telefono)?
                .map(|r| r.cliente_nombre)
                .unwrap_or_else(|| limpio.clone());

            resultado.push(ConversationSummary {
                telefono: telefono.to_string(),
                nombre,
                ultimo_mensaje: preview(mensaje),
                ultimo_mensaje_fecha: mensaje.enviado_at.format("%d/%m %H:%M").to_string(),
                no_leidos: 0,
                tiene_multimedia: mensaje.num_media > 0,
            });
        }
    }

    Ok(resultado)
}

fn preview(mensaje: &Mensaje) -> String {
    let mut texto: String = mensaje.contenido.chars().take(PREVIEW_CHARS).collect();
    if mensaje.num_media > 0 {
        texto = format!("📎 {} archivo(s) - {texto}", mensaje.num_media);
    }
    if mensaje.contenido.chars().count() > PREVIEW_CHARS {
        texto.push_str("...");
    }
    texto
}

/// Full ordered history with one number, attachments decoded.
pub fn conversacion(
    conn: &Connection,
    telefono: &str,
) -> Result<Vec<ConversationMessage>, AppError> {
    let normalizado = phone::normalize(telefono);
    let mensajes = queries::get_mensajes_para_telefono(conn, &phone::fingerprint(&normalizado))?;

    Ok(mensajes
        .into_iter()
        .map(|m| {
            let fecha = m.enviado_at.format("%d/%m/%Y %H:%M").to_string();
            let media_urls = m.media_url_list();
            let media_types = m.media_type_list();
            ConversationMessage {
                id: m.id,
                contenido: m.contenido,
                direccion: m.direccion,
                estado: m.estado,
                fecha,
                telefono_origen: m.telefono_origen,
                telefono_destino: m.telefono_destino,
                num_media: m.num_media,
                media_urls,
                media_types,
            }
        })
        .collect())
}
