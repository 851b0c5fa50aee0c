use chrono::{NaiveDate, NaiveTime, Utc};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::db::{self, queries};
use crate::errors::AppError;
use crate::models::{EstadoReserva, Reserva};

const CONFLICT_MSG: &str = "Ya existe una reserva para esta fecha";

#[derive(Debug, Deserialize)]
pub struct CrearReservaRequest {
    pub cliente_nombre: String,
    pub cliente_telefono: String,
    #[serde(default)]
    pub cliente_email: Option<String>,
    pub fecha_evento: String,
    pub hora_inicio: String,
    pub hora_fin: String,
    #[serde(default)]
    pub num_invitados: Option<i64>,
    #[serde(default)]
    pub tipo_celebracion: Option<String>,
    #[serde(default)]
    pub precio: Option<f64>,
    #[serde(default)]
    pub anticipo: Option<f64>,
    #[serde(default)]
    pub notas: Option<String>,
}

/// A confirmed booking projected into the shape the calendar view consumes.
#[derive(Debug, Serialize)]
pub struct CalendarEvent {
    pub id: i64,
    pub title: String,
    pub start: String,
    pub end: String,
    pub cliente: String,
    pub telefono: String,
    pub invitados: i64,
    pub precio: f64,
}

pub fn calendar_events(conn: &Connection) -> Result<Vec<CalendarEvent>, AppError> {
    let reservas = queries::get_reservas_confirmadas(conn)?;

    Ok(reservas
        .into_iter()
        .map(|r| {
            let tipo = r
                .tipo_celebracion
                .as_deref()
                .filter(|t| !t.is_empty())
                .unwrap_or("Evento");
            CalendarEvent {
                id: r.id,
                title: format!("{} - {}", r.cliente_nombre, tipo),
                start: format!(
                    "{}T{}",
                    r.fecha_evento.format("%Y-%m-%d"),
                    r.hora_inicio.format("%H:%M:%S")
                ),
                end: format!(
                    "{}T{}",
                    r.fecha_evento.format("%Y-%m-%d"),
                    r.hora_fin.format("%H:%M:%S")
                ),
                cliente: r.cliente_nombre,
                telefono: r.cliente_telefono,
                invitados: r.num_invitados,
                precio: r.precio,
            }
        })
        .collect())
}

/// Create a confirmed booking. The pre-check gives the friendly conflict
/// message; the partial unique index on (fecha_evento, confirmada) is what
/// actually closes the race between concurrent creates.
pub fn crear(
    conn: &Connection,
    req: CrearReservaRequest,
    user_id: i64,
) -> Result<i64, AppError> {
    let fecha_evento = NaiveDate::parse_from_str(&req.fecha_evento, "%Y-%m-%d")
        .map_err(|_| AppError::Validation("fecha_evento debe ser YYYY-MM-DD".to_string()))?;
    let hora_inicio = NaiveTime::parse_from_str(&req.hora_inicio, "%H:%M")
        .map_err(|_| AppError::Validation("hora_inicio debe ser HH:MM".to_string()))?;
    let hora_fin = NaiveTime::parse_from_str(&req.hora_fin, "%H:%M")
        .map_err(|_| AppError::Validation("hora_fin debe ser HH:MM".to_string()))?;

    if queries::exists_confirmada_en_fecha(conn, fecha_evento)? {
        return Err(AppError::Conflict(CONFLICT_MSG.to_string()));
    }

    let now = Utc::now().naive_utc();
    let reserva = Reserva {
        id: 0,
        cliente_nombre: req.cliente_nombre,
        cliente_telefono: req.cliente_telefono,
        cliente_email: req.cliente_email,
        fecha_evento,
        hora_inicio,
        hora_fin,
        num_invitados: req.num_invitados.unwrap_or(0),
        tipo_celebracion: req.tipo_celebracion,
        precio: req.precio.unwrap_or(0.0),
        anticipo: req.anticipo.unwrap_or(0.0),
        estado: EstadoReserva::Confirmada,
        notas: req.notas,
        created_at: now,
        updated_at: now,
        user_id: Some(user_id),
    };

    match queries::insert_reserva(conn, &reserva) {
        Ok(id) => Ok(id),
        Err(e) if db::is_constraint_violation(&e) => {
            Err(AppError::Conflict(CONFLICT_MSG.to_string()))
        }
        Err(e) => Err(e.into()),
    }
}

pub fn cambiar_estado(
    conn: &Connection,
    id: i64,
    nuevo_estado: &str,
) -> Result<EstadoReserva, AppError> {
    let estado = EstadoReserva::parse(nuevo_estado)
        .ok_or_else(|| AppError::Validation("Estado no válido".to_string()))?;

    if queries::get_reserva_by_id(conn, id)?.is_none() {
        return Err(AppError::NotFound("Reserva no encontrada".to_string()));
    }

    match queries::update_reserva_estado(conn, id, estado) {
        Ok(_) => Ok(estado),
        // Confirming a booking on an already-confirmed date hits the index.
        Err(e) if db::is_constraint_violation(&e) => Err(AppError::Conflict(
            "Ya existe una reserva confirmada para esa fecha".to_string(),
        )),
        Err(e) => Err(e.into()),
    }
}

/// Deleting a booking removes its messages through the FK cascade.
pub fn eliminar(conn: &Connection, id: i64) -> Result<(), AppError> {
    if !queries::delete_reserva(conn, id)? {
        return Err(AppError::NotFound("Reserva no encontrada".to_string()));
    }
    Ok(())
}
