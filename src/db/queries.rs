use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Utc};
use rusqlite::{params, Connection};

use crate::models::{Direccion, EstadoMensaje, EstadoReserva, Mensaje, Reserva, User};

const DATE_FMT: &str = "%Y-%m-%d";
const TIME_FMT: &str = "%H:%M";
const DATETIME_FMT: &str = "%Y-%m-%d %H:%M:%S";

// ── Users ──

pub fn insert_user(
    conn: &Connection,
    username: &str,
    email: &str,
    password_hash: &str,
    is_admin: bool,
) -> anyhow::Result<i64> {
    conn.execute(
        "INSERT INTO users (username, email, password_hash, is_admin) VALUES (?1, ?2, ?3, ?4)",
        params![username, email, password_hash, is_admin as i32],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn get_user_by_username(conn: &Connection, username: &str) -> anyhow::Result<Option<User>> {
    let result = conn.query_row(
        "SELECT id, username, email, password_hash, is_admin, created_at
         FROM users WHERE username = ?1",
        params![username],
        |row| Ok(parse_user_row(row)),
    );

    match result {
        Ok(user) => Ok(Some(user?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn count_users(conn: &Connection) -> anyhow::Result<i64> {
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))?;
    Ok(count)
}

fn parse_user_row(row: &rusqlite::Row) -> anyhow::Result<User> {
    let created_at_str: String = row.get(5)?;
    Ok(User {
        id: row.get(0)?,
        username: row.get(1)?,
        email: row.get(2)?,
        password_hash: row.get(3)?,
        is_admin: row.get::<_, i32>(4)? != 0,
        created_at: parse_datetime(&created_at_str),
    })
}

// ── Sessions ──

pub fn insert_session(conn: &Connection, token: &str, user_id: i64) -> anyhow::Result<()> {
    conn.execute(
        "INSERT INTO sessions (token, user_id) VALUES (?1, ?2)",
        params![token, user_id],
    )?;
    Ok(())
}

pub fn get_session_user(conn: &Connection, token: &str) -> anyhow::Result<Option<User>> {
    let result = conn.query_row(
        "SELECT u.id, u.username, u.email, u.password_hash, u.is_admin, u.created_at
         FROM sessions s INNER JOIN users u ON u.id = s.user_id
         WHERE s.token = ?1",
        params![token],
        |row| Ok(parse_user_row(row)),
    );

    match result {
        Ok(user) => Ok(Some(user?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn delete_session(conn: &Connection, token: &str) -> anyhow::Result<bool> {
    let count = conn.execute("DELETE FROM sessions WHERE token = ?1", params![token])?;
    Ok(count > 0)
}

// ── Reservas ──

const RESERVA_COLUMNS: &str = "id, cliente_nombre, cliente_telefono, cliente_email, fecha_evento, \
     hora_inicio, hora_fin, num_invitados, tipo_celebracion, precio, anticipo, estado, notas, \
     created_at, updated_at, user_id";

pub fn insert_reserva(conn: &Connection, reserva: &Reserva) -> anyhow::Result<i64> {
    conn.execute(
        "INSERT INTO reservas (cliente_nombre, cliente_telefono, cliente_email, fecha_evento,
             hora_inicio, hora_fin, num_invitados, tipo_celebracion, precio, anticipo, estado,
             notas, created_at, updated_at, user_id)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)",
        params![
            reserva.cliente_nombre,
            reserva.cliente_telefono,
            reserva.cliente_email,
            reserva.fecha_evento.format(DATE_FMT).to_string(),
            reserva.hora_inicio.format(TIME_FMT).to_string(),
            reserva.hora_fin.format(TIME_FMT).to_string(),
            reserva.num_invitados,
            reserva.tipo_celebracion,
            reserva.precio,
            reserva.anticipo,
            reserva.estado.as_str(),
            reserva.notas,
            reserva.created_at.format(DATETIME_FMT).to_string(),
            reserva.updated_at.format(DATETIME_FMT).to_string(),
            reserva.user_id,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn get_reserva_by_id(conn: &Connection, id: i64) -> anyhow::Result<Option<Reserva>> {
    let result = conn.query_row(
        &format!("SELECT {RESERVA_COLUMNS} FROM reservas WHERE id = ?1"),
        params![id],
        |row| Ok(parse_reserva_row(row)),
    );

    match result {
        Ok(reserva) => Ok(Some(reserva?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn get_reservas_confirmadas(conn: &Connection) -> anyhow::Result<Vec<Reserva>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {RESERVA_COLUMNS} FROM reservas WHERE estado = 'confirmada' ORDER BY fecha_evento ASC"
    ))?;

    let rows = stmt.query_map([], |row| Ok(parse_reserva_row(row)))?;

    let mut reservas = vec![];
    for row in rows {
        reservas.push(row??);
    }
    Ok(reservas)
}

pub fn exists_confirmada_en_fecha(conn: &Connection, fecha: NaiveDate) -> anyhow::Result<bool> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM reservas WHERE fecha_evento = ?1 AND estado = 'confirmada'",
        params![fecha.format(DATE_FMT).to_string()],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

pub fn update_reserva_estado(
    conn: &Connection,
    id: i64,
    estado: EstadoReserva,
) -> anyhow::Result<bool> {
    let now = Utc::now().naive_utc().format(DATETIME_FMT).to_string();
    let count = conn.execute(
        "UPDATE reservas SET estado = ?1, updated_at = ?2 WHERE id = ?3",
        params![estado.as_str(), now, id],
    )?;
    Ok(count > 0)
}

pub fn delete_reserva(conn: &Connection, id: i64) -> anyhow::Result<bool> {
    let count = conn.execute("DELETE FROM reservas WHERE id = ?1", params![id])?;
    Ok(count > 0)
}

pub fn get_reservas(conn: &Connection) -> anyhow::Result<Vec<Reserva>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {RESERVA_COLUMNS} FROM reservas ORDER BY id ASC"
    ))?;

    let rows = stmt.query_map([], |row| Ok(parse_reserva_row(row)))?;

    let mut reservas = vec![];
    for row in rows {
        reservas.push(row??);
    }
    Ok(reservas)
}

fn parse_reserva_row(row: &rusqlite::Row) -> anyhow::Result<Reserva> {
    let fecha_str: String = row.get(4)?;
    let hora_inicio_str: String = row.get(5)?;
    let hora_fin_str: String = row.get(6)?;
    let estado_str: String = row.get(11)?;
    let created_at_str: String = row.get(13)?;
    let updated_at_str: String = row.get(14)?;

    Ok(Reserva {
        id: row.get(0)?,
        cliente_nombre: row.get(1)?,
        cliente_telefono: row.get(2)?,
        cliente_email: row.get(3)?,
        fecha_evento: NaiveDate::parse_from_str(&fecha_str, DATE_FMT)
            .unwrap_or_else(|_| Utc::now().date_naive()),
        hora_inicio: NaiveTime::parse_from_str(&hora_inicio_str, TIME_FMT)
            .unwrap_or(NaiveTime::MIN),
        hora_fin: NaiveTime::parse_from_str(&hora_fin_str, TIME_FMT).unwrap_or(NaiveTime::MIN),
        num_invitados: row.get(7)?,
        tipo_celebracion: row.get(8)?,
        precio: row.get(9)?,
        anticipo: row.get(10)?,
        estado: EstadoReserva::parse(&estado_str).unwrap_or(EstadoReserva::Pendiente),
        notas: row.get(12)?,
        created_at: parse_datetime(&created_at_str),
        updated_at: parse_datetime(&updated_at_str),
        user_id: row.get(15)?,
    })
}

// ── Mensajes ──

const MENSAJE_COLUMNS: &str = "id, reserva_id, telefono_destino, telefono_origen, contenido, \
     tipo, direccion, estado, twilio_sid, num_media, media_urls, media_types, enviado_at, user_id";

pub fn insert_mensaje(conn: &Connection, mensaje: &Mensaje) -> anyhow::Result<i64> {
    conn.execute(
        "INSERT INTO mensajes (reserva_id, telefono_destino, telefono_origen, contenido, tipo,
             direccion, estado, twilio_sid, num_media, media_urls, media_types, enviado_at, user_id)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
        params![
            mensaje.reserva_id,
            mensaje.telefono_destino,
            mensaje.telefono_origen,
            mensaje.contenido,
            mensaje.tipo,
            mensaje.direccion.as_str(),
            mensaje.estado.as_str(),
            mensaje.twilio_sid,
            mensaje.num_media,
            mensaje.media_urls,
            mensaje.media_types,
            mensaje.enviado_at.format(DATETIME_FMT).to_string(),
            mensaje.user_id,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// All messages, newest first.
pub fn get_mensajes_desc(conn: &Connection) -> anyhow::Result<Vec<Mensaje>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {MENSAJE_COLUMNS} FROM mensajes ORDER BY enviado_at DESC, id DESC"
    ))?;

    let rows = stmt.query_map([], |row| Ok(parse_mensaje_row(row)))?;

    let mut mensajes = vec![];
    for row in rows {
        mensajes.push(row??);
    }
    Ok(mensajes)
}

/// Full history with one counterpart number, oldest first.
pub fn get_mensajes_para_telefono(
    conn: &Connection,
    fingerprint: &str,
) -> anyhow::Result<Vec<Mensaje>> {
    if fingerprint.is_empty() {
        return Ok(vec![]);
    }

    let mut stmt = conn.prepare(&format!(
        "SELECT {MENSAJE_COLUMNS} FROM mensajes
         WHERE telefono_destino LIKE '%' || ?1 || '%'
            OR telefono_origen LIKE '%' || ?1 || '%'
         ORDER BY enviado_at ASC, id ASC"
    ))?;

    let rows = stmt.query_map(params![fingerprint], |row| Ok(parse_mensaje_row(row)))?;

    let mut mensajes = vec![];
    for row in rows {
        mensajes.push(row??);
    }
    Ok(mensajes)
}

pub fn get_mensajes_por_reserva(conn: &Connection, reserva_id: i64) -> anyhow::Result<Vec<Mensaje>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {MENSAJE_COLUMNS} FROM mensajes WHERE reserva_id = ?1 ORDER BY enviado_at ASC, id ASC"
    ))?;

    let rows = stmt.query_map(params![reserva_id], |row| Ok(parse_mensaje_row(row)))?;

    let mut mensajes = vec![];
    for row in rows {
        mensajes.push(row??);
    }
    Ok(mensajes)
}

fn parse_mensaje_row(row: &rusqlite::Row) -> anyhow::Result<Mensaje> {
    let direccion_str: String = row.get(6)?;
    let estado_str: String = row.get(7)?;
    let enviado_at_str: String = row.get(12)?;

    Ok(Mensaje {
        id: row.get(0)?,
        reserva_id: row.get(1)?,
        telefono_destino: row.get(2)?,
        telefono_origen: row.get(3)?,
        contenido: row.get(4)?,
        tipo: row.get(5)?,
        direccion: Direccion::parse(&direccion_str),
        estado: EstadoMensaje::parse(&estado_str),
        twilio_sid: row.get(8)?,
        num_media: row.get(9)?,
        media_urls: row.get(10)?,
        media_types: row.get(11)?,
        enviado_at: parse_datetime(&enviado_at_str),
        user_id: row.get(13)?,
    })
}

fn parse_datetime(s: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(s, DATETIME_FMT).unwrap_or_else(|_| Utc::now().naive_utc())
}
