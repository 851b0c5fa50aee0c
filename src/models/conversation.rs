use serde::Serialize;

use super::{Direccion, EstadoMensaje};

/// One entry in the conversation list: a counterpart number summarized by
/// its most recent message.
#[derive(Debug, Clone, Serialize)]
pub struct ConversationSummary {
    pub telefono: String,
    pub nombre: String,
    pub ultimo_mensaje: String,
    pub ultimo_mensaje_fecha: String,
    pub no_leidos: i64,
    pub tiene_multimedia: bool,
}

/// A message as rendered inside a conversation view, attachments decoded.
#[derive(Debug, Clone, Serialize)]
pub struct ConversationMessage {
    pub id: i64,
    pub contenido: String,
    pub direccion: Direccion,
    pub estado: EstadoMensaje,
    pub fecha: String,
    pub telefono_origen: String,
    pub telefono_destino: String,
    pub num_media: i64,
    pub media_urls: Vec<String>,
    pub media_types: Vec<String>,
}
