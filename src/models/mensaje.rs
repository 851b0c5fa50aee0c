use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// One WhatsApp message, inbound or outbound. Immutable once recorded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Mensaje {
    pub id: i64,
    /// Bookings own their messages; unassociated messages keep this NULL.
    pub reserva_id: Option<i64>,
    pub telefono_destino: String,
    pub telefono_origen: String,
    pub contenido: String,
    pub tipo: String,
    pub direccion: Direccion,
    pub estado: EstadoMensaje,
    pub twilio_sid: Option<String>,
    pub num_media: i64,
    /// JSON-encoded list of attachment URLs, as handed over by the provider.
    pub media_urls: Option<String>,
    pub media_types: Option<String>,
    pub enviado_at: NaiveDateTime,
    pub user_id: Option<i64>,
}

impl Mensaje {
    pub fn media_url_list(&self) -> Vec<String> {
        decode_list(self.media_urls.as_deref())
    }

    pub fn media_type_list(&self) -> Vec<String> {
        decode_list(self.media_types.as_deref())
    }
}

fn decode_list(raw: Option<&str>) -> Vec<String> {
    raw.map(|s| serde_json::from_str(s).unwrap_or_default())
        .unwrap_or_default()
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Direccion {
    Saliente,
    Entrante,
}

impl Direccion {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direccion::Saliente => "saliente",
            Direccion::Entrante => "entrante",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s {
            "entrante" => Direccion::Entrante,
            _ => Direccion::Saliente,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EstadoMensaje {
    Enviado,
    Fallido,
    Recibido,
}

impl EstadoMensaje {
    pub fn as_str(&self) -> &'static str {
        match self {
            EstadoMensaje::Enviado => "enviado",
            EstadoMensaje::Fallido => "fallido",
            EstadoMensaje::Recibido => "recibido",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s {
            "fallido" => EstadoMensaje::Fallido,
            "recibido" => EstadoMensaje::Recibido,
            _ => EstadoMensaje::Enviado,
        }
    }
}
