use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

/// A reserved event slot at the venue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reserva {
    pub id: i64,
    pub cliente_nombre: String,
    pub cliente_telefono: String,
    pub cliente_email: Option<String>,
    pub fecha_evento: NaiveDate,
    pub hora_inicio: NaiveTime,
    pub hora_fin: NaiveTime,
    pub num_invitados: i64,
    pub tipo_celebracion: Option<String>,
    pub precio: f64,
    pub anticipo: f64,
    pub estado: EstadoReserva,
    pub notas: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub user_id: Option<i64>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EstadoReserva {
    Pendiente,
    Confirmada,
    Cancelada,
}

impl EstadoReserva {
    pub fn as_str(&self) -> &'static str {
        match self {
            EstadoReserva::Pendiente => "pendiente",
            EstadoReserva::Confirmada => "confirmada",
            EstadoReserva::Cancelada => "cancelada",
        }
    }

    /// None for anything outside the three known states.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pendiente" => Some(EstadoReserva::Pendiente),
            "confirmada" => Some(EstadoReserva::Confirmada),
            "cancelada" => Some(EstadoReserva::Cancelada),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_estado_round_trip() {
        for estado in [
            EstadoReserva::Pendiente,
            EstadoReserva::Confirmada,
            EstadoReserva::Cancelada,
        ] {
            assert_eq!(EstadoReserva::parse(estado.as_str()), Some(estado));
        }
    }

    #[test]
    fn test_estado_rejects_unknown() {
        assert_eq!(EstadoReserva::parse("confirmed"), None);
        assert_eq!(EstadoReserva::parse(""), None);
    }
}
