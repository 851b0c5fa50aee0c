pub mod auth;
pub mod mensajes;
pub mod messaging;
pub mod phone;
pub mod reservas;
