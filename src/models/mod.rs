pub mod conversation;
pub mod mensaje;
pub mod reserva;
pub mod user;

pub use conversation::{ConversationMessage, ConversationSummary};
pub use mensaje::{Direccion, EstadoMensaje, Mensaje};
pub use reserva::{EstadoReserva, Reserva};
pub use user::User;
