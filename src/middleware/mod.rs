pub mod auth;
pub mod load_message;
pub mod response;

pub use auth::{authenticate_jwt, ensure_logged_in, AuthUser};
pub use load_message::{load_message, MessageContext};
pub use response::{MessageResponse, MessageResult};
