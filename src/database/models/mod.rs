pub mod message;
pub mod user;

pub use message::{CreatedMessage, MessageDetail, MessageId, NewMessage, ReadReceipt};
pub(crate) use message::MessageRow;
pub use user::UserSummary;
