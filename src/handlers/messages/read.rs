use axum::{extract::State, Extension};

use crate::app::AppState;
use crate::auth::authorize_mark_read;
use crate::database::models::ReadReceipt;
use crate::middleware::{MessageContext, MessageResponse, MessageResult};

/// POST /messages/:id/read - mark a message as read
///
/// Only the recipient may do this. Repeating the call is harmless and returns
/// the first `read_at`.
pub async fn message_read(
    State(state): State<AppState>,
    Extension(ctx): Extension<MessageContext>,
) -> MessageResult<ReadReceipt> {
    let MessageContext { user, message } = ctx;

    if let Err(denied) = authorize_mark_read(&message, &user.username).into_result() {
        tracing::warn!("'{}' denied mark-read of message {}", user.username, message.id);
        return Err(denied);
    }

    let receipt = state.store.mark_read(message.id).await?;
    tracing::info!("Message {} read by '{}'", receipt.id, user.username);

    Ok(MessageResponse::new(receipt))
}
