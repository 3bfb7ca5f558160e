use axum::Extension;

use crate::auth::authorize_view;
use crate::database::models::MessageDetail;
use crate::middleware::{MessageContext, MessageResponse, MessageResult};

/// GET /messages/:id - message detail with both participants
///
/// Only the sender or the recipient may view a message.
pub async fn message_get(Extension(ctx): Extension<MessageContext>) -> MessageResult<MessageDetail> {
    let MessageContext { user, message } = ctx;

    if let Err(denied) = authorize_view(&message, &user.username).into_result() {
        tracing::warn!("'{}' denied view of message {}", user.username, message.id);
        return Err(denied);
    }

    Ok(MessageResponse::new(message))
}
