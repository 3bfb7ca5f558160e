use axum::{
    extract::{Path, Request, State},
    middleware::Next,
    response::Response,
};

use super::auth::AuthUser;
use crate::app::AppState;
use crate::database::models::{MessageDetail, MessageId};
use crate::error::ApiError;

/// Per-request context handed to the message handlers: who is asking, and about what
#[derive(Clone, Debug)]
pub struct MessageContext {
    pub user: AuthUser,
    pub message: MessageDetail,
}

/// Resolve `:id` from the route and load the message it names.
///
/// Runs after [`super::ensure_logged_in`], so the caller is always known here.
pub async fn load_message(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let user = request
        .extensions()
        .get::<AuthUser>()
        .cloned()
        .ok_or_else(|| ApiError::unauthorized("Authentication required"))?;

    let id = parse_message_id(&raw_id)?;
    let message = state.store.get(id).await?;

    request.extensions_mut().insert(MessageContext { user, message });
    Ok(next.run(request).await)
}

fn parse_message_id(raw: &str) -> Result<MessageId, ApiError> {
    raw.parse::<MessageId>()
        .map_err(|_| ApiError::bad_request(format!("Invalid message id: {}", raw)))
}
