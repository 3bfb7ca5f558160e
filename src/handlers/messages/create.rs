use axum::{
    extract::{rejection::JsonRejection, State},
    Extension, Json,
};
use serde::Deserialize;
use std::collections::HashMap;

use crate::app::AppState;
use crate::database::models::{CreatedMessage, NewMessage};
use crate::error::ApiError;
use crate::middleware::{AuthUser, MessageResponse, MessageResult};

#[derive(Debug, Deserialize)]
pub struct CreateMessageRequest {
    pub to_username: String,
    pub body: String,
}

impl CreateMessageRequest {
    fn validate(&self) -> Result<(), ApiError> {
        let mut field_errors = HashMap::new();
        if self.to_username.trim().is_empty() {
            field_errors.insert("to_username".to_string(), "must not be blank".to_string());
        }
        if self.body.trim().is_empty() {
            field_errors.insert("body".to_string(), "must not be blank".to_string());
        }

        if field_errors.is_empty() {
            Ok(())
        } else {
            Err(ApiError::validation_error("Invalid message", Some(field_errors)))
        }
    }
}

/// POST /messages - send a message from the authenticated user
///
/// Expected Input:
/// ```json
/// { "to_username": "bob", "body": "hi" }
/// ```
///
/// The sender is always taken from the token; a `from_username` in the body is ignored.
pub async fn message_post(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    payload: Result<Json<CreateMessageRequest>, JsonRejection>,
) -> MessageResult<CreatedMessage> {
    let Json(payload) = payload?;
    payload.validate()?;

    let created = state
        .store
        .create(NewMessage {
            from_username: user.username,
            to_username: payload.to_username,
            body: payload.body,
        })
        .await?;

    tracing::info!(
        "Message {} sent from '{}' to '{}'",
        created.id,
        created.from_username,
        created.to_username
    );

    Ok(MessageResponse::new(created))
}
