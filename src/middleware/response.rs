use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use serde_json::json;

/// Wraps a payload in the `{"message": ...}` envelope used by every message route
#[derive(Debug)]
pub struct MessageResponse<T: Serialize> {
    pub message: T,
}

impl<T: Serialize> MessageResponse<T> {
    pub fn new(message: T) -> Self {
        Self { message }
    }
}

impl<T: Serialize> IntoResponse for MessageResponse<T> {
    fn into_response(self) -> Response {
        let message = match serde_json::to_value(&self.message) {
            Ok(value) => value,
            Err(e) => {
                tracing::error!("Failed to serialize response data: {}", e);
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({
                        "error": true,
                        "status": 500,
                        "code": "INTERNAL_SERVER_ERROR",
                        "message": "Failed to serialize response data"
                    })),
                )
                    .into_response();
            }
        };

        (StatusCode::OK, Json(json!({ "message": message }))).into_response()
    }
}

// Convenience type alias
pub type MessageResult<T> = Result<MessageResponse<T>, crate::error::ApiError>;
