use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};

use crate::app::AppState;
use crate::auth::Claims;
use crate::error::ApiError;

/// Authenticated user context extracted from JWT
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthUser {
    pub username: String,
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            username: claims.username,
        }
    }
}

/// Decode a bearer token when one is present and attach the caller to the request.
///
/// Never rejects on its own: requests without a usable token continue
/// anonymously and are turned away by [`ensure_logged_in`].
pub async fn authenticate_jwt(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    match extract_jwt_from_headers(request.headers()) {
        Ok(Some(token)) => match state.jwt.verify(&token) {
            Ok(claims) => {
                tracing::debug!("Authenticated request for '{}'", claims.username);
                request.extensions_mut().insert(AuthUser::from(claims));
            }
            Err(e) => tracing::warn!("Rejected bearer token: {}", e),
        },
        Ok(None) => {}
        Err(msg) => tracing::warn!("Ignoring Authorization header: {}", msg),
    }

    next.run(request).await
}

/// Short-circuit with 401 unless an earlier stage established the caller
pub async fn ensure_logged_in(request: Request, next: Next) -> Result<Response, ApiError> {
    if request.extensions().get::<AuthUser>().is_none() {
        return Err(ApiError::unauthorized("Authentication required"));
    }

    Ok(next.run(request).await)
}

/// Extract JWT token from Authorization header. `Ok(None)` when no header was sent.
fn extract_jwt_from_headers(headers: &HeaderMap) -> Result<Option<String>, String> {
    let Some(auth_header) = headers.get(axum::http::header::AUTHORIZATION) else {
        return Ok(None);
    };

    let auth_str = auth_header
        .to_str()
        .map_err(|_| "Invalid Authorization header format".to_string())?;

    if let Some(token) = auth_str.strip_prefix("Bearer ") {
        if token.trim().is_empty() {
            return Err("Empty JWT token".to_string());
        }
        Ok(Some(token.trim().to_string()))
    } else {
        Err("Authorization header must use Bearer token format".to_string())
    }
}
