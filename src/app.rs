use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::auth::JwtKeys;
use crate::config::{AppConfig, Environment};
use crate::database::MessageStore;
use crate::handlers;
use crate::middleware::{authenticate_jwt, ensure_logged_in, load_message};

/// Shared, read-only state handed to every request
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn MessageStore>,
    pub jwt: JwtKeys,
}

impl AppState {
    pub fn new(store: Arc<dyn MessageStore>, jwt: JwtKeys) -> Self {
        Self { store, jwt }
    }
}

/// Full application router with global layers from `config`
pub fn app(state: AppState, config: &AppConfig) -> Router {
    let router = Router::new()
        // Public
        .route("/", get(handlers::service::root))
        .route("/health", get(handlers::service::health))
        // Protected
        .nest("/messages", message_routes(state.clone()))
        // Global middleware
        .layer(DefaultBodyLimit::max(config.api.max_request_size_bytes))
        .layer(cors_layer(config));

    let router = if config.api.enable_request_logging {
        router.layer(TraceLayer::new_for_http())
    } else {
        router
    };

    router.with_state(state)
}

/// Message routes behind the guard pipeline:
/// authenticate_jwt -> ensure_logged_in -> load_message (id routes only)
fn message_routes(state: AppState) -> Router<AppState> {
    use handlers::messages;

    let logged_in = ServiceBuilder::new()
        .layer(from_fn_with_state(state.clone(), authenticate_jwt))
        .layer(from_fn(ensure_logged_in));

    let with_message = logged_in
        .clone()
        .layer(from_fn_with_state(state, load_message));

    let collection = Router::new()
        .route("/", post(messages::message_post))
        .route_layer(logged_in);

    let item = Router::new()
        .route("/:id", get(messages::message_get))
        .route("/:id/read", post(messages::message_read))
        .route_layer(with_message);

    collection.merge(item)
}

fn cors_layer(config: &AppConfig) -> CorsLayer {
    if !config.security.enable_cors {
        return CorsLayer::new();
    }
    if config.environment == Environment::Development {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = config
        .security
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
}
