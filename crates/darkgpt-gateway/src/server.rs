// SPDX-FileCopyrightText: 2026 DarkGPT Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway HTTP server built on axum.
//!
//! Sets up routes, middleware, and shared state for the gateway.

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use darkgpt_agent::SessionRegistry;
use darkgpt_auth::IdentityService;
use darkgpt_config::model::GatewayConfig;
use darkgpt_core::{DarkgptError, HealthStatus, PluginAdapter};
use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::auth::auth_middleware;
use crate::handlers;

/// Room for the JSON envelope and message text around an image payload.
const BODY_HEADROOM: usize = 1024 * 1024;

/// Largest request body that can carry an image of `max_image_bytes` as a
/// base64 `data:` URI.
pub fn body_limit_for(max_image_bytes: usize) -> usize {
    max_image_bytes.div_ceil(3).saturating_mul(4).saturating_add(BODY_HEADROOM)
}

/// Shared state for axum request handlers.
#[derive(Clone)]
pub struct GatewayState {
    pub identity: Arc<IdentityService>,
    pub sessions: Arc<SessionRegistry>,
    /// Request body cap, see [`body_limit_for`].
    pub max_body_bytes: usize,
}

impl GatewayState {
    /// Whether the identity provider (and the store behind it) is healthy.
    pub(crate) async fn identity_health(&self) -> bool {
        matches!(self.identity.health_check().await, Ok(HealthStatus::Healthy))
    }
}

/// Builds the router:
/// - GET /health
/// - POST /v1/auth/signup, POST /v1/auth/login
/// - POST /v1/auth/logout, GET /v1/messages, POST /v1/messages (bearer auth)
///
/// Bodies above `state.max_body_bytes` are rejected with 413.
pub fn router(state: GatewayState) -> Router {
    let max_body_bytes = state.max_body_bytes;
    let public_routes = Router::new()
        .route("/health", get(handlers::get_health))
        .route("/v1/auth/signup", post(handlers::post_signup))
        .route("/v1/auth/login", post(handlers::post_login))
        .with_state(state.clone());

    let api_routes = Router::new()
        .route("/v1/auth/logout", post(handlers::post_logout))
        .route(
            "/v1/messages",
            get(handlers::get_messages).post(handlers::post_messages),
        )
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ))
        .with_state(state);

    Router::new()
        .merge(public_routes)
        .merge(api_routes)
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Binds to `host:port` and serves until `shutdown` is cancelled.
pub async fn start_server(
    config: &GatewayConfig,
    state: GatewayState,
    shutdown: CancellationToken,
) -> Result<(), DarkgptError> {
    let app = router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| DarkgptError::Config(format!("failed to bind gateway to {addr}: {e}")))?;

    tracing::info!("gateway listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await
        .map_err(|e| DarkgptError::Internal(format!("gateway server error: {e}")))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_limit_fits_a_full_size_image() {
        let max_image: usize = 4 * 1024 * 1024;
        let encoded = max_image.div_ceil(3) * 4 + "data:image/webp;base64,".len();
        assert!(body_limit_for(max_image) > encoded + 64 * 1024);
        assert!(body_limit_for(0) >= BODY_HEADROOM);
    }
}
