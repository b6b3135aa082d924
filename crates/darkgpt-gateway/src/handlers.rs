// SPDX-FileCopyrightText: 2026 DarkGPT Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers for the gateway REST API.

use axum::extract::State;
use axum::http::StatusCode;
use axum::{Extension, Json};
use darkgpt_auth::{LoginSession, SignupForm};
use darkgpt_core::{Message, UserProfile};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::server::GatewayState;

/// Response body for GET /health.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// "ok" or "degraded".
    pub status: String,
    /// Binary version.
    pub version: String,
}

/// Request body for POST /v1/auth/login.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Request body for POST /v1/messages.
#[derive(Debug, Deserialize)]
pub struct SendRequest {
    /// Message text. May be empty when an image is attached.
    #[serde(default)]
    pub content: String,
    /// Image as a `data:` URI.
    #[serde(default)]
    pub image: Option<String>,
    /// Expert mode: the backend must search the web before answering.
    #[serde(default)]
    pub use_web_search: bool,
}

/// Response body for POST /v1/messages.
#[derive(Debug, Serialize)]
pub struct SendResponse {
    pub reply: Message,
}

/// Response body for GET /v1/messages.
#[derive(Debug, Serialize)]
pub struct MessagesResponse {
    pub messages: Vec<Message>,
}

/// GET /health
pub async fn get_health(State(state): State<GatewayState>) -> Json<HealthResponse> {
    let status = if state.identity_health().await {
        "ok"
    } else {
        "degraded"
    };
    Json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// POST /v1/auth/signup
pub async fn post_signup(
    State(state): State<GatewayState>,
    Json(form): Json<SignupForm>,
) -> Result<(StatusCode, Json<UserProfile>), ApiError> {
    let profile = state.identity.signup(&form).await?;
    Ok((StatusCode::CREATED, Json(profile)))
}

/// POST /v1/auth/login
pub async fn post_login(
    State(state): State<GatewayState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<LoginSession>, ApiError> {
    let session = state.identity.login(&body.email, &body.password).await?;
    Ok(Json(session))
}

/// POST /v1/auth/logout
pub async fn post_logout(
    State(state): State<GatewayState>,
    Extension(user): Extension<AuthUser>,
) -> StatusCode {
    state.identity.logout(&user.token);
    debug!(user_id = %user.profile.id, "session closed");
    StatusCode::NO_CONTENT
}

/// GET /v1/messages
pub async fn get_messages(
    State(state): State<GatewayState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<MessagesResponse>, ApiError> {
    let session = state.sessions.get_or_load(&user.profile.id).await?;
    Ok(Json(MessagesResponse {
        messages: session.messages().await,
    }))
}

/// POST /v1/messages
pub async fn post_messages(
    State(state): State<GatewayState>,
    Extension(user): Extension<AuthUser>,
    Json(body): Json<SendRequest>,
) -> Result<Json<SendResponse>, ApiError> {
    let session = state.sessions.get_or_load(&user.profile.id).await?;
    let reply = session
        .send(&body.content, body.image, body.use_web_search)
        .await?;
    Ok(Json(SendResponse { reply }))
}
