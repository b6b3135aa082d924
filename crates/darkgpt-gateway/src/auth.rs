// SPDX-FileCopyrightText: 2026 DarkGPT Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bearer token authentication middleware.

use axum::extract::{Request, State};
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::Response;
use darkgpt_core::{AuthAdapter, DarkgptError, UserProfile};

use crate::error::ApiError;
use crate::server::GatewayState;

/// The authenticated caller, inserted into request extensions.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub profile: UserProfile,
    /// The bearer token the request was made with.
    pub token: String,
}

/// Resolves `Authorization: Bearer <token>` to a user or rejects with 401.
pub async fn auth_middleware(
    State(state): State<GatewayState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .ok_or_else(|| DarkgptError::Auth("missing bearer token".into()))?;

    let profile = state.identity.authenticate(&token).await?;
    request
        .extensions_mut()
        .insert(AuthUser { profile, token });
    Ok(next.run(request).await)
}
