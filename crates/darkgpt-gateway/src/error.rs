// SPDX-FileCopyrightText: 2026 DarkGPT Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mapping of [`DarkgptError`] to HTTP responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use darkgpt_core::DarkgptError;
use serde::Serialize;
use tracing::warn;

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error description.
    pub error: String,
}

/// A [`DarkgptError`] on its way to the client.
#[derive(Debug)]
pub struct ApiError(pub DarkgptError);

impl From<DarkgptError> for ApiError {
    fn from(err: DarkgptError) -> Self {
        Self(err)
    }
}

/// HTTP status for each error kind.
pub fn status_for(err: &DarkgptError) -> StatusCode {
    match err {
        DarkgptError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        DarkgptError::Auth(_) => StatusCode::UNAUTHORIZED,
        DarkgptError::SessionBusy => StatusCode::CONFLICT,
        DarkgptError::Config(_) | DarkgptError::PersistenceUnavailable(_) => {
            StatusCode::SERVICE_UNAVAILABLE
        }
        DarkgptError::Provider { .. } | DarkgptError::ToolExecution { .. } => {
            StatusCode::BAD_GATEWAY
        }
        DarkgptError::Storage { .. } | DarkgptError::Internal(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = status_for(&self.0);
        let error = match &self.0 {
            // Store internals stay in the log.
            DarkgptError::Storage { .. } | DarkgptError::Internal(_) => {
                warn!(error = %self.0, "request failed");
                "internal server error".to_string()
            }
            other => other.to_string(),
        };
        (status, Json(ErrorResponse { error })).into_response()
    }
}
