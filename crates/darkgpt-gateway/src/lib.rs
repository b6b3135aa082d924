// SPDX-FileCopyrightText: 2026 DarkGPT Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP gateway for DarkGPT.
//!
//! A JSON API over axum: account signup and login, reading the merged
//! conversation view and sending turns. Every `/v1` route except signup and
//! login requires a bearer token issued by login.

pub mod auth;
pub mod error;
pub mod handlers;
pub mod server;

pub use error::{ApiError, ErrorResponse};
pub use server::{body_limit_for, router, start_server, GatewayState};
