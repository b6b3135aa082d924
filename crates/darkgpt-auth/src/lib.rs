// SPDX-FileCopyrightText: 2026 DarkGPT Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Email/password identity provider for DarkGPT.
//!
//! Users sign up with a name, email and password. Passwords are stored as
//! argon2id PHC strings. A successful login yields an opaque bearer token
//! that [`IdentityService`] resolves back to the user through the
//! [`AuthAdapter`](darkgpt_core::AuthAdapter) trait. Tokens live in memory
//! and do not survive a restart.

pub mod password;
pub mod service;
pub mod token;
pub mod validation;

pub use service::{IdentityService, LoginSession};
pub use validation::SignupForm;
