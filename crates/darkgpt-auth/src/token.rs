// SPDX-FileCopyrightText: 2026 DarkGPT Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Opaque session tokens.

use darkgpt_core::DarkgptError;
use ring::rand::{SecureRandom, SystemRandom};

const TOKEN_BYTES: usize = 32;

/// Returns 32 random bytes, hex-encoded.
pub fn generate_token() -> Result<String, DarkgptError> {
    let mut bytes = [0u8; TOKEN_BYTES];
    SystemRandom::new()
        .fill(&mut bytes)
        .map_err(|_| DarkgptError::Internal("failed to generate session token".into()))?;
    Ok(hex::encode(bytes))
}
