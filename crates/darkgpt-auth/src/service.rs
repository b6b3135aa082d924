// SPDX-FileCopyrightText: 2026 DarkGPT Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Identity service: signup, login, logout and token authentication.

use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use serde::Serialize;
use tracing::{debug, info};

use darkgpt_config::model::AuthConfig;
use darkgpt_core::types::{timestamp_now, UserProfile, UserRecord};
use darkgpt_core::{
    AdapterType, AuthAdapter, DarkgptError, HealthStatus, PluginAdapter, StorageAdapter,
};

use crate::password::{hash_password, verify_password};
use crate::token::generate_token;
use crate::validation::{normalize_email, SignupForm};

const INVALID_CREDENTIALS: &str = "invalid email or password";

/// Result of a successful login.
#[derive(Debug, Clone, Serialize)]
pub struct LoginSession {
    pub token: String,
    pub user: UserProfile,
}

/// Email/password identity provider backed by the message store's user table.
///
/// Session tokens map to user ids and are held in memory only.
pub struct IdentityService {
    storage: Arc<dyn StorageAdapter>,
    rules: AuthConfig,
    sessions: DashMap<String, String>,
}

impl IdentityService {
    pub fn new(storage: Arc<dyn StorageAdapter>, rules: AuthConfig) -> Self {
        Self {
            storage,
            rules,
            sessions: DashMap::new(),
        }
    }

    /// Registers a new account. The email is stored lowercased.
    pub async fn signup(&self, form: &SignupForm) -> Result<UserProfile, DarkgptError> {
        let form = form.validate(&self.rules)?;

        if self.storage.get_user_by_email(&form.email).await?.is_some() {
            return Err(DarkgptError::Auth("email already in use".into()));
        }

        let password = form.password.clone();
        let password_hash = tokio::task::spawn_blocking(move || hash_password(&password))
            .await
            .map_err(|e| DarkgptError::Internal(format!("password hashing task failed: {e}")))??;

        let profile = UserProfile {
            id: uuid::Uuid::new_v4().to_string(),
            name: form.name,
            email: form.email,
            created_at: timestamp_now(),
        };
        self.storage
            .create_user(&UserRecord {
                profile: profile.clone(),
                password_hash,
            })
            .await?;

        info!(user_id = %profile.id, "account created");
        Ok(profile)
    }

    /// Verifies credentials and opens a session.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginSession, DarkgptError> {
        let email = normalize_email(email);
        let Some(record) = self.storage.get_user_by_email(&email).await? else {
            debug!("login rejected: unknown email");
            return Err(DarkgptError::Auth(INVALID_CREDENTIALS.into()));
        };

        let password = password.to_string();
        let stored = record.password_hash.clone();
        let verified = tokio::task::spawn_blocking(move || verify_password(&password, &stored))
            .await
            .map_err(|e| DarkgptError::Internal(format!("password check task failed: {e}")))?;
        if !verified {
            debug!(user_id = %record.profile.id, "login rejected: wrong password");
            return Err(DarkgptError::Auth(INVALID_CREDENTIALS.into()));
        }

        let token = generate_token()?;
        self.sessions
            .insert(token.clone(), record.profile.id.clone());
        info!(user_id = %record.profile.id, "session opened");
        Ok(LoginSession {
            token,
            user: record.profile,
        })
    }

    /// Ends a session. Returns `false` if the token was not active.
    pub fn logout(&self, token: &str) -> bool {
        self.sessions.remove(token).is_some()
    }

    /// Number of active sessions.
    pub fn active_sessions(&self) -> usize {
        self.sessions.len()
    }
}

#[async_trait]
impl PluginAdapter for IdentityService {
    fn name(&self) -> &str {
        "password"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Auth
    }

    async fn health_check(&self) -> Result<HealthStatus, DarkgptError> {
        self.storage.health_check().await
    }

    async fn shutdown(&self) -> Result<(), DarkgptError> {
        self.sessions.clear();
        Ok(())
    }
}

#[async_trait]
impl AuthAdapter for IdentityService {
    async fn authenticate(&self, token: &str) -> Result<UserProfile, DarkgptError> {
        let user_id = self
            .sessions
            .get(token)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| DarkgptError::Auth("invalid or expired session token".into()))?;

        match self.storage.get_user(&user_id).await? {
            Some(record) => Ok(record.profile),
            None => {
                self.sessions.remove(token);
                Err(DarkgptError::Auth("session user no longer exists".into()))
            }
        }
    }
}
